//! Persistence gateway for CV documents.
//!
//! `AppState` holds an `Arc<dyn CvStore>`; the backend is chosen at startup from
//! `STORAGE_BACKEND`. Each call is a single-document operation. Timestamps are
//! owned by the store: `insert` sets both, `update` refreshes `updated_at`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::cv::{Cv, CvFields, CvSummary};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("slug '{0}' is already taken")]
    SlugTaken(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored document is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[async_trait]
pub trait CvStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// All CVs, most recently updated first.
    async fn list(&self) -> Result<Vec<CvSummary>, StoreError>;

    /// Inserts a new document. Fails with `SlugTaken` if the slug is in use.
    async fn insert(&self, id: Uuid, slug: &str, fields: &CvFields) -> Result<Cv, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Cv>, StoreError>;

    /// Overwrites the document content. `None` when the id does not resolve.
    async fn update(&self, id: Uuid, fields: &CvFields) -> Result<Option<Cv>, StoreError>;

    /// `false` when the id does not resolve.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
