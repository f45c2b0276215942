use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::cv::store::{CvStore, StoreError};
use crate::models::cv::{Cv, CvFields, CvSummary};

/// Process-local store. Used with `STORAGE_BACKEND=memory` and in tests.
#[derive(Default)]
pub struct MemoryCvStore {
    docs: RwLock<HashMap<Uuid, Cv>>,
}

impl MemoryCvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CvStore for MemoryCvStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<CvSummary>, StoreError> {
        let docs = self.docs.read().await;
        let mut all: Vec<&Cv> = docs.values().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(all.into_iter().map(CvSummary::from).collect())
    }

    async fn insert(&self, id: Uuid, slug: &str, fields: &CvFields) -> Result<Cv, StoreError> {
        let mut docs = self.docs.write().await;
        if docs.values().any(|cv| cv.slug == slug) {
            return Err(StoreError::SlugTaken(slug.to_string()));
        }
        let now = Utc::now();
        let cv = Cv {
            id,
            slug: slug.to_string(),
            fields: fields.clone(),
            created_at: now,
            updated_at: now,
        };
        docs.insert(id, cv.clone());
        Ok(cv)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Cv>, StoreError> {
        Ok(self.docs.read().await.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, fields: &CvFields) -> Result<Option<Cv>, StoreError> {
        let mut docs = self.docs.write().await;
        Ok(docs.get_mut(&id).map(|cv| {
            cv.fields = fields.clone();
            cv.updated_at = Utc::now();
            cv.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.docs.write().await.remove(&id).is_some())
    }
}
