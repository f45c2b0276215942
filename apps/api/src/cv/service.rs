//! CV operations behind the collection and item endpoints.
//!
//! Flow for every write: validate → single-document store call → return the
//! stored representation. There is no version check; the last write wins.

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cv::store::{CvStore, StoreError};
use crate::cv::validation::{validate_cv, ValidationError};
use crate::models::cv::{derive_slug, Cv, CvDraft, CvFields, CvSummary};

/// Consecutive millisecond values tried when a derived slug collides.
const MAX_SLUG_ATTEMPTS: i64 = 16;

/// Top-level keys a PATCH body cannot change.
const IMMUTABLE_KEYS: &[&str] = &["_id", "slug", "createdAt", "updatedAt"];

#[derive(Debug, Error)]
pub enum CvError {
    #[error("CV not found")]
    NotFound,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("slug '{0}' is already taken")]
    SlugTaken(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CvError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SlugTaken(slug) => CvError::SlugTaken(slug),
            other => CvError::Store(other),
        }
    }
}

pub async fn list_cvs(store: &dyn CvStore) -> Result<Vec<CvSummary>, CvError> {
    Ok(store.list().await?)
}

/// Validates and inserts a new CV. A missing or blank slug is derived from the
/// name and the current time; on collision the timestamp component is bumped.
pub async fn create_cv(store: &dyn CvStore, draft: CvDraft) -> Result<Cv, CvError> {
    let CvDraft { slug, fields } = draft;
    validate_cv(&fields)?;

    let id = Uuid::new_v4();

    if let Some(slug) = slug.filter(|s| !s.trim().is_empty()) {
        let cv = store.insert(id, &slug, &fields).await?;
        info!("Created CV {} with slug {} ({})", cv.id, cv.slug, store.backend());
        return Ok(cv);
    }

    let base_millis = Utc::now().timestamp_millis();
    let mut last_slug = String::new();
    for attempt in 0..MAX_SLUG_ATTEMPTS {
        let slug = derive_slug(&fields.first_name, &fields.last_name, base_millis + attempt);
        match store.insert(id, &slug, &fields).await {
            Ok(cv) => {
                info!("Created CV {} with slug {} ({})", cv.id, cv.slug, store.backend());
                return Ok(cv);
            }
            Err(StoreError::SlugTaken(taken)) => {
                warn!("Slug {taken} already taken, retrying");
                last_slug = taken;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(CvError::SlugTaken(last_slug))
}

pub async fn get_cv(store: &dyn CvStore, id: Uuid) -> Result<Cv, CvError> {
    store.find(id).await?.ok_or(CvError::NotFound)
}

/// Overwrites every field of the document. Lists are replaced wholesale and
/// absent fields fall back to their defaults. The stored slug is kept.
pub async fn replace_cv(store: &dyn CvStore, id: Uuid, draft: CvDraft) -> Result<Cv, CvError> {
    validate_cv(&draft.fields)?;
    let cv = store
        .update(id, &draft.fields)
        .await?
        .ok_or(CvError::NotFound)?;
    info!("Replaced CV {id}");
    Ok(cv)
}

/// Shallow top-level merge of `patch` into the stored document, then re-validation.
pub async fn patch_cv(
    store: &dyn CvStore,
    id: Uuid,
    patch: Map<String, Value>,
) -> Result<Cv, CvError> {
    let current = store.find(id).await?.ok_or(CvError::NotFound)?;
    let merged = merge_fields(&current.fields, patch)?;
    validate_cv(&merged)?;

    let cv = store
        .update(id, &merged)
        .await?
        .ok_or(CvError::NotFound)?;
    info!("Patched CV {id}");
    Ok(cv)
}

pub async fn delete_cv(store: &dyn CvStore, id: Uuid) -> Result<(), CvError> {
    if store.delete(id).await? {
        info!("Deleted CV {id}");
        Ok(())
    } else {
        Err(CvError::NotFound)
    }
}

/// Overlays each top-level key of `patch` onto `current`. A provided list
/// replaces the stored list; nothing is merged element-wise.
pub fn merge_fields(
    current: &CvFields,
    patch: Map<String, Value>,
) -> Result<CvFields, ValidationError> {
    let mut merged = match serde_json::to_value(current) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(ValidationError::malformed("stored CV is not an object")),
        Err(e) => return Err(ValidationError::malformed(e.to_string())),
    };

    for (key, value) in patch {
        if IMMUTABLE_KEYS.contains(&key.as_str()) {
            continue;
        }
        merged.insert(key, value);
    }

    serde_json::from_value(Value::Object(merged))
        .map_err(|e| ValidationError::malformed(e.to_string()))
}
