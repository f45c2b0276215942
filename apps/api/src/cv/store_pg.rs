use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::cv::store::{CvStore, StoreError};
use crate::models::cv::{Cv, CvFields, CvSummary};

/// One row of the `cvs` table. The CV content lives in `document` (JSONB).
#[derive(Debug, Clone, FromRow)]
pub struct CvRow {
    pub id: Uuid,
    pub slug: String,
    pub document: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CvRow> for Cv {
    type Error = serde_json::Error;

    fn try_from(row: CvRow) -> Result<Self, Self::Error> {
        Ok(Cv {
            id: row.id,
            slug: row.slug,
            fields: serde_json::from_value(row.document)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed store.
pub struct PgCvStore {
    pool: PgPool,
}

impl PgCvStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_slug_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl CvStore for PgCvStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self) -> Result<Vec<CvSummary>, StoreError> {
        let rows = sqlx::query_as::<_, CvRow>("SELECT * FROM cvs ORDER BY updated_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| Cv::try_from(row).map(|cv| CvSummary::from(&cv)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    async fn insert(&self, id: Uuid, slug: &str, fields: &CvFields) -> Result<Cv, StoreError> {
        let document = serde_json::to_value(fields)?;
        let row = sqlx::query_as::<_, CvRow>(
            r#"
            INSERT INTO cvs (id, slug, document, created_at, updated_at)
            VALUES ($1, $2, $3, now(), now())
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(slug)
        .bind(&document)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_slug_conflict(&e) {
                StoreError::SlugTaken(slug.to_string())
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(Cv::try_from(row)?)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Cv>, StoreError> {
        let row = sqlx::query_as::<_, CvRow>("SELECT * FROM cvs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Cv::try_from).transpose()?)
    }

    async fn update(&self, id: Uuid, fields: &CvFields) -> Result<Option<Cv>, StoreError> {
        let document = serde_json::to_value(fields)?;
        let row = sqlx::query_as::<_, CvRow>(
            "UPDATE cvs SET document = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&document)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Cv::try_from).transpose()?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM cvs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
