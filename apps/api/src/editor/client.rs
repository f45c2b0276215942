//! HTTP client for the CV API, used by the editing surface.
//!
//! Everything the editor does to stored CVs goes through [`CvApi`], so the
//! session logic can be driven against a fake in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::ErrorBody;
use crate::models::cv::{Cv, CvDraft, CvSummary};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("CV not found")]
    NotFound,

    /// The server answered with an error body.
    #[error("{error} (status {status})")]
    Rejected {
        status: u16,
        error: String,
        details: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait CvApi: Send + Sync {
    async fn list(&self) -> Result<Vec<CvSummary>, ClientError>;
    async fn get(&self, id: Uuid) -> Result<Cv, ClientError>;
    async fn create(&self, draft: &CvDraft) -> Result<Cv, ClientError>;
    async fn replace(&self, id: Uuid, draft: &CvDraft) -> Result<Cv, ClientError>;
    async fn patch(&self, id: Uuid, partial: &Map<String, Value>) -> Result<Cv, ClientError>;
    async fn delete(&self, id: Uuid) -> Result<(), ClientError>;
}

#[derive(Clone)]
pub struct HttpCvClient {
    client: Client,
    base_url: String,
}

impl HttpCvClient {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/api/cv", self.base_url)
    }

    fn item_url(&self, id: Uuid) -> String {
        format!("{}/api/cv/{}", self.base_url, id)
    }
}

/// Decodes a success body, or turns an error status into a `ClientError`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or(ErrorBody {
        error: text,
        details: None,
    });
    warn!("CV API returned {}: {}", status, body.error);
    Err(ClientError::Rejected {
        status: status.as_u16(),
        error: body.error,
        details: body.details,
    })
}

#[async_trait]
impl CvApi for HttpCvClient {
    async fn list(&self) -> Result<Vec<CvSummary>, ClientError> {
        let response = self.client.get(self.collection_url()).send().await?;
        decode(response).await
    }

    async fn get(&self, id: Uuid) -> Result<Cv, ClientError> {
        let response = self.client.get(self.item_url(id)).send().await?;
        decode(response).await
    }

    async fn create(&self, draft: &CvDraft) -> Result<Cv, ClientError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(draft)
            .send()
            .await?;
        let cv: Cv = decode(response).await?;
        debug!("Created CV {} ({})", cv.id, cv.slug);
        Ok(cv)
    }

    async fn replace(&self, id: Uuid, draft: &CvDraft) -> Result<Cv, ClientError> {
        let response = self
            .client
            .put(self.item_url(id))
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    async fn patch(&self, id: Uuid, partial: &Map<String, Value>) -> Result<Cv, ClientError> {
        let response = self
            .client
            .patch(self.item_url(id))
            .json(partial)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        let _: Value = decode(response).await?;
        Ok(())
    }
}
