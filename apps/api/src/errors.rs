use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cv::service::CvError;

pub const CV_NOT_FOUND: &str = "CV not found";

/// Error body: `{ "error": string, "details"?: string }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input. `message` names the operation, `details` the cause.
    #[error("{message}: {details}")]
    Validation { message: String, details: String },

    #[error("Method {method} Not Allowed")]
    MethodNotAllowed {
        method: Method,
        allow: &'static str,
    },

    /// Unexpected failure. The cause is logged, never sent to the client.
    #[error("{message}: {source}")]
    Server {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Maps a service error onto the HTTP taxonomy for the operation named by `message`.
    pub fn from_cv(message: &str, err: CvError) -> Self {
        match err {
            CvError::NotFound => AppError::NotFound(CV_NOT_FOUND.to_string()),
            CvError::Invalid(e) => AppError::Validation {
                message: message.to_string(),
                details: e.to_string(),
            },
            CvError::SlugTaken(slug) => AppError::Validation {
                message: message.to_string(),
                details: format!("slug '{slug}' is already taken"),
            },
            CvError::Store(e) => AppError::Server {
                message: message.to_string(),
                source: e.into(),
            },
        }
    }

    pub fn from_rejection(message: &str, rejection: JsonRejection) -> Self {
        AppError::Validation {
            message: message.to_string(),
            details: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: msg.clone(),
                    details: None,
                },
            ),
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message.clone(),
                    details: Some(details.clone()),
                },
            ),
            AppError::MethodNotAllowed { method, allow } => {
                let body = ErrorBody {
                    error: format!("Method {method} Not Allowed"),
                    details: None,
                };
                let mut response = (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::ALLOW, HeaderValue::from_static(allow));
                return response;
            }
            AppError::Server { message, source } => {
                tracing::error!("{message}: {source:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: message.clone(),
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
