//! Axum route handlers for the CV API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::cv::service::{create_cv, delete_cv, get_cv, list_cvs, patch_cv, replace_cv};
use crate::errors::{AppError, CV_NOT_FOUND};
use crate::models::cv::{Cv, CvDraft, CvSummary};
use crate::state::AppState;

const LIST_FAILED: &str = "Failed to fetch CVs";
const CREATE_FAILED: &str = "Failed to create CV";
const FETCH_FAILED: &str = "Failed to fetch CV";
const UPDATE_FAILED: &str = "Failed to update CV";
const PATCH_FAILED: &str = "Failed to patch CV";
const DELETE_FAILED: &str = "Failed to delete CV";

pub const COLLECTION_METHODS: &str = "GET, POST";
pub const ITEM_METHODS: &str = "GET, PUT, PATCH, DELETE";

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Identifiers that are not UUIDs can never resolve, so they read as not-found.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(CV_NOT_FOUND.to_string()))
}

/// GET /api/cv
pub async fn handle_list_cvs(
    State(state): State<AppState>,
) -> Result<Json<Vec<CvSummary>>, AppError> {
    let cvs = list_cvs(state.store.as_ref())
        .await
        .map_err(|e| AppError::from_cv(LIST_FAILED, e))?;
    Ok(Json(cvs))
}

/// POST /api/cv
pub async fn handle_create_cv(
    State(state): State<AppState>,
    payload: Result<Json<CvDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Cv>), AppError> {
    let Json(draft) = payload.map_err(|r| AppError::from_rejection(CREATE_FAILED, r))?;
    let cv = create_cv(state.store.as_ref(), draft)
        .await
        .map_err(|e| AppError::from_cv(CREATE_FAILED, e))?;
    Ok((StatusCode::CREATED, Json(cv)))
}

/// GET /api/cv/:id
pub async fn handle_get_cv(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Cv>, AppError> {
    let id = parse_id(&id)?;
    let cv = get_cv(state.store.as_ref(), id)
        .await
        .map_err(|e| AppError::from_cv(FETCH_FAILED, e))?;
    Ok(Json(cv))
}

/// PUT /api/cv/:id
///
/// Full replace. Validation runs before the lookup, so an invalid body against
/// an unknown id reports 400.
pub async fn handle_replace_cv(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CvDraft>, JsonRejection>,
) -> Result<Json<Cv>, AppError> {
    let Json(draft) = payload.map_err(|r| AppError::from_rejection(UPDATE_FAILED, r))?;
    let id = parse_id(&id)?;
    let cv = replace_cv(state.store.as_ref(), id, draft)
        .await
        .map_err(|e| AppError::from_cv(UPDATE_FAILED, e))?;
    Ok(Json(cv))
}

/// PATCH /api/cv/:id
pub async fn handle_patch_cv(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Cv>, AppError> {
    let Json(patch) = payload.map_err(|r| AppError::from_rejection(PATCH_FAILED, r))?;
    let id = parse_id(&id)?;
    let cv = patch_cv(state.store.as_ref(), id, patch)
        .await
        .map_err(|e| AppError::from_cv(PATCH_FAILED, e))?;
    Ok(Json(cv))
}

/// DELETE /api/cv/:id
pub async fn handle_delete_cv(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id(&id)?;
    delete_cv(state.store.as_ref(), id)
        .await
        .map_err(|e| AppError::from_cv(DELETE_FAILED, e))?;
    Ok(Json(DeleteResponse {
        message: "CV deleted successfully".to_string(),
    }))
}

/// Any other method on /api/cv
pub async fn collection_method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed {
        method,
        allow: COLLECTION_METHODS,
    }
}

/// Any other method on /api/cv/:id
pub async fn item_method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed {
        method,
        allow: ITEM_METHODS,
    }
}
