//! Pending-resolution review endpoints.
//!
//! These five routes are the entire decision surface: list the queue, add a
//! proposal, approve, reject, or save edited content. The request and
//! response bodies mirror the wire shapes in `mergegate_core::models`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use mergegate_core::models::{NewResolution, ResolutionRequest};

use super::status::ApiError;
use crate::AppState;

#[derive(Deserialize)]
struct CommentBody {
    comment: Option<String>,
}

#[derive(Deserialize)]
struct SaveBody {
    content: String,
}

#[derive(Serialize)]
struct AddResponse {
    success: bool,
    id: String,
}

#[derive(Serialize)]
struct ApproveResponse {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct OkResponse {
    success: bool,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/pending", get(list_pending))
        .route("/api/add", post(add_resolution))
        .route("/api/approve/:id", post(approve_resolution))
        .route("/api/reject/:id", post(reject_resolution))
        .route("/api/save/:id", post(save_resolution))
}

/// `GET /api/pending` — requests awaiting review, oldest first.
async fn list_pending(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ResolutionRequest>>, ApiError> {
    let pending = state.store.list().await?;
    Ok(Json(pending))
}

/// `POST /api/add` — queue a proposed resolution.
async fn add_resolution(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewResolution>, JsonRejection>,
) -> Result<Json<AddResponse>, ApiError> {
    let Json(new) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let id = state.store.propose(new).await?;
    Ok(Json(AddResponse { success: true, id }))
}

/// `POST /api/approve/:id` — apply the resolution to the working tree.
///
/// A missing or malformed body is treated as approval without a comment.
async fn approve_resolution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<CommentBody>>,
) -> Result<Json<ApproveResponse>, ApiError> {
    let comment = body.and_then(|Json(b)| b.comment);
    let message = state.store.approve(&id, comment.as_deref()).await?;
    info!(id = %id, "resolution approved");
    Ok(Json(ApproveResponse {
        success: true,
        message,
    }))
}

/// `POST /api/reject/:id` — discard the resolution, keeping the comment in
/// the rejection ledger.
async fn reject_resolution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<CommentBody>>,
) -> Result<Json<OkResponse>, ApiError> {
    let comment = body.and_then(|Json(b)| b.comment);
    state.store.reject(&id, comment.as_deref()).await?;
    info!(id = %id, "resolution rejected");
    Ok(Json(OkResponse { success: true }))
}

/// `POST /api/save/:id` — overwrite the proposed file content with a
/// reviewer edit.
async fn save_resolution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<SaveBody>, JsonRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let Json(SaveBody { content }) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    state.store.update(&id, &content).await?;
    Ok(Json(OkResponse { success: true }))
}
