//! Upload progress handler

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use pixgate_core::{AppError, ProgressRecord, ProgressStore};
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Poll progress for one upload batch
///
/// Any token that does not resolve to a live record reads as not found,
/// including expired and malformed ids.
#[utoipa::path(
    get,
    path = "/api/upload-progress/{upload_id}",
    tag = "uploads",
    params(
        ("upload_id" = String, Path, description = "Upload id returned by the upload endpoint")
    ),
    responses(
        (status = 200, description = "Current batch progress", body = ProgressRecord),
        (status = 404, description = "Upload not found", body = ErrorResponse)
    )
)]
pub async fn get_upload_progress(
    State(state): State<Arc<AppState>>,
    Path(upload_id): Path<String>,
) -> Result<Json<ProgressRecord>, HttpAppError> {
    Uuid::parse_str(&upload_id)
        .ok()
        .and_then(|id| state.uploads.progress.get(&id))
        .map(Json)
        .ok_or_else(|| HttpAppError(AppError::NotFound("Upload not found".to_string())))
}
