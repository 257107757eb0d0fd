//! Photo batch upload handler

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use pixgate_core::models::upload::FailedUpload;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::PhotoUploadService;
use crate::state::AppState;
use crate::utils::upload::extract_upload_batch;

/// Response for a completed upload batch.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadPhotosResponse {
    pub success: bool,
    /// Token for polling batch progress
    #[serde(rename = "uploadId")]
    pub upload_id: Uuid,
    /// Shareable link to the provisioned folder
    #[serde(rename = "folderLink")]
    pub folder_link: String,
    pub message: String,
    /// Files that landed in the folder
    pub uploaded: Vec<String>,
    /// Files whose upload failed, with the reason
    pub failed: Vec<FailedUpload>,
}

/// Upload a batch of photos for one customer order
///
/// Spools the files locally, provisions a Drive folder named after the
/// customer and order, uploads every file into it, and reports the per-file
/// results. Progress can be polled during the batch via the returned id.
#[utoipa::path(
    post,
    path = "/api/upload-photos",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Batch processed", body = UploadPhotosResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Provisioning or unexpected failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_photos"))]
pub async fn upload_photos(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let batch = extract_upload_batch(multipart, state.uploads.max_files_per_batch)
        .await
        .map_err(HttpAppError::from)?;

    let total = batch.photos.len();
    let service = PhotoUploadService::new(&state.uploads);
    let result = service
        .handle_batch(&batch.customer_name, &batch.order_number, batch.photos)
        .await
        .map_err(HttpAppError::from)?;

    let message = upload_message(result.outcome.uploaded.len(), total, &result.folder.name);

    Ok(Json(UploadPhotosResponse {
        success: true,
        upload_id: result.upload_id,
        folder_link: result.folder.link,
        message,
        uploaded: result.outcome.uploaded,
        failed: result.outcome.failed,
    }))
}

/// Human-readable summary counting actual successes, not attempts.
fn upload_message(uploaded: usize, total: usize, folder_name: &str) -> String {
    format!(
        "Uploaded {} of {} photo{} to folder {}",
        uploaded,
        total,
        if total == 1 { "" } else { "s" },
        folder_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_message_counts_successes() {
        assert_eq!(
            upload_message(2, 3, "Jane-ORD-1-20240101000000"),
            "Uploaded 2 of 3 photos to folder Jane-ORD-1-20240101000000"
        );
    }

    #[test]
    fn test_upload_message_singular() {
        assert_eq!(
            upload_message(1, 1, "f"),
            "Uploaded 1 of 1 photo to folder f"
        );
    }
}
