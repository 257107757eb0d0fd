//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use pixgate_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixgate API",
        version = "0.1.0",
        description = "Photo-order upload gateway: accepts photo batches per customer order, provisions a Google Drive folder, uploads the files, and exposes batch progress."
    ),
    paths(
        handlers::upload::upload_photos,
        handlers::progress::get_upload_progress,
        handlers::health::liveness_check,
    ),
    components(schemas(
        handlers::upload::UploadPhotosResponse,
        error::ErrorResponse,
        models::upload::ProgressRecord,
        models::upload::UploadStatus,
        models::upload::FailedUpload,
        models::upload::RemoteFolder,
        models::upload::RemoteFileRef,
    )),
    tags(
        (name = "uploads", description = "Photo batch uploads and progress"),
        (name = "health", description = "Liveness probes")
    )
)]
pub struct ApiDoc;
