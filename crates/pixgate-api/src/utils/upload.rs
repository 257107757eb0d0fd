//! Common utilities for the upload handler

use axum::extract::Multipart;
use bytes::Bytes;
use pixgate_core::AppError;

/// One file pulled out of the multipart form, still in memory.
#[derive(Debug)]
pub struct IncomingPhoto {
    pub original_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Parsed `POST /api/upload-photos` form: order metadata plus the photo files
/// in submission order.
#[derive(Debug)]
pub struct UploadBatch {
    pub customer_name: String,
    pub order_number: String,
    pub photos: Vec<IncomingPhoto>,
}

/// Extract the photo batch from a multipart form.
///
/// Accepts repeated `photos` file fields plus `customerName` and `orderNumber`
/// text fields; unknown fields are ignored. The file-count ceiling is enforced
/// while reading so an oversized batch fails before buffering everything.
pub async fn extract_upload_batch(
    mut multipart: Multipart,
    max_files: usize,
) -> Result<UploadBatch, AppError> {
    let mut customer_name: Option<String> = None;
    let mut order_number: Option<String> = None;
    let mut photos: Vec<IncomingPhoto> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "photos" => {
                if photos.len() >= max_files {
                    return Err(AppError::InvalidInput(format!(
                        "Too many files; at most {} photos per batch",
                        max_files
                    )));
                }

                let original_name = field
                    .file_name()
                    .map(|s: &str| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let content_type = field
                    .content_type()
                    .map(|s: &str| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;

                photos.push(IncomingPhoto {
                    original_name,
                    content_type,
                    data,
                });
            }
            "customerName" => {
                let value = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read customerName: {}", e))
                })?;
                customer_name = Some(value);
            }
            "orderNumber" => {
                let value = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read orderNumber: {}", e))
                })?;
                order_number = Some(value);
            }
            _ => {}
        }
    }

    let customer_name = customer_name
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("customerName is required".to_string()))?;
    let order_number = order_number
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("orderNumber is required".to_string()))?;

    Ok(UploadBatch {
        customer_name,
        order_number,
        photos,
    })
}
