//! Google Drive REST client
//!
//! Folder creation, permission grants, and media uploads against the Drive v3
//! API. Base URLs are injectable so deployments and tests can point the client
//! at a different endpoint.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pixgate_core::config::{Config, DriveAccount};
use pixgate_core::{RemoteFileRef, RemoteFolder};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::TokenProvider;
use crate::error::{DriveError, DriveResult};
use crate::traits::RemoteStore;

const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFileResource {
    id: String,
    name: String,
    #[serde(default)]
    web_view_link: Option<String>,
}

/// Drive v3 API client.
pub struct DriveClient {
    http_client: reqwest::Client,
    tokens: TokenProvider,
    api_base_url: String,
    upload_base_url: String,
}

impl DriveClient {
    pub fn new(
        account: DriveAccount,
        api_base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
    ) -> DriveResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(DriveClient {
            tokens: TokenProvider::new(http_client.clone(), account),
            http_client,
            api_base_url: api_base_url.into(),
            upload_base_url: upload_base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> DriveResult<Self> {
        Self::new(
            config.drive_account().clone(),
            config.drive_api_base_url(),
            config.drive_upload_base_url(),
        )
    }

    /// Build the per-order folder name: customer, order number, and a UTC
    /// timestamp suffix for uniqueness.
    pub fn folder_name(customer_name: &str, order_number: &str, when: DateTime<Utc>) -> String {
        format!(
            "{}-{}-{}",
            sanitize_component(customer_name),
            sanitize_component(order_number),
            when.format("%Y%m%d%H%M%S")
        )
    }
}

/// Collapse whitespace to single dashes and drop characters Drive renders
/// poorly in folder names.
fn sanitize_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_was_dash = false;
    for c in value.trim().chars() {
        let mapped = if c.is_whitespace() || c == '/' || c == '\\' {
            '-'
        } else {
            c
        };
        if mapped == '-' {
            if !last_was_dash && !out.is_empty() {
                out.push('-');
            }
            last_was_dash = true;
        } else {
            out.push(mapped);
            last_was_dash = false;
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Frame a `multipart/related` upload body: JSON metadata part followed by the
/// media part, as the Drive upload endpoint expects.
fn multipart_related_body(
    metadata: &serde_json::Value,
    content_type: &str,
    data: &[u8],
    boundary: &str,
) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 512);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

#[async_trait]
impl RemoteStore for DriveClient {
    async fn create_folder(&self, name: &str) -> DriveResult<RemoteFolder> {
        let token = self.tokens.access_token().await?;
        let url = format!(
            "{}/files?fields=id,name,webViewLink",
            self.api_base_url.trim_end_matches('/')
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token)
            .json(&json!({
                "name": name,
                "mimeType": FOLDER_MIME_TYPE,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::CreateFolder(format!(
                "Drive returned {}: {}",
                status, body
            )));
        }

        let resource: DriveFileResource = response
            .json()
            .await
            .map_err(|e| DriveError::CreateFolder(format!("Invalid response: {}", e)))?;

        let link = resource.web_view_link.unwrap_or_else(|| {
            format!("https://drive.google.com/drive/folders/{}", resource.id)
        });

        tracing::info!(
            folder_id = %resource.id,
            folder_name = %resource.name,
            "Created Drive folder"
        );

        Ok(RemoteFolder {
            id: resource.id,
            name: resource.name,
            link,
        })
    }

    async fn grant_public_read(&self, folder_id: &str) -> DriveResult<()> {
        let token = self.tokens.access_token().await?;
        let url = format!(
            "{}/files/{}/permissions",
            self.api_base_url.trim_end_matches('/'),
            folder_id
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token)
            .json(&json!({
                "role": "reader",
                "type": "anyone",
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Permission(format!(
                "Drive returned {}: {}",
                status, body
            )));
        }

        tracing::info!(folder_id = %folder_id, "Granted anyone-with-link read access");

        Ok(())
    }

    async fn upload_file(
        &self,
        folder_id: &str,
        file_name: &str,
        content_type: &str,
        local_path: &Path,
    ) -> DriveResult<RemoteFileRef> {
        let token = self.tokens.access_token().await?;
        let data = tokio::fs::read(local_path).await?;
        let size = data.len();
        let start = Instant::now();

        let metadata = json!({
            "name": file_name,
            "parents": [folder_id],
        });
        let boundary = format!("pixgate-{}", Uuid::new_v4());
        let body = multipart_related_body(&metadata, content_type, &data, &boundary);

        let url = format!(
            "{}/files?uploadType=multipart&fields=id,name",
            self.upload_base_url.trim_end_matches('/')
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::UploadFailed(format!(
                "Drive returned {}: {}",
                status, body
            )));
        }

        let resource: DriveFileResource = response
            .json()
            .await
            .map_err(|e| DriveError::UploadFailed(format!("Invalid response: {}", e)))?;

        tracing::info!(
            file_id = %resource.id,
            file_name = %resource.name,
            folder_id = %folder_id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Uploaded file to Drive"
        );

        Ok(RemoteFileRef {
            id: resource.id,
            name: resource.name,
        })
    }
}
