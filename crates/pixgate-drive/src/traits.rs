//! Remote storage abstraction trait
//!
//! This module defines the trait the upload orchestrator works against, so it
//! is not coupled to the Google Drive implementation.

use std::path::Path;

use async_trait::async_trait;
use pixgate_core::{RemoteFileRef, RemoteFolder};

use crate::error::DriveResult;

/// Remote storage operations needed by the gateway.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Create a folder and return its identifier and shareable link.
    async fn create_folder(&self, name: &str) -> DriveResult<RemoteFolder>;

    /// Make the folder readable by anyone with the link.
    async fn grant_public_read(&self, folder_id: &str) -> DriveResult<()>;

    /// Upload a local file into the folder, tagged with its original
    /// filename and MIME type.
    async fn upload_file(
        &self,
        folder_id: &str,
        file_name: &str,
        content_type: &str,
        local_path: &Path,
    ) -> DriveResult<RemoteFileRef>;
}
