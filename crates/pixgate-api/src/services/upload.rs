//! Upload orchestration
//!
//! Ties the pipeline together for one batch: spool the incoming files,
//! provision the per-order Drive folder, fan the uploads out with a bounded
//! worker pool, and keep the progress record current throughout.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use pixgate_core::{AppError, ProgressRecord, ProgressStore, RemoteFolder, UploadOutcome};
use pixgate_drive::{DriveClient, RemoteStore};
use pixgate_storage::SpooledPhoto;
use uuid::Uuid;

use crate::error::{drive_error_to_app, storage_error_to_app};
use crate::state::UploadState;
use crate::utils::upload::IncomingPhoto;

/// Result of one orchestrated batch.
pub struct BatchResult {
    pub upload_id: Uuid,
    pub folder: RemoteFolder,
    pub outcome: UploadOutcome,
}

/// Orchestrates the upload pipeline for one request.
pub struct PhotoUploadService<'a> {
    uploads: &'a UploadState,
}

impl<'a> PhotoUploadService<'a> {
    pub fn new(uploads: &'a UploadState) -> Self {
        PhotoUploadService { uploads }
    }

    /// Run one batch end to end.
    ///
    /// Validation and spooling happen before any remote call, so an empty or
    /// oversized batch never reaches Drive and never creates a progress
    /// record. Per-file upload failures are folded into the outcome; only a
    /// provisioning failure aborts the batch.
    pub async fn handle_batch(
        &self,
        customer_name: &str,
        order_number: &str,
        photos: Vec<IncomingPhoto>,
    ) -> Result<BatchResult, AppError> {
        if photos.is_empty() {
            return Err(AppError::InvalidInput("No files uploaded".to_string()));
        }
        if photos.len() > self.uploads.max_files_per_batch {
            return Err(AppError::InvalidInput(format!(
                "Too many files; at most {} photos per batch",
                self.uploads.max_files_per_batch
            )));
        }

        let mut spooled = Vec::with_capacity(photos.len());
        for photo in photos {
            let stored = self
                .uploads
                .spool
                .store(&photo.original_name, &photo.content_type, photo.data)
                .await
                .map_err(storage_error_to_app)?;
            spooled.push(stored);
        }

        let upload_id = Uuid::new_v4();
        let total = spooled.len();
        self.uploads
            .progress
            .insert(upload_id, ProgressRecord::new(total));

        tracing::info!(
            upload_id = %upload_id,
            customer_name = %customer_name,
            order_number = %order_number,
            total,
            "Starting upload batch"
        );

        let folder = self.provision_folder(customer_name, order_number).await?;
        self.uploads
            .progress
            .update(&upload_id, &mut |r| r.set_folder_link(folder.link.clone()));

        let outcome = self.upload_all(upload_id, &folder.id, spooled).await;
        self.uploads.progress.update(&upload_id, &mut |r| r.finish());

        tracing::info!(
            upload_id = %upload_id,
            folder_id = %folder.id,
            uploaded = outcome.uploaded.len(),
            failed = outcome.failed.len(),
            "Upload batch finished"
        );

        Ok(BatchResult {
            upload_id,
            folder,
            outcome,
        })
    }

    /// Create the per-order folder, then grant anyone-with-link read access
    /// when link sharing is enabled. Either call failing aborts the batch.
    async fn provision_folder(
        &self,
        customer_name: &str,
        order_number: &str,
    ) -> Result<RemoteFolder, AppError> {
        let name = DriveClient::folder_name(customer_name, order_number, Utc::now());
        let folder = self
            .uploads
            .remote
            .create_folder(&name)
            .await
            .map_err(drive_error_to_app)?;

        if self.uploads.public_links {
            self.uploads
                .remote
                .grant_public_read(&folder.id)
                .await
                .map_err(drive_error_to_app)?;
        }

        Ok(folder)
    }

    /// Upload the spooled files with a bounded fan-out and fold the results
    /// into an outcome. Each guard drops as its upload settles, so the spool
    /// stays clean whether the remote call succeeded or not.
    async fn upload_all(
        &self,
        upload_id: Uuid,
        folder_id: &str,
        spooled: Vec<SpooledPhoto>,
    ) -> UploadOutcome {
        let concurrency = self.uploads.upload_concurrency.max(1);

        let results = stream::iter(spooled.into_iter().map(|photo| {
            let remote = self.uploads.remote.clone();
            let progress = self.uploads.progress.clone();
            let folder_id = folder_id.to_string();

            async move {
                let name = photo.original_name().to_string();
                let result = remote
                    .upload_file(&folder_id, &name, photo.content_type(), photo.path())
                    .await;

                match &result {
                    Ok(file) => {
                        progress.update(&upload_id, &mut |r| r.record_success());
                        tracing::debug!(
                            upload_id = %upload_id,
                            file_id = %file.id,
                            file_name = %name,
                            "File uploaded"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            upload_id = %upload_id,
                            file_name = %name,
                            error = %e,
                            "File upload failed"
                        );
                    }
                }

                (name, result)
            }
        }))
        .buffer_unordered(concurrency)
        .collect::<Vec<_>>()
        .await;

        let mut outcome = UploadOutcome::default();
        for (name, result) in results {
            match result {
                Ok(_) => outcome.record_uploaded(name),
                Err(e) => outcome.record_failed(name, e.to_string()),
            }
        }
        outcome
    }
}
