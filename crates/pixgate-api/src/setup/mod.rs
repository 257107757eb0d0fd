//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from
//! main.rs for better organization and testability.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use pixgate_core::{Config, ProgressStore, TtlProgressStore};
use pixgate_drive::{DriveClient, RemoteStore};
use pixgate_storage::SpoolDir;

use crate::state::{AppState, UploadState};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Validate configuration - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Configuration loaded and validated successfully");

    let spool = SpoolDir::new(config.spool_dir(), config.max_file_size_bytes())
        .await
        .context("Failed to initialize spool directory")?;

    let remote: Arc<dyn RemoteStore> =
        Arc::new(DriveClient::from_config(&config).context("Failed to create Drive client")?);

    let progress: Arc<dyn ProgressStore> = Arc::new(TtlProgressStore::new(
        config.progress_capacity(),
        config.progress_ttl(),
    ));

    let state = Arc::new(AppState {
        uploads: UploadState {
            spool,
            remote,
            progress,
            max_files_per_batch: config.max_files_per_batch(),
            upload_concurrency: config.upload_concurrency(),
            public_links: config.drive_public_links(),
        },
        config: config.clone(),
    });

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
