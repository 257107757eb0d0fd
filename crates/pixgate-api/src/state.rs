//! Application state.
//!
//! State is grouped per concern so handlers and services take only what they
//! need, and the remote store / progress store sit behind trait objects so
//! tests can substitute doubles.

use std::sync::Arc;

use pixgate_core::{Config, ProgressStore};
use pixgate_drive::RemoteStore;
use pixgate_storage::SpoolDir;

/// Everything the upload pipeline needs: local spool, remote store, progress
/// store, and the batch limits.
#[derive(Clone)]
pub struct UploadState {
    pub spool: SpoolDir,
    pub remote: Arc<dyn RemoteStore>,
    pub progress: Arc<dyn ProgressStore>,
    pub max_files_per_batch: usize,
    pub upload_concurrency: usize,
    /// Grant anyone-with-link read access on provisioned folders
    pub public_links: bool,
}

pub struct AppState {
    pub config: Config,
    pub uploads: UploadState,
}
