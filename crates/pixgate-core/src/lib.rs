//! Pixgate Core Library
//!
//! This crate provides the domain models, error types, configuration, and the
//! progress store shared across all pixgate components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod progress;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::upload::{
    FailedUpload, ProgressRecord, RemoteFileRef, RemoteFolder, UploadOutcome, UploadStatus,
};
pub use progress::{ProgressStore, TtlProgressStore};
