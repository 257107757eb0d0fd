//! Domain models

pub mod upload;

pub use upload::{
    FailedUpload, ProgressRecord, RemoteFileRef, RemoteFolder, UploadOutcome, UploadStatus,
};
