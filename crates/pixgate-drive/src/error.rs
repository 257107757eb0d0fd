use thiserror::Error;

/// Drive operation errors
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Folder creation failed: {0}")]
    CreateFolder(String),

    #[error("Permission grant failed: {0}")]
    Permission(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Drive operations
pub type DriveResult<T> = Result<T, DriveError>;
