use std::path::{Path, PathBuf};
use std::time::Instant;

use bytes::Bytes;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Spool operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File too large: {size} bytes exceeds maximum of {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for spool operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Local spool directory for incoming uploads.
///
/// Each stored file gets a collision-resistant name (UUID prefix plus the
/// sanitized original name) and a per-file size ceiling is enforced before
/// anything touches the disk.
#[derive(Clone)]
pub struct SpoolDir {
    base_path: PathBuf,
    max_file_size: usize,
}

impl SpoolDir {
    /// Create a new spool, ensuring the directory exists.
    pub async fn new(base_path: impl Into<PathBuf>, max_file_size: usize) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create spool directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(SpoolDir {
            base_path,
            max_file_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Strip any path components and replace shell-hostile characters so the
    /// original name is safe to embed in a local filename.
    fn sanitize_name(original_name: &str) -> String {
        let base = original_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(original_name);
        let cleaned: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if cleaned.trim_matches(['_', '.']).is_empty() {
            "photo".to_string()
        } else {
            cleaned
        }
    }

    /// Write one incoming file to the spool and return its guard.
    ///
    /// Rejects oversized payloads before writing. The returned `SpooledPhoto`
    /// removes the file when dropped.
    pub async fn store(
        &self,
        original_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<SpooledPhoto> {
        if data.len() > self.max_file_size {
            return Err(StorageError::TooLarge {
                size: data.len(),
                max: self.max_file_size,
            });
        }

        let filename = format!("{}-{}", Uuid::new_v4(), Self::sanitize_name(original_name));
        let path = self.base_path.join(&filename);
        let size = data.len();
        let start = Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            original_name = %original_name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Spooled incoming file"
        );

        Ok(SpooledPhoto {
            path,
            original_name: original_name.to_string(),
            content_type: content_type.to_string(),
            size_bytes: size as u64,
        })
    }
}

/// A file sitting in the spool, scoped to one upload attempt.
///
/// Dropping the guard removes the file, so success, per-file failure, and
/// early abort all leave the spool directory clean.
#[derive(Debug)]
pub struct SpooledPhoto {
    path: PathBuf,
    original_name: String,
    content_type: String,
    size_bytes: u64,
}

impl SpooledPhoto {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

impl Drop for SpooledPhoto {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove spooled file"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MAX: usize = 1024;

    #[tokio::test]
    async fn test_store_writes_file() {
        let dir = tempdir().unwrap();
        let spool = SpoolDir::new(dir.path(), MAX).await.unwrap();

        let photo = spool
            .store("order.jpg", "image/jpeg", Bytes::from_static(b"jpeg bytes"))
            .await
            .unwrap();

        assert!(photo.path().exists());
        assert_eq!(photo.original_name(), "order.jpg");
        assert_eq!(photo.content_type(), "image/jpeg");
        assert_eq!(photo.size_bytes(), 10);

        let written = std::fs::read(photo.path()).unwrap();
        assert_eq!(written, b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempdir().unwrap();
        let spool = SpoolDir::new(dir.path(), MAX).await.unwrap();

        let path = {
            let photo = spool
                .store("a.png", "image/png", Bytes::from_static(b"x"))
                .await
                .unwrap();
            photo.path().to_path_buf()
        };

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_oversized_rejected_before_write() {
        let dir = tempdir().unwrap();
        let spool = SpoolDir::new(dir.path(), 4).await.unwrap();

        let result = spool
            .store("big.jpg", "image/jpeg", Bytes::from_static(b"too big"))
            .await;

        assert!(matches!(
            result,
            Err(StorageError::TooLarge { size: 7, max: 4 })
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_same_name_gets_unique_paths() {
        let dir = tempdir().unwrap();
        let spool = SpoolDir::new(dir.path(), MAX).await.unwrap();

        let first = spool
            .store("dup.jpg", "image/jpeg", Bytes::from_static(b"1"))
            .await
            .unwrap();
        let second = spool
            .store("dup.jpg", "image/jpeg", Bytes::from_static(b"2"))
            .await
            .unwrap();

        assert_ne!(first.path(), second.path());
    }

    #[tokio::test]
    async fn test_sanitize_strips_path_components() {
        let dir = tempdir().unwrap();
        let spool = SpoolDir::new(dir.path(), MAX).await.unwrap();

        let photo = spool
            .store("../../etc/pass wd.jpg", "image/jpeg", Bytes::from_static(b"x"))
            .await
            .unwrap();

        let filename = photo.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(filename.ends_with("pass_wd.jpg"));
        assert!(photo.path().starts_with(dir.path()));
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(SpoolDir::sanitize_name("///"), "photo");
        assert_eq!(SpoolDir::sanitize_name("..."), "photo");
    }
}
