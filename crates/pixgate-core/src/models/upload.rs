use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A folder created in the remote storage service for one customer order.
/// Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemoteFolder {
    pub id: String,
    pub name: String,
    /// Shareable browser link to the folder
    pub link: String,
}

/// Reference to a file uploaded into a remote folder.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemoteFileRef {
    pub id: String,
    pub name: String,
}

/// Batch status. Transitions only `Uploading -> Completed`, never backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
    Completed,
}

/// Progress of one upload batch, keyed by its upload id in the progress store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProgressRecord {
    pub total: usize,
    pub completed: usize,
    #[serde(rename = "folderLink")]
    pub folder_link: Option<String>,
    pub status: UploadStatus,
}

impl ProgressRecord {
    pub fn new(total: usize) -> Self {
        ProgressRecord {
            total,
            completed: 0,
            folder_link: None,
            status: UploadStatus::Uploading,
        }
    }

    /// Record one successful file upload. Saturates at `total` so the
    /// `completed <= total` invariant holds even on misuse.
    pub fn record_success(&mut self) {
        if self.completed < self.total {
            self.completed += 1;
        }
    }

    pub fn set_folder_link(&mut self, link: String) {
        self.folder_link = Some(link);
    }

    pub fn finish(&mut self) {
        self.status = UploadStatus::Completed;
    }
}

/// A single file that failed its remote upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FailedUpload {
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub error: String,
}

/// Per-file results of one batch: which files landed remotely and which did not.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UploadOutcome {
    pub uploaded: Vec<String>,
    pub failed: Vec<FailedUpload>,
}

impl UploadOutcome {
    pub fn record_uploaded(&mut self, file_name: String) {
        self.uploaded.push(file_name);
    }

    pub fn record_failed(&mut self, file_name: String, error: String) {
        self.failed.push(FailedUpload { file_name, error });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_record_new() {
        let record = ProgressRecord::new(5);
        assert_eq!(record.total, 5);
        assert_eq!(record.completed, 0);
        assert!(record.folder_link.is_none());
        assert_eq!(record.status, UploadStatus::Uploading);
    }

    #[test]
    fn test_completed_never_exceeds_total() {
        let mut record = ProgressRecord::new(2);
        record.record_success();
        record.record_success();
        record.record_success();
        assert_eq!(record.completed, 2);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let record = ProgressRecord::new(1);
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("uploading"));
        assert!(json.get("folderLink").is_some());
    }
}
