//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pixgate-api --test uploads_test` or
//! `cargo test -p pixgate-api`. No external services are needed; the Drive
//! client is replaced by an in-memory `FakeDrive`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use pixgate_api::constants;
use pixgate_api::setup::routes;
use pixgate_api::state::{AppState, UploadState};
use pixgate_core::{Config, RemoteFileRef, RemoteFolder, TtlProgressStore};
use pixgate_drive::{DriveError, DriveResult, RemoteStore};
use pixgate_storage::SpoolDir;
use tempfile::TempDir;

/// API path prefix for tests (e.g. `/api`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// In-memory Drive double: records calls, optionally fails provisioning or
/// specific filenames.
#[derive(Default)]
pub struct FakeDrive {
    pub fail_create_folder: bool,
    pub fail_files: HashSet<String>,
    pub folder_calls: AtomicUsize,
    pub grant_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub uploaded_names: Mutex<Vec<String>>,
}

impl FakeDrive {
    pub fn failing_provision() -> Self {
        FakeDrive {
            fail_create_folder: true,
            ..FakeDrive::default()
        }
    }

    pub fn failing_file(name: &str) -> Self {
        let mut fake = FakeDrive::default();
        fake.fail_files.insert(name.to_string());
        fake
    }

    pub fn remote_call_count(&self) -> usize {
        self.folder_calls.load(Ordering::SeqCst)
            + self.grant_calls.load(Ordering::SeqCst)
            + self.upload_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStore for FakeDrive {
    async fn create_folder(&self, name: &str) -> DriveResult<RemoteFolder> {
        self.folder_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create_folder {
            return Err(DriveError::CreateFolder("simulated outage".to_string()));
        }
        Ok(RemoteFolder {
            id: format!("folder-{}", name),
            name: name.to_string(),
            link: format!("https://drive.google.com/drive/folders/folder-{}", name),
        })
    }

    async fn grant_public_read(&self, _folder_id: &str) -> DriveResult<()> {
        self.grant_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn upload_file(
        &self,
        _folder_id: &str,
        file_name: &str,
        _content_type: &str,
        local_path: &Path,
    ) -> DriveResult<RemoteFileRef> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        assert!(
            local_path.exists(),
            "spooled file must exist while uploading"
        );
        if self.fail_files.contains(file_name) {
            return Err(DriveError::UploadFailed("simulated failure".to_string()));
        }
        self.uploaded_names
            .lock()
            .unwrap()
            .push(file_name.to_string());
        Ok(RemoteFileRef {
            id: format!("file-{}", file_name),
            name: file_name.to_string(),
        })
    }
}

/// Test application: server plus owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub remote: Arc<FakeDrive>,
    spool_path: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn spool_file_count(&self) -> usize {
        std::fs::read_dir(&self.spool_path)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Setup test app with an isolated spool and the given Drive double.
pub async fn setup_test_app(remote: FakeDrive) -> TestApp {
    setup_test_app_with_limits(remote, 1024 * 1024, 10).await
}

/// Same, but with explicit per-file size ceiling and batch size limit.
pub async fn setup_test_app_with_limits(
    remote: FakeDrive,
    max_file_size: usize,
    max_files_per_batch: usize,
) -> TestApp {
    let temp_dir = TempDir::new().expect("create temp dir");
    let spool_path = temp_dir.path().to_path_buf();
    let spool = SpoolDir::new(temp_dir.path(), max_file_size)
        .await
        .expect("create spool");
    let remote = Arc::new(remote);

    let config = Config::from_env().expect("config from env");
    let state = Arc::new(AppState {
        uploads: UploadState {
            spool,
            remote: remote.clone(),
            progress: Arc::new(TtlProgressStore::new(100, Duration::from_secs(60))),
            max_files_per_batch,
            upload_concurrency: 4,
            public_links: true,
        },
        config: config.clone(),
    });

    let router = routes::setup_routes(&config, state).expect("setup routes");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        remote,
        spool_path,
        _temp_dir: temp_dir,
    }
}
