//! Shared constants

/// Default per-file size ceiling in MiB.
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;

/// Default maximum number of photos accepted in one batch.
pub const DEFAULT_MAX_FILES_PER_BATCH: usize = 10;

/// Default fan-out limit for per-batch uploads.
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 4;

/// Default lifetime of a progress record, in seconds.
pub const DEFAULT_PROGRESS_TTL_SECONDS: u64 = 3600;

/// Default capacity of the progress store.
pub const DEFAULT_PROGRESS_CAPACITY: usize = 10_000;

/// Default directory photos are spooled to before the remote upload.
pub const DEFAULT_SPOOL_DIR: &str = "uploads";
