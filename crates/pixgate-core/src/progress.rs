//! In-memory progress store
//!
//! Cross-request progress lookup for running upload batches. The store is an
//! explicit abstraction so handlers and the orchestrator depend on a trait,
//! and the default implementation is bounded: LRU capacity plus per-entry TTL,
//! so records never accumulate for the life of the process.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use uuid::Uuid;

use crate::models::upload::ProgressRecord;

/// Progress lookup and mutation, keyed by upload id.
pub trait ProgressStore: Send + Sync {
    fn insert(&self, id: Uuid, record: ProgressRecord);

    /// Returns a snapshot of the record, or `None` if unknown or expired.
    fn get(&self, id: &Uuid) -> Option<ProgressRecord>;

    /// Apply `f` to the record if present. Returns whether the record existed.
    fn update(&self, id: &Uuid, f: &mut dyn FnMut(&mut ProgressRecord)) -> bool;

    fn evict(&self, id: &Uuid);
}

struct Entry {
    record: ProgressRecord,
    expires_at: Instant,
}

/// Bounded progress store: LRU-evicted at capacity, entries expire after a TTL.
///
/// Expired entries read as absent and are dropped on access. Updates refresh
/// the TTL so a long-running batch is not reclaimed mid-upload.
pub struct TtlProgressStore {
    entries: Mutex<LruCache<Uuid, Entry>>,
    ttl: Duration,
}

impl TtlProgressStore {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity clamped to >= 1");
        TtlProgressStore {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<Uuid, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProgressStore for TtlProgressStore {
    fn insert(&self, id: Uuid, record: ProgressRecord) {
        let mut entries = self.lock();
        entries.put(
            id,
            Entry {
                record,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    fn get(&self, id: &Uuid) -> Option<ProgressRecord> {
        let mut entries = self.lock();
        match entries.get(id) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.record.clone()),
            Some(_) => {
                entries.pop(id);
                tracing::debug!(upload_id = %id, "Expired progress record dropped on read");
                None
            }
            None => None,
        }
    }

    fn update(&self, id: &Uuid, f: &mut dyn FnMut(&mut ProgressRecord)) -> bool {
        let mut entries = self.lock();
        let now = Instant::now();
        match entries.get_mut(id) {
            Some(entry) if entry.expires_at > now => {
                f(&mut entry.record);
                entry.expires_at = now + self.ttl;
                true
            }
            Some(_) => {
                entries.pop(id);
                false
            }
            None => false,
        }
    }

    fn evict(&self, id: &Uuid) {
        self.lock().pop(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::upload::UploadStatus;

    fn store(capacity: usize, ttl_ms: u64) -> TtlProgressStore {
        TtlProgressStore::new(capacity, Duration::from_millis(ttl_ms))
    }

    #[test]
    fn test_insert_and_get() {
        let store = store(10, 60_000);
        let id = Uuid::new_v4();
        store.insert(id, ProgressRecord::new(3));

        let record = store.get(&id).expect("record present");
        assert_eq!(record.total, 3);
        assert_eq!(record.completed, 0);
    }

    #[test]
    fn test_unknown_id_is_none() {
        let store = store(10, 60_000);
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_update_mutates_record() {
        let store = store(10, 60_000);
        let id = Uuid::new_v4();
        store.insert(id, ProgressRecord::new(2));

        assert!(store.update(&id, &mut |r| r.record_success()));
        assert!(store.update(&id, &mut |r| {
            r.record_success();
            r.finish();
        }));

        let record = store.get(&id).expect("record present");
        assert_eq!(record.completed, 2);
        assert_eq!(record.status, UploadStatus::Completed);
    }

    #[test]
    fn test_update_unknown_returns_false() {
        let store = store(10, 60_000);
        assert!(!store.update(&Uuid::new_v4(), &mut |r| r.finish()));
    }

    #[test]
    fn test_ttl_expiry() {
        let store = store(10, 10);
        let id = Uuid::new_v4();
        store.insert(id, ProgressRecord::new(1));

        std::thread::sleep(Duration::from_millis(30));
        assert!(store.get(&id).is_none());
        assert!(!store.update(&id, &mut |r| r.finish()));
    }

    #[test]
    fn test_capacity_eviction_drops_oldest() {
        let store = store(2, 60_000);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();

        store.insert(first, ProgressRecord::new(1));
        store.insert(second, ProgressRecord::new(2));
        store.insert(third, ProgressRecord::new(3));

        assert!(store.get(&first).is_none());
        assert!(store.get(&second).is_some());
        assert!(store.get(&third).is_some());
    }

    #[test]
    fn test_evict() {
        let store = store(10, 60_000);
        let id = Uuid::new_v4();
        store.insert(id, ProgressRecord::new(1));
        store.evict(&id);
        assert!(store.get(&id).is_none());
    }
}
