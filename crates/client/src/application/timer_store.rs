//! Best-effort local record of when a reservation started.
//!
//! The backend's `expires_at` is the only authority on expiry; this store
//! merely remembers the start instant across restarts so progress display
//! has a stable origin. A record is written when a reservation starts,
//! recovered on resume, and removed on every path that lets go of the slot
//! (submit, abandon, expiry). Losing it costs nothing but display fidelity.

use std::sync::Arc;

use commenter_domain::SlotId;

use crate::ports::outbound::{storage_keys, PlatformPort};

#[derive(Clone)]
pub struct LocalTimerStore {
    platform: Arc<dyn PlatformPort>,
}

impl LocalTimerStore {
    pub fn new(platform: Arc<dyn PlatformPort>) -> Self {
        Self { platform }
    }

    /// Record the start instant for a slot, keeping any existing record.
    ///
    /// A resume must not move the origin, so an already-recorded instant
    /// wins over `now_ms`. Returns the effective start instant.
    pub fn ensure_started(&self, slot_id: SlotId, now_ms: u64) -> u64 {
        if let Some(existing) = self.recall(slot_id) {
            return existing;
        }
        self.platform
            .storage_save(&storage_keys::slot_started(slot_id), &now_ms.to_string());
        now_ms
    }

    /// The recorded start instant in epoch milliseconds, if any.
    ///
    /// An unreadable record is treated as absent.
    pub fn recall(&self, slot_id: SlotId) -> Option<u64> {
        self.platform
            .storage_load(&storage_keys::slot_started(slot_id))
            .and_then(|raw| raw.trim().parse().ok())
    }

    pub fn clear(&self, slot_id: SlotId) {
        self.platform
            .storage_remove(&storage_keys::slot_started(slot_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::memory::MemoryPlatform;

    #[test]
    fn test_record_survives_new_store_over_same_storage() {
        let platform = Arc::new(MemoryPlatform::new());
        let slot_id = SlotId::new();

        let store = LocalTimerStore::new(platform.clone());
        assert_eq!(store.ensure_started(slot_id, 1_000), 1_000);

        // A second store over the same platform sees the same record.
        let store = LocalTimerStore::new(platform);
        assert_eq!(store.recall(slot_id), Some(1_000));
        // And a later ensure does not move the origin.
        assert_eq!(store.ensure_started(slot_id, 9_999), 1_000);
    }

    #[test]
    fn test_clear_removes_record() {
        let platform = Arc::new(MemoryPlatform::new());
        let store = LocalTimerStore::new(platform);
        let slot_id = SlotId::new();

        store.ensure_started(slot_id, 42);
        store.clear(slot_id);
        assert_eq!(store.recall(slot_id), None);
    }

    #[test]
    fn test_garbage_record_reads_as_absent() {
        let platform = Arc::new(MemoryPlatform::new());
        let slot_id = SlotId::new();
        platform.storage_save(&storage_keys::slot_started(slot_id), "not-a-number");

        let store = LocalTimerStore::new(platform);
        assert_eq!(store.recall(slot_id), None);
    }
}
