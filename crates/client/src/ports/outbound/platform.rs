//! Platform abstraction port.
//!
//! A single trait covering the host-specific operations the application
//! needs: wall-clock time, async sleep, persistent key-value storage, and
//! the anonymous user identity derived from that storage. Keeping these
//! behind one trait lets services run unchanged against the desktop
//! platform or an in-memory test platform with a manual clock.

use std::{future::Future, pin::Pin};

/// Host services the application depends on.
///
/// Implementations: `infrastructure::platform::DesktopPlatform` (file-backed
/// storage, real clock) and `infrastructure::platform::MemoryPlatform`
/// (tests; manual clock).
pub trait PlatformPort: Send + Sync {
    /// Current time as a Unix timestamp in seconds.
    fn now_unix_secs(&self) -> u64;

    /// Current time in milliseconds since the Unix epoch.
    ///
    /// All countdown math in the application derives "now" from this method,
    /// never from the system clock directly.
    fn now_millis(&self) -> u64;

    /// Sleep for the given number of milliseconds.
    ///
    /// The future is `Send` so drivers can run it on a spawned task.
    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

    /// Save a string value under the given key.
    fn storage_save(&self, key: &str, value: &str);

    /// Load a string value by key, `None` if absent.
    fn storage_load(&self, key: &str) -> Option<String>;

    /// Remove a value by key.
    fn storage_remove(&self, key: &str);

    /// Get or create a stable anonymous user ID.
    ///
    /// The ID is persisted in storage and reused across sessions until local
    /// storage is cleared.
    fn get_user_id(&self) -> String;
}

/// Storage key constants.
///
/// These are kept in the ports layer as they define the contract for
/// what keys are used across the application.
pub mod storage_keys {
    use commenter_domain::SlotId;

    pub const USER_ID: &str = "commenter_user_id";
    pub const API_URL: &str = "commenter_api_url";
    pub const FEED_CACHE: &str = "commenter_feed_cache";
    /// Per-slot reservation start marker; the slot id is appended.
    pub const SLOT_STARTED_PREFIX: &str = "commenter_slot_started.";

    /// Key under which a slot's local reservation start instant is stored.
    pub fn slot_started(slot_id: SlotId) -> String {
        format!("{SLOT_STARTED_PREFIX}{slot_id}")
    }
}
