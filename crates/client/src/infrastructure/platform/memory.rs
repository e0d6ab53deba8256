//! In-memory platform with a manual clock, for tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::{future::Future, pin::Pin};

use crate::ports::outbound::{storage_keys, PlatformPort};

/// Clock origin for tests; an arbitrary fixed instant.
const TEST_EPOCH_MS: u64 = 1_700_000_000_000;

/// Platform double backed by a `HashMap` and an atomic millisecond clock.
///
/// Time only moves when a test calls [`MemoryPlatform::advance_ms`], and
/// sleeps resolve immediately, so countdown behavior is driven entirely by
/// the test instead of real timers.
pub struct MemoryPlatform {
    clock_ms: AtomicU64,
    storage: Mutex<HashMap<String, String>>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self {
            clock_ms: AtomicU64::new(TEST_EPOCH_MS),
            storage: Mutex::new(HashMap::new()),
        }
    }

    /// Move the clock forward.
    pub fn advance_ms(&self, ms: u64) {
        self.clock_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Pin the clock to an absolute instant.
    pub fn set_now_ms(&self, ms: u64) {
        self.clock_ms.store(ms, Ordering::SeqCst);
    }

    fn lock_storage(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformPort for MemoryPlatform {
    fn now_unix_secs(&self) -> u64 {
        self.clock_ms.load(Ordering::SeqCst) / 1_000
    }

    fn now_millis(&self) -> u64 {
        self.clock_ms.load(Ordering::SeqCst)
    }

    fn sleep_ms(&self, _ms: u64) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>> {
        Box::pin(async {})
    }

    fn storage_save(&self, key: &str, value: &str) {
        self.lock_storage()
            .insert(key.to_string(), value.to_string());
    }

    fn storage_load(&self, key: &str) -> Option<String> {
        self.lock_storage().get(key).cloned()
    }

    fn storage_remove(&self, key: &str) {
        self.lock_storage().remove(key);
    }

    fn get_user_id(&self) -> String {
        if let Some(existing) = self.storage_load(storage_keys::USER_ID) {
            return existing;
        }
        let user_id = format!("user-{}", uuid::Uuid::new_v4());
        self.storage_save(storage_keys::USER_ID, &user_id);
        user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_only_moves_when_advanced() {
        let platform = MemoryPlatform::new();
        let before = platform.now_millis();
        assert_eq!(platform.now_millis(), before);

        platform.advance_ms(2_500);
        assert_eq!(platform.now_millis(), before + 2_500);
        assert_eq!(platform.now_unix_secs(), (before + 2_500) / 1_000);
    }

    #[test]
    fn test_user_id_is_stable_across_calls() {
        let platform = MemoryPlatform::new();
        let first = platform.get_user_id();
        assert!(first.starts_with("user-"));
        assert_eq!(platform.get_user_id(), first);
    }
}
