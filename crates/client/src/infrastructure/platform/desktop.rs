//! Desktop platform implementation
//!
//! File-backed key-value storage plus the host clock and tokio timers.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use std::{future::Future, pin::Pin};

use crate::ports::outbound::{storage_keys, PlatformPort};

/// Desktop platform with JSON-file persistence
///
/// Stores key-value pairs in a JSON file at:
/// - Linux: ~/.config/commenter/storage.json
/// - macOS: ~/Library/Application Support/br.santz.commenter/storage.json
/// - Windows: C:\Users\<User>\AppData\Roaming\santz\commenter\storage.json
#[derive(Clone)]
pub struct DesktopPlatform {
    /// Path to the storage file
    storage_path: PathBuf,
    /// In-memory cache of stored values
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for DesktopPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopPlatform {
    /// Create a desktop platform rooted at the user's config directory.
    ///
    /// Loads existing data from the storage file if it exists.
    pub fn new() -> Self {
        let storage_path = if let Some(dirs) = ProjectDirs::from("br", "santz", "commenter") {
            dirs.config_dir().join("storage.json")
        } else {
            // Fallback to current directory if project dirs unavailable
            PathBuf::from("commenter_storage.json")
        };
        Self::with_storage_path(storage_path)
    }

    /// Create a desktop platform with an explicit storage file (for testing).
    pub fn with_storage_path(storage_path: PathBuf) -> Self {
        let cache = if storage_path.exists() {
            match fs::read_to_string(&storage_path) {
                Ok(data) => match serde_json::from_str::<HashMap<String, String>>(&data) {
                    Ok(map) => map,
                    Err(e) => {
                        tracing::warn!("Failed to parse storage file: {}", e);
                        HashMap::new()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read storage file: {}", e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        tracing::debug!("Desktop storage initialized at: {:?}", storage_path);

        Self {
            storage_path,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Persist the cache to disk
    fn persist(&self) {
        if let Some(parent) = self.storage_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::error!("Failed to create storage directory: {}", e);
                return;
            }
        }

        let cache = match self.cache.read() {
            Ok(guard) => guard,
            Err(e) => {
                tracing::error!("Failed to acquire read lock for storage: {}", e);
                return;
            }
        };

        match serde_json::to_string_pretty(&*cache) {
            Ok(data) => {
                if let Err(e) = fs::write(&self.storage_path, data) {
                    tracing::error!("Failed to write storage file: {}", e);
                }
            }
            Err(e) => {
                tracing::error!("Failed to serialize storage data: {}", e);
            }
        }
    }
}

impl PlatformPort for DesktopPlatform {
    fn now_unix_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        })
    }

    fn storage_save(&self, key: &str, value: &str) {
        match self.cache.write() {
            Ok(mut guard) => {
                guard.insert(key.to_string(), value.to_string());
                drop(guard); // Release lock before I/O
                self.persist();
            }
            Err(e) => {
                tracing::error!("Failed to acquire write lock for storage: {}", e);
            }
        }
    }

    fn storage_load(&self, key: &str) -> Option<String> {
        match self.cache.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(e) => {
                tracing::error!("Failed to acquire read lock for storage: {}", e);
                None
            }
        }
    }

    fn storage_remove(&self, key: &str) {
        match self.cache.write() {
            Ok(mut guard) => {
                guard.remove(key);
                drop(guard); // Release lock before I/O
                self.persist();
            }
            Err(e) => {
                tracing::error!("Failed to acquire write lock for storage: {}", e);
            }
        }
    }

    fn get_user_id(&self) -> String {
        if let Some(existing) = self.storage_load(storage_keys::USER_ID) {
            return existing;
        }
        let user_id = format!("user-{}", uuid::Uuid::new_v4());
        self.storage_save(storage_keys::USER_ID, &user_id);
        tracing::info!("Created new user identity: {}", user_id);
        user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_round_trip_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let platform = DesktopPlatform::with_storage_path(path.clone());
        platform.storage_save("commenter_slot_started.abc", "1700000000000");
        platform.storage_save(storage_keys::USER_ID, "user-fixed");

        // A fresh instance reads what the first one persisted.
        let reloaded = DesktopPlatform::with_storage_path(path);
        assert_eq!(
            reloaded.storage_load("commenter_slot_started.abc").as_deref(),
            Some("1700000000000")
        );
        assert_eq!(reloaded.get_user_id(), "user-fixed");
    }

    #[test]
    fn test_remove_deletes_from_disk_too() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let platform = DesktopPlatform::with_storage_path(path.clone());
        platform.storage_save("key", "value");
        platform.storage_remove("key");

        let reloaded = DesktopPlatform::with_storage_path(path);
        assert_eq!(reloaded.storage_load("key"), None);
    }

    #[test]
    fn test_corrupt_storage_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json at all").unwrap();

        let platform = DesktopPlatform::with_storage_path(path);
        assert_eq!(platform.storage_load("anything"), None);
    }
}
