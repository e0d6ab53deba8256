//! Availability feed - companies with open review capacity.
//!
//! Stale-read cache over the remote listing: `load_cached` serves the last
//! known list instantly so a view can render while `refresh` is in flight.
//! A failed refresh keeps whatever was shown before; cached data may lag
//! reality and a reservation attempt against a stale row simply fails with
//! the backend's capacity error.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use commenter_domain::CompanySummary;

use crate::ports::outbound::{storage_keys, PlatformPort, ServiceError, SlotServicePort};

#[derive(Clone)]
pub struct AvailabilityFeed {
    remote: Arc<dyn SlotServicePort>,
    platform: Arc<dyn PlatformPort>,
    companies: Arc<Mutex<Vec<CompanySummary>>>,
}

impl AvailabilityFeed {
    pub fn new(remote: Arc<dyn SlotServicePort>, platform: Arc<dyn PlatformPort>) -> Self {
        Self {
            remote,
            platform,
            companies: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fetch the live list, replacing the in-memory snapshot and the
    /// storage cache. On failure the previous snapshot stays untouched.
    pub async fn refresh(&self) -> Result<Vec<CompanySummary>, ServiceError> {
        let companies = self.remote.list_available_companies().await?;
        {
            let mut current = self.lock_companies();
            *current = companies.clone();
        }
        match serde_json::to_string(&companies) {
            Ok(json) => self.platform.storage_save(storage_keys::FEED_CACHE, &json),
            Err(err) => tracing::warn!("could not cache availability feed: {err}"),
        }
        tracing::debug!(count = companies.len(), "availability feed refreshed");
        Ok(companies)
    }

    /// The last known list, if any, without touching the network.
    ///
    /// Prefers the in-memory snapshot; falls back to the storage cache from
    /// a previous run. An unreadable cache is discarded.
    pub fn load_cached(&self) -> Option<Vec<CompanySummary>> {
        {
            let current = self.lock_companies();
            if !current.is_empty() {
                return Some(current.clone());
            }
        }
        let raw = self.platform.storage_load(storage_keys::FEED_CACHE)?;
        match serde_json::from_str::<Vec<CompanySummary>>(&raw) {
            Ok(companies) => {
                let mut current = self.lock_companies();
                *current = companies.clone();
                Some(companies)
            }
            Err(err) => {
                tracing::warn!("discarding unreadable feed cache: {err}");
                self.platform.storage_remove(storage_keys::FEED_CACHE);
                None
            }
        }
    }

    /// Current in-memory snapshot; empty until the first refresh or cache
    /// load.
    pub fn current(&self) -> Vec<CompanySummary> {
        self.lock_companies().clone()
    }

    fn lock_companies(&self) -> MutexGuard<'_, Vec<CompanySummary>> {
        self.companies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::memory::MemoryPlatform;
    use crate::ports::outbound::MockSlotServicePort;
    use commenter_domain::CompanyId;

    fn summaries() -> Vec<CompanySummary> {
        vec![
            CompanySummary::new(CompanyId::new(), "Padaria Central", 2),
            CompanySummary::new(CompanyId::new(), "Auto Center Silva", 1),
        ]
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot_and_survives_restart() {
        let platform = Arc::new(MemoryPlatform::new());
        let mut remote = MockSlotServicePort::new();
        let listed = summaries();
        let listed_clone = listed.clone();
        remote
            .expect_list_available_companies()
            .times(1)
            .returning(move || Ok(listed_clone.clone()));

        let feed = AvailabilityFeed::new(Arc::new(remote), platform.clone());
        assert!(feed.load_cached().is_none());

        let refreshed = feed.refresh().await.unwrap();
        assert_eq!(refreshed, listed);
        assert_eq!(feed.current(), listed);

        // A fresh feed over the same storage serves the cached list without
        // any remote call.
        let cold_remote = MockSlotServicePort::new();
        let cold = AvailabilityFeed::new(Arc::new(cold_remote), platform);
        assert_eq!(cold.load_cached(), Some(listed));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_list() {
        let platform = Arc::new(MemoryPlatform::new());
        let mut remote = MockSlotServicePort::new();
        let listed = summaries();
        let listed_clone = listed.clone();
        let mut calls = 0;
        remote
            .expect_list_available_companies()
            .times(2)
            .returning(move || {
                calls += 1;
                if calls == 1 {
                    Ok(listed_clone.clone())
                } else {
                    Err(ServiceError::Network("connection refused".to_string()))
                }
            });

        let feed = AvailabilityFeed::new(Arc::new(remote), platform);
        feed.refresh().await.unwrap();
        let err = feed.refresh().await.unwrap_err();
        assert!(matches!(err, ServiceError::Network(_)));
        assert_eq!(feed.current(), listed);
    }

    #[test]
    fn test_corrupt_cache_is_discarded() {
        let platform = Arc::new(MemoryPlatform::new());
        platform.storage_save(storage_keys::FEED_CACHE, "{not json");

        let feed = AvailabilityFeed::new(Arc::new(MockSlotServicePort::new()), platform.clone());
        assert!(feed.load_cached().is_none());
        assert!(platform.storage_load(storage_keys::FEED_CACHE).is_none());
    }
}
