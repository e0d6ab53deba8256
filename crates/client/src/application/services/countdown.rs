//! Periodic driver for the lifecycle countdown.
//!
//! The controller's [`tick`](super::slot_lifecycle::SlotLifecycleController::tick)
//! is a pure step; something has to call it once a second while a slot is
//! held. This driver is that something: a spawned task that sleeps through
//! the platform clock and stops on its own as soon as the lifecycle lets go
//! of the slot. Countdown display and the expiry trigger both ride on it.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::application::services::slot_lifecycle::SlotLifecycleController;
use crate::ports::outbound::PlatformPort;

pub const TICK_INTERVAL_MS: u64 = 1_000;

pub struct CountdownDriver;

impl CountdownDriver {
    /// Spawn a 1 Hz ticker for the given controller.
    ///
    /// The task ends by itself once the controller reports no slot attached;
    /// abort the handle to end it earlier (view teardown). Spawning while
    /// idle is harmless: the first tick finds nothing and the task exits.
    pub fn spawn(
        controller: SlotLifecycleController,
        platform: Arc<dyn PlatformPort>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                platform.sleep_ms(TICK_INTERVAL_MS).await;
                if controller.tick().await.is_none() {
                    break;
                }
            }
            tracing::debug!("countdown driver stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::availability::AvailabilityFeed;
    use crate::application::services::slot_lifecycle::LifecyclePhase;
    use crate::infrastructure::platform::memory::MemoryPlatform;
    use crate::ports::outbound::{MockSlotServicePort, SlotServicePort};
    use chrono::DateTime;
    use commenter_domain::{ActiveReservation, CompanyId, CompanyRef, SlotId};

    fn controller_with(
        remote: MockSlotServicePort,
        platform: Arc<MemoryPlatform>,
    ) -> SlotLifecycleController {
        let remote: Arc<dyn SlotServicePort> = Arc::new(remote);
        let feed = AvailabilityFeed::new(remote.clone(), platform.clone());
        SlotLifecycleController::new(remote, platform, feed)
    }

    #[tokio::test]
    async fn test_driver_exits_immediately_when_idle() {
        let platform = Arc::new(MemoryPlatform::new());
        let controller = controller_with(MockSlotServicePort::new(), platform.clone());

        // Memory platform sleeps resolve instantly, so this completes.
        CountdownDriver::spawn(controller, platform).await.unwrap();
    }

    #[tokio::test]
    async fn test_driver_fires_expiry_then_stops() {
        let platform = Arc::new(MemoryPlatform::new());
        let expires_at =
            DateTime::from_timestamp_millis(platform.now_millis() as i64 + 30_000).unwrap();
        let reservation = ActiveReservation::new(
            SlotId::new(),
            CompanyRef::new(
                CompanyId::new(),
                "Padaria Central",
                "https://maps.example.com/padaria-central",
            ),
            expires_at,
        );
        let slot_id = reservation.slot_id();

        let mut remote = MockSlotServicePort::new();
        remote
            .expect_fetch_active_slot()
            .times(1)
            .returning(move || Ok(Some(reservation.clone())));
        remote
            .expect_release_or_expire_slot()
            .times(1)
            .withf(move |id| *id == slot_id)
            .returning(|_| Ok(()));
        remote
            .expect_list_available_companies()
            .times(1)
            .returning(|| Ok(vec![]));

        let controller = controller_with(remote, platform.clone());
        controller.resume_if_active().await.unwrap();

        // Past the deadline, the first tick expires the hold and the next
        // one finds nothing, ending the task.
        platform.advance_ms(31_000);
        CountdownDriver::spawn(controller.clone(), platform)
            .await
            .unwrap();
        assert_eq!(controller.snapshot().phase, LifecyclePhase::Idle);
    }
}
