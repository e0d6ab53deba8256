//! Application services and their wiring.

pub mod admin;
pub mod availability;
pub mod countdown;
pub mod earnings;
pub mod profile;
pub mod reviews;
pub mod slot_lifecycle;

pub use admin::AdminService;
pub use availability::AvailabilityFeed;
pub use countdown::CountdownDriver;
pub use earnings::{EarningsOverview, EarningsService};
pub use profile::ProfileService;
pub use reviews::ReviewHistoryService;
pub use slot_lifecycle::{
    LifecycleEvent, LifecyclePhase, LifecycleSnapshot, SlotLifecycleController, SubmitReceipt,
};

use std::sync::Arc;

use crate::ports::outbound::{AccountPort, AdminPort, PlatformPort, SlotServicePort};

/// Everything the presentation layer needs, wired once at startup.
#[derive(Clone)]
pub struct Services {
    pub lifecycle: SlotLifecycleController,
    pub feed: AvailabilityFeed,
    pub earnings: EarningsService,
    pub reviews: ReviewHistoryService,
    pub profile: ProfileService,
    pub admin: AdminService,
    pub platform: Arc<dyn PlatformPort>,
}

impl Services {
    pub fn new(
        slots: Arc<dyn SlotServicePort>,
        account: Arc<dyn AccountPort>,
        admin: Arc<dyn AdminPort>,
        platform: Arc<dyn PlatformPort>,
    ) -> Self {
        let feed = AvailabilityFeed::new(slots.clone(), platform.clone());
        let lifecycle =
            SlotLifecycleController::new(slots, platform.clone(), feed.clone());
        Self {
            lifecycle,
            feed,
            earnings: EarningsService::new(account.clone()),
            reviews: ReviewHistoryService::new(account.clone()),
            profile: ProfileService::new(account),
            admin: AdminService::new(admin),
            platform,
        }
    }
}
