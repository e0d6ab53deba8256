//! Outbound ports - what the application needs from the outside world.

pub mod account;
pub mod admin;
pub mod platform;
pub mod rest_api;
pub mod service_error;
pub mod slot_service;

pub use account::AccountPort;
pub use admin::AdminPort;
pub use platform::{storage_keys, PlatformPort};
pub use rest_api::RestApiPort;
pub use service_error::ServiceError;
pub use slot_service::SlotServicePort;

#[cfg(any(test, feature = "testing"))]
pub use account::MockAccountPort;
#[cfg(any(test, feature = "testing"))]
pub use admin::MockAdminPort;
#[cfg(any(test, feature = "testing"))]
pub use rest_api::MockRestApiPort;
#[cfg(any(test, feature = "testing"))]
pub use slot_service::MockSlotServicePort;
