//! Unified Commenter Pay client crate.
//!
//! This crate contains the application services (slot lifecycle, availability
//! feed, account and admin flows), the outbound ports they depend on, and the
//! infrastructure adapters that back those ports (REST transport, desktop
//! platform, event bus).

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod presentation;

// Re-export commonly used entrypoints
pub use application::services::Services;
pub use application::services::slot_lifecycle::{
    LifecycleEvent, LifecyclePhase, LifecycleSnapshot, SlotLifecycleController,
};
pub use ports::outbound::{PlatformPort, ServiceError};
