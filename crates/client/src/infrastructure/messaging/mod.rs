//! In-process messaging between the lifecycle and its observers.

pub mod event_bus;

pub use event_bus::LifecycleEventBus;
