//! Application layer - services orchestrating the domain over the ports.

pub mod services;
pub mod timer_store;

pub use services::Services;
pub use timer_store::LocalTimerStore;
