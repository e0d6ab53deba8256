//! View models and intent handlers for the client screens
//!
//! Rendering is left to the embedding shell; this layer only turns
//! application state into display-ready structs and routes user intents
//! into the services.

pub mod format;
pub mod intents;
pub mod view;

pub use intents::UserIntents;
pub use view::{EarningsView, HistoryRowView, ReservationView, WithdrawalRowView};
