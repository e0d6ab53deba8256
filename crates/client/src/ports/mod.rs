//! Port definitions (interfaces) for the client.
//!
//! Ports are trait definitions only; concrete implementations live in
//! `infrastructure`.

pub mod outbound;
