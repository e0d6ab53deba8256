//! Infrastructure adapters backing the outbound ports.

pub mod http;
pub mod messaging;
pub mod platform;
