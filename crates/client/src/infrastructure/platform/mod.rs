//! Platform implementations behind [`crate::ports::outbound::PlatformPort`]

pub mod desktop;
#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use desktop::DesktopPlatform;
#[cfg(any(test, feature = "testing"))]
pub use memory::MemoryPlatform;
