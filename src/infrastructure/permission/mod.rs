//! Permission probe adapters

mod platform;

pub use platform::PlatformPermissionProbe;
