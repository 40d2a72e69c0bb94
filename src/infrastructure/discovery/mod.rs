//! Device discovery adapters
//!
//! Screens and cameras come from a TOML device manifest; microphones are
//! enumerated through cpal when no manifest pins them down.

mod manifest;
mod system;

pub use manifest::ManifestDiscovery;
pub use system::SystemDeviceDiscovery;
