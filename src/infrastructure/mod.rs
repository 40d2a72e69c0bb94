//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external recorders, cpal, the global pointer state,
//! the filesystem and XDG config.

pub mod capture;
pub mod config;
pub mod discovery;
pub mod export;
pub mod permission;
pub mod pointer;

// Re-export adapters
pub use capture::{CommandCapture, NoOpCapture};
pub use config::XdgConfigStore;
pub use discovery::{ManifestDiscovery, SystemDeviceDiscovery};
pub use export::DirectoryExporter;
pub use permission::PlatformPermissionProbe;
pub use pointer::ClickListener;
