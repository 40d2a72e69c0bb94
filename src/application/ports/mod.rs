//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the session model
//! and the collaborators that feed or consume it.

pub mod capture;
pub mod config;
pub mod discovery;
pub mod export;
pub mod permission;

// Re-export common types
pub use capture::{CaptureBackend, CaptureError, CapturePlan};
pub use config::ConfigStore;
pub use discovery::{DeviceDiscovery, DiscoveryError};
pub use export::{ExportError, ExportReceipt, ExportRequest, Exporter};
pub use permission::PermissionProbe;
