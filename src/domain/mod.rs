//! Domain layer - Core session model
//!
//! Contains the device registry, permission tracker, source selection,
//! the session state machine and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod device;
pub mod error;
pub mod permission;
pub mod selection;
pub mod session;

// Re-export common types
pub use config::AppConfig;
pub use device::{CaptureDevice, DeviceInventory, DeviceRegistry, ScreenSource};
pub use error::*;
pub use permission::{Capability, CapabilitySet, PermissionStatus, PermissionTracker};
pub use selection::{AudioOptions, CameraChoice, ScreenChoice, SourceOptions, SourceSelection};
pub use session::{ArtifactRef, ClickEvent, Elapsed, Phase, SessionController, SessionState};
