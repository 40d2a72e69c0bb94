//! OS permission tracking

mod tracker;

pub use tracker::{Capability, CapabilitySet, PermissionStatus, PermissionTracker};
