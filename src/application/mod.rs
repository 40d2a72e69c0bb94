//! Application layer - Use cases and port interfaces
//!
//! Contains the studio use case that drives the session model and the
//! trait definitions for its external collaborators.

pub mod ports;
pub mod studio;

// Re-export use cases
pub use studio::{Studio, StudioError, StudioSnapshot};
