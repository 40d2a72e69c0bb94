//! Pointer clicks captured for mouse zoom

use serde::{Deserialize, Serialize};

/// A left-button press while recording, used to drive zoom on export
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub x: f64,
    pub y: f64,
    /// Milliseconds since the recording started
    pub timestamp_ms: u64,
}

impl ClickEvent {
    pub fn new(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self { x, y, timestamp_ms }
    }
}
