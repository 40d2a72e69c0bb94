//! Device registry: cache of the last device enumeration

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A camera or microphone entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDevice {
    pub id: String,
    pub name: String,
}

impl CaptureDevice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A capturable display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_index: u32,
}

impl ScreenSource {
    pub fn new(id: impl Into<String>, name: impl Into<String>, display_index: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_index,
        }
    }
}

/// One complete enumeration result.
///
/// Screens, cameras and microphones always travel together so a refresh
/// can never mix lists from two different enumerations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInventory {
    #[serde(default)]
    pub screens: Vec<ScreenSource>,
    #[serde(default)]
    pub cameras: Vec<CaptureDevice>,
    #[serde(default)]
    pub microphones: Vec<CaptureDevice>,
}

impl DeviceInventory {
    pub fn new(
        screens: Vec<ScreenSource>,
        cameras: Vec<CaptureDevice>,
        microphones: Vec<CaptureDevice>,
    ) -> Self {
        Self {
            screens,
            cameras,
            microphones,
        }
    }
}

/// Holds the most recent device enumeration.
///
/// Performs no validation; an empty list is a valid state (no camera
/// attached, for instance).
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    snapshot: Arc<DeviceInventory>,
}

impl DeviceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all three device lists at once
    pub fn refresh(
        &mut self,
        screens: Vec<ScreenSource>,
        cameras: Vec<CaptureDevice>,
        microphones: Vec<CaptureDevice>,
    ) {
        self.replace(DeviceInventory::new(screens, cameras, microphones));
    }

    /// Replace the registry contents with a complete inventory
    pub fn replace(&mut self, inventory: DeviceInventory) {
        tracing::debug!(
            screens = inventory.screens.len(),
            cameras = inventory.cameras.len(),
            microphones = inventory.microphones.len(),
            "device registry refreshed"
        );
        self.snapshot = Arc::new(inventory);
    }

    pub fn list_screens(&self) -> &[ScreenSource] {
        &self.snapshot.screens
    }

    pub fn list_cameras(&self) -> &[CaptureDevice] {
        &self.snapshot.cameras
    }

    pub fn list_mics(&self) -> &[CaptureDevice] {
        &self.snapshot.microphones
    }

    /// Shared handle to the current enumeration
    pub fn snapshot(&self) -> Arc<DeviceInventory> {
        Arc::clone(&self.snapshot)
    }

    /// Look up a screen by display name
    pub fn find_screen(&self, name: &str) -> Option<&ScreenSource> {
        self.snapshot.screens.iter().find(|s| s.name == name)
    }

    /// Look up a camera by display name
    pub fn find_camera(&self, name: &str) -> Option<&CaptureDevice> {
        self.snapshot.cameras.iter().find(|c| c.name == name)
    }

    pub fn has_screen(&self, name: &str) -> bool {
        self.find_screen(name).is_some()
    }

    pub fn has_camera(&self, name: &str) -> bool {
        self.find_camera(name).is_some()
    }
}
