//! Source selection validated against the device registry

use crate::domain::device::DeviceRegistry;
use crate::domain::error::{SessionError, SourceKind};
use crate::domain::permission::{Capability, CapabilitySet};

use super::options::{CameraChoice, ScreenChoice, SourceOptions};

/// The user's capture configuration.
///
/// Screen and camera names are checked against the registry on every
/// write. A rejected write leaves the selection untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSelection {
    options: SourceOptions,
}

impl SourceSelection {
    /// Create a selection with default options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &SourceOptions {
        &self.options
    }

    /// Select a screen by name, or the whole-screen sentinel
    pub fn set_screen(&mut self, name: &str, registry: &DeviceRegistry) -> Result<(), SessionError> {
        let choice = ScreenChoice::from_name(name);
        check_screen(&choice, registry)?;
        self.options.screen = choice;
        Ok(())
    }

    /// Select a camera by name, or the no-camera sentinel
    pub fn set_camera(&mut self, name: &str, registry: &DeviceRegistry) -> Result<(), SessionError> {
        let choice = CameraChoice::from_name(name);
        check_camera(&choice, registry)?;
        self.options.camera = choice;
        Ok(())
    }

    pub fn set_mouse_zoom(&mut self, enabled: bool) {
        self.options.mouse_zoom = enabled;
    }

    pub fn set_audio(&mut self, microphone: bool, system: bool) {
        self.options.audio.microphone = microphone;
        self.options.audio.system = system;
    }

    /// Replace every option at once; all-or-nothing
    pub fn apply(&mut self, options: SourceOptions, registry: &DeviceRegistry) -> Result<(), SessionError> {
        check_screen(&options.screen, registry)?;
        check_camera(&options.camera, registry)?;
        self.options = options;
        Ok(())
    }

    /// Reset any screen or camera that left the registry to its sentinel.
    ///
    /// Returns true when something was reset.
    pub fn reconcile(&mut self, registry: &DeviceRegistry) -> bool {
        let mut changed = false;

        if check_screen(&self.options.screen, registry).is_err() {
            tracing::info!(screen = %self.options.screen, "selected screen disappeared, falling back");
            self.options.screen = ScreenChoice::EntireScreen;
            changed = true;
        }
        if check_camera(&self.options.camera, registry).is_err() {
            tracing::info!(camera = %self.options.camera, "selected camera disappeared, falling back");
            self.options.camera = CameraChoice::None;
            changed = true;
        }

        changed
    }

    /// Check that screen and camera still refer to registered devices
    pub fn validate(&self, registry: &DeviceRegistry) -> Result<(), SessionError> {
        check_screen(&self.options.screen, registry)?;
        check_camera(&self.options.camera, registry)
    }

    pub fn is_valid(&self, registry: &DeviceRegistry) -> bool {
        self.validate(registry).is_ok()
    }

    /// Capabilities the OS must grant before this selection can be recorded.
    ///
    /// System audio is not permission-gated.
    pub fn required_permissions(&self) -> CapabilitySet {
        let mut required = CapabilitySet::new();
        required.insert(Capability::Screen);
        if !self.options.camera.is_sentinel() {
            required.insert(Capability::Camera);
        }
        if self.options.audio.microphone {
            required.insert(Capability::Microphone);
        }
        required
    }
}

fn check_screen(choice: &ScreenChoice, registry: &DeviceRegistry) -> Result<(), SessionError> {
    match choice {
        ScreenChoice::EntireScreen => Ok(()),
        ScreenChoice::Display(name) if registry.has_screen(name) => Ok(()),
        ScreenChoice::Display(name) => Err(SessionError::InvalidSource {
            kind: SourceKind::Screen,
            name: name.clone(),
        }),
    }
}

fn check_camera(choice: &CameraChoice, registry: &DeviceRegistry) -> Result<(), SessionError> {
    match choice {
        CameraChoice::None => Ok(()),
        CameraChoice::Device(name) if registry.has_camera(name) => Ok(()),
        CameraChoice::Device(name) => Err(SessionError::InvalidSource {
            kind: SourceKind::Camera,
            name: name.clone(),
        }),
    }
}
