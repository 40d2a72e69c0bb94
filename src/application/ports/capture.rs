//! Capture backend port interface

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::device::{CaptureDevice, DeviceRegistry, ScreenSource};
use crate::domain::permission::CapabilitySet;
use crate::domain::selection::{CameraChoice, ScreenChoice, SourceOptions};
use crate::domain::session::ArtifactRef;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Failed to stop capture: {0}")]
    StopFailed(String),

    #[error("Capture command not found: {0}")]
    CommandNotFound(String),

    #[error("Capture already running")]
    AlreadyRunning,
}

/// Everything a capture backend needs to begin recording
#[derive(Debug, Clone, Serialize)]
pub struct CapturePlan {
    pub options: SourceOptions,
    pub required: CapabilitySet,
    /// Registry entry for the chosen display; `None` means the whole screen
    pub screen: Option<ScreenSource>,
    pub camera: Option<CaptureDevice>,
    /// First registered microphone when microphone capture is on
    pub microphone: Option<CaptureDevice>,
}

impl CapturePlan {
    /// Resolve validated options into concrete registry entries
    pub fn resolve(options: &SourceOptions, required: CapabilitySet, registry: &DeviceRegistry) -> Self {
        let screen = match &options.screen {
            ScreenChoice::EntireScreen => None,
            ScreenChoice::Display(name) => registry.find_screen(name).cloned(),
        };
        let camera = match &options.camera {
            CameraChoice::None => None,
            CameraChoice::Device(name) => registry.find_camera(name).cloned(),
        };
        let microphone = if options.audio.microphone {
            registry.list_mics().first().cloned()
        } else {
            None
        };

        Self {
            options: options.clone(),
            required,
            screen,
            camera,
            microphone,
        }
    }

    /// Display index to capture (0 for the whole screen)
    pub fn display_index(&self) -> u32 {
        self.screen.as_ref().map(|s| s.display_index).unwrap_or(0)
    }
}

/// Port for the component that actually captures frames and audio
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Begin capturing according to the plan
    async fn start(&self, plan: &CapturePlan) -> Result<(), CaptureError>;

    /// Stop capturing.
    ///
    /// # Returns
    /// The produced artifact, or `None` when nothing usable was recorded
    async fn stop(&self) -> Result<Option<ArtifactRef>, CaptureError>;

    /// False once the capture died on its own
    async fn is_alive(&self) -> bool;

    /// Release an artifact the session will never export
    async fn discard(&self, _artifact: &ArtifactRef) -> Result<(), CaptureError> {
        Ok(())
    }
}

/// Blanket implementation for boxed capture backends
#[async_trait]
impl CaptureBackend for Box<dyn CaptureBackend> {
    async fn start(&self, plan: &CapturePlan) -> Result<(), CaptureError> {
        self.as_ref().start(plan).await
    }

    async fn stop(&self) -> Result<Option<ArtifactRef>, CaptureError> {
        self.as_ref().stop().await
    }

    async fn is_alive(&self) -> bool {
        self.as_ref().is_alive().await
    }

    async fn discard(&self, artifact: &ArtifactRef) -> Result<(), CaptureError> {
        self.as_ref().discard(artifact).await
    }
}
