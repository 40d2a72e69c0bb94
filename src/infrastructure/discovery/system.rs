//! Host device discovery using cpal for microphones

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait};

use super::manifest::ManifestDiscovery;
use crate::application::ports::{DeviceDiscovery, DiscoveryError};
use crate::domain::device::{CaptureDevice, DeviceInventory, ScreenSource};
use crate::domain::selection::WHOLE_SCREEN;

/// Discovers devices on the local machine.
///
/// Microphones come from the default cpal host. Displays and cameras have
/// no portable enumeration API here, so they are read from an optional
/// manifest; without one the only screen is the whole desktop.
pub struct SystemDeviceDiscovery {
    manifest: Option<ManifestDiscovery>,
}

impl SystemDeviceDiscovery {
    pub fn new() -> Self {
        Self { manifest: None }
    }

    /// Take screens and cameras from a manifest file
    pub fn with_manifest(manifest: ManifestDiscovery) -> Self {
        Self {
            manifest: Some(manifest),
        }
    }

    fn default_screens() -> Vec<ScreenSource> {
        vec![ScreenSource::new("0", WHOLE_SCREEN, 0)]
    }

    /// Enumerate input devices on the default audio host
    fn enumerate_microphones() -> Result<Vec<CaptureDevice>, DiscoveryError> {
        let host = cpal::default_host();
        let host_name = host.id().name();
        let devices = host
            .input_devices()
            .map_err(|e| DiscoveryError::EnumerationFailed(e.to_string()))?;

        Ok(devices
            .enumerate()
            .filter_map(|(index, device)| {
                let name = device.name().ok()?;
                Some(CaptureDevice::new(format!("{}:{}", host_name, index), name))
            })
            .collect())
    }
}

impl Default for SystemDeviceDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceDiscovery for SystemDeviceDiscovery {
    async fn discover(&self) -> Result<DeviceInventory, DiscoveryError> {
        let mut inventory = match &self.manifest {
            Some(manifest) => manifest.discover().await?,
            None => DeviceInventory::default(),
        };
        if inventory.screens.is_empty() {
            inventory.screens = Self::default_screens();
        }

        // Manifest microphones win; otherwise ask the audio host
        if inventory.microphones.is_empty() {
            let enumerated = tokio::task::spawn_blocking(Self::enumerate_microphones)
                .await
                .map_err(|e| DiscoveryError::EnumerationFailed(e.to_string()))?;
            match enumerated {
                Ok(mics) => inventory.microphones = mics,
                Err(e) => tracing::warn!(error = %e, "microphone enumeration failed"),
            }
        }

        Ok(inventory)
    }
}
