//! Device manifest adapter

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{DeviceDiscovery, DiscoveryError};
use crate::domain::device::DeviceInventory;

/// Reads the device list from a TOML file.
///
/// ```toml
/// [[screens]]
/// id = "0"
/// name = "Display 2"
/// display_index = 1
///
/// [[cameras]]
/// id = "cam0"
/// name = "USB Camera"
/// ```
///
/// The file is re-read on every discovery, so editing it and refreshing
/// simulates a hotplug.
pub struct ManifestDiscovery {
    path: PathBuf,
}

impl ManifestDiscovery {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(content: &str) -> Result<DeviceInventory, DiscoveryError> {
        toml::from_str(content).map_err(|e| DiscoveryError::ManifestParse(e.to_string()))
    }
}

#[async_trait]
impl DeviceDiscovery for ManifestDiscovery {
    async fn discover(&self) -> Result<DeviceInventory, DiscoveryError> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            DiscoveryError::ManifestRead(format!("{}: {}", self.path.display(), e))
        })?;
        Self::parse(&content)
    }
}
