//! Device discovery port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::device::DeviceInventory;

/// Device discovery errors
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    #[error("Failed to read device manifest: {0}")]
    ManifestRead(String),

    #[error("Failed to parse device manifest: {0}")]
    ManifestParse(String),

    #[error("Device enumeration failed: {0}")]
    EnumerationFailed(String),
}

/// Port for enumerating screens, cameras and microphones
#[async_trait]
pub trait DeviceDiscovery: Send + Sync {
    /// Enumerate every capture device currently available.
    ///
    /// # Returns
    /// A complete inventory; partial results are never returned
    async fn discover(&self) -> Result<DeviceInventory, DiscoveryError>;
}
