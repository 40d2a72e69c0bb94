//! Permission probe port interface

use async_trait::async_trait;

use crate::domain::permission::{Capability, PermissionStatus};

/// Port for querying OS capture permissions
#[async_trait]
pub trait PermissionProbe: Send + Sync {
    /// Query the current grant status of one capability
    async fn probe(&self, capability: Capability) -> PermissionStatus;

    /// Ask the OS to grant a capability and report the resulting status.
    ///
    /// Platforms without a prompt just report the current status.
    async fn request(&self, capability: Capability) -> PermissionStatus {
        self.probe(capability).await
    }
}
