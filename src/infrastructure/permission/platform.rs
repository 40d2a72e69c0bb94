//! Platform permission probe

use std::collections::HashMap;

use async_trait::async_trait;

use crate::application::ports::PermissionProbe;
use crate::domain::config::AppConfig;
use crate::domain::permission::{Capability, PermissionStatus};

/// Whether this OS gates capture behind per-app permissions
pub const fn platform_gates_capture() -> bool {
    !cfg!(any(target_os = "linux", target_os = "windows"))
}

/// Reports permission status from platform defaults and config overrides.
///
/// Linux and Windows do not gate screen, camera or microphone capture per
/// application, so everything is granted there. Elsewhere nothing is
/// assumed: a capability is denied until the user records the grant under
/// `[permissions]` in the config file.
#[derive(Debug, Clone, Default)]
pub struct PlatformPermissionProbe {
    overrides: HashMap<Capability, PermissionStatus>,
}

impl PlatformPermissionProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a probe honouring `[permissions]` overrides from config
    pub fn from_config(config: &AppConfig) -> Self {
        let overrides = Capability::ALL
            .into_iter()
            .filter_map(|c| config.permission_override(c).map(|s| (c, s)))
            .collect();
        Self { overrides }
    }

    pub fn with_override(mut self, capability: Capability, status: PermissionStatus) -> Self {
        self.overrides.insert(capability, status);
        self
    }

    fn platform_default() -> PermissionStatus {
        if platform_gates_capture() {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        }
    }
}

#[async_trait]
impl PermissionProbe for PlatformPermissionProbe {
    async fn probe(&self, capability: Capability) -> PermissionStatus {
        let status = self
            .overrides
            .get(&capability)
            .copied()
            .unwrap_or_else(Self::platform_default);
        tracing::debug!(%capability, %status, "permission probed");
        status
    }

    async fn request(&self, capability: Capability) -> PermissionStatus {
        let status = self.probe(capability).await;
        if !status.is_granted() && platform_gates_capture() {
            tracing::warn!(
                %capability,
                "grant access in the system privacy settings, then set permissions.{} = \"granted\"",
                capability
            );
        }
        status
    }
}
