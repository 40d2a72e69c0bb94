//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::permission::{Capability, PermissionStatus};
use crate::domain::selection::{AudioOptions, CameraChoice, ScreenChoice, SourceOptions};

/// Per-capability permission overrides.
///
/// Values are `granted`, `denied` or `loading`; anything unset is left to
/// the platform probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionOverrides {
    pub screen: Option<String>,
    pub camera: Option<String>,
    pub microphone: Option<String>,
}

impl PermissionOverrides {
    pub fn get(&self, capability: Capability) -> Option<&str> {
        match capability {
            Capability::Screen => self.screen.as_deref(),
            Capability::Camera => self.camera.as_deref(),
            Capability::Microphone => self.microphone.as_deref(),
        }
    }

    pub fn set(&mut self, capability: Capability, value: Option<String>) {
        match capability {
            Capability::Screen => self.screen = value,
            Capability::Camera => self.camera = value,
            Capability::Microphone => self.microphone = value,
        }
    }
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub screen: Option<String>,
    pub camera: Option<String>,
    pub mouse_zoom: Option<bool>,
    pub microphone: Option<bool>,
    pub system_audio: Option<bool>,
    pub export_dir: Option<String>,
    pub capture_command: Option<String>,
    pub device_manifest: Option<String>,
    pub permissions: Option<PermissionOverrides>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        let options = SourceOptions::default();
        Self {
            screen: Some(options.screen.to_string()),
            camera: Some(options.camera.to_string()),
            mouse_zoom: Some(options.mouse_zoom),
            microphone: Some(options.audio.microphone),
            system_audio: Some(options.audio.system),
            export_dir: None,
            capture_command: None,
            device_manifest: None,
            permissions: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            screen: other.screen.or(self.screen),
            camera: other.camera.or(self.camera),
            mouse_zoom: other.mouse_zoom.or(self.mouse_zoom),
            microphone: other.microphone.or(self.microphone),
            system_audio: other.system_audio.or(self.system_audio),
            export_dir: other.export_dir.or(self.export_dir),
            capture_command: other.capture_command.or(self.capture_command),
            device_manifest: other.device_manifest.or(self.device_manifest),
            permissions: Self::merge_permissions(self.permissions, other.permissions),
        }
    }

    fn merge_permissions(
        base: Option<PermissionOverrides>,
        other: Option<PermissionOverrides>,
    ) -> Option<PermissionOverrides> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(PermissionOverrides {
                screen: o.screen.or(b.screen),
                camera: o.camera.or(b.camera),
                microphone: o.microphone.or(b.microphone),
            }),
        }
    }

    /// Source options described by this config.
    ///
    /// Not validated against any registry; the selection does that.
    pub fn source_options(&self) -> SourceOptions {
        let defaults = SourceOptions::default();
        SourceOptions {
            screen: self
                .screen
                .as_deref()
                .map(ScreenChoice::from_name)
                .unwrap_or(defaults.screen),
            camera: self
                .camera
                .as_deref()
                .map(CameraChoice::from_name)
                .unwrap_or(defaults.camera),
            mouse_zoom: self.mouse_zoom.unwrap_or(defaults.mouse_zoom),
            audio: AudioOptions {
                microphone: self.microphone.unwrap_or(defaults.audio.microphone),
                system: self.system_audio.unwrap_or(defaults.audio.system),
            },
        }
    }

    /// Configured override for one capability, if set and valid
    pub fn permission_override(&self, capability: Capability) -> Option<PermissionStatus> {
        self.permissions
            .as_ref()
            .and_then(|p| p.get(capability))
            .and_then(|s| s.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.screen, Some("Entire Screen".to_string()));
        assert_eq!(config.camera, Some("None".to_string()));
        assert_eq!(config.mouse_zoom, Some(false));
        assert_eq!(config.microphone, Some(true));
        assert_eq!(config.system_audio, Some(false));
        assert!(config.capture_command.is_none());
        assert!(config.permissions.is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.screen.is_none());
        assert!(config.camera.is_none());
        assert!(config.export_dir.is_none());
        assert!(config.permissions.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            screen: Some("Display 1".to_string()),
            microphone: Some(true),
            export_dir: Some("/base".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            screen: Some("Display 2".to_string()),
            microphone: None, // Should not override
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.screen, Some("Display 2".to_string()));
        assert_eq!(merged.microphone, Some(true)); // Kept from base
        assert_eq!(merged.export_dir, Some("/base".to_string()));
    }

    #[test]
    fn merge_permission_sections() {
        let base = AppConfig {
            permissions: Some(PermissionOverrides {
                screen: Some("granted".to_string()),
                camera: Some("denied".to_string()),
                microphone: None,
            }),
            ..Default::default()
        };
        let other = AppConfig {
            permissions: Some(PermissionOverrides {
                camera: Some("granted".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = base.merge(other);
        let perms = merged.permissions.unwrap();
        assert_eq!(perms.screen, Some("granted".to_string()));
        assert_eq!(perms.camera, Some("granted".to_string()));
        assert!(perms.microphone.is_none());
    }

    #[test]
    fn source_options_maps_sentinels() {
        let config = AppConfig {
            screen: Some("Display 2".to_string()),
            camera: Some("None".to_string()),
            system_audio: Some(true),
            ..Default::default()
        };
        let options = config.source_options();
        assert_eq!(options.screen, ScreenChoice::Display("Display 2".to_string()));
        assert_eq!(options.camera, CameraChoice::None);
        assert!(options.audio.microphone);
        assert!(options.audio.system);
    }

    #[test]
    fn permission_override_ignores_garbage() {
        let config = AppConfig {
            permissions: Some(PermissionOverrides {
                screen: Some("denied".to_string()),
                camera: Some("sometimes".to_string()),
                microphone: None,
            }),
            ..Default::default()
        };
        assert_eq!(
            config.permission_override(Capability::Screen),
            Some(PermissionStatus::Denied)
        );
        assert_eq!(config.permission_override(Capability::Camera), None);
        assert_eq!(config.permission_override(Capability::Microphone), None);
    }

    #[test]
    fn parses_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
screen = "Display 2"
mouse_zoom = true

[permissions]
camera = "denied"
"#,
        )
        .unwrap();
        assert_eq!(config.screen.as_deref(), Some("Display 2"));
        assert_eq!(config.mouse_zoom, Some(true));
        assert_eq!(
            config.permission_override(Capability::Camera),
            Some(PermissionStatus::Denied)
        );
    }
}
