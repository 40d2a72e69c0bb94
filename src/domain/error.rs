//! Domain error types

use thiserror::Error;

use super::permission::Capability;
use super::session::Phase;

/// Which kind of source a selection refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Screen,
    Camera,
}

impl SourceKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Camera => "camera",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the session model.
///
/// All of these are recoverable: the UI surfaces them and the user retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Invalid {kind} source: \"{name}\" is not in the current device list")]
    InvalidSource { kind: SourceKind, name: String },

    #[error("Permission denied: {} not granted", format_capabilities(.missing))]
    PermissionDenied { missing: Vec<Capability> },

    #[error("Invalid state transition: cannot {action} while in {phase} phase")]
    InvalidTransition { phase: Phase, action: &'static str },

    #[error("Recording produced no artifact")]
    RecordingEmpty,
}

fn format_capabilities(caps: &[Capability]) -> String {
    caps.iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error when a permission status string cannot be parsed
#[derive(Debug, Clone, Error)]
#[error("Invalid permission status: \"{input}\". Expected one of: loading, granted, denied")]
pub struct PermissionStatusParseError {
    pub input: String,
}

/// Error when a capability name cannot be parsed
#[derive(Debug, Clone, Error)]
#[error("Invalid capability: \"{input}\". Expected one of: screen, camera, microphone")]
pub struct CapabilityParseError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_lists_capabilities() {
        let err = SessionError::PermissionDenied {
            missing: vec![Capability::Camera, Capability::Microphone],
        };
        assert_eq!(
            err.to_string(),
            "Permission denied: camera, microphone not granted"
        );
    }

    #[test]
    fn invalid_transition_mentions_phase() {
        let err = SessionError::InvalidTransition {
            phase: Phase::Recording,
            action: "start recording",
        };
        let msg = err.to_string();
        assert!(msg.contains("start recording"));
        assert!(msg.contains("recording phase"));
    }

    #[test]
    fn invalid_source_names_device() {
        let err = SessionError::InvalidSource {
            kind: SourceKind::Screen,
            name: "Display 9".to_string(),
        };
        assert!(err.to_string().contains("\"Display 9\""));
        assert!(err.to_string().contains("screen"));
    }
}
