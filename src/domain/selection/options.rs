//! Source option value objects

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel meaning "capture the whole screen, no specific display"
pub const WHOLE_SCREEN: &str = "Entire Screen";

/// Sentinel meaning "no camera overlay"
pub const NO_CAMERA: &str = "None";

/// Screen the user wants to record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScreenChoice {
    #[default]
    EntireScreen,
    Display(String),
}

impl ScreenChoice {
    /// Build a choice from a display name; the sentinel string maps to `EntireScreen`
    pub fn from_name(name: &str) -> Self {
        if name == WHOLE_SCREEN {
            Self::EntireScreen
        } else {
            Self::Display(name.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::EntireScreen => WHOLE_SCREEN,
            Self::Display(name) => name,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::EntireScreen)
    }
}

impl From<String> for ScreenChoice {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<ScreenChoice> for String {
    fn from(choice: ScreenChoice) -> Self {
        choice.as_str().to_string()
    }
}

impl fmt::Display for ScreenChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Camera overlay the user wants to record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CameraChoice {
    #[default]
    None,
    Device(String),
}

impl CameraChoice {
    /// Build a choice from a camera name; the sentinel string maps to `None`
    pub fn from_name(name: &str) -> Self {
        if name == NO_CAMERA {
            Self::None
        } else {
            Self::Device(name.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::None => NO_CAMERA,
            Self::Device(name) => name,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<String> for CameraChoice {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<CameraChoice> for String {
    fn from(choice: CameraChoice) -> Self {
        choice.as_str().to_string()
    }
}

impl fmt::Display for CameraChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio tracks to capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioOptions {
    pub microphone: bool,
    pub system: bool,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            microphone: true,
            system: false,
        }
    }
}

/// The full capture configuration chosen by the user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceOptions {
    pub screen: ScreenChoice,
    pub camera: CameraChoice,
    pub mouse_zoom: bool,
    pub audio: AudioOptions,
}
