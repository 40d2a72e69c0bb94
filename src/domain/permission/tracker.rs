//! Tri-state permission tracker

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{CapabilityParseError, PermissionStatusParseError};

/// An OS-gated capture capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Screen,
    Camera,
    Microphone,
}

impl Capability {
    pub const ALL: [Capability; 3] = [Self::Screen, Self::Camera, Self::Microphone];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Camera => "camera",
            Self::Microphone => "microphone",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = CapabilityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "screen" | "screen_recording" => Ok(Self::Screen),
            "camera" => Ok(Self::Camera),
            "microphone" | "mic" => Ok(Self::Microphone),
            _ => Err(CapabilityParseError {
                input: s.to_string(),
            }),
        }
    }
}

/// Set of capabilities, ordered for stable output
pub type CapabilitySet = BTreeSet<Capability>;

/// Grant status of one capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    #[default]
    Loading,
    Granted,
    Denied,
}

impl PermissionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    pub fn is_granted(&self) -> bool {
        *self == Self::Granted
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionStatus {
    type Err = PermissionStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "loading" => Ok(Self::Loading),
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            _ => Err(PermissionStatusParseError {
                input: s.to_string(),
            }),
        }
    }
}

/// Holds the grant status of screen, camera and microphone capture.
///
/// Statuses are independent and any status may follow any other, since the
/// OS can revoke a grant at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTracker {
    screen: PermissionStatus,
    camera: PermissionStatus,
    microphone: PermissionStatus,
}

impl PermissionTracker {
    /// Create a tracker with every capability still loading
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, capability: Capability) -> PermissionStatus {
        match capability {
            Capability::Screen => self.screen,
            Capability::Camera => self.camera,
            Capability::Microphone => self.microphone,
        }
    }

    pub fn set_status(&mut self, capability: Capability, status: PermissionStatus) {
        let slot = match capability {
            Capability::Screen => &mut self.screen,
            Capability::Camera => &mut self.camera,
            Capability::Microphone => &mut self.microphone,
        };
        if *slot != status {
            tracing::debug!(%capability, from = %slot, to = %status, "permission status changed");
        }
        *slot = status;
    }

    /// True iff every capability in `required` is granted
    pub fn all_granted(&self, required: &CapabilitySet) -> bool {
        required.iter().all(|c| self.status(*c).is_granted())
    }

    /// Capabilities from `required` that are not granted yet
    pub fn missing(&self, required: &CapabilitySet) -> Vec<Capability> {
        required
            .iter()
            .copied()
            .filter(|c| !self.status(*c).is_granted())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(caps: &[Capability]) -> CapabilitySet {
        caps.iter().copied().collect()
    }

    #[test]
    fn everything_starts_loading() {
        let tracker = PermissionTracker::new();
        for cap in Capability::ALL {
            assert_eq!(tracker.status(cap), PermissionStatus::Loading);
        }
    }

    #[test]
    fn loading_is_not_granted() {
        let tracker = PermissionTracker::new();
        assert!(!tracker.all_granted(&set(&[Capability::Screen])));
    }

    #[test]
    fn empty_set_is_granted() {
        let tracker = PermissionTracker::new();
        assert!(tracker.all_granted(&CapabilitySet::new()));
    }

    #[test]
    fn all_granted_checks_only_requested() {
        let mut tracker = PermissionTracker::new();
        tracker.set_status(Capability::Screen, PermissionStatus::Granted);
        tracker.set_status(Capability::Camera, PermissionStatus::Denied);

        assert!(tracker.all_granted(&set(&[Capability::Screen])));
        assert!(!tracker.all_granted(&set(&[Capability::Screen, Capability::Camera])));
    }

    #[test]
    fn grant_can_be_revoked() {
        let mut tracker = PermissionTracker::new();
        tracker.set_status(Capability::Microphone, PermissionStatus::Granted);
        tracker.set_status(Capability::Microphone, PermissionStatus::Denied);
        assert_eq!(
            tracker.status(Capability::Microphone),
            PermissionStatus::Denied
        );
    }

    #[test]
    fn missing_lists_in_order() {
        let mut tracker = PermissionTracker::new();
        tracker.set_status(Capability::Camera, PermissionStatus::Granted);
        let missing = tracker.missing(&set(&Capability::ALL));
        assert_eq!(missing, vec![Capability::Screen, Capability::Microphone]);
    }

    #[test]
    fn parse_status() {
        assert_eq!("granted".parse::<PermissionStatus>().unwrap(), PermissionStatus::Granted);
        assert_eq!(" DENIED ".parse::<PermissionStatus>().unwrap(), PermissionStatus::Denied);
        assert!("maybe".parse::<PermissionStatus>().is_err());
    }

    #[test]
    fn parse_capability() {
        assert_eq!("mic".parse::<Capability>().unwrap(), Capability::Microphone);
        assert_eq!("screen".parse::<Capability>().unwrap(), Capability::Screen);
        assert!("keyboard".parse::<Capability>().is_err());
    }
}
