//! Recording timer display

use std::fmt;

/// Elapsed recording time in whole seconds, shown as `mm:ss` or `h:mm:ss`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Elapsed(pub u64);

impl Elapsed {
    pub const fn as_secs(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;

        if hours == 0 {
            write!(f, "{:02}:{:02}", minutes, seconds)
        } else {
            write!(f, "{}:{:02}:{:02}", hours, minutes, seconds)
        }
    }
}
