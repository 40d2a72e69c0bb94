//! Recording session state machine

mod clicks;
mod controller;
mod elapsed;
mod phase;

pub use clicks::ClickEvent;
pub use controller::{SessionController, SessionState};
pub use elapsed::Elapsed;
pub use phase::{ArtifactRef, Phase};
