//! Capture backend adapters
//!
//! Frame and audio capture happen outside this crate: the command backend
//! drives an external recorder process, the no-op backend records nothing.

mod command;
mod noop;

pub use command::CommandCapture;
pub use noop::NoOpCapture;
