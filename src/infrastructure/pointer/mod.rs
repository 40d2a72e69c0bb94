//! Global pointer capture for mouse zoom

mod listener;

pub use listener::ClickListener;
