//! Capture device enumeration

mod registry;

pub use registry::{CaptureDevice, DeviceInventory, DeviceRegistry, ScreenSource};
