//! Capture source selection

mod options;
mod source_selection;

pub use options::{
    AudioOptions, CameraChoice, ScreenChoice, SourceOptions, NO_CAMERA, WHOLE_SCREEN,
};
pub use source_selection::SourceSelection;
