//! No-op capture adapter

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::application::ports::{CaptureBackend, CaptureError, CapturePlan};
use crate::domain::session::ArtifactRef;

/// Capture backend that never produces an artifact
///
/// Used when no capture command is configured. Every recording made with
/// it ends as `RecordingEmpty`.
#[derive(Debug, Default)]
pub struct NoOpCapture {
    running: AtomicBool,
}

impl NoOpCapture {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CaptureBackend for NoOpCapture {
    async fn start(&self, _plan: &CapturePlan) -> Result<(), CaptureError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::AlreadyRunning);
        }
        Ok(())
    }

    async fn stop(&self) -> Result<Option<ArtifactRef>, CaptureError> {
        self.running.store(false, Ordering::SeqCst);
        Ok(None)
    }

    async fn is_alive(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
