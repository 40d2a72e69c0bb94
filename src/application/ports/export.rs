//! Export port interface

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::session::{ArtifactRef, ClickEvent};

/// Export errors
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("Artifact not found: {0}")]
    ArtifactMissing(String),

    #[error("Failed to write export: {0}")]
    WriteFailed(String),
}

/// What the exporter receives when the session enters export
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub artifact: ArtifactRef,
    pub elapsed_seconds: u64,
    pub clicks: Vec<ClickEvent>,
}

/// Proof that the exporter consumed the artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub destination: PathBuf,
    pub clicks_file: Option<PathBuf>,
}

/// Port for consuming finished recordings
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Consume the artifact.
    ///
    /// Returning `Ok` confirms the artifact is no longer read and may be
    /// released by the session.
    async fn export(&self, request: &ExportRequest) -> Result<ExportReceipt, ExportError>;
}
