//! Export into a local directory

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{ExportError, ExportReceipt, ExportRequest, Exporter};

/// Moves finished recordings into a directory.
///
/// The file is named `recording-<millis>.<ext>`, keeping the artifact's
/// extension. Clicks captured for mouse zoom go to a `.clicks.json`
/// sidecar next to it. The artifact is consumed: after a successful
/// export only the exported copy remains.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$XDG_VIDEOS_DIR`, falling back to the home directory, then cwd
    pub fn default_dir() -> PathBuf {
        dirs::video_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn destination(&self, source: &Path) -> PathBuf {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let name = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("recording-{}.{}", timestamp, ext),
            None => format!("recording-{}", timestamp),
        };
        self.dir.join(name)
    }

    async fn write_clicks(
        destination: &Path,
        request: &ExportRequest,
    ) -> Result<Option<PathBuf>, ExportError> {
        if request.clicks.is_empty() {
            return Ok(None);
        }

        let path = destination.with_extension("clicks.json");
        let json = serde_json::to_string_pretty(&request.clicks)
            .map_err(|e| ExportError::WriteFailed(e.to_string()))?;
        fs::write(&path, json)
            .await
            .map_err(|e| ExportError::WriteFailed(format!("{}: {}", path.display(), e)))?;
        Ok(Some(path))
    }

    /// Rename into place, or copy and remove the original across filesystems
    async fn move_file(source: &Path, destination: &Path) -> Result<(), ExportError> {
        if fs::rename(source, destination).await.is_ok() {
            return Ok(());
        }

        fs::copy(source, destination)
            .await
            .map_err(|e| ExportError::WriteFailed(format!("{}: {}", destination.display(), e)))?;
        if let Err(e) = fs::remove_file(source).await {
            tracing::warn!(source = %source.display(), error = %e, "failed to remove exported recording");
        }
        Ok(())
    }
}

#[async_trait]
impl Exporter for DirectoryExporter {
    async fn export(&self, request: &ExportRequest) -> Result<ExportReceipt, ExportError> {
        let source = PathBuf::from(request.artifact.as_str());
        if !fs::try_exists(&source).await.unwrap_or(false) {
            return Err(ExportError::ArtifactMissing(request.artifact.to_string()));
        }

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ExportError::WriteFailed(format!("{}: {}", self.dir.display(), e)))?;

        let destination = self.destination(&source);

        // Sidecar first: a failed export must leave the artifact in place for a retry
        let clicks_file = Self::write_clicks(&destination, request).await?;
        if let Err(e) = Self::move_file(&source, &destination).await {
            if let Some(clicks) = &clicks_file {
                if let Err(e) = fs::remove_file(clicks).await {
                    tracing::debug!(error = %e, "failed to remove click sidecar");
                }
            }
            return Err(e);
        }

        tracing::info!(
            destination = %destination.display(),
            seconds = request.elapsed_seconds,
            clicks = request.clicks.len(),
            "recording exported"
        );

        Ok(ExportReceipt {
            destination,
            clicks_file,
        })
    }
}
