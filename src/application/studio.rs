//! Recording studio use case
//!
//! Owns the four session components and drives them from the external
//! collaborators. Every mutation goes through `&mut self`, so the model
//! has a single writer; observers follow along through a watch channel.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

use crate::domain::device::{DeviceInventory, DeviceRegistry};
use crate::domain::error::SessionError;
use crate::domain::permission::{Capability, PermissionStatus, PermissionTracker};
use crate::domain::selection::{SourceOptions, SourceSelection};
use crate::domain::session::{ArtifactRef, ClickEvent, Phase, SessionController};

use super::ports::{
    CaptureBackend, CaptureError, CapturePlan, DeviceDiscovery, DiscoveryError, ExportError,
    ExportReceipt, ExportRequest, Exporter, PermissionProbe,
};

/// Errors from the studio use case
#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Device discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

impl StudioError {
    /// The session-level error, if this is one
    pub fn as_session(&self) -> Option<&SessionError> {
        match self {
            Self::Session(e) => Some(e),
            _ => None,
        }
    }
}

/// Everything a UI needs to render the current state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudioSnapshot {
    pub phase: Phase,
    pub elapsed_seconds: u64,
    pub artifact_ref: Option<ArtifactRef>,
    pub permissions: PermissionTracker,
    pub selection: SourceOptions,
    pub devices: Arc<DeviceInventory>,
}

/// Recording studio use case
pub struct Studio<D, P, C, E>
where
    D: DeviceDiscovery,
    P: PermissionProbe,
    C: CaptureBackend,
    E: Exporter,
{
    discovery: D,
    probe: P,
    capture: C,
    exporter: E,
    registry: DeviceRegistry,
    permissions: PermissionTracker,
    selection: SourceSelection,
    session: SessionController,
    events: watch::Sender<StudioSnapshot>,
}

impl<D, P, C, E> Studio<D, P, C, E>
where
    D: DeviceDiscovery,
    P: PermissionProbe,
    C: CaptureBackend,
    E: Exporter,
{
    /// Create a new studio; all permissions start out loading
    pub fn new(discovery: D, probe: P, capture: C, exporter: E) -> Self {
        let (events, _) = watch::channel(StudioSnapshot::default());
        Self {
            discovery,
            probe,
            capture,
            exporter,
            registry: DeviceRegistry::new(),
            permissions: PermissionTracker::new(),
            selection: SourceSelection::new(),
            session: SessionController::new(),
            events,
        }
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<StudioSnapshot> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> StudioSnapshot {
        StudioSnapshot {
            phase: self.session.phase(),
            elapsed_seconds: self.session.elapsed_seconds(),
            artifact_ref: self.session.artifact().cloned(),
            permissions: self.permissions,
            selection: self.selection.options().clone(),
            devices: self.registry.snapshot(),
        }
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn permissions(&self) -> &PermissionTracker {
        &self.permissions
    }

    pub fn selection(&self) -> &SourceSelection {
        &self.selection
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    fn publish(&self) {
        self.events.send_replace(self.snapshot());
    }

    /// Re-enumerate devices and reconcile the selection in one step.
    ///
    /// Returns true when the selection had to fall back to a sentinel.
    pub async fn refresh_devices(&mut self) -> Result<bool, StudioError> {
        let inventory = self.discovery.discover().await?;
        self.registry.replace(inventory);
        let changed = self.selection.reconcile(&self.registry);
        self.publish();
        Ok(changed)
    }

    /// Query every capability, publishing `loading` before each answer
    pub async fn probe_permissions(&mut self) -> PermissionTracker {
        for capability in Capability::ALL {
            self.permissions
                .set_status(capability, PermissionStatus::Loading);
        }
        self.publish();

        for capability in Capability::ALL {
            let status = self.probe.probe(capability).await;
            self.permissions.set_status(capability, status);
        }
        self.publish();
        self.permissions
    }

    /// Ask the OS for one capability again (UI-driven retry)
    pub async fn request_permission(&mut self, capability: Capability) -> PermissionStatus {
        self.set_permission(capability, PermissionStatus::Loading);
        let status = self.probe.request(capability).await;
        self.set_permission(capability, status);
        status
    }

    /// Record a status pushed by an external permission probe
    pub fn set_permission(&mut self, capability: Capability, status: PermissionStatus) {
        self.permissions.set_status(capability, status);
        self.publish();
    }

    pub fn select_screen(&mut self, name: &str) -> Result<(), StudioError> {
        self.selection.set_screen(name, &self.registry)?;
        self.publish();
        Ok(())
    }

    pub fn select_camera(&mut self, name: &str) -> Result<(), StudioError> {
        self.selection.set_camera(name, &self.registry)?;
        self.publish();
        Ok(())
    }

    pub fn set_mouse_zoom(&mut self, enabled: bool) {
        self.selection.set_mouse_zoom(enabled);
        self.publish();
    }

    pub fn set_audio(&mut self, microphone: bool, system: bool) {
        self.selection.set_audio(microphone, system);
        self.publish();
    }

    /// Replace the whole selection; nothing changes if any field is invalid
    pub fn apply_options(&mut self, options: SourceOptions) -> Result<(), StudioError> {
        self.selection.apply(options, &self.registry)?;
        self.publish();
        Ok(())
    }

    /// Transition to recording and start the capture backend.
    ///
    /// If the backend refuses to start, the session is treated as having
    /// lost its capture and returns to idle.
    pub async fn start_recording(&mut self) -> Result<CapturePlan, StudioError> {
        self.session
            .start(&self.permissions, &self.selection, &self.registry)?;

        let plan = CapturePlan::resolve(
            self.selection.options(),
            self.selection.required_permissions(),
            &self.registry,
        );

        if let Err(e) = self.capture.start(&plan).await {
            tracing::error!(error = %e, "capture backend failed to start");
            // The start error is reported; the session's RecordingEmpty is not
            if let Err(lost) = self.session.capture_lost() {
                tracing::debug!(error = %lost, "session reset after failed start");
            }
            self.publish();
            return Err(e.into());
        }

        self.publish();
        Ok(plan)
    }

    /// Advance the recording timer (called once per second from outside)
    pub fn tick(&mut self) -> Option<u64> {
        let elapsed = self.session.tick();
        if elapsed.is_some() {
            self.publish();
        }
        elapsed
    }

    /// Forward a pointer click for mouse zoom.
    ///
    /// Returns false when the click was ignored (not recording, or mouse
    /// zoom off for the active plan).
    pub fn record_click(&mut self, click: ClickEvent) -> bool {
        self.session.record_click(click)
    }

    /// Check the capture backend is still running.
    ///
    /// A dead backend while recording forces the session back to idle and
    /// reports `RecordingEmpty`. Whatever the backend left behind is
    /// discarded, since the session will never export it.
    pub async fn check_capture(&mut self) -> Result<(), StudioError> {
        if self.session.phase() != Phase::Recording || self.capture.is_alive().await {
            return Ok(());
        }
        // Reap the dead backend so the next start is accepted
        match self.capture.stop().await {
            Ok(Some(partial)) => {
                tracing::warn!(artifact = %partial, "discarding partial recording");
                if let Err(e) = self.capture.discard(&partial).await {
                    tracing::warn!(error = %e, artifact = %partial, "failed to discard partial recording");
                }
            }
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, "releasing dead capture backend"),
        }
        let result = self.session.capture_lost();
        self.publish();
        result.map_err(Into::into)
    }

    /// Stop capturing and hand the artifact to export
    pub async fn stop_recording(&mut self) -> Result<ArtifactRef, StudioError> {
        let artifact = if self.session.phase() == Phase::Recording {
            match self.capture.stop().await {
                Ok(artifact) => artifact,
                Err(e) => {
                    tracing::error!(error = %e, "capture backend failed to stop cleanly");
                    None
                }
            }
        } else {
            None
        };

        let result = self.session.stop(artifact);
        self.publish();
        result?;

        self.session
            .artifact()
            .cloned()
            .ok_or_else(|| SessionError::RecordingEmpty.into())
    }

    /// Run the exporter on the current artifact and confirm consumption.
    ///
    /// On failure the session stays in export holding the artifact, so
    /// the export can be retried.
    pub async fn export(&mut self) -> Result<ExportReceipt, StudioError> {
        let artifact = match (self.session.phase(), self.session.artifact()) {
            (Phase::Export, Some(artifact)) => artifact.clone(),
            (phase, _) => {
                return Err(SessionError::InvalidTransition {
                    phase,
                    action: "export",
                }
                .into())
            }
        };

        let request = ExportRequest {
            artifact,
            elapsed_seconds: self.session.elapsed_seconds(),
            clicks: self.session.clicks().to_vec(),
        };
        let receipt = self.exporter.export(&request).await?;

        self.session.confirm_export()?;
        self.publish();
        Ok(receipt)
    }

    /// Return to idle; deferred until the exporter confirmed consumption
    pub fn finish_export(&mut self) -> Result<Phase, StudioError> {
        let phase = self.session.finish_export()?;
        self.publish();
        Ok(phase)
    }
}
