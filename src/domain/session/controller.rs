//! Session controller state machine

use serde::{Deserialize, Serialize};

use crate::domain::device::DeviceRegistry;
use crate::domain::error::SessionError;
use crate::domain::permission::PermissionTracker;
use crate::domain::selection::{SourceOptions, SourceSelection};

use super::clicks::ClickEvent;
use super::phase::{ArtifactRef, Phase};

/// Observable session state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub phase: Phase,
    pub elapsed_seconds: u64,
    pub artifact_ref: Option<ArtifactRef>,
}

/// Session controller entity.
/// Owns the phase, the recording timer and the produced artifact.
///
/// State machine:
///   IDLE -> RECORDING (start, gated on sources and permissions)
///   RECORDING -> EXPORT (stop with an artifact)
///   RECORDING -> IDLE (stop without an artifact, reported as RecordingEmpty)
///   EXPORT -> IDLE (finish_export, once the exporter confirmed consumption)
#[derive(Debug, Default)]
pub struct SessionController {
    phase: Phase,
    elapsed_seconds: u64,
    artifact: Option<ArtifactRef>,
    /// Selection in force when recording started
    active: Option<SourceOptions>,
    clicks: Vec<ClickEvent>,
    export_confirmed: bool,
    finish_requested: bool,
}

impl SessionController {
    /// Create a new controller in idle phase
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn artifact(&self) -> Option<&ArtifactRef> {
        self.artifact.as_ref()
    }

    /// Source options the current recording was started with
    pub fn active_plan(&self) -> Option<&SourceOptions> {
        self.active.as_ref()
    }

    /// Clicks captured during the last recording
    pub fn clicks(&self) -> &[ClickEvent] {
        &self.clicks
    }

    pub fn is_export_confirmed(&self) -> bool {
        self.export_confirmed
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            phase: self.phase,
            elapsed_seconds: self.elapsed_seconds,
            artifact_ref: self.artifact.clone(),
        }
    }

    /// Transition from IDLE to RECORDING.
    ///
    /// Fails with `InvalidSource` when the selection references a device the
    /// registry no longer lists, and with `PermissionDenied` when a required
    /// capability is not granted. The phase is unchanged on failure.
    pub fn start(
        &mut self,
        permissions: &PermissionTracker,
        selection: &SourceSelection,
        registry: &DeviceRegistry,
    ) -> Result<(), SessionError> {
        self.expect_phase(Phase::Idle, "start recording")?;

        selection.validate(registry)?;

        let required = selection.required_permissions();
        if !permissions.all_granted(&required) {
            return Err(SessionError::PermissionDenied {
                missing: permissions.missing(&required),
            });
        }

        self.phase = Phase::Recording;
        self.elapsed_seconds = 0;
        self.artifact = None;
        self.active = Some(selection.options().clone());
        self.clicks.clear();
        self.export_confirmed = false;
        self.finish_requested = false;

        tracing::info!(screen = %selection.options().screen, "recording started");
        Ok(())
    }

    /// Advance the recording timer by one second.
    ///
    /// Returns the new elapsed time, or `None` when not recording.
    pub fn tick(&mut self) -> Option<u64> {
        if self.phase != Phase::Recording {
            return None;
        }
        self.elapsed_seconds += 1;
        Some(self.elapsed_seconds)
    }

    /// Record a pointer click for mouse zoom.
    ///
    /// Ignored unless recording with mouse zoom enabled.
    pub fn record_click(&mut self, click: ClickEvent) -> bool {
        let zooming = self.active.as_ref().is_some_and(|plan| plan.mouse_zoom);
        if self.phase != Phase::Recording || !zooming {
            return false;
        }
        self.clicks.push(click);
        true
    }

    /// Transition out of RECORDING.
    ///
    /// With an artifact the session moves to EXPORT and the artifact belongs
    /// to the exporter. Without one it falls back to IDLE and reports
    /// `RecordingEmpty`.
    pub fn stop(&mut self, artifact: Option<ArtifactRef>) -> Result<(), SessionError> {
        self.expect_phase(Phase::Recording, "stop recording")?;

        match artifact.filter(|a| !a.is_empty()) {
            Some(artifact) => {
                tracing::info!(
                    %artifact,
                    elapsed_seconds = self.elapsed_seconds,
                    "recording stopped, handing artifact to export"
                );
                self.artifact = Some(artifact);
                self.phase = Phase::Export;
                Ok(())
            }
            None => {
                tracing::warn!(
                    elapsed_seconds = self.elapsed_seconds,
                    "recording stopped without an artifact"
                );
                self.reset_to_idle();
                Err(SessionError::RecordingEmpty)
            }
        }
    }

    /// The capture collaborator went away mid-recording
    pub fn capture_lost(&mut self) -> Result<(), SessionError> {
        tracing::warn!("capture collaborator lost");
        self.stop(None)
    }

    /// The exporter finished reading the artifact.
    ///
    /// Completes a deferred `finish_export`. Returns the resulting phase.
    pub fn confirm_export(&mut self) -> Result<Phase, SessionError> {
        self.expect_phase(Phase::Export, "confirm export")?;
        self.export_confirmed = true;
        tracing::debug!("export consumption confirmed");

        if self.finish_requested {
            self.reset_to_idle();
        }
        Ok(self.phase)
    }

    /// Transition from EXPORT to IDLE.
    ///
    /// Before the exporter confirmed consumption the request is deferred:
    /// the phase stays EXPORT and the artifact is left alone until
    /// `confirm_export` arrives. Returns the resulting phase.
    pub fn finish_export(&mut self) -> Result<Phase, SessionError> {
        self.expect_phase(Phase::Export, "finish export")?;

        if self.export_confirmed {
            self.reset_to_idle();
        } else {
            tracing::debug!("finish requested before export confirmation, deferring");
            self.finish_requested = true;
        }
        Ok(self.phase)
    }

    fn expect_phase(&self, expected: Phase, action: &'static str) -> Result<(), SessionError> {
        if self.phase != expected {
            return Err(SessionError::InvalidTransition {
                phase: self.phase,
                action,
            });
        }
        Ok(())
    }

    fn reset_to_idle(&mut self) {
        self.phase = Phase::Idle;
        self.artifact = None;
        self.active = None;
        self.export_confirmed = false;
        self.finish_requested = false;
        tracing::info!("session idle");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::{CaptureDevice, ScreenSource};
    use crate::domain::permission::{Capability, PermissionStatus};

    struct Fixture {
        registry: DeviceRegistry,
        permissions: PermissionTracker,
        selection: SourceSelection,
    }

    impl Fixture {
        fn granted() -> Self {
            let mut registry = DeviceRegistry::new();
            registry.refresh(
                vec![
                    ScreenSource::new("0", "Entire Screen", 0),
                    ScreenSource::new("1", "Display 2", 1),
                ],
                vec![CaptureDevice::new("cam0", "USB Camera")],
                vec![CaptureDevice::new("mic0", "Built-in Mic")],
            );
            let mut permissions = PermissionTracker::new();
            for cap in Capability::ALL {
                permissions.set_status(cap, PermissionStatus::Granted);
            }
            Self {
                registry,
                permissions,
                selection: SourceSelection::new(),
            }
        }

        fn start(&self, session: &mut SessionController) -> Result<(), SessionError> {
            session.start(&self.permissions, &self.selection, &self.registry)
        }
    }

    #[test]
    fn new_session_is_idle() {
        let session = SessionController::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.elapsed_seconds(), 0);
        assert!(session.artifact().is_none());
    }

    #[test]
    fn start_from_idle() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();
        fx.start(&mut session).unwrap();
        assert_eq!(session.phase(), Phase::Recording);
        assert_eq!(session.elapsed_seconds(), 0);
        assert_eq!(session.active_plan(), Some(fx.selection.options()));
    }

    #[test]
    fn duplicate_start_is_invalid() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();
        fx.start(&mut session).unwrap();
        session.tick();

        let err = fx.start(&mut session).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition { phase: Phase::Recording, .. }
        ));
        assert_eq!(session.elapsed_seconds(), 1);
    }

    #[test]
    fn start_denied_when_permission_missing() {
        let mut fx = Fixture::granted();
        fx.permissions.set_status(Capability::Microphone, PermissionStatus::Denied);
        let mut session = SessionController::new();

        let err = fx.start(&mut session).unwrap_err();
        assert_eq!(
            err,
            SessionError::PermissionDenied {
                missing: vec![Capability::Microphone]
            }
        );
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn start_denied_while_permissions_loading() {
        let mut fx = Fixture::granted();
        fx.permissions = PermissionTracker::new();
        let mut session = SessionController::new();
        assert!(matches!(
            fx.start(&mut session),
            Err(SessionError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn start_rejects_stale_selection() {
        let mut fx = Fixture::granted();
        fx.selection.set_camera("USB Camera", &fx.registry).unwrap();
        fx.registry.refresh(Vec::new(), Vec::new(), Vec::new());
        let mut session = SessionController::new();

        assert!(matches!(
            fx.start(&mut session),
            Err(SessionError::InvalidSource { .. })
        ));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn tick_only_counts_while_recording() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();
        assert_eq!(session.tick(), None);

        fx.start(&mut session).unwrap();
        assert_eq!(session.tick(), Some(1));
        assert_eq!(session.tick(), Some(2));
        assert_eq!(session.phase(), Phase::Recording);

        session.stop(Some(ArtifactRef::new("rec.mp4"))).unwrap();
        assert_eq!(session.tick(), None);
        assert_eq!(session.elapsed_seconds(), 2);
    }

    #[test]
    fn stop_with_artifact_enters_export() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();
        fx.start(&mut session).unwrap();

        session.stop(Some(ArtifactRef::new("rec123"))).unwrap();
        assert_eq!(session.phase(), Phase::Export);
        assert_eq!(session.artifact().map(|a| a.as_str()), Some("rec123"));
    }

    #[test]
    fn stop_without_artifact_returns_to_idle() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();
        fx.start(&mut session).unwrap();

        assert_eq!(session.stop(None), Err(SessionError::RecordingEmpty));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.artifact().is_none());
    }

    #[test]
    fn blank_artifact_counts_as_empty() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();
        fx.start(&mut session).unwrap();
        assert_eq!(
            session.stop(Some(ArtifactRef::new(""))),
            Err(SessionError::RecordingEmpty)
        );
    }

    #[test]
    fn stop_from_idle_is_invalid() {
        let mut session = SessionController::new();
        assert!(matches!(
            session.stop(Some(ArtifactRef::new("x"))),
            Err(SessionError::InvalidTransition { phase: Phase::Idle, .. })
        ));
    }

    #[test]
    fn capture_lost_reports_empty() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();
        fx.start(&mut session).unwrap();
        assert_eq!(session.capture_lost(), Err(SessionError::RecordingEmpty));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn finish_before_confirmation_is_deferred() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();
        fx.start(&mut session).unwrap();
        session.stop(Some(ArtifactRef::new("rec123"))).unwrap();

        assert_eq!(session.finish_export(), Ok(Phase::Export));
        assert_eq!(session.artifact().map(|a| a.as_str()), Some("rec123"));

        assert_eq!(session.confirm_export(), Ok(Phase::Idle));
        assert!(session.artifact().is_none());
    }

    #[test]
    fn finish_after_confirmation_completes() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();
        fx.start(&mut session).unwrap();
        session.stop(Some(ArtifactRef::new("rec123"))).unwrap();

        assert_eq!(session.confirm_export(), Ok(Phase::Export));
        assert!(session.artifact().is_some());
        assert_eq!(session.finish_export(), Ok(Phase::Idle));
        assert!(session.artifact().is_none());
    }

    #[test]
    fn export_actions_outside_export_are_invalid() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();
        assert!(session.finish_export().is_err());
        assert!(session.confirm_export().is_err());

        fx.start(&mut session).unwrap();
        assert!(matches!(
            session.finish_export(),
            Err(SessionError::InvalidTransition { phase: Phase::Recording, .. })
        ));
    }

    #[test]
    fn start_from_export_is_invalid() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();
        fx.start(&mut session).unwrap();
        session.stop(Some(ArtifactRef::new("rec123"))).unwrap();
        assert!(fx.start(&mut session).is_err());
        assert_eq!(session.phase(), Phase::Export);
    }

    #[test]
    fn clicks_require_mouse_zoom() {
        let mut fx = Fixture::granted();
        let mut session = SessionController::new();
        fx.start(&mut session).unwrap();
        assert!(!session.record_click(ClickEvent::new(1.0, 2.0, 10)));
        session.stop(None).unwrap_err();

        fx.selection.set_mouse_zoom(true);
        fx.start(&mut session).unwrap();
        assert!(session.record_click(ClickEvent::new(1.0, 2.0, 10)));
        assert_eq!(session.clicks().len(), 1);
    }

    #[test]
    fn clicks_ignored_when_idle() {
        let mut session = SessionController::new();
        assert!(!session.record_click(ClickEvent::new(0.0, 0.0, 0)));
    }

    #[test]
    fn selection_change_does_not_affect_active_plan() {
        let mut fx = Fixture::granted();
        fx.selection.set_screen("Display 2", &fx.registry).unwrap();
        let mut session = SessionController::new();
        fx.start(&mut session).unwrap();

        fx.registry.refresh(Vec::new(), Vec::new(), Vec::new());
        fx.selection.reconcile(&fx.registry);

        assert_eq!(session.phase(), Phase::Recording);
        assert_eq!(
            session.active_plan().map(|p| p.screen.as_str()),
            Some("Display 2")
        );
    }

    #[test]
    fn full_cycle() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();

        fx.start(&mut session).unwrap();
        session.tick();
        session.stop(Some(ArtifactRef::new("a.mp4"))).unwrap();
        session.confirm_export().unwrap();
        session.finish_export().unwrap();
        assert_eq!(session.phase(), Phase::Idle);

        // Can start another cycle
        fx.start(&mut session).unwrap();
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[test]
    fn state_snapshot() {
        let fx = Fixture::granted();
        let mut session = SessionController::new();
        fx.start(&mut session).unwrap();
        session.tick();
        let state = session.state();
        assert_eq!(state.phase, Phase::Recording);
        assert_eq!(state.elapsed_seconds, 1);
        assert_eq!(state.artifact_ref, None);
    }
}
