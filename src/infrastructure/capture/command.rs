//! External recorder process adapter

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::application::ports::{CaptureBackend, CaptureError, CapturePlan};
use crate::domain::session::ArtifactRef;

/// How long the recorder gets to finalize its file after SIGINT
const STOP_GRACE: Duration = Duration::from_secs(10);

/// Environment variable carrying the capture plan as JSON
pub const PLAN_ENV: &str = "STUDIO_CAPTURE_PLAN";

struct RunningCapture {
    child: Child,
    output: PathBuf,
}

/// Runs an external recorder (ffmpeg, wf-recorder, ...) as the capture
/// collaborator.
///
/// The command template is split on whitespace and these placeholders are
/// substituted per argument: `{output}`, `{display}`, `{screen}`,
/// `{camera}`, `{microphone}`. The plan is also passed as JSON in
/// `STUDIO_CAPTURE_PLAN`. The recorder is stopped with SIGINT so it can
/// finalize the file; a non-empty output file becomes the artifact.
pub struct CommandCapture {
    template: String,
    output_dir: PathBuf,
    extension: String,
    running: Mutex<Option<RunningCapture>>,
}

impl CommandCapture {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            output_dir: std::env::temp_dir(),
            extension: "mp4".to_string(),
            running: Mutex::new(None),
        }
    }

    /// Directory the recorder writes its output into
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    fn output_path(&self) -> PathBuf {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        self.output_dir
            .join(format!("studio-session-{}.{}", timestamp, self.extension))
    }

    /// Expand the template into program + arguments
    fn build_args(template: &str, plan: &CapturePlan, output: &Path) -> Vec<String> {
        let output = output.to_string_lossy();
        let display = plan.display_index().to_string();
        let camera = plan
            .camera
            .as_ref()
            .map(|c| c.id.as_str())
            .unwrap_or_default();
        let microphone = plan
            .microphone
            .as_ref()
            .map(|m| m.id.as_str())
            .unwrap_or_default();

        template
            .split_whitespace()
            .map(|arg| {
                arg.replace("{output}", &output)
                    .replace("{display}", &display)
                    .replace("{screen}", plan.options.screen.as_str())
                    .replace("{camera}", camera)
                    .replace("{microphone}", microphone)
            })
            .collect()
    }

    fn spawn(args: &[String], plan: &CapturePlan) -> Result<Child, CaptureError> {
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| CaptureError::StartFailed("capture command is empty".to_string()))?;
        let plan_json = serde_json::to_string(plan)
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

        let mut command = Command::new(program);
        command
            .args(rest)
            .env(PLAN_ENV, plan_json)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // Own process group: a terminal Ctrl-C must reach us, not the recorder
        #[cfg(unix)]
        command.process_group(0);

        command
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CaptureError::CommandNotFound(program.clone())
                } else {
                    CaptureError::StartFailed(e.to_string())
                }
            })
    }

    /// Ask the recorder to finish, escalating to a kill after the grace period
    async fn terminate(child: &mut Child) -> Result<(), CaptureError> {
        if matches!(child.try_wait(), Ok(Some(_))) {
            return Ok(());
        }

        #[cfg(unix)]
        {
            use nix::sys::signal::{self, Signal};
            use nix::unistd::Pid;

            if let Some(id) = child.id() {
                signal::kill(Pid::from_raw(id as i32), Signal::SIGINT)
                    .map_err(|e| CaptureError::StopFailed(format!("Signal failed: {}", e)))?;
            }
        }
        #[cfg(not(unix))]
        child
            .start_kill()
            .map_err(|e| CaptureError::StopFailed(e.to_string()))?;

        match timeout(STOP_GRACE, child.wait()).await {
            Ok(result) => {
                result.map_err(|e| CaptureError::StopFailed(e.to_string()))?;
            }
            Err(_) => {
                tracing::warn!("recorder ignored SIGINT, killing it");
                child
                    .kill()
                    .await
                    .map_err(|e| CaptureError::StopFailed(e.to_string()))?;
            }
        }
        Ok(())
    }

    /// The output file as an artifact, if the recorder left anything usable
    async fn collect(output: &Path) -> Option<ArtifactRef> {
        match fs::metadata(output).await {
            Ok(meta) if meta.len() > 0 => Some(ArtifactRef::new(output.to_string_lossy())),
            Ok(_) => {
                let _ = fs::remove_file(output).await;
                None
            }
            Err(_) => None,
        }
    }
}

#[async_trait]
impl CaptureBackend for CommandCapture {
    async fn start(&self, plan: &CapturePlan) -> Result<(), CaptureError> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(CaptureError::AlreadyRunning);
        }

        let output = self.output_path();
        let args = Self::build_args(&self.template, plan, &output);
        tracing::debug!(?args, "spawning recorder");
        let child = Self::spawn(&args, plan)?;

        tracing::info!(output = %output.display(), "recorder started");
        *running = Some(RunningCapture { child, output });
        Ok(())
    }

    async fn stop(&self) -> Result<Option<ArtifactRef>, CaptureError> {
        let mut capture = self.running.lock().await.take().ok_or_else(|| {
            CaptureError::StopFailed("No capture in progress".to_string())
        })?;

        Self::terminate(&mut capture.child).await?;
        let artifact = Self::collect(&capture.output).await;
        tracing::info!(artifact = ?artifact, "recorder stopped");
        Ok(artifact)
    }

    async fn is_alive(&self) -> bool {
        let mut running = self.running.lock().await;
        match running.as_mut() {
            Some(capture) => matches!(capture.child.try_wait(), Ok(None)),
            None => false,
        }
    }

    async fn discard(&self, artifact: &ArtifactRef) -> Result<(), CaptureError> {
        match fs::remove_file(artifact.as_str()).await {
            Ok(()) => {
                tracing::info!(artifact = %artifact, "discarded recorder output");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CaptureError::StopFailed(format!("{}: {}", artifact, e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::{CaptureDevice, DeviceRegistry, ScreenSource};
    use crate::domain::permission::CapabilitySet;
    use crate::domain::selection::{CameraChoice, ScreenChoice, SourceOptions};

    fn plan() -> CapturePlan {
        let mut registry = DeviceRegistry::new();
        registry.refresh(
            vec![ScreenSource::new("s1", "Display 2", 1)],
            vec![CaptureDevice::new("cam0", "USB Camera")],
            vec![CaptureDevice::new("mic0", "Built-in Mic")],
        );
        let options = SourceOptions {
            screen: ScreenChoice::Display("Display 2".to_string()),
            camera: CameraChoice::Device("USB Camera".to_string()),
            ..Default::default()
        };
        CapturePlan::resolve(&options, CapabilitySet::new(), &registry)
    }

    #[test]
    fn build_args_substitutes_placeholders() {
        let args = CommandCapture::build_args(
            "rec --display {display} --screen {screen} --cam {camera} --mic {microphone} -o {output}",
            &plan(),
            Path::new("/tmp/out.mp4"),
        );
        assert_eq!(
            args,
            vec![
                "rec", "--display", "1", "--screen", "Display 2", "--cam", "cam0", "--mic",
                "mic0", "-o", "/tmp/out.mp4"
            ]
        );
    }

    #[test]
    fn output_path_uses_extension() {
        let capture = CommandCapture::new("rec {output}")
            .with_output_dir("/var/tmp")
            .with_extension("mkv");
        let path = capture.output_path();
        assert!(path.starts_with("/var/tmp"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mkv"));
    }

    #[tokio::test]
    async fn empty_template_fails_to_start() {
        let capture = CommandCapture::new("   ");
        assert!(matches!(
            capture.start(&plan()).await,
            Err(CaptureError::StartFailed(_))
        ));
    }

    #[tokio::test]
    async fn missing_program_is_reported() {
        let capture = CommandCapture::new("definitely-not-a-recorder-binary {output}");
        assert!(matches!(
            capture.start(&plan()).await,
            Err(CaptureError::CommandNotFound(_))
        ));
        assert!(!capture.is_alive().await);
    }

    #[tokio::test]
    async fn stop_without_start_fails() {
        let capture = CommandCapture::new("rec {output}");
        assert!(capture.stop().await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn recorder_output_becomes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("rec.sh");
        std::fs::write(&script, "#!/bin/sh\necho frames > \"$1\"\nexec sleep 30\n").unwrap();
        let capture = CommandCapture::new(format!("sh {} {{output}}", script.display()))
            .with_output_dir(dir.path());

        capture.start(&plan()).await.unwrap();
        assert!(capture.is_alive().await);
        tokio::time::sleep(Duration::from_millis(300)).await;

        let artifact = capture.stop().await.unwrap().expect("artifact");
        assert!(artifact.as_str().starts_with(&*dir.path().to_string_lossy()));
        assert!(!capture.is_alive().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn recorder_without_output_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let capture = CommandCapture::new("sleep 30").with_output_dir(dir.path());
        capture.start(&plan()).await.unwrap();
        assert_eq!(capture.stop().await.unwrap(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn crashed_recorder_output_can_be_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("rec.sh");
        std::fs::write(&script, "#!/bin/sh\necho frames > \"$1\"\nexit 1\n").unwrap();
        let capture = CommandCapture::new(format!("sh {} {{output}}", script.display()))
            .with_output_dir(dir.path());

        capture.start(&plan()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!capture.is_alive().await);

        let partial = capture.stop().await.unwrap().expect("partial output");
        assert!(Path::new(partial.as_str()).exists());
        capture.discard(&partial).await.unwrap();
        assert!(!Path::new(partial.as_str()).exists());

        // Already gone is fine
        capture.discard(&partial).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exited_recorder_is_not_alive() {
        let capture = CommandCapture::new("true");
        capture.start(&plan()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!capture.is_alive().await);
    }
}
