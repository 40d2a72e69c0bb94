//! Command runners

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::application::ports::{CaptureBackend, ConfigStore};
use crate::application::{Studio, StudioError};
use crate::domain::config::AppConfig;
use crate::domain::error::SessionError;
use crate::domain::session::{ClickEvent, Elapsed};
use crate::infrastructure::{
    ClickListener, CommandCapture, DirectoryExporter, ManifestDiscovery, NoOpCapture,
    PlatformPermissionProbe, SystemDeviceDiscovery, XdgConfigStore,
};

use super::args::RecordArgs;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Studio wired to the local machine
pub type LocalStudio = Studio<
    SystemDeviceDiscovery,
    PlatformPermissionProbe,
    Box<dyn CaptureBackend>,
    DirectoryExporter,
>;

/// Build the studio from merged config; `manifest` overrides the configured one
pub fn build_studio(config: &AppConfig, manifest: Option<PathBuf>) -> LocalStudio {
    let manifest = manifest.or_else(|| config.device_manifest.as_ref().map(PathBuf::from));
    let discovery = match manifest {
        Some(path) => SystemDeviceDiscovery::with_manifest(ManifestDiscovery::new(path)),
        None => SystemDeviceDiscovery::new(),
    };

    let capture: Box<dyn CaptureBackend> = match config.capture_command.as_deref() {
        Some(command) => Box::new(CommandCapture::new(command)),
        None => {
            tracing::debug!("no capture_command configured, using the no-op backend");
            Box::new(NoOpCapture::new())
        }
    };

    let export_dir = config
        .export_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(DirectoryExporter::default_dir);

    Studio::new(
        discovery,
        PlatformPermissionProbe::from_config(config),
        capture,
        DirectoryExporter::new(export_dir),
    )
}

/// Exit code for a failed command
pub fn exit_code_for(error: &StudioError) -> u8 {
    match error.as_session() {
        Some(SessionError::InvalidSource { .. }) => EXIT_USAGE_ERROR,
        _ => EXIT_ERROR,
    }
}

/// List screens, cameras and microphones
pub async fn run_devices(json: bool, manifest: Option<PathBuf>) -> ExitCode {
    let presenter = Presenter::new();
    let config = load_merged_config(AppConfig::empty()).await;
    let mut studio = build_studio(&config, manifest);

    if let Err(e) = studio.refresh_devices().await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let inventory = studio.registry().snapshot();
    if json {
        match serde_json::to_string_pretty(inventory.as_ref()) {
            Ok(text) => presenter.output(&text),
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        presenter.devices(&inventory);
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Probe and print capture permissions
pub async fn run_permissions(manifest: Option<PathBuf>) -> ExitCode {
    let presenter = Presenter::new();
    let config = load_merged_config(AppConfig::empty()).await;
    let mut studio = build_studio(&config, manifest);

    let tracker = studio.probe_permissions().await;
    presenter.permissions(&tracker);

    ExitCode::from(EXIT_SUCCESS)
}

/// Record one session: idle, recording, export, back to idle
pub async fn run_record(args: RecordArgs, manifest: Option<PathBuf>) -> ExitCode {
    let mut presenter = Presenter::new();
    let config = load_merged_config(args.to_config()).await;
    let mut studio = build_studio(&config, manifest);

    if let Err(e) = studio.refresh_devices().await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }
    studio.probe_permissions().await;

    if let Err(e) = studio.apply_options(config.source_options()) {
        presenter.error(&e.to_string());
        return ExitCode::from(exit_code_for(&e));
    }

    if config.capture_command.is_none() {
        presenter.warn("No capture_command configured; nothing will be recorded");
    }

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    let plan = match studio.start_recording().await {
        Ok(plan) => plan,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(exit_code_for(&e));
        }
    };
    tracing::debug!(?plan, "recording started");

    let mut clicks = plan.options.mouse_zoom.then(ClickListener::spawn);

    let limit = args.seconds;
    let mut updates = studio.subscribe();
    let status = presenter.format_recording(0, limit);
    presenter.start_spinner(&status);

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.tick().await;

    loop {
        if limit.is_some_and(|limit| studio.session().elapsed_seconds() >= limit) {
            break;
        }

        tokio::select! {
            biased;
            _ = shutdown.wait() => break,
            _ = interval.tick() => {
                if let Err(e) = studio.check_capture().await {
                    presenter.spinner_fail("Capture stopped unexpectedly");
                    presenter.error(&e.to_string());
                    return ExitCode::from(EXIT_ERROR);
                }
                studio.tick();
            }
            click = next_click(&mut clicks) => match click {
                Some(click) => {
                    studio.record_click(click);
                }
                None => clicks = None,
            },
        }

        if updates.has_changed().unwrap_or(false) {
            let snapshot = updates.borrow_and_update().clone();
            presenter.update_recording_progress(snapshot.elapsed_seconds, limit);
        }
    }

    drop(clicks);

    let elapsed = Elapsed(studio.session().elapsed_seconds());
    let artifact = match studio.stop_recording().await {
        Ok(artifact) => artifact,
        Err(e) => {
            presenter.spinner_fail(&format!("Recording stopped at {}", elapsed));
            presenter.error(&e.to_string());
            if config.capture_command.is_none() {
                presenter.info("Set a recorder with 'studio-session config set capture_command <cmd>'");
            }
            return ExitCode::from(EXIT_ERROR);
        }
    };
    presenter.spinner_success(&format!("Recorded {}", elapsed));

    match studio.export().await {
        Ok(receipt) => {
            presenter.output(&receipt.destination.to_string_lossy());
            if let Some(clicks) = receipt.clicks_file {
                presenter.info(&format!("Click track: {}", clicks.display()));
            }
        }
        Err(e) => {
            presenter.error(&e.to_string());
            presenter.info(&format!("Recording kept at {}", artifact));
            return ExitCode::from(EXIT_ERROR);
        }
    }

    match studio.finish_export() {
        Ok(phase) => {
            tracing::debug!(%phase, "session finished");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Next mouse-zoom click; never resolves without a listener
async fn next_click(listener: &mut Option<ClickListener>) -> Option<ClickEvent> {
    match listener {
        Some(listener) => listener.next().await,
        None => std::future::pending().await,
    }
}

/// Load and merge configuration from file and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let file_config = XdgConfigStore::new().load_or_empty().await;

    // Merge: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}
