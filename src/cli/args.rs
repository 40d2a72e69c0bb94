//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::config::AppConfig;

/// studio-session - screen recording sessions from the terminal
#[derive(Parser, Debug)]
#[command(name = "studio-session")]
#[command(version)]
#[command(about = "Record the screen, camera and audio through a guarded session state machine")]
#[command(long_about = None)]
pub struct Cli {
    /// Device manifest (TOML) listing screens, cameras and microphones
    #[arg(short = 'm', long, value_name = "FILE", global = true, env = "STUDIO_SESSION_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List capture devices
    Devices {
        /// Print the inventory as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show capture permission status
    Permissions,
    /// Record a session and export it
    Record(RecordArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for the record subcommand
#[derive(clap::Args, Debug, Default, Clone)]
pub struct RecordArgs {
    /// Screen to capture ("Entire Screen" for all displays)
    #[arg(short = 's', long, value_name = "NAME")]
    pub screen: Option<String>,

    /// Camera to overlay ("None" to disable)
    #[arg(short = 'c', long, value_name = "NAME")]
    pub camera: Option<String>,

    /// Do not record the microphone
    #[arg(long)]
    pub no_microphone: bool,

    /// Record system audio
    #[arg(long)]
    pub system_audio: bool,

    /// Zoom towards mouse clicks on export
    #[arg(short = 'z', long)]
    pub mouse_zoom: bool,

    /// Stop automatically after this many seconds
    #[arg(short = 'n', long, value_name = "SECONDS")]
    pub seconds: Option<u64>,

    /// Directory to export into
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

impl RecordArgs {
    /// The subset of config these flags override
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            screen: self.screen.clone(),
            camera: self.camera.clone(),
            mouse_zoom: if self.mouse_zoom { Some(true) } else { None },
            microphone: if self.no_microphone { Some(false) } else { None },
            system_audio: if self.system_audio { Some(true) } else { None },
            export_dir: self
                .output
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            ..Default::default()
        }
    }
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "screen",
    "camera",
    "mouse_zoom",
    "microphone",
    "system_audio",
    "export_dir",
    "capture_command",
    "device_manifest",
    "permissions.screen",
    "permissions.camera",
    "permissions.microphone",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
