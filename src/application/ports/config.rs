//! Persisted session defaults

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Where recording defaults, the recorder command and permission
/// overrides are kept between runs
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the stored defaults; a missing file yields an empty config
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Write the defaults back, creating parent directories as needed
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    fn path(&self) -> PathBuf;

    fn exists(&self) -> bool;

    /// Seed a file with `AppConfig::defaults()`; fails if one is already there
    async fn init(&self) -> Result<(), ConfigError>;

    /// Stored defaults, or an empty config when the file cannot be read.
    /// A broken config file must not block recording.
    async fn load_or_empty(&self) -> AppConfig {
        match self.load().await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.path().display(),
                    "ignoring unreadable config file"
                );
                AppConfig::empty()
            }
        }
    }
}
