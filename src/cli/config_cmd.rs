//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, PermissionOverrides};
use crate::domain::error::ConfigError;
use crate::domain::permission::{Capability, PermissionStatus};

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match get_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(
            key,
            &get_value(&config, key).unwrap_or_else(|| "(not set)".to_string()),
        );
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Validate and store one value; the key must already be valid
fn set_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid_bool = || ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be 'true' or 'false'".to_string(),
    };

    match key {
        "screen" => config.screen = Some(non_empty(key, value)?),
        "camera" => config.camera = Some(non_empty(key, value)?),
        "mouse_zoom" => config.mouse_zoom = Some(parse_bool(value).map_err(|_| invalid_bool())?),
        "microphone" => config.microphone = Some(parse_bool(value).map_err(|_| invalid_bool())?),
        "system_audio" => {
            config.system_audio = Some(parse_bool(value).map_err(|_| invalid_bool())?)
        }
        "export_dir" => config.export_dir = Some(non_empty(key, value)?),
        "capture_command" => config.capture_command = Some(non_empty(key, value)?),
        "device_manifest" => config.device_manifest = Some(non_empty(key, value)?),
        _ => {
            let capability = permission_key(key)?;
            let status = value
                .parse::<PermissionStatus>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
            config
                .permissions
                .get_or_insert_with(PermissionOverrides::default)
                .set(capability, Some(status.as_str().to_string()));
        }
    }
    Ok(())
}

fn get_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "screen" => config.screen.clone(),
        "camera" => config.camera.clone(),
        "mouse_zoom" => config.mouse_zoom.map(|b| b.to_string()),
        "microphone" => config.microphone.map(|b| b.to_string()),
        "system_audio" => config.system_audio.map(|b| b.to_string()),
        "export_dir" => config.export_dir.clone(),
        "capture_command" => config.capture_command.clone(),
        "device_manifest" => config.device_manifest.clone(),
        _ => {
            let capability = permission_key(key).ok()?;
            config
                .permissions
                .as_ref()
                .and_then(|p| p.get(capability))
                .map(str::to_string)
        }
    }
}

/// Capability named by a `permissions.<capability>` key
fn permission_key(key: &str) -> Result<Capability, ConfigError> {
    key.strip_prefix("permissions.")
        .and_then(|name| name.parse().ok())
        .ok_or_else(|| ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: "Value must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(()),
    }
}
