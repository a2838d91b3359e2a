//! TOML configuration file I/O
//!
//! Handles loading and saving lifecycle configuration to/from TOML files
//! in the user's configuration directory.

use crate::config::LifecycleConfig;
use crate::error::{ConfigError, VpnStateError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "VPNSTATE_CONFIG_DIR";

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the default configuration directory
///
/// Returns ~/.config/vpnstate, or VPNSTATE_CONFIG_DIR if set
pub fn get_config_dir() -> Result<PathBuf, VpnStateError> {
    if let Ok(config_dir) = std::env::var(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(config_dir));
    }

    let home = std::env::var("HOME").map_err(|_| {
        VpnStateError::Config(ConfigError::IoError {
            message: "HOME environment variable not set".to_string(),
        })
    })?;

    Ok(PathBuf::from(home).join(".config").join("vpnstate"))
}

/// Get the default configuration file path
pub fn get_config_path() -> Result<PathBuf, VpnStateError> {
    let config_dir = get_config_dir()?;
    Ok(config_dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from the default TOML file
///
/// A missing file yields the default configuration.
pub fn load_config() -> Result<LifecycleConfig, VpnStateError> {
    let config_path = get_config_path()?;
    if !config_path.exists() {
        debug!("No configuration at {:?}, using defaults", config_path);
        return Ok(LifecycleConfig::default());
    }
    load_config_from_path(&config_path)
}

/// Load configuration from a specific TOML file
pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> Result<LifecycleConfig, VpnStateError> {
    let contents = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => VpnStateError::Config(ConfigError::LoadFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        }),
        _ => VpnStateError::Config(ConfigError::IoError {
            message: format!("Failed to read config file: {}", e),
        }),
    })?;

    let config: LifecycleConfig = toml::from_str(&contents).map_err(|e| {
        VpnStateError::Config(ConfigError::IoError {
            message: format!("Failed to parse TOML: {}", e),
        })
    })?;

    config
        .validate()
        .map_err(|e| VpnStateError::Config(ConfigError::ValidationError { message: e }))?;

    Ok(config)
}

/// Save configuration to a specific TOML file
pub fn save_config_to_path<P: AsRef<Path>>(
    config: &LifecycleConfig,
    path: P,
) -> Result<(), VpnStateError> {
    config
        .validate()
        .map_err(|e| VpnStateError::Config(ConfigError::ValidationError { message: e }))?;

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            VpnStateError::Config(ConfigError::IoError {
                message: format!("Failed to create config directory: {}", e),
            })
        })?;
    }

    let contents = toml::to_string_pretty(config)?;

    std::fs::write(&path, contents).map_err(|_e| {
        VpnStateError::Config(ConfigError::SaveFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        })
    })?;

    info!("Saved configuration to {:?}", path.as_ref());
    Ok(())
}

/// Check if a configuration file exists
pub fn config_exists() -> Result<bool, VpnStateError> {
    let config_path = get_config_path()?;
    Ok(config_path.exists())
}
