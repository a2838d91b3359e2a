//! Configuration module
//!
//! Handles loading and saving lifecycle configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

pub mod toml_config;

/// Largest accepted history limit
pub const MAX_HISTORY_LIMIT: usize = 1024;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Lifecycle configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Number of transitions kept in the state file
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Log verbosity (off, error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// State file location, overriding the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

fn default_history_limit() -> usize {
    crate::vpn::machine::DEFAULT_HISTORY_LIMIT
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl LifecycleConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.history_limit == 0 || self.history_limit > MAX_HISTORY_LIMIT {
            return Err(format!(
                "history_limit must be between 1 and {}, got: {}",
                MAX_HISTORY_LIMIT, self.history_limit
            ));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "log_level must be one of {}, got: {}",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }

        if let Some(path) = &self.state_file {
            if path.as_os_str().is_empty() {
                return Err("state_file cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Log filter for the configured level
    ///
    /// Falls back to `warn` for unrecognised values.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::WARN)
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            log_level: default_log_level(),
            state_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LifecycleConfig::default().validate().is_ok());
        assert_eq!(LifecycleConfig::default().level_filter(), LevelFilter::WARN);
    }

    #[test]
    fn test_invalid_config_validation() {
        let invalid_configs = vec![
            LifecycleConfig {
                history_limit: 0,
                ..Default::default()
            },
            LifecycleConfig {
                history_limit: MAX_HISTORY_LIMIT + 1,
                ..Default::default()
            },
            LifecycleConfig {
                log_level: "verbose".to_string(),
                ..Default::default()
            },
            LifecycleConfig {
                state_file: Some(PathBuf::new()),
                ..Default::default()
            },
        ];

        for config in invalid_configs {
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_level_filter_is_case_insensitive() {
        let config = LifecycleConfig {
            log_level: "DEBUG".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.level_filter(), LevelFilter::DEBUG);
    }
}
