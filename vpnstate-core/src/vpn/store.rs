//! State file persistence
//!
//! Persists a connection state machine as JSON so that separate CLI
//! invocations operate on the same connection instance.

use crate::config::toml_config::get_config_dir;
use crate::config::LifecycleConfig;
use crate::error::{StoreError, VpnStateError};
use crate::vpn::machine::ConnectionStateMachine;
use crate::vpn::transition::Transition;
use crate::vpn::ConnectionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the state file location
pub const STATE_FILE_ENV: &str = "VPNSTATE_STATE_FILE";

const STATE_FILE_NAME: &str = "state.json";

/// Persisted form of a connection state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub state: ConnectionState,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub history: Vec<Transition>,
}

/// JSON state file holding one connection instance
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default state file location
    ///
    /// Uses `VPNSTATE_STATE_FILE` if set, else `state.json` in the config
    /// directory.
    pub fn default_path() -> Result<PathBuf, VpnStateError> {
        if let Ok(path) = std::env::var(STATE_FILE_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(get_config_dir()?.join(STATE_FILE_NAME))
    }

    /// Store for the configured state file
    ///
    /// `VPNSTATE_STATE_FILE` takes precedence over the configured
    /// `state_file`, which takes precedence over the default location.
    pub fn from_config(config: &LifecycleConfig) -> Result<Self, VpnStateError> {
        let path = match (std::env::var(STATE_FILE_ENV), &config.state_file) {
            (Ok(path), _) => PathBuf::from(path),
            (Err(_), Some(path)) => path.clone(),
            (Err(_), None) => Self::default_path()?,
        };
        Ok(Self::new(path))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted machine
    ///
    /// Returns `Ok(None)` when no state file exists.
    pub fn load(&self, history_limit: usize) -> Result<Option<ConnectionStateMachine>, VpnStateError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No state file at {:?}", self.path);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: StateSnapshot =
            serde_json::from_str(&contents).map_err(|e| self.corrupt(e.to_string()))?;

        let machine = ConnectionStateMachine::from_snapshot(snapshot, history_limit)
            .map_err(|reason| self.corrupt(reason))?;

        debug!(
            "Loaded connection state {} from {:?}",
            machine.current_state(),
            self.path
        );
        Ok(Some(machine))
    }

    /// Load the persisted machine, or a fresh `Idle` one if none exists
    pub fn load_or_default(&self, history_limit: usize) -> Result<ConnectionStateMachine, VpnStateError> {
        Ok(self
            .load(history_limit)?
            .unwrap_or_else(|| ConnectionStateMachine::with_history_limit(history_limit)))
    }

    /// Write the machine to the state file
    pub fn save(&self, machine: &ConnectionStateMachine) -> Result<(), VpnStateError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&machine.snapshot())?;

        std::fs::write(&self.path, json).map_err(|_e| StoreError::WriteFailed {
            path: self.path.to_string_lossy().to_string(),
        })?;

        debug!(
            "Saved connection state {} to {:?}",
            machine.current_state(),
            self.path
        );
        Ok(())
    }

    /// Discard the persisted connection instance
    ///
    /// A missing file is not an error.
    pub fn clear(&self) -> Result<(), VpnStateError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Removed state file {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn corrupt(&self, reason: String) -> VpnStateError {
        StoreError::Corrupt {
            path: self.path.to_string_lossy().to_string(),
            reason,
        }
        .into()
    }
}
