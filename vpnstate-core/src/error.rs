//! Error types for the vpnstate tool
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.

use crate::vpn::{ConnectionEvent, ConnectionState};
use thiserror::Error;

/// Main error type for the vpnstate application
#[derive(Error, Debug)]
pub enum VpnStateError {
    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected or unparseable lifecycle transitions
    #[error("Transition error: {0}")]
    Transition(#[from] TransitionError),

    /// Errors related to the persisted state file
    #[error("State file error: {0}")]
    Store(#[from] StoreError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to save configuration file: {path}")]
    SaveFailed { path: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// Lifecycle transition errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// No edge exists for this (state, event) pair
    #[error("Invalid transition: cannot apply '{event}' while {from}")]
    InvalidTransition {
        from: ConnectionState,
        event: ConnectionEvent,
    },

    #[error("Unknown connection event: {name}")]
    UnknownEvent { name: String },
}

/// State file persistence errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("State file {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Failed to write state file: {path}")]
    WriteFailed { path: String },

    #[error("Connection is {state}; refusing to discard an active connection")]
    ConnectionActive { state: ConnectionState },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, VpnStateError>;
