//! Unit tests for error types and conversions

use vpnstate_core::error::{ConfigError, StoreError, TransitionError, VpnStateError};
use vpnstate_core::vpn::{ConnectionEvent, ConnectionState};

#[test]
fn test_invalid_transition_display() {
    let error = TransitionError::InvalidTransition {
        from: ConnectionState::Connected,
        event: ConnectionEvent::BeginConnect,
    };
    assert_eq!(
        error.to_string(),
        "Invalid transition: cannot apply 'begin-connect' while connected"
    );
}

#[test]
fn test_config_error_display() {
    let error = ConfigError::ValidationError {
        message: "history_limit must be between 1 and 1024, got: 0".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Configuration validation error: history_limit must be between 1 and 1024, got: 0"
    );
}

#[test]
fn test_store_error_display() {
    let error = StoreError::ConnectionActive {
        state: ConnectionState::Connecting,
    };
    assert_eq!(
        error.to_string(),
        "Connection is connecting; refusing to discard an active connection"
    );
}

#[test]
fn test_error_from_transition() {
    let error: VpnStateError = TransitionError::UnknownEvent {
        name: "reconnect".to_string(),
    }
    .into();
    assert!(matches!(error, VpnStateError::Transition(_)));
    assert_eq!(
        error.to_string(),
        "Transition error: Unknown connection event: reconnect"
    );
}

#[test]
fn test_error_from_io() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: VpnStateError = io_error.into();
    assert!(matches!(error, VpnStateError::Io(_)));
}

#[test]
fn test_error_from_toml() {
    let toml_error: toml::de::Error =
        toml::from_str::<vpnstate_core::config::LifecycleConfig>("history_limit = \"many\"")
            .unwrap_err();
    let error: VpnStateError = toml_error.into();
    assert!(matches!(error, VpnStateError::Toml(_)));
}

#[test]
fn test_error_from_json() {
    let json_error = serde_json::from_str::<ConnectionState>("\"offline\"").unwrap_err();
    let error: VpnStateError = json_error.into();
    assert!(matches!(error, VpnStateError::Json(_)));
}
