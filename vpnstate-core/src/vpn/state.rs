//! VPN connection state
//!
//! Defines the four lifecycle states a VPN connection moves through.

use serde::{Deserialize, Serialize};

/// VPN connection lifecycle states
///
/// A normal lifetime starts in [`ConnectionState::Idle`], goes through
/// [`ConnectionState::Connecting`] to [`ConnectionState::Connected`] (or back
/// to `Idle` on failure), and returns to `Idle` via
/// [`ConnectionState::Disconnecting`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// No connection, nothing in progress
    #[default]
    Idle,

    /// A connection is being set up
    Connecting,

    /// The connection is established
    Connected,

    /// The connection is being torn down
    Disconnecting,
}

impl ConnectionState {
    /// Every state, in lifecycle order
    pub const ALL: [ConnectionState; 4] = [
        ConnectionState::Idle,
        ConnectionState::Connecting,
        ConnectionState::Connected,
        ConnectionState::Disconnecting,
    ];

    /// Check if no connection exists
    pub fn is_idle(&self) -> bool {
        matches!(self, ConnectionState::Idle)
    }

    /// Check if currently connected
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// Check if a setup or teardown is in progress
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ConnectionState::Connecting | ConnectionState::Disconnecting
        )
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Idle => write!(f, "idle"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Disconnecting => write!(f, "disconnecting"),
        }
    }
}
