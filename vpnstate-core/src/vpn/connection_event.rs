//! Connection event types for the VPN lifecycle state machine
//!
//! Defines the events that drive a connection from one state to the next.

use crate::error::TransitionError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Events that request a lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionEvent {
    /// A new connection is about to be set up
    BeginConnect,

    /// Connection setup finished successfully
    ConnectSucceeded,

    /// Connection setup failed
    ConnectFailed,

    /// The connection is about to be torn down
    BeginDisconnect,

    /// Teardown finished
    DisconnectCompleted,
}

impl ConnectionEvent {
    /// Every event, in transition table order
    pub const ALL: [ConnectionEvent; 5] = [
        ConnectionEvent::BeginConnect,
        ConnectionEvent::ConnectSucceeded,
        ConnectionEvent::ConnectFailed,
        ConnectionEvent::BeginDisconnect,
        ConnectionEvent::DisconnectCompleted,
    ];

    /// Kebab-case name used on the command line and in state files
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionEvent::BeginConnect => "begin-connect",
            ConnectionEvent::ConnectSucceeded => "connect-succeeded",
            ConnectionEvent::ConnectFailed => "connect-failed",
            ConnectionEvent::BeginDisconnect => "begin-disconnect",
            ConnectionEvent::DisconnectCompleted => "disconnect-completed",
        }
    }
}

impl std::fmt::Display for ConnectionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionEvent {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == normalized)
            .ok_or_else(|| TransitionError::UnknownEvent {
                name: s.to_string(),
            })
    }
}
