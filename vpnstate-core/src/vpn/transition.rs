//! Lifecycle transition table
//!
//! The only edges a connection may take between states. Any (state, event)
//! pair not listed here is rejected.

use crate::vpn::{ConnectionEvent, ConnectionState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// (from, event, to)
const TRANSITIONS: [(ConnectionState, ConnectionEvent, ConnectionState); 5] = [
    (
        ConnectionState::Idle,
        ConnectionEvent::BeginConnect,
        ConnectionState::Connecting,
    ),
    (
        ConnectionState::Connecting,
        ConnectionEvent::ConnectSucceeded,
        ConnectionState::Connected,
    ),
    (
        ConnectionState::Connecting,
        ConnectionEvent::ConnectFailed,
        ConnectionState::Idle,
    ),
    (
        ConnectionState::Connected,
        ConnectionEvent::BeginDisconnect,
        ConnectionState::Disconnecting,
    ),
    (
        ConnectionState::Disconnecting,
        ConnectionEvent::DisconnectCompleted,
        ConnectionState::Idle,
    ),
];

/// The full transition table as (from, event, to) triples
pub fn transition_table() -> &'static [(ConnectionState, ConnectionEvent, ConnectionState)] {
    &TRANSITIONS
}

/// Look up the state reached by applying `event` in `from`
///
/// Returns `None` when the table has no such edge.
pub fn next_state(from: ConnectionState, event: ConnectionEvent) -> Option<ConnectionState> {
    TRANSITIONS
        .iter()
        .find(|(f, e, _)| *f == from && *e == event)
        .map(|(_, _, to)| *to)
}

/// Events that have an edge out of `state`
pub fn permitted_events(state: ConnectionState) -> Vec<ConnectionEvent> {
    TRANSITIONS
        .iter()
        .filter(|(f, _, _)| *f == state)
        .map(|(_, e, _)| *e)
        .collect()
}

/// A transition that was applied to a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: ConnectionState,
    pub event: ConnectionEvent,
    pub to: ConnectionState,
    /// When the transition was applied
    pub at: DateTime<Utc>,
}

impl Transition {
    /// Record a transition happening now
    pub fn now(from: ConnectionState, event: ConnectionEvent, to: ConnectionState) -> Self {
        Self {
            from,
            event,
            to,
            at: Utc::now(),
        }
    }

    /// Check that this record is an edge of the transition table
    pub fn is_valid_edge(&self) -> bool {
        next_state(self.from, self.event) == Some(self.to)
    }
}
