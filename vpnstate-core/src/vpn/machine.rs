//! Connection lifecycle state machine
//!
//! Holds the state of a single connection and validates every change
//! against the transition table.

use crate::error::TransitionError;
use crate::vpn::store::StateSnapshot;
use crate::vpn::transition::{next_state, Transition};
use crate::vpn::{ConnectionEvent, ConnectionState};
use chrono::Utc;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Number of transitions kept when no limit is configured
pub const DEFAULT_HISTORY_LIMIT: usize = 32;

/// State machine for one VPN connection
#[derive(Debug, Clone)]
pub struct ConnectionStateMachine {
    state: ConnectionState,
    history: VecDeque<Transition>,
    history_limit: usize,
}

impl ConnectionStateMachine {
    /// Create a new machine in the `Idle` state
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a new machine that records at most `limit` transitions
    ///
    /// The most recent transition is always kept, so a limit of zero
    /// behaves like a limit of one.
    pub fn with_history_limit(limit: usize) -> Self {
        let history_limit = limit.max(1);
        Self {
            state: ConnectionState::Idle,
            history: VecDeque::with_capacity(history_limit.min(DEFAULT_HISTORY_LIMIT)),
            history_limit,
        }
    }

    /// Get the current connection state
    pub fn current_state(&self) -> ConnectionState {
        self.state
    }

    /// Check whether `event` has an edge out of the current state
    pub fn can_apply(&self, event: ConnectionEvent) -> bool {
        next_state(self.state, event).is_some()
    }

    /// Apply `event` to the current state
    ///
    /// On success the new state is stored, recorded in the history and
    /// returned. On failure nothing changes and the rejected
    /// (state, event) pair is returned in the error.
    pub fn request_transition(
        &mut self,
        event: ConnectionEvent,
    ) -> Result<ConnectionState, TransitionError> {
        self.apply(event).map(|transition| transition.to)
    }

    /// Like [`request_transition`](Self::request_transition), returning the
    /// recorded transition
    pub fn apply(&mut self, event: ConnectionEvent) -> Result<Transition, TransitionError> {
        let from = self.state;
        let Some(to) = next_state(from, event) else {
            warn!(state = %from, event = %event, "Rejected invalid transition");
            return Err(TransitionError::InvalidTransition { from, event });
        };

        let transition = Transition::now(from, event, to);
        self.state = to;
        self.record(transition.clone());

        if to.is_transient() {
            debug!("Connection state {} -> {} on {}", from, to, event);
        } else {
            info!("Connection state {} -> {} on {}", from, to, event);
        }

        Ok(transition)
    }

    /// Recorded transitions, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Transition> {
        self.history.iter()
    }

    /// Maximum number of recorded transitions
    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    fn record(&mut self, transition: Transition) {
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(transition);
    }

    /// Capture the machine for persistence
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            state: self.state,
            updated_at: self.history.back().map(|t| t.at).unwrap_or_else(Utc::now),
            history: self.history.iter().cloned().collect(),
        }
    }

    /// Rebuild a machine from a persisted snapshot
    ///
    /// The recorded history must be a chain of table edges ending in the
    /// snapshot state. A snapshot without history must be `Idle`.
    /// Transitions beyond `history_limit` are dropped, oldest first; the
    /// most recent one is always kept.
    pub fn from_snapshot(snapshot: StateSnapshot, history_limit: usize) -> Result<Self, String> {
        let history_limit = history_limit.max(1);
        let StateSnapshot { state, history, .. } = snapshot;

        match history.last() {
            None if !state.is_idle() => {
                return Err(format!("state is {} but no transitions are recorded", state));
            }
            Some(last) if last.to != state => {
                return Err(format!(
                    "last recorded transition ends in {} but state is {}",
                    last.to, state
                ));
            }
            _ => {}
        }

        for (i, transition) in history.iter().enumerate() {
            if !transition.is_valid_edge() {
                return Err(format!(
                    "recorded transition {} -> {} on {} is not allowed",
                    transition.from, transition.to, transition.event
                ));
            }
            if let Some(next) = history.get(i + 1) {
                if next.from != transition.to {
                    return Err(format!(
                        "recorded transitions do not link: {} is followed by a transition from {}",
                        transition.to, next.from
                    ));
                }
            }
        }

        let mut history: VecDeque<Transition> = history.into();
        while history.len() > history_limit {
            history.pop_front();
        }

        Ok(Self {
            state,
            history,
            history_limit,
        })
    }
}

impl Default for ConnectionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
