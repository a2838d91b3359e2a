//! Thread-safe connection state
//!
//! Wraps a [`ConnectionStateMachine`] behind a single lock. Every successful
//! transition is published on a broadcast channel, and the latest state on a
//! watch channel.

use crate::error::TransitionError;
use crate::vpn::machine::ConnectionStateMachine;
use crate::vpn::store::StateSnapshot;
use crate::vpn::transition::Transition;
use crate::vpn::{ConnectionEvent, ConnectionState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, watch};

/// Transitions buffered per subscriber before it starts lagging
pub const TRANSITION_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug)]
struct Inner {
    machine: Mutex<ConnectionStateMachine>,
    state_tx: watch::Sender<ConnectionState>,
    transition_tx: broadcast::Sender<Transition>,
}

/// Thread-safe connection state wrapper
///
/// Clones share the same machine.
#[derive(Debug, Clone)]
pub struct SharedConnectionState(Arc<Inner>);

impl SharedConnectionState {
    /// Create a new shared connection state in `Idle`
    pub fn new() -> Self {
        Self::from_machine(ConnectionStateMachine::new())
    }

    /// Share an existing machine
    pub fn from_machine(machine: ConnectionStateMachine) -> Self {
        let (state_tx, _) = watch::channel(machine.current_state());
        let (transition_tx, _) = broadcast::channel(TRANSITION_CHANNEL_CAPACITY);
        Self(Arc::new(Inner {
            machine: Mutex::new(machine),
            state_tx,
            transition_tx,
        }))
    }

    // The machine only changes through complete transitions, so a poisoned
    // lock still guards a consistent value.
    fn lock(&self) -> MutexGuard<'_, ConnectionStateMachine> {
        self.0.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the current connection state
    pub fn current_state(&self) -> ConnectionState {
        self.lock().current_state()
    }

    /// Apply `event` under the lock and notify subscribers on success
    pub fn request_transition(
        &self,
        event: ConnectionEvent,
    ) -> Result<ConnectionState, TransitionError> {
        let mut machine = self.lock();
        let transition = machine.apply(event)?;
        let state = transition.to;

        // No transition subscribers is fine.
        let _ = self.0.transition_tx.send(transition);
        self.0.state_tx.send_replace(state);
        Ok(state)
    }

    /// Check if currently connected
    pub fn is_connected(&self) -> bool {
        self.current_state().is_connected()
    }

    /// Watch the latest state
    ///
    /// Back-to-back transitions are coalesced; use
    /// [`transitions`](Self::transitions) to see each one.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.0.state_tx.subscribe()
    }

    /// Receive every transition applied from now on, in order
    ///
    /// A receiver more than [`TRANSITION_CHANNEL_CAPACITY`] transitions behind
    /// gets `RecvError::Lagged`.
    pub fn transitions(&self) -> broadcast::Receiver<Transition> {
        self.0.transition_tx.subscribe()
    }

    /// Wait until the connection reaches `target`
    ///
    /// Resolves immediately if it is already there.
    pub async fn wait_for(&self, target: ConnectionState) -> ConnectionState {
        let mut receiver = self.subscribe();
        receiver
            .wait_for(|state| *state == target)
            .await
            .map(|state| *state)
            // Unreachable while `self` holds the sender.
            .unwrap_or_else(|_| self.current_state())
    }

    /// Capture the shared machine for persistence
    pub fn snapshot(&self) -> StateSnapshot {
        self.lock().snapshot()
    }

    /// Copy of the shared machine
    pub fn to_machine(&self) -> ConnectionStateMachine {
        self.lock().clone()
    }
}

impl Default for SharedConnectionState {
    fn default() -> Self {
        Self::new()
    }
}
