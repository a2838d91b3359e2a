//! VPN connection lifecycle module
//!
//! State model, transition validation, shared access and persistence.

pub mod connection_event;
pub mod machine;
pub mod shared;
pub mod state;
pub mod store;
pub mod transition;

// Public re-exports
pub use connection_event::ConnectionEvent;
pub use machine::ConnectionStateMachine;
pub use shared::SharedConnectionState;
pub use state::ConnectionState;
pub use store::{StateSnapshot, StateStore};
pub use transition::{next_state, permitted_events, transition_table, Transition};
