//! CLI command implementations
//!
//! This module contains the implementation of all CLI subcommands.

pub mod cycle;
pub mod state;

use colored::{ColoredString, Colorize};
use vpnstate_core::vpn::ConnectionState;

/// Render a state for terminal output
pub fn paint_state(state: ConnectionState) -> ColoredString {
    let label = state.to_string();
    match state {
        ConnectionState::Idle => label.dimmed(),
        ConnectionState::Connecting | ConnectionState::Disconnecting => label.yellow(),
        ConnectionState::Connected => label.green().bold(),
    }
}
