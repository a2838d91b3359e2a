//! Persisted connection state commands
//!
//! Each command loads the connection from the state file, acts on it and
//! writes it back when it changed.

use crate::cli::paint_state;
use colored::Colorize;
use tracing::{info, warn};
use vpnstate_core::config::LifecycleConfig;
use vpnstate_core::error::{StoreError, TransitionError, VpnStateError};
use vpnstate_core::vpn::{
    permitted_events, transition_table, ConnectionEvent, ConnectionState, StateStore,
};

fn format_events(state: ConnectionState) -> String {
    permitted_events(state)
        .iter()
        .map(ConnectionEvent::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run the status command
pub fn run_status(config: &LifecycleConfig) -> Result<(), VpnStateError> {
    let store = StateStore::from_config(config)?;
    let machine = store.load_or_default(config.history_limit)?;
    let state = machine.current_state();

    println!("Status: {}", paint_state(state));
    if let Some(last) = machine.history().last() {
        println!(
            "Since:  {} ({})",
            last.at.format("%Y-%m-%d %H:%M:%S UTC"),
            last.event
        );
    }
    println!("Next:   {}", format_events(state));
    Ok(())
}

/// Run the apply command
pub fn run_apply(config: &LifecycleConfig, event: ConnectionEvent) -> Result<(), VpnStateError> {
    let store = StateStore::from_config(config)?;
    let mut machine = store.load_or_default(config.history_limit)?;
    let from = machine.current_state();

    match machine.request_transition(event) {
        Ok(to) => {
            store.save(&machine)?;
            println!("✓ {} → {} ({})", paint_state(from), paint_state(to), event);
            Ok(())
        }
        Err(e) => {
            if let TransitionError::InvalidTransition { from, .. } = &e {
                eprintln!(
                    "{} allowed from {}: {}",
                    "Hint:".yellow(),
                    from,
                    format_events(*from)
                );
            }
            Err(e.into())
        }
    }
}

/// Run the history command
pub fn run_history(config: &LifecycleConfig) -> Result<(), VpnStateError> {
    let store = StateStore::from_config(config)?;
    let machine = store.load_or_default(config.history_limit)?;

    if machine.history().next().is_none() {
        println!("No transitions recorded");
        return Ok(());
    }

    for transition in machine.history() {
        println!(
            "{}  {:<14} → {:<14} {}",
            transition.at.format("%Y-%m-%d %H:%M:%S"),
            transition.from.to_string(),
            transition.to.to_string(),
            transition.event.to_string().dimmed()
        );
    }
    Ok(())
}

/// Run the table command
pub fn run_table() -> Result<(), VpnStateError> {
    println!("{:<14} {:<22} {}", "FROM", "EVENT", "TO");
    for (from, event, to) in transition_table() {
        println!("{:<14} {:<22} {}", from.to_string(), event.as_str(), to);
    }
    Ok(())
}

/// Run the reset command
pub fn run_reset(config: &LifecycleConfig, force: bool) -> Result<(), VpnStateError> {
    let store = StateStore::from_config(config)?;

    // A corrupt state file can always be discarded.
    let state = match store.load(config.history_limit) {
        Ok(machine) => machine.map(|m| m.current_state()).unwrap_or_default(),
        Err(VpnStateError::Store(StoreError::Corrupt { reason, .. })) => {
            warn!("Discarding corrupt state file: {}", reason);
            ConnectionState::Idle
        }
        Err(e) => return Err(e),
    };

    if !state.is_idle() {
        if !force {
            eprintln!("{} use --force to discard it", "Hint:".yellow());
            return Err(StoreError::ConnectionActive { state }.into());
        }
        warn!("Forcibly discarding {} connection", state);
    }

    store.clear()?;
    info!("Connection discarded, next command starts idle");
    println!("✓ Connection reset to {}", paint_state(ConnectionState::Idle));
    Ok(())
}
