//! vpnstate - VPN connection lifecycle CLI
//!
//! Drives a persisted VPN connection through its lifecycle states,
//! rejecting any transition the lifecycle does not allow.

use clap::{Parser, Subcommand};
use vpnstate_core::config::toml_config::load_config;
use vpnstate_core::error::VpnStateError;
use vpnstate_core::init_logging;
use vpnstate_core::vpn::ConnectionEvent;

mod cli;

#[derive(Parser)]
#[command(name = "vpnstate")]
#[command(about = "Track and drive the lifecycle of a VPN connection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current connection state
    Status,
    /// Apply a lifecycle event (e.g. begin-connect, connect-succeeded)
    Apply {
        /// Event to apply
        event: ConnectionEvent,
    },
    /// Show recorded transitions
    History,
    /// Show the lifecycle transition table
    Table,
    /// Discard the persisted connection
    Reset {
        /// Discard even if a connection is in progress or established
        #[arg(long)]
        force: bool,
    },
    /// Run an in-memory connect/disconnect cycle with a state observer
    Cycle {
        /// Make the connect attempt fail
        #[arg(long)]
        fail: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = init_logging(config.level_filter()) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let result = match cli.command {
        Commands::Status => cli::state::run_status(&config),
        Commands::Apply { event } => cli::state::run_apply(&config, event),
        Commands::History => cli::state::run_history(&config),
        Commands::Table => cli::state::run_table(),
        Commands::Reset { force } => cli::state::run_reset(&config, force),
        Commands::Cycle { fail } => cli::cycle::run_cycle(&config, fail),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let exit_code = match e {
                // Configuration errors (exit code 2)
                VpnStateError::Config(_) | VpnStateError::Toml(_) | VpnStateError::TomlSerialize(_) => 2,
                // Rejected transitions and runtime failures (exit code 1)
                VpnStateError::Transition(_)
                | VpnStateError::Store(_)
                | VpnStateError::Io(_)
                | VpnStateError::Json(_) => 1,
            };

            eprintln!("{}", e);
            std::process::exit(exit_code);
        }
    }
}
