//! In-memory lifecycle cycle
//!
//! Drives a shared connection through a full connect/disconnect cycle from
//! one task while another task observes every transition.

use crate::cli::paint_state;
use chrono::Local;
use colored::Colorize;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vpnstate_core::config::LifecycleConfig;
use vpnstate_core::error::VpnStateError;
use vpnstate_core::vpn::{
    ConnectionEvent, ConnectionState, ConnectionStateMachine, SharedConnectionState,
};

/// Simulated time spent in each transient state
const STEP_DELAY: Duration = Duration::from_millis(100);

/// Run the cycle command
pub fn run_cycle(config: &LifecycleConfig, fail: bool) -> Result<(), VpnStateError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    runtime.block_on(drive_cycle(config.history_limit, fail))
}

async fn drive_cycle(history_limit: usize, fail: bool) -> Result<(), VpnStateError> {
    let shared =
        SharedConnectionState::from_machine(ConnectionStateMachine::with_history_limit(history_limit));

    let observer = spawn_observer(&shared);

    let driver = shared.clone();
    let outcome = tokio::spawn(async move {
        driver.request_transition(ConnectionEvent::BeginConnect)?;
        tokio::time::sleep(STEP_DELAY).await;

        if fail {
            info!("Simulating failed connection attempt");
            return driver.request_transition(ConnectionEvent::ConnectFailed);
        }

        driver.request_transition(ConnectionEvent::ConnectSucceeded)?;
        tokio::time::sleep(STEP_DELAY).await;
        driver.request_transition(ConnectionEvent::BeginDisconnect)?;
        tokio::time::sleep(STEP_DELAY).await;
        driver.request_transition(ConnectionEvent::DisconnectCompleted)
    })
    .await
    .map_err(join_error)?;

    let final_state = outcome?;
    let observed = observer.await.map_err(join_error)?;
    debug!("Observer saw {} transitions", observed);

    let machine = shared.to_machine();
    println!();
    println!(
        "Cycle finished in {} after {} transitions",
        paint_state(final_state),
        machine.history().count()
    );
    Ok(())
}

/// Print every transition until the connection is idle again
fn spawn_observer(shared: &SharedConnectionState) -> JoinHandle<usize> {
    let mut transitions = shared.transitions();
    tokio::spawn(async move {
        let mut observed = 0;
        loop {
            let transition = match transitions.recv().await {
                Ok(transition) => transition,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Observer skipped {} transitions", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            observed += 1;
            println!(
                "[{}] {} {}",
                transition.at.with_timezone(&Local).format("%H:%M:%S%.3f"),
                paint_state(transition.to),
                transition.event.to_string().dimmed()
            );
            if transition.to == ConnectionState::Idle {
                break;
            }
        }
        observed
    })
}

fn join_error(e: tokio::task::JoinError) -> VpnStateError {
    VpnStateError::Io(std::io::Error::other(e))
}
