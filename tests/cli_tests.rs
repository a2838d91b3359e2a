//! Integration tests for the vpnstate command line
//!
//! Each test runs the built binary against its own temporary config
//! directory and state file.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn state_file(&self) -> PathBuf {
        self.dir.path().join("state.json")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_vpnstate"))
            .args(args)
            .env("VPNSTATE_CONFIG_DIR", self.dir.path())
            .env("VPNSTATE_STATE_FILE", self.state_file())
            .env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
            .env_remove("CLICOLOR_FORCE")
            .env_remove("JOURNAL_STREAM")
            .output()
            .expect("Failed to execute vpnstate")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_status_without_state_file_is_idle() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["status"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Status: idle"));
    assert!(stdout(&output).contains("begin-connect"));
    assert!(!sandbox.state_file().exists(), "status must not create state");
}

#[test]
fn test_apply_persists_between_invocations() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["apply", "begin-connect"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let output = sandbox.run(&["apply", "connect-succeeded"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let output = sandbox.run(&["status"]);
    assert!(stdout(&output).contains("Status: connected"));

    let history = sandbox.run(&["history"]);
    let text = stdout(&history);
    assert!(text.contains("begin-connect"));
    assert!(text.contains("connect-succeeded"));
}

#[test]
fn test_invalid_transition_exits_one_and_keeps_state() {
    let sandbox = Sandbox::new();
    sandbox.run(&["apply", "begin-connect"]);
    let before = fs::read_to_string(sandbox.state_file()).unwrap();

    let output = sandbox.run(&["apply", "disconnect-completed"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Invalid transition"), "stderr: {}", err);
    assert!(err.contains("connect-succeeded, connect-failed"), "stderr: {}", err);
    assert_eq!(fs::read_to_string(sandbox.state_file()).unwrap(), before);
}

#[test]
fn test_unknown_event_is_rejected_by_parser() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["apply", "reconnect"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Unknown connection event"));
}

#[test]
fn test_reset_requires_force_when_active() {
    let sandbox = Sandbox::new();
    sandbox.run(&["apply", "begin-connect"]);

    let output = sandbox.run(&["reset"]);
    assert_eq!(output.status.code(), Some(1));
    let message = stderr(&output);
    assert!(message.contains("refusing to discard an active connection"));
    assert!(message.contains("use --force"));
    assert!(sandbox.state_file().exists());

    let output = sandbox.run(&["reset", "--force"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(!sandbox.state_file().exists());
}

#[test]
fn test_reset_discards_corrupt_state_file() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.state_file(), "not valid json {{{").unwrap();

    let output = sandbox.run(&["status"]);
    assert_eq!(output.status.code(), Some(1));

    let output = sandbox.run(&["reset"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(!sandbox.state_file().exists());
}

#[test]
fn test_invalid_config_exits_two() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.dir.path().join("config.toml"), "history_limit = 0\n").unwrap();

    let output = sandbox.run(&["status"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("history_limit"));
}

#[test]
fn test_table_lists_all_edges() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["table"]);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    // Header plus five edges
    assert_eq!(text.lines().count(), 6);
    assert!(text.contains("disconnect-completed"));
}

#[test]
fn test_cycle_round_trip() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["cycle"]);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    // The observer prints each transition, not just the final state
    for event in [
        "begin-connect",
        "connect-succeeded",
        "begin-disconnect",
        "disconnect-completed",
    ] {
        assert!(text.contains(event), "observer missed {}", event);
    }
    assert!(text.contains("Cycle finished in idle after 4 transitions"));
    assert!(!sandbox.state_file().exists(), "cycle runs in memory");
}

#[test]
fn test_cycle_with_failed_connect() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["cycle", "--fail"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Cycle finished in idle after 2 transitions"));
}
