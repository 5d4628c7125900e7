//! End-to-end smoke tests for the smarthome binary.
//!
//! Each test launches the real executable, pipes a script into stdin and
//! inspects stdout. Environment overrides are cleared and `--config` points
//! at a file that does not exist, so neither a developer's shell nor a
//! `smarthome.toml` in the working directory can change the outcome.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn missing_config() -> PathBuf {
    std::env::temp_dir().join(format!("smarthome-smoke-{}-missing.toml", std::process::id()))
}

fn run_script(script: &str, envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_smarthome"));
    command.arg("--config").arg(missing_config());
    for key in [
        "SMARTHOME_RATE",
        "SMARTHOME_PASSWORD",
        "SMARTHOME_REALTIME",
        "SMARTHOME_OUTPUT",
        "SMARTHOME_LOG",
        "RUST_LOG",
    ] {
        command.env_remove(key);
    }
    let mut child = command
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary should start");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(script.as_bytes())
        .expect("script should be written");
    child.wait_with_output().expect("binary should exit")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn should_build_a_home_and_report_on_it() {
    let output = run_script(
        "add-rooms Kitchen, Attic\n5680\nadd-device 1 1000 Kettle\nstatus\nreport\ntrends\nquit\n",
        &[],
    );
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("2 room(s) added."));
    assert!(text.contains("Room: Kitchen\n - Kettle: OFF\nRoom: Attic\n"));
    assert!(text.contains("Total Energy Consumed: 0.000 kWh"));
    assert!(text.contains("Total Cost: 0.0000 Fils"));
    assert!(text.contains("Device activated for the longest time: Kettle in Kitchen (0.00 hours)"));
    assert!(text.contains("Goodbye."));
}

#[test]
fn should_refuse_changes_after_wrong_passwords() {
    let output = run_script("add-rooms Kitchen\n1\n2\n3\nstatus\n", &[]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Access denied."));
    assert!(!text.contains("Room: Kitchen"));
}

#[test]
fn should_ask_again_after_a_denied_request() {
    let output = run_script(
        "add-rooms Kitchen\n1\n2\n3\nadd-rooms Attic\n5680\nstatus\n",
        &[],
    );
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Access denied."));
    assert!(text.contains("1 room(s) added."));
    assert!(text.contains("Room: Attic"));
    assert!(!text.contains("Room: Kitchen"));
}

#[test]
fn should_honour_environment_overrides() {
    let output = run_script(
        "add-rooms Den\nsecret\nreport\n",
        &[("SMARTHOME_PASSWORD", "secret"), ("SMARTHOME_OUTPUT", "json")],
    );
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("\"message\": \"1 room(s) added.\""));
    assert!(text.contains("\"currency\": \"Fils\""));
}

#[test]
fn should_reject_unknown_arguments() {
    let output = Command::new(env!("CARGO_BIN_EXE_smarthome"))
        .arg("--verbose")
        .stdin(Stdio::null())
        .output()
        .expect("binary should run");
    assert!(!output.status.success());
}
