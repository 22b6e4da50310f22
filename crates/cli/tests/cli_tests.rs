//! CLI integration tests
//!
//! These only exercise the argument surface; report generation needs a live
//! cluster and is covered by the library tests against a fake.

use std::process::Command;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-p", "kubesize-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("cluster"), "Should show cluster command");
    assert!(stdout.contains("node-role"), "Should show node-role command");
    assert!(stdout.contains("--kubeconfig"), "Should show kubeconfig option");
    assert!(stdout.contains("--namespace"), "Should show namespace option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = run_cli(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("kubesize"), "Should show binary name");
}

/// Test cluster subcommand help and display flags
#[test]
fn test_cluster_help() {
    let output = run_cli(&["cluster", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Cluster help should succeed");
    assert!(stdout.contains("--readable"), "Should show readable option");
    assert!(
        stdout.contains("--default-format"),
        "Should show default-format option"
    );
    assert!(stdout.contains("--no-headers"), "Should show no-headers option");
    assert!(stdout.contains("--output"), "Should show output option");
}

/// Test node-role subcommand help
#[test]
fn test_node_role_help() {
    let output = run_cli(&["node-role", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Node-role help should succeed");
    assert!(stdout.contains("--readable"), "Should show readable option");
    assert!(stdout.contains("--output"), "Should show output option");
}

/// Test that the short aliases resolve to the subcommands
#[test]
fn test_subcommand_aliases() {
    let output = run_cli(&["c", "--help"]);
    assert!(output.status.success(), "Cluster alias help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--readable"), "Alias should resolve to cluster");

    let output = run_cli(&["nr", "--help"]);
    assert!(output.status.success(), "Node-role alias help should succeed");
}

/// Test output format values
#[test]
fn test_output_format_values() {
    let output = run_cli(&["cluster", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("table"), "Should show table format");
    assert!(stdout.contains("json"), "Should show json format");
    assert!(stdout.contains("yaml"), "Should show yaml format");
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = run_cli(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}

/// Test invalid output format error handling
#[test]
fn test_invalid_output_format() {
    let output = run_cli(&["cluster", "--output", "xml"]);
    assert!(!output.status.success(), "Invalid format should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid value") || stderr.contains("error"),
        "Should show error about the format value"
    );
}

/// Test that a missing subcommand fails
#[test]
fn test_missing_subcommand() {
    let output = run_cli(&[]);
    assert!(!output.status.success(), "Missing subcommand should fail");
}
