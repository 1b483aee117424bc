//! Integration tests for general CLI functionality
//!
//! These tests validate:
//! - Help and version output
//! - Credential management flags
//! - Configuration file handling
//! - Batch command execution without a reachable server
//! - Route guarding for protected screens

mod common;
use common::*;

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_cli_help_command() {
    let home = TempDir::new().unwrap();
    let mut cmd = cli_command(home.path());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Interactive terminal for Moneta accounting and inventory",
        ))
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--chat-url"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--remember"));
}

#[test]
fn test_cli_version_output() {
    let home = TempDir::new().unwrap();
    let mut cmd = cli_command(home.path());
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains("Commit:"))
        .stdout(predicate::str::contains("Built:"));
}

#[test]
fn test_cli_conflicting_format_flags() {
    let home = TempDir::new().unwrap();
    let mut cmd = cli_command(home.path());
    cmd.arg("--json").arg("--format").arg("csv");

    cmd.assert().failure();
}

#[test]
fn test_list_instances_with_no_stored_credentials() {
    let home = TempDir::new().unwrap();
    let mut cmd = cli_command(home.path());
    cmd.arg("--list-instances");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No stored credentials"));
}

#[test]
fn test_show_credentials_for_missing_instance() {
    let home = TempDir::new().unwrap();
    let mut cmd = cli_command(home.path());
    cmd.arg("--show-credentials");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "No credentials stored for instance 'local'",
        ));
}

#[test]
fn test_delete_credentials_is_idempotent() {
    let home = TempDir::new().unwrap();
    let mut cmd = cli_command(home.path());
    cmd.arg("--delete-credentials");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Deleted credentials for instance 'local'"));
}

#[test]
fn test_batch_config_command_runs_offline() {
    let home = TempDir::new().unwrap();
    let mut cmd = script_command(home.path(), "\\config");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Configuration:"))
        .stdout(predicate::str::contains("Format:"));
}

#[test]
fn test_batch_whoami_reports_signed_out() {
    let home = TempDir::new().unwrap();
    let mut cmd = script_command(home.path(), "\\whoami");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Session Information"))
        .stdout(predicate::str::contains("Signed in:      No"));
}

#[test]
fn test_token_flag_authenticates_whoami() {
    let home = TempDir::new().unwrap();
    let mut cmd = script_command(home.path(), "\\whoami");
    cmd.arg("--token").arg("test-token").arg("--username").arg("amira");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Signed in:      Yes"))
        .stdout(predicate::str::contains("Username:       amira"));
}

#[test]
fn test_protected_screen_redirects_to_sign_in() {
    let home = TempDir::new().unwrap();
    let mut cmd = script_command(home.path(), "open products");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Sign in to view Products."));
}

#[test]
fn test_public_help_screen_opens_while_signed_out() {
    let home = TempDir::new().unwrap();
    let mut cmd = script_command(home.path(), "open help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("open <screen>"))
        .stdout(predicate::str::contains("summary <from> <to>"));
}

#[test]
fn test_list_without_screen_fails() {
    let home = TempDir::new().unwrap();
    let mut cmd = script_command(home.path(), "list");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Sign in screen has no record list"));
}

#[test]
fn test_config_file_sets_output_format() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".moneta");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[ui]\nformat = \"json\"\npage_size = 25\n",
    )
    .unwrap();

    let mut cmd = script_command(home.path(), "\\config");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Format:         json"))
        .stdout(predicate::str::contains("Page size:      25"));
}

#[test]
fn test_unreachable_server_error_on_login() {
    let home = TempDir::new().unwrap();
    let mut cmd = script_command(home.path(), "status");
    cmd.arg("--username").arg("amira").arg("--password").arg("wrong");

    // The login call itself fails fast against the closed port
    cmd.assert().failure();
}
