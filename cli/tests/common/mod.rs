//! Common utilities and helpers for CLI integration tests
//!
//! Every helper here keeps the binary off the network and away from the real
//! home directory: commands point at a closed local port and all state files
//! (credentials, config, preferences) land inside a per-test temp dir.

use assert_cmd::Command;
use std::path::Path;
use std::time::Duration;

/// A local port nothing listens on, so commands that would call the server
/// fail fast instead of reaching anything real
pub const OFFLINE_URL: &str = "http://127.0.0.1:9";

pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Helper to create a CLI command sandboxed to `home`
///
/// Overrides `HOME` and `XDG_CONFIG_HOME` so stored credentials, config, and
/// UI preferences resolve inside the temp dir, and sets `NO_COLOR` so output
/// assertions see plain text.
pub fn cli_command(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_moneta"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .timeout(TEST_TIMEOUT);
    cmd
}

/// Helper to run a `;`-separated command script against the offline URL
pub fn script_command(home: &Path, script: &str) -> Command {
    let mut cmd = cli_command(home);
    cmd.arg("--url")
        .arg(OFFLINE_URL)
        .arg("--no-spinner")
        .arg("--command")
        .arg(script);
    cmd
}
