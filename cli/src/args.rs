use clap::Parser;
use moneta_cli::OutputFormat;
use std::path::PathBuf;

// Macro to create the version string at compile time
macro_rules! version_string {
    () => {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nCommit: ",
            env!("GIT_COMMIT_HASH"),
            "\nBuilt: ",
            env!("BUILD_DATE")
        )
    };
}

/// Moneta CLI - Terminal client for the Moneta accounting server
#[derive(Parser, Debug)]
#[command(name = "moneta")]
#[command(version = version_string!())]
#[command(about = "Interactive terminal for Moneta accounting and inventory", long_about = None)]
pub struct Cli {
    /// Server URL (e.g., http://localhost:8080)
    #[arg(short = 'u', long = "url")]
    pub url: Option<String>,

    /// Support chat URL (defaults to the server URL)
    #[arg(long = "chat-url")]
    pub chat_url: Option<String>,

    /// Bearer token (skips the login flow)
    #[arg(long = "token")]
    pub token: Option<String>,

    /// Username to sign in as
    #[arg(long = "username")]
    pub username: Option<String>,

    /// Password (if flag is present without value, prompts interactively)
    #[arg(long = "password", num_args = 0..=1, default_missing_value = "")]
    pub password: Option<String>,

    /// Keep this sign-in across restarts (writes stored credentials)
    #[arg(long = "remember")]
    pub remember: bool,

    /// Server instance name (for credential storage)
    #[arg(long = "instance", default_value = "local")]
    pub instance: String,

    /// Execute a single command and exit
    #[arg(short = 'c', long = "command")]
    pub command: Option<String>,

    /// Output format
    #[arg(long = "format", default_value = "table")]
    pub format: OutputFormat,

    /// Enable JSON output (shorthand for --format=json)
    #[arg(long = "json", conflicts_with = "format")]
    pub json: bool,

    /// Enable CSV output (shorthand for --format=csv)
    #[arg(long = "csv", conflicts_with = "format")]
    pub csv: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Disable spinners/animations
    #[arg(long = "no-spinner")]
    pub no_spinner: bool,

    /// Configuration file path
    #[arg(long = "config", default_value = "~/.moneta/config.toml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// HTTP request timeout in seconds (default: 30)
    #[arg(long = "timeout", value_name = "SECONDS", default_value_t = 30)]
    pub timeout: u64,

    /// Rows per page on list screens
    #[arg(long = "page-size", value_name = "ROWS")]
    pub page_size: Option<u32>,

    // Credential management commands
    /// Show stored credentials for instance
    #[arg(long = "show-credentials")]
    pub show_credentials: bool,

    /// Delete stored credentials for instance
    #[arg(long = "delete-credentials")]
    pub delete_credentials: bool,

    /// List all stored credential instances
    #[arg(long = "list-instances")]
    pub list_instances: bool,
}
