//! Moneta CLI - Terminal client for the Moneta accounting and inventory server
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! moneta --url http://localhost:8080
//!
//! # Sign in up front and remember the session
//! moneta --username amira --remember
//!
//! # Execute commands and exit
//! moneta -c "open products; list"
//!
//! # JSON output
//! moneta --json -c "open invoices; filter status=open; list"
//! ```

use clap::Parser;

use moneta_cli::{CliConfiguration, FileCredentialStore, Result};

mod args;
mod commands;
mod connect;

use args::Cli;
use commands::credentials::handle_credentials;
use connect::create_session;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging; --verbose surfaces the debug trail
    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    // Load credential store
    let mut credential_store = FileCredentialStore::new()?;

    // Handle credential management flags
    if handle_credentials(&cli, &mut credential_store)? {
        return Ok(());
    }

    // Load configuration
    let config = CliConfiguration::load(&cli.config)?;

    let mut session = create_session(&cli, &credential_store, &config).await?;

    // Execute based on mode
    match cli.command {
        // Execute a command string and exit
        Some(ref command) => session.execute_batch(command).await?,

        // Interactive mode
        None => session.run_interactive().await?,
    }

    Ok(())
}
