//! Library entry point for moneta-cli components.
//!
//! Exposes reusable modules (formatter, session, guard, config, etc.) so
//! integration tests and other crates can leverage CLI formatting and
//! behaviors without going through the binary entry point.

pub mod completer;
pub mod config;
pub mod credentials;
pub mod error;
pub mod formatter;
pub mod forms;
pub mod guard;
pub mod history;
pub mod nav;
pub mod pages;
pub mod parser;
pub mod prefs;
pub mod session;

pub use config::{default_config_path, expand_config_path, CliConfiguration};
pub use credentials::FileCredentialStore;
pub use error::{CliError, Result};
pub use formatter::{OutputFormat, OutputFormatter};
pub use prefs::default_prefs_path;
pub use session::CliSession;

/// CLI version from Cargo.toml
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");
