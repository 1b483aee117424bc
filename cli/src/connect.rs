//! Session construction from CLI flags, stored credentials, and the config file

use std::time::Duration;

use moneta_cli::{
    default_prefs_path, expand_config_path, CliConfiguration, CliError, CliSession,
    FileCredentialStore, OutputFormat, Result,
};
use moneta_link::credentials::CredentialStore;
use moneta_link::{LoginOutcome, MonetaClient, SessionStore};

use crate::args::Cli;

/// Timeout clap fills in when --timeout is not given
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub async fn create_session(
    cli: &Cli,
    credential_store: &FileCredentialStore,
    config: &CliConfiguration,
) -> Result<CliSession> {
    // Output format priority: shorthand flags, then an explicit --format,
    // then the config file
    let format = if cli.json {
        OutputFormat::Json
    } else if cli.csv {
        OutputFormat::Csv
    } else if !matches!(cli.format, OutputFormat::Table) {
        cli.format
    } else {
        config.output_format().unwrap_or(cli.format)
    };

    let stored = credential_store
        .get_credentials(&cli.instance)
        .map_err(|e| CliError::Configuration(format!("Failed to load credentials: {}", e)))?;

    // Server URL priority: CLI flag, then the URL the stored token was issued
    // against, then the config file, then local default
    let server_url = match cli.url.clone() {
        Some(url) => url,
        None => stored
            .as_ref()
            .and_then(|creds| {
                let url = creds.get_server_url();
                if url.starts_with("http://") || url.starts_with("https://") {
                    Some(url.to_string())
                } else {
                    None
                }
            })
            .or_else(|| config.server.as_ref().and_then(|s| s.url.clone()))
            .unwrap_or_else(|| "http://localhost:8080".to_string()),
    };

    // The support chat runs on its own origin; unset means same origin as the API
    let chat_url = cli.chat_url.clone().or_else(|| config.chat_url());

    // clap fills the default value, so an untouched flag defers to config
    let timeout = if cli.timeout != DEFAULT_TIMEOUT_SECS {
        cli.timeout
    } else {
        config.resolved_server().timeout
    };

    let page_size = cli.page_size.unwrap_or(config.resolved_ui().page_size);
    let color = !cli.no_color && config.resolved_ui().color;

    let mut builder = MonetaClient::builder()
        .base_url(server_url)
        .timeout(Duration::from_secs(timeout));
    if let Some(ref url) = chat_url {
        builder = builder.chat_url(url.clone());
    }
    let client = builder.build()?;

    let mut session = SessionStore::new(client, credential_store.clone(), cli.instance.clone());

    // Auth priority: explicit token, then a password sign-in, then whatever
    // "remember me" left behind
    if let Some(ref token) = cli.token {
        let username = cli.username.clone().unwrap_or_else(|| "token".to_string());
        session.adopt_token(username, token.clone());
    } else if let Some(ref username) = cli.username {
        let password = match cli.password.clone().filter(|p| !p.is_empty()) {
            Some(password) => password,
            None => rpassword::prompt_password("Password: ")
                .map_err(|e| CliError::Readline(e.to_string()))?,
        };

        match session.login(username, &password, cli.remember).await? {
            LoginOutcome::Authenticated => {
                if cli.verbose {
                    eprintln!("Signed in as {}", username);
                }
            }
            LoginOutcome::TwoFactorRequired => {
                // The pending challenge carries into the interactive shell;
                // a batch run has no way to enter the code
                if cli.command.is_some() {
                    return Err(CliError::Validation(
                        "this account requires a one-time code; sign in interactively".to_string(),
                    ));
                }
            }
        }
    } else if session.restore()? && cli.verbose {
        eprintln!("Restored session for instance '{}'", cli.instance);
    }

    Ok(CliSession::new(
        session,
        format,
        color,
        !cli.no_spinner,
        page_size,
        chat_url,
        config.clone(),
        expand_config_path(&cli.config),
        default_prefs_path(),
    ))
}
