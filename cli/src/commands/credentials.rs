use crate::args::Cli;
use moneta_cli::{CliError, FileCredentialStore, Result};
use moneta_link::credentials::CredentialStore;

/// Handle the credential management flags that run before any session exists.
///
/// Returns `Ok(true)` when a flag was handled and the process should exit.
pub fn handle_credentials(cli: &Cli, credential_store: &mut FileCredentialStore) -> Result<bool> {
    if cli.list_instances {
        let instances = credential_store
            .list_instances()
            .map_err(|e| CliError::Configuration(format!("Failed to list instances: {}", e)))?;
        if instances.is_empty() {
            println!("No stored credentials");
        } else {
            println!("Stored credential instances:");
            for instance in instances {
                if let Ok(Some(creds)) = credential_store.get_credentials(&instance) {
                    let expired = if creds.is_expired() { " (expired)" } else { "" };
                    println!("  • {} (user: {}){}", instance, creds.username, expired);
                } else {
                    println!("  • {}", instance);
                }
            }
        }
        return Ok(true);
    }

    if cli.show_credentials {
        match credential_store
            .get_credentials(&cli.instance)
            .map_err(|e| CliError::Configuration(format!("Failed to get credentials: {}", e)))?
        {
            Some(creds) => {
                println!("Instance: {}", creds.instance);
                println!("Username: {}", creds.username);
                println!(
                    "Token: {}...",
                    &creds.access_token[..creds.access_token.len().min(20)]
                );
                if let Some(ref expires) = creds.expires_at {
                    let expired = if creds.is_expired() { " (EXPIRED)" } else { "" };
                    println!("Expires: {}{}", expires, expired);
                }
                if let Some(ref url) = creds.server_url {
                    println!("Server URL: {}", url);
                }
            }
            None => {
                println!("No credentials stored for instance '{}'", cli.instance);
            }
        }
        return Ok(true);
    }

    if cli.delete_credentials {
        credential_store
            .delete_credentials(&cli.instance)
            .map_err(|e| CliError::Configuration(format!("Failed to delete credentials: {}", e)))?;
        println!("Deleted credentials for instance '{}'", cli.instance);
        return Ok(true);
    }

    Ok(false)
}
