//! Session, configuration, and credential meta-commands

use colored::*;
use moneta_link::credentials::CredentialStore;

use crate::error::Result;
use crate::CLI_VERSION;

use super::CliSession;

impl CliSession {
    /// Show session and connection information (`\whoami`)
    pub(super) fn show_whoami(&self) {
        println!();
        println!("{}", "═══════════════════════════════════════".cyan().bold());
        println!("{}", "    Session Information".white().bold());
        println!("{}", "═══════════════════════════════════════".cyan().bold());
        println!();

        // Connection
        println!("{}", "Connection:".yellow().bold());
        println!(
            "  Server URL:     {}",
            self.session.client().base_url().green()
        );
        match self.chat_url {
            Some(ref url) => println!("  Chat URL:       {}", url.green()),
            None => println!("  Chat URL:       {}", "(same origin)".dimmed()),
        }
        println!("  Instance:       {}", self.session.instance().green());
        println!();

        // Session
        println!("{}", "Session:".yellow().bold());
        match self.session.current_username() {
            Some(username) => {
                println!("  Signed in:      {}", "Yes".green());
                println!("  Username:       {}", username.green());
            }
            None if self.session.is_two_factor_pending() => {
                println!("  Signed in:      {}", "Waiting on a one-time code".yellow());
            }
            None => {
                println!("  Signed in:      {}", "No".red());
            }
        }
        if let Some(user) = self.session.current_user() {
            if let Some(ref email) = user.email {
                println!("  Email:          {}", email.green());
            }
            println!("  Role:           {}", user.role.green());
        }
        println!("  Screen:         {}", self.screen.label().green());

        let uptime = self.connected_at.elapsed();
        let hours = uptime.as_secs() / 3600;
        let minutes = (uptime.as_secs() % 3600) / 60;
        let seconds = uptime.as_secs() % 60;
        let uptime_str = if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        };
        println!("  Session time:   {}", uptime_str.green());
        println!(
            "  Commands run:   {}",
            self.commands_executed.to_string().green()
        );
        println!();

        // Preferences
        println!("{}", "Preferences:".yellow().bold());
        println!(
            "  Sidebar:        {}",
            if self.nav.is_collapsed() {
                "Collapsed".dimmed()
            } else {
                "Expanded".green()
            }
        );
        println!(
            "  Chat rows:      {}",
            self.prefs.chat_panel_rows.to_string().green()
        );
        println!(
            "  Output format:  {}",
            format!("{:?}", self.formatter.format()).to_lowercase().green()
        );
        println!(
            "  Prefs file:     {}",
            self.prefs_path.display().to_string().green()
        );
        println!();

        // Client
        println!("{}", "Client:".yellow().bold());
        println!("  CLI version:    {}", CLI_VERSION.green());
        println!("  Built:          {}", env!("BUILD_DATE").dimmed());
        println!("  Commit:         {}", env!("GIT_COMMIT_HASH").dimmed());
        println!();
    }

    /// Show the loaded configuration (`\config`)
    pub(super) fn show_config(&self) {
        let server = self.config.resolved_server();
        let ui = self.config.resolved_ui();

        println!();
        println!("{}", "Configuration:".yellow().bold());
        println!(
            "  Config file:    {}",
            self.config_path.display().to_string().green()
        );
        println!(
            "  File exists:    {}",
            if self.config_path.exists() {
                "Yes".green()
            } else {
                "No (using defaults)".dimmed()
            }
        );
        match server.url {
            Some(ref url) => println!("  Server URL:     {}", url.green()),
            None => println!("  Server URL:     {}", "(not set)".dimmed()),
        }
        println!("  Timeout:        {}s", server.timeout.to_string().green());
        match self.config.chat_url() {
            Some(url) => println!("  Chat URL:       {}", url.green()),
            None => println!("  Chat URL:       {}", "(not set)".dimmed()),
        }
        println!("  Format:         {}", ui.format.green());
        println!("  Page size:      {}", ui.page_size.to_string().green());
        println!(
            "  Color:          {}",
            if ui.color { "Yes".green() } else { "No".red() }
        );
        println!();
    }

    /// Show the stored credentials for this instance (`\show-credentials`)
    pub(super) fn show_credentials(&self) -> Result<()> {
        let instance = self.session.instance().to_string();
        match self.session.store().get_credentials(&instance)? {
            Some(credentials) => {
                println!("{}", format!("Credentials for '{}':", instance).cyan().bold());
                println!("  Username:   {}", credentials.username.green());
                println!("  Token:      {}", truncate_token(&credentials.access_token));
                match credentials.expires_at {
                    Some(ref expires) if credentials.is_expired() => {
                        println!("  Expires:    {}", format!("{} (expired)", expires).red());
                    }
                    Some(ref expires) => println!("  Expires:    {}", expires.green()),
                    None => println!("  Expires:    {}", "unknown (treated as expired)".dimmed()),
                }
                if let Some(ref url) = credentials.server_url {
                    println!("  Server:     {}", url.green());
                }
            }
            None => {
                println!(
                    "{}",
                    format!("No stored credentials for '{}'", instance).dimmed()
                );
            }
        }
        Ok(())
    }

    /// Delete the stored credentials for this instance
    /// (`\delete-credentials`)
    pub(super) fn delete_stored_credentials(&mut self) -> Result<()> {
        let instance = self.session.instance().to_string();
        if self.session.store().get_credentials(&instance)?.is_none() {
            println!(
                "{}",
                format!("No stored credentials for '{}'", instance).dimmed()
            );
            return Ok(());
        }
        self.session.store_mut().delete_credentials(&instance)?;
        println!(
            "{}",
            format!("✓ Deleted stored credentials for '{}'", instance).green()
        );
        Ok(())
    }
}

/// First characters of a token, enough to recognize it without leaking it
fn truncate_token(token: &str) -> String {
    const SHOWN: usize = 20;
    if token.len() <= SHOWN {
        token.to_string()
    } else {
        format!("{}...", &token[..SHOWN])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_token_keeps_short_tokens() {
        assert_eq!(truncate_token("abc"), "abc");
    }

    #[test]
    fn test_truncate_token_cuts_long_tokens() {
        let token = "a".repeat(64);
        let shown = truncate_token(&token);
        assert_eq!(shown.len(), 23);
        assert!(shown.ends_with("..."));
    }
}
