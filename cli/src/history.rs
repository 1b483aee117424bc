//! Command history persistence.
//!
//! Keeps the readline history in `~/.moneta/history` across sessions.
//! Commands that carry secrets (one-time codes, reset tokens) are never
//! written to disk.

use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// Default cap on persisted history entries.
pub const DEFAULT_HISTORY_SIZE: usize = 1000;

/// Returns false for commands that must not land in the history file.
///
/// `2fa` lines contain a live one-time or backup code and `reset` lines
/// contain the reset token and the new password.
pub fn should_persist_command(command: &str) -> bool {
    let first = command
        .trim()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();
    !matches!(first.as_str(), "2fa" | "reset")
}

/// Command history manager
pub struct CommandHistory {
    /// History file path
    path: PathBuf,

    /// Maximum history size
    max_size: usize,
}

impl CommandHistory {
    /// Create a new history manager with the default path
    pub fn new(max_size: usize) -> Self {
        let base = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let path = base.join(".moneta").join("history");

        Self { path, max_size }
    }

    /// Create with custom path
    pub fn with_path<P: AsRef<Path>>(path: P, max_size: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_size,
        }
    }

    /// Load history from file
    pub fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| CliError::File(format!("Failed to read history file: {}", e)))?;

        let lines: Vec<String> = contents
            .lines()
            .map(|s| s.to_string())
            .rev()
            .take(self.max_size)
            .collect();

        Ok(lines.into_iter().rev().collect())
    }

    /// Save history to file
    pub fn save(&self, history: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Keep the newest max_size entries
        let entries: Vec<&String> = history.iter().rev().take(self.max_size).collect();
        let entries: Vec<&String> = entries.into_iter().rev().collect();

        let contents = entries
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        std::fs::write(&self.path, contents)
            .map_err(|e| CliError::File(format!("Failed to write history file: {}", e)))?;

        Ok(())
    }

    /// Append a command to history
    pub fn append(&self, command: &str) -> Result<()> {
        let mut history = self.load()?;

        // Don't add empty or duplicate consecutive commands
        if command.trim().is_empty() {
            return Ok(());
        }
        if history.last().map(|s| s.as_str()) == Some(command) {
            return Ok(());
        }

        history.push(command.to_string());
        self.save(&history)?;
        Ok(())
    }

    /// Number of persisted entries
    pub fn entry_count(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    /// Clear history
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Get history file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn test_history_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history");
        let history = CommandHistory::with_path(&path, 100);

        let commands = vec!["open products".to_string(), "next".to_string()];
        history.save(&commands).unwrap();

        let loaded = history.load().unwrap();
        assert_eq!(loaded, commands);
    }

    #[test]
    fn test_history_max_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history");
        let history = CommandHistory::with_path(&path, 2);

        let commands = vec![
            "open products".to_string(),
            "filter active=true".to_string(),
            "next".to_string(),
        ];
        history.save(&commands).unwrap();

        let loaded = history.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], "filter active=true");
        assert_eq!(loaded[1], "next");
    }

    #[test]
    fn test_append_skips_consecutive_duplicates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history");
        let history = CommandHistory::with_path(&path, 100);

        history.append("open products").unwrap();
        history.append("open products").unwrap();
        history.append("next").unwrap();

        let loaded = history.load().unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history");
        let history = CommandHistory::with_path(&path, 100);

        history.append("open products").unwrap();
        assert!(path.exists());

        history.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_secret_commands_are_not_persisted() {
        assert!(!should_persist_command("2fa 123456"));
        assert!(!should_persist_command("  2FA backup 9988-7766"));
        assert!(!should_persist_command("reset tok-1 hunter2"));

        assert!(should_persist_command("open products"));
        assert!(should_persist_command("login ada"));
        assert!(should_persist_command("forgot ada@example.com"));
    }
}
