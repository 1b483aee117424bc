//! Configuration file management
//!
//! # Configuration Format
//!
//! ```toml
//! [server]
//! url = "http://localhost:8080"  # Moneta server URL
//! timeout = 30                   # Request timeout in seconds
//!
//! [chat]
//! url = "http://localhost:8081"  # Support chat URL (falls back to server URL)
//!
//! [ui]
//! format = "table"               # table, json, csv
//! color = true
//! page_size = 10                 # Rows per page on list screens
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use moneta_link::DEFAULT_PAGE_SIZE;

use crate::error::{CliError, Result};
use crate::formatter::OutputFormat;

/// CLI configuration loaded from TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfiguration {
    /// Server connection settings
    pub server: Option<ServerConfig>,

    /// Support chat settings
    pub chat: Option<ChatConfig>,

    /// UI preferences
    pub ui: Option<UiConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server URL (e.g., http://localhost:8080)
    pub url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Support chat URL; unset means the chat rides on the server URL
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Output format: table, json, csv
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,

    /// Rows per page on list screens
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_timeout() -> u64 {
    30
}

fn default_format() -> String {
    "table".to_string()
}

fn default_color() -> bool {
    true
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for CliConfiguration {
    fn default() -> Self {
        Self {
            server: Some(ServerConfig {
                url: Some("http://localhost:8080".to_string()),
                timeout: default_timeout(),
            }),
            chat: None,
            ui: Some(UiConfig {
                format: default_format(),
                color: default_color(),
                page_size: default_page_size(),
            }),
        }
    }
}

pub fn expand_config_path(path: &Path) -> PathBuf {
    let path_str = path.to_str().unwrap_or("~/.moneta/config.toml");
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    }
    path.to_path_buf()
}

pub fn default_config_path() -> PathBuf {
    expand_config_path(Path::new("~/.moneta/config.toml"))
}

impl CliConfiguration {
    /// Load configuration from file
    ///
    /// Returns default configuration if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_config_path(path);
        let path = &expanded_path;

        if !path.exists() {
            // Return default configuration if file doesn't exist
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| CliError::Configuration(format!("Failed to read config file: {}", e)))?;

        let config: CliConfiguration = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let expanded_path = expand_config_path(path);
        let path = &expanded_path;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn resolved_server(&self) -> ServerConfig {
        self.server.clone().unwrap_or(ServerConfig {
            url: None,
            timeout: default_timeout(),
        })
    }

    pub fn resolved_ui(&self) -> UiConfig {
        self.ui.clone().unwrap_or(UiConfig {
            format: default_format(),
            color: default_color(),
            page_size: default_page_size(),
        })
    }

    /// Chat URL from config, when one is set
    pub fn chat_url(&self) -> Option<String> {
        self.chat.as_ref().and_then(|c| c.url.clone())
    }

    /// Output format from config, when it parses
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.ui
            .as_ref()
            .and_then(|ui| parse_output_format(&ui.format))
    }
}

fn parse_output_format(value: &str) -> Option<OutputFormat> {
    match value.trim().to_lowercase().as_str() {
        "table" => Some(OutputFormat::Table),
        "json" => Some(OutputFormat::Json),
        "csv" => Some(OutputFormat::Csv),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfiguration::default();
        assert!(config.server.is_some());
        assert_eq!(
            config.server.as_ref().unwrap().url,
            Some("http://localhost:8080".to_string())
        );
        assert_eq!(config.server.as_ref().unwrap().timeout, 30);
        // Chat rides on the server URL unless configured
        assert!(config.chat.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = CliConfiguration::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("[server]"));
        assert!(toml.contains("url"));
        assert!(toml.contains("[ui]"));
        assert!(toml.contains("page_size"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: CliConfiguration = toml::from_str(
            r#"
            [server]
            url = "https://books.example.com"

            [ui]
            format = "json"
            "#,
        )
        .unwrap();

        let server = config.resolved_server();
        assert_eq!(server.url.as_deref(), Some("https://books.example.com"));
        assert_eq!(server.timeout, 30);

        let ui = config.resolved_ui();
        assert_eq!(ui.format, "json");
        assert!(ui.color);
        assert_eq!(ui.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(parse_output_format("table"), Some(OutputFormat::Table));
        assert_eq!(parse_output_format("JSON"), Some(OutputFormat::Json));
        assert_eq!(parse_output_format(" csv "), Some(OutputFormat::Csv));
        assert_eq!(parse_output_format("yaml"), None);
    }

    #[test]
    fn test_chat_url_resolution() {
        let mut config = CliConfiguration::default();
        assert_eq!(config.chat_url(), None);

        config.chat = Some(ChatConfig {
            url: Some("http://localhost:8081".to_string()),
        });
        assert_eq!(config.chat_url().as_deref(), Some("http://localhost:8081"));
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        let config = CliConfiguration::load(&path).unwrap();
        assert_eq!(
            config.resolved_server().url.as_deref(),
            Some("http://localhost:8080")
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = CliConfiguration::default();
        config.ui.as_mut().unwrap().page_size = 25;
        config.save(&path).unwrap();

        let reloaded = CliConfiguration::load(&path).unwrap();
        assert_eq!(reloaded.resolved_ui().page_size, 25);
    }
}
