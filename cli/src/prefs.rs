//! Durable UI preferences
//!
//! Small TOML file next to the configuration holding the pieces of UI state
//! that survive restarts: the navigation sidebar (collapsed flag and item
//! order) and the chat panel height. Unlike credentials these are not
//! sensitive, so no special permissions are applied.
//!
//! # File Format
//!
//! ```toml
//! sidebar_collapsed = false
//! chat_panel_rows = 8
//! menu_order = ["home", "invoices", "products"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::expand_config_path;
use crate::error::{CliError, Result};

/// Default chat panel height in rows
pub const DEFAULT_CHAT_PANEL_ROWS: u16 = 8;

/// UI state persisted across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPrefs {
    /// Whether the navigation sidebar is collapsed
    #[serde(default)]
    pub sidebar_collapsed: bool,

    /// Chat panel height in rows
    #[serde(default = "default_chat_panel_rows")]
    pub chat_panel_rows: u16,

    /// Navigation item order, by screen name; empty means the default order
    #[serde(default)]
    pub menu_order: Vec<String>,
}

fn default_chat_panel_rows() -> u16 {
    DEFAULT_CHAT_PANEL_ROWS
}

impl Default for UiPrefs {
    fn default() -> Self {
        Self {
            sidebar_collapsed: false,
            chat_panel_rows: default_chat_panel_rows(),
            menu_order: Vec::new(),
        }
    }
}

pub fn default_prefs_path() -> PathBuf {
    expand_config_path(Path::new("~/.moneta/prefs.toml"))
}

impl UiPrefs {
    /// Load preferences from file
    ///
    /// Returns defaults if the file doesn't exist. A malformed file is also
    /// treated as defaults so a stray edit never locks the UI out.
    pub fn load(path: &Path) -> Self {
        let expanded_path = expand_config_path(path);

        match std::fs::read_to_string(&expanded_path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                log::warn!(
                    "[PREFS] Ignoring malformed preferences file '{}': {}",
                    expanded_path.display(),
                    e.message()
                );
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save preferences to file
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
}
