//! File-based credential storage for CLI
//!
//! Stores bearer tokens in TOML format with secure file permissions (0600 on Unix).
//!
//! # File Location
//!
//! - Windows: `~/.moneta/credentials.toml`
//! - Linux/macOS: `~/.config/moneta/credentials.toml`
//!
//! # Security
//!
//! - File permissions set to 0600 (owner read/write only) on Unix
//! - Only access tokens are stored, never plaintext passwords
//! - Expired tokens are ignored on restore
//!
//! # File Format
//!
//! ```toml
//! [instances.local]
//! access_token = "mnta_1b9e4c..."
//! username = "amina"
//! expires_at = "2026-12-31T23:59:59Z"
//! server_url = "http://localhost:8080"
//!
//! [instances.production]
//! access_token = "mnta_77f0a2..."
//! username = "admin"
//! expires_at = "2026-12-31T23:59:59Z"
//! server_url = "https://books.example.com"
//! ```

use moneta_link::credentials::{CredentialStore, Credentials};
use moneta_link::{LinkError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File-based credential storage
///
/// Persists bearer tokens to `~/.config/moneta/credentials.toml` with
/// secure file permissions.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    /// Path to credentials file
    file_path: PathBuf,

    /// In-memory cache of credentials
    cache: HashMap<String, StoredCredential>,
}

/// Stored credential format for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct StoredCredential {
    /// Bearer access token
    access_token: String,
    /// Username the token was issued to
    username: String,
    /// Token expiration time in RFC3339 format
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<String>,
    /// Server URL
    #[serde(skip_serializing_if = "Option::is_none")]
    server_url: Option<String>,
}

/// Top-level TOML structure
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    instances: HashMap<String, StoredCredential>,
}

impl FileCredentialStore {
    /// Default credentials file path
    /// - Windows: `~/.moneta/credentials.toml`
    /// - Linux/macOS: `~/.config/moneta/credentials.toml`
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".moneta").join("credentials.toml")
            } else {
                PathBuf::from(".moneta").join("credentials.toml")
            }
        }

        #[cfg(not(target_os = "windows"))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("moneta").join("credentials.toml")
            } else if let Some(home_dir) = dirs::home_dir() {
                home_dir
                    .join(".config")
                    .join("moneta")
                    .join("credentials.toml")
            } else {
                PathBuf::from(".moneta").join("credentials.toml")
            }
        }
    }

    /// Create a new file-based credential store at the default location
    pub fn new() -> Result<Self> {
        Self::with_path(Self::default_path())
    }

    /// Create a new file-based credential store at a custom location
    pub fn with_path(file_path: PathBuf) -> Result<Self> {
        let mut store = Self {
            file_path,
            cache: HashMap::new(),
        };
        store.load_from_disk()?;
        Ok(store)
    }

    /// Load credentials from disk into memory cache
    fn load_from_disk(&mut self) -> Result<()> {
        if !self.file_path.exists() {
            // No file yet, start with empty cache
            self.cache.clear();
            return Ok(());
        }

        let contents = fs::read_to_string(&self.file_path).map_err(|e| {
            LinkError::Configuration(format!(
                "Cannot read credentials file '{}': {}",
                self.file_path.display(),
                e
            ))
        })?;

        let file: CredentialsFile = toml::from_str(&contents).map_err(|e| {
            LinkError::Configuration(format!(
                "Corrupted credentials file '{}': {}. Delete it and sign in again.",
                self.file_path.display(),
                e.message()
            ))
        })?;

        self.cache = file.instances;
        Ok(())
    }

    /// Save credentials from memory cache to disk
    fn save_to_disk(&self) -> Result<()> {
        let file = CredentialsFile {
            instances: self.cache.clone(),
        };

        let contents = toml::to_string_pretty(&file).map_err(|e| {
            LinkError::Configuration(format!("Failed to serialize credentials: {}", e))
        })?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LinkError::Configuration(format!(
                    "Failed to create credentials directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(&self.file_path, contents).map_err(|e| {
            LinkError::Configuration(format!(
                "Failed to write credentials file at '{}': {}",
                self.file_path.display(),
                e
            ))
        })?;

        // Set file permissions to 0600 (owner read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.file_path, permissions).map_err(|e| {
                LinkError::Configuration(format!(
                    "Failed to set file permissions for '{}': {}",
                    self.file_path.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Get the file path used by this store
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get_credentials(&self, instance: &str) -> Result<Option<Credentials>> {
        if let Some(stored) = self.cache.get(instance) {
            Ok(Some(Credentials {
                instance: instance.to_string(),
                username: stored.username.clone(),
                access_token: stored.access_token.clone(),
                expires_at: stored.expires_at.clone(),
                server_url: stored.server_url.clone(),
            }))
        } else {
            Ok(None)
        }
    }

    fn set_credentials(&mut self, credentials: &Credentials) -> Result<()> {
        let stored = StoredCredential {
            access_token: credentials.access_token.clone(),
            username: credentials.username.clone(),
            expires_at: credentials.expires_at.clone(),
            server_url: credentials.server_url.clone(),
        };

        self.cache.insert(credentials.instance.clone(), stored);
        self.save_to_disk()?;
        Ok(())
    }

    fn delete_credentials(&mut self, instance: &str) -> Result<()> {
        self.cache.remove(instance);
        self.save_to_disk()?;
        Ok(())
    }

    fn list_instances(&self) -> Result<Vec<String>> {
        Ok(self.cache.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_temp_store() -> (FileCredentialStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("credentials.toml");
        let store = FileCredentialStore::with_path(file_path).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_file_store_basic_operations() {
        let (mut store, _temp_dir) = create_temp_store();

        // Initially empty
        assert_eq!(store.get_credentials("local").unwrap(), None);
        assert!(!store.has_credentials("local").unwrap());

        // Store credentials
        let creds = Credentials::new("local".into(), "amina".into(), "mnta_test".into())
            .with_expires_at("2099-12-31T23:59:59Z".to_string());
        store.set_credentials(&creds).unwrap();

        // Retrieve credentials
        let retrieved = store.get_credentials("local").unwrap();
        assert_eq!(retrieved.as_ref().unwrap().username, "amina");
        assert_eq!(retrieved.as_ref().unwrap().access_token, "mnta_test");
        assert!(store.has_credentials("local").unwrap());

        // Delete credentials
        store.delete_credentials("local").unwrap();
        assert_eq!(store.get_credentials("local").unwrap(), None);
    }

    #[test]
    fn test_file_store_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("credentials.toml");

        // Create store and add credentials
        {
            let mut store = FileCredentialStore::with_path(file_path.clone()).unwrap();
            let creds = Credentials::new("prod".into(), "bob".into(), "mnta_prod".into())
                .with_expires_at("2099-12-31T23:59:59Z".to_string());
            store.set_credentials(&creds).unwrap();
        }

        // Verify file was created
        assert!(file_path.exists());

        // Load store again and verify credentials persisted
        {
            let store = FileCredentialStore::with_path(file_path).unwrap();
            let retrieved = store.get_credentials("prod").unwrap().unwrap();
            assert_eq!(retrieved.username, "bob");
            assert_eq!(retrieved.access_token, "mnta_prod");
        }
    }

    #[test]
    fn test_file_store_multiple_instances() {
        let (mut store, _temp_dir) = create_temp_store();

        let creds1 = Credentials::new("local".into(), "amina".into(), "token1".into());
        let creds2 = Credentials::new("prod".into(), "bob".into(), "token2".into())
            .with_server_url("https://books.example.com".to_string());

        store.set_credentials(&creds1).unwrap();
        store.set_credentials(&creds2).unwrap();

        // List instances
        let instances = store.list_instances().unwrap();
        assert_eq!(instances.len(), 2);
        assert!(instances.contains(&"local".to_string()));
        assert!(instances.contains(&"prod".to_string()));

        // Retrieve specific instances
        let local = store.get_credentials("local").unwrap().unwrap();
        assert_eq!(local.username, "amina");
        assert_eq!(local.server_url, None);

        let prod = store.get_credentials("prod").unwrap().unwrap();
        assert_eq!(prod.username, "bob");
        assert_eq!(
            prod.server_url,
            Some("https://books.example.com".to_string())
        );
    }

    #[test]
    fn test_file_store_overwrite() {
        let (mut store, _temp_dir) = create_temp_store();

        let creds1 = Credentials::new("local".into(), "amina".into(), "old_token".into());
        let creds2 = Credentials::new("local".into(), "amina".into(), "new_token".into());

        store.set_credentials(&creds1).unwrap();
        store.set_credentials(&creds2).unwrap();

        let retrieved = store.get_credentials("local").unwrap().unwrap();
        assert_eq!(retrieved.access_token, "new_token");
    }

    #[test]
    #[cfg(unix)]
    fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (mut store, _temp_dir) = create_temp_store();

        let creds = Credentials::new("local".into(), "amina".into(), "test_token".into());
        store.set_credentials(&creds).unwrap();

        // Check file permissions are 0600
        let metadata = fs::metadata(store.path()).unwrap();
        let permissions = metadata.permissions();
        assert_eq!(permissions.mode() & 0o777, 0o600);
    }

    #[test]
    fn test_toml_format() {
        let (mut store, _temp_dir) = create_temp_store();

        let creds1 = Credentials::new("local".into(), "amina".into(), "token_local".into())
            .with_expires_at("2099-12-31T23:59:59Z".to_string())
            .with_server_url("http://localhost:8080".to_string());
        let creds2 = Credentials::new("prod".into(), "bob".into(), "token_prod".into());

        store.set_credentials(&creds1).unwrap();
        store.set_credentials(&creds2).unwrap();

        // Read raw file and verify TOML structure
        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("[instances.local]"));
        assert!(contents.contains("[instances.prod]"));
        assert!(contents.contains("access_token = \"token_local\""));
        assert!(contents.contains("access_token = \"token_prod\""));
        assert!(contents.contains("username = \"amina\""));
        assert!(contents.contains("server_url = \"http://localhost:8080\""));
    }

    #[test]
    fn test_corrupted_file_is_a_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("credentials.toml");
        fs::write(&file_path, "not = [valid").unwrap();

        let result = FileCredentialStore::with_path(file_path);
        assert!(matches!(result, Err(LinkError::Configuration(_))));
    }
}
