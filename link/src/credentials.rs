//! Credential storage abstraction for Moneta clients.
//!
//! Provides a trait-based system for storing and retrieving session tokens
//! across different storage backends (files, environment variables, secure
//! keychains, etc.).
//!
//! This abstraction lets terminal clients and other applications persist a
//! "remember me" session in a platform-appropriate way.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Stored session credentials for a Moneta server.
///
/// Holds the bearer token issued at login so a later run can restore the
/// session without prompting for a password again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    /// Server instance identifier (e.g., "local", "production", URL)
    pub instance: String,

    /// Username the token was issued to
    pub username: String,

    /// Bearer access token
    /// Note: Stored credentials should be protected with appropriate file permissions
    pub access_token: String,

    /// Token expiry as an RFC 3339 timestamp, if the server reported one
    pub expires_at: Option<String>,

    /// Optional: Server URL if different from instance name
    pub server_url: Option<String>,
}

impl Credentials {
    /// Create new credentials
    pub fn new(instance: String, username: String, access_token: String) -> Self {
        Self {
            instance,
            username,
            access_token,
            expires_at: None,
            server_url: None,
        }
    }

    /// Set the token expiry timestamp
    pub fn with_expires_at(mut self, expires_at: String) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Set the server URL
    pub fn with_server_url(mut self, server_url: String) -> Self {
        self.server_url = Some(server_url);
        self
    }

    /// Get the server URL, defaulting to instance name if not set
    pub fn get_server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(&self.instance)
    }

    /// Whether the stored token has passed its expiry timestamp.
    ///
    /// A token with no expiry, or an expiry that fails to parse, is treated
    /// as expired so a stale entry never restores a session.
    pub fn is_expired(&self) -> bool {
        match &self.expires_at {
            Some(raw) => match chrono::DateTime::parse_from_rfc3339(raw) {
                Ok(expiry) => expiry <= chrono::Utc::now(),
                Err(_) => true,
            },
            None => true,
        }
    }
}

/// Trait for credential storage backends.
///
/// Implementations can store tokens in files, environment variables, secure
/// keychains, or any other storage mechanism.
///
/// # Security Note
///
/// Implementations MUST ensure credentials are stored securely:
/// - Files should use restrictive permissions (0600 on Unix)
/// - Tokens should never be logged
/// - Consider encryption for sensitive deployments
pub trait CredentialStore {
    /// Retrieve credentials for a specific server instance
    ///
    /// Returns `Ok(None)` if no credentials are stored for the instance.
    ///
    /// # Arguments
    /// * `instance` - Instance identifier (e.g., "local", "production")
    fn get_credentials(&self, instance: &str) -> Result<Option<Credentials>>;

    /// Store credentials for a server instance
    ///
    /// Overwrites existing credentials for the same instance.
    ///
    /// # Arguments
    /// * `credentials` - Credentials to store
    fn set_credentials(&mut self, credentials: &Credentials) -> Result<()>;

    /// Delete stored credentials for an instance
    ///
    /// Returns `Ok(())` even if no credentials were stored.
    ///
    /// # Arguments
    /// * `instance` - Instance identifier to delete
    fn delete_credentials(&mut self, instance: &str) -> Result<()>;

    /// List all stored instance identifiers
    ///
    /// Returns a vector of instance names that have stored credentials.
    fn list_instances(&self) -> Result<Vec<String>>;

    /// Check if credentials exist for an instance
    ///
    /// Default implementation calls `get_credentials()` and checks for Some.
    fn has_credentials(&self, instance: &str) -> Result<bool> {
        Ok(self.get_credentials(instance)?.is_some())
    }
}

/// In-memory credential store for testing and temporary use.
///
/// Does NOT persist credentials across restarts. Useful for:
/// - Unit tests
/// - Temporary sessions where "remember me" is off
///
/// # Example
///
/// ```rust
/// use moneta_link::credentials::{CredentialStore, Credentials, MemoryCredentialStore};
///
/// let mut store = MemoryCredentialStore::new();
/// let creds = Credentials::new(
///     "local".to_string(),
///     "amina".to_string(),
///     "tok-123".to_string(),
/// );
///
/// store.set_credentials(&creds).unwrap();
/// let retrieved = store.get_credentials("local").unwrap();
/// assert_eq!(retrieved, Some(creds));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryCredentialStore {
    credentials: std::collections::HashMap<String, Credentials>,
}

impl MemoryCredentialStore {
    /// Create a new empty in-memory credential store
    pub fn new() -> Self {
        Self {
            credentials: std::collections::HashMap::new(),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get_credentials(&self, instance: &str) -> Result<Option<Credentials>> {
        Ok(self.credentials.get(instance).cloned())
    }

    fn set_credentials(&mut self, credentials: &Credentials) -> Result<()> {
        self.credentials.insert(credentials.instance.clone(), credentials.clone());
        Ok(())
    }

    fn delete_credentials(&mut self, instance: &str) -> Result<()> {
        self.credentials.remove(instance);
        Ok(())
    }

    fn list_instances(&self) -> Result<Vec<String>> {
        Ok(self.credentials.keys().cloned().collect())
    }
}
