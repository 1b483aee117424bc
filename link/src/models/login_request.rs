use serde::{Deserialize, Serialize};

/// Login request body for credential submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username for authentication
    pub username: String,
    /// Password for authentication
    pub password: String,
    /// Whether the issued token should be persisted client-side
    #[serde(default)]
    pub remember_me: bool,
}
