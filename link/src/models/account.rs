use serde::{Deserialize, Serialize};

/// Managed user account (the user-management screen, not the session user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub email: String,
    /// Role name granting this account its permissions
    pub role: String,
    pub active: bool,
    #[serde(default)]
    pub last_login_at: Option<String>,
    pub created_at: String,
}

/// Create/update payload for a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDraft {
    pub username: String,
    pub email: String,
    pub role: String,
    /// Required on create; omitted on update to keep the current password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
