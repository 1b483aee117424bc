use serde::{Deserialize, Serialize};

/// User identity carried in the session after a completed login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User ID
    pub id: u64,
    /// Username
    pub username: String,
    /// User email (optional)
    #[serde(default)]
    pub email: Option<String>,
    /// Role name (admin, manager, clerk, ...)
    pub role: String,
}
