use serde::{Deserialize, Serialize};

/// Role grouping a set of permission codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Permission codes granted by this role
    #[serde(default)]
    pub permissions: Vec<String>,
    pub created_at: String,
}

/// Create/update payload for a role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}
