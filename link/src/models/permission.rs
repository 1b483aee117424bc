use serde::{Deserialize, Serialize};

/// Assignable permission, list-only from the client's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: u64,
    /// Stable code referenced by roles (e.g. `products.write`)
    pub code: String,
    pub description: String,
}
