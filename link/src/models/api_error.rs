use serde::{Deserialize, Serialize};

/// Error body returned by the backend on failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable error code
    #[serde(default)]
    pub code: Option<String>,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
