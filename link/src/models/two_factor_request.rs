use serde::{Deserialize, Serialize};

/// 2FA verification request: the pending challenge plus the user's code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoFactorRequest {
    /// Challenge token issued by the login call
    pub challenge_token: String,
    /// Time-based code, or a backup code when `use_backup_code` is set
    pub code: String,
    /// Interpret `code` as a one-time backup code
    #[serde(default)]
    pub use_backup_code: bool,
}
