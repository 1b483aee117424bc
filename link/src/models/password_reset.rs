use serde::{Deserialize, Serialize};

/// Request body for starting a password reset (public endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    /// Account email to send the reset token to
    pub email: String,
}

/// Request body for completing a password reset with the emailed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetConfirm {
    /// Reset token from the email
    pub token: String,
    /// Replacement password
    pub new_password: String,
}
