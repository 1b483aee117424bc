use serde::{Deserialize, Serialize};

use super::user_info::UserInfo;

/// Login (and 2FA verification) response from the server.
///
/// Two shapes share this type. When the account has no second factor the
/// server answers with `access_token`, `expires_at`, and `user` populated.
/// When a second factor is required it answers with `two_factor_required:
/// true` plus a short-lived `challenge_token`, and withholds the access
/// token until the challenge is answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Set when the account still has a pending second-factor challenge.
    #[serde(default)]
    pub two_factor_required: bool,
    /// Opaque challenge to echo back on the 2FA verify call.
    #[serde(default)]
    pub challenge_token: Option<String>,
    /// Bearer token for subsequent API calls; absent while 2FA is pending.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Token expiration time in RFC3339 format.
    #[serde(default)]
    pub expires_at: Option<String>,
    /// Authenticated user information; absent while 2FA is pending.
    #[serde(default)]
    pub user: Option<UserInfo>,
}
