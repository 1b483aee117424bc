//! Authentication provider for the Moneta API client.
//!
//! Attaches the bearer token to outgoing requests when one is present; when
//! the session is anonymous the header is simply omitted.

use crate::error::Result;

/// Authentication state applied to every API request.
///
/// # Examples
///
/// ```rust
/// use moneta_link::AuthProvider;
///
/// // Bearer token from a completed login
/// let auth = AuthProvider::bearer("eyJhbGc...".to_string());
///
/// // Anonymous (login, password reset, public endpoints)
/// let auth = AuthProvider::none();
/// ```
#[derive(Debug, Clone, Default)]
pub enum AuthProvider {
    /// `Authorization: Bearer <token>`
    Bearer(String),

    /// No Authorization header.
    #[default]
    None,
}

impl AuthProvider {
    /// Bearer-token authentication from an access token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Anonymous access.
    pub fn none() -> Self {
        Self::None
    }

    /// Attach the Authorization header to a request builder.
    pub fn apply_to_request(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder> {
        match self {
            Self::Bearer(token) => Ok(request.bearer_auth(token)),
            Self::None => Ok(request),
        }
    }

    /// Whether a token is currently configured.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Bearer(_))
    }

    /// The configured token, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Bearer(token) => Some(token),
            Self::None => None,
        }
    }
}
