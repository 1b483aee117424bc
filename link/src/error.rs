//! Error types for the moneta-link client library.

use reqwest::StatusCode;

/// Result type used throughout moneta-link.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors surfaced by the client library.
///
/// The taxonomy mirrors how screens treat failures: authentication problems
/// send the user back to the login flow, validation problems render next to
/// the offending form, everything else degrades to an inline message.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Credentials or a 2FA code were rejected by the server.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A request payload failed validation (client- or server-side).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request could not be completed at the transport level.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status outside the auth/validation
    /// cases, carrying whatever message the backend provided.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The client was constructed or used with invalid settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LinkError {
    /// Classify a non-2xx response into the error taxonomy.
    ///
    /// 401/403 become [`LinkError::Authentication`], 422 becomes
    /// [`LinkError::Validation`], anything else is a plain server error with
    /// the status attached.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LinkError::Authentication(message),
            StatusCode::UNPROCESSABLE_ENTITY => LinkError::Validation(message),
            _ => LinkError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// True when the failure means the session is no longer valid and the
    /// caller should return to the login flow.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, LinkError::Authentication(_))
    }

    /// HTTP status carried by the error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            LinkError::Server { status, .. } => Some(*status),
            LinkError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
