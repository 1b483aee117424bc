//! Error types for moneta-cli
//!
//! Provides user-friendly error messages and context for common CLI failures.

use moneta_link::LinkError;
use std::fmt;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug)]
pub enum CliError {
    /// Error from the moneta-link library
    Link(LinkError),

    /// Configuration file error
    Configuration(String),

    /// File I/O error
    File(String),

    /// Invalid command syntax
    Parse(String),

    /// A form field failed a client-side check before any request was sent
    Validation(String),

    /// User cancelled operation
    Cancelled,

    /// Readline error
    Readline(String),

    /// Format error
    Format(String),
}

impl CliError {
    /// True when the underlying failure means the session is no longer valid
    /// and the user should be sent back to the login screen.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, CliError::Link(e) if e.is_auth_error())
    }

    fn format_link_error(err: &LinkError) -> String {
        match err {
            LinkError::Network(e) => Self::clean_nested_message(&e.to_string()),
            LinkError::Authentication(msg) => msg.clone(),
            LinkError::Validation(msg) => msg.clone(),
            LinkError::Configuration(msg) => msg.clone(),
            LinkError::Serialization(e) => e.to_string(),
            LinkError::Server { status, message } => {
                format!("Server error ({}): {}", status, message)
            }
        }
    }

    fn clean_nested_message(message: &str) -> String {
        let mut cleaned = message.trim();
        let prefixes = [
            "error sending request for url",
            "Network error:",
            "network error:",
        ];

        loop {
            let mut stripped = false;
            for prefix in &prefixes {
                if let Some(rest) = cleaned.strip_prefix(prefix) {
                    cleaned = rest.trim_start_matches([':', ' ', '(']).trim_end_matches(')');
                    stripped = true;
                    break;
                }
            }

            if !stripped {
                break;
            }
        }

        cleaned.to_string()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Link(e) => write!(f, "{}", Self::format_link_error(e)),
            CliError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            CliError::File(msg) => write!(f, "File error: {}", msg),
            CliError::Parse(msg) => write!(f, "Parse error: {}", msg),
            CliError::Validation(msg) => write!(f, "Validation error: {}", msg),
            CliError::Cancelled => write!(f, "Operation cancelled"),
            CliError::Readline(msg) => write!(f, "Input error: {}", msg),
            CliError::Format(msg) => write!(f, "Format error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<LinkError> for CliError {
    fn from(err: LinkError) -> Self {
        CliError::Link(err)
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        match err {
            rustyline::error::ReadlineError::Interrupted => CliError::Cancelled,
            rustyline::error::ReadlineError::Eof => CliError::Cancelled,
            e => CliError::Readline(e.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::File(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Configuration(format!("TOML parse error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::Parse("unknown command 'opne'".into());
        assert_eq!(err.to_string(), "Parse error: unknown command 'opne'");

        let err = CliError::Cancelled;
        assert_eq!(err.to_string(), "Operation cancelled");

        let err = CliError::Validation("name is required".into());
        assert_eq!(err.to_string(), "Validation error: name is required");
    }

    #[test]
    fn test_auth_error_detection() {
        let err = CliError::Link(LinkError::Authentication("token expired".into()));
        assert!(err.is_auth_error());

        let err = CliError::Link(LinkError::Server {
            status: 500,
            message: "boom".into(),
        });
        assert!(!err.is_auth_error());

        let err = CliError::Parse("nope".into());
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_link_error_messages_are_flattened() {
        let err = CliError::Link(LinkError::Authentication("invalid code".into()));
        assert_eq!(err.to_string(), "invalid code");

        let err = CliError::Link(LinkError::Server {
            status: 503,
            message: "maintenance".into(),
        });
        assert_eq!(err.to_string(), "Server error (503): maintenance");
    }
}
