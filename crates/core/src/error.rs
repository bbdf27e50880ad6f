//! Error types for the voice sales agent

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the voice sales agent
///
/// Construction-time and connect-time failures propagate to the caller
/// through these variants. Tool-level failures never reach this type during
/// a conversation; they are rendered as failure text for the model runtime.
#[derive(Error, Debug)]
pub enum Error {
    /// Audio capture device denied or unavailable (fatal to session creation)
    #[error("Device error: {0}")]
    Device(String),

    /// Ephemeral credential issuance failed (fatal to connect)
    #[error("Credential error: {0}")]
    Credential(String),

    /// Malformed tool parameters (recovered locally, conversation continues)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Similarity computation undefined (recovered locally as "no matches")
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// A resource-release step failed during stop (logged and swallowed)
    #[error("Teardown error: {0}")]
    Teardown(String),

    // Transport errors
    #[error("Transport error: {0}")]
    Transport(String),

    // Persistence errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    // Tool errors
    #[error("Tool error: {0}")]
    Tool(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Credential("issuer returned 500".to_string());
        assert_eq!(err.to_string(), "Credential error: issuer returned 500");
    }

    #[test]
    fn test_error_from_str() {
        let err: Error = "something".into();
        assert!(matches!(err, Error::Other(_)));
    }
}
