//! Session lifecycle for the voice sales agent
//!
//! Owns the realtime transport and local audio for one call attempt,
//! guarantees no tool performs an externally visible side effect before
//! the channel is provably bidirectional, and runs the termination
//! protocol when a tool or the caller ends the call.

pub mod bootstrap;
pub mod credential;
pub mod readiness;
pub mod session;

pub use bootstrap::collaborators_from_settings;
pub use credential::{CredentialSource, EphemeralCredential, HttpCredentialIssuer, StubCredentials};
pub use readiness::{wait_until_ready, ReadinessOutcome};
pub use session::{SalesSession, SessionCollaborators, SessionConfig, SessionState};

use thiserror::Error;
use voice_sales_transport::TransportError;

/// Session errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Audio acquisition denied or unavailable; fatal to session creation
    #[error("Device error: {0}")]
    Device(String),

    /// Ephemeral credential issuance failed; fatal to connect
    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Agent graph error: {0}")]
    Graph(#[from] voice_sales_agent::AgentError),
}

impl From<SessionError> for voice_sales_core::Error {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Device(msg) => voice_sales_core::Error::Device(msg),
            SessionError::Credential(msg) => voice_sales_core::Error::Credential(msg),
            SessionError::Transport(e) => voice_sales_core::Error::Transport(e.to_string()),
            SessionError::Graph(e) => voice_sales_core::Error::Other(e.to_string()),
        }
    }
}
