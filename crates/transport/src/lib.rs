//! Realtime transport capability seam
//!
//! The media/data channel itself (WebRTC or otherwise) is an external
//! collaborator. This crate defines the capabilities a transport
//! implementation must satisfy so the session can gate tools on channel
//! readiness and tear resources down without runtime probing: what the
//! transport can do is a compile-time fact of the trait, not a question
//! asked of an unknown-shaped object.

pub mod stub;
pub mod traits;

pub use stub::{StubCapture, StubDeviceProvider, StubTransport, StubTransportFactory};
pub use traits::{AudioCapture, AudioDeviceProvider, RealtimeTransport, TransportFactory};

use thiserror::Error;

/// Transport errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Channel closed")]
    Closed,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Data channel state as observed by polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Not yet opened
    New,
    /// Open requested, not yet confirmed bidirectional
    Connecting,
    /// Confirmed open in both directions
    Open,
    /// Closed (locally or by the peer)
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_state_equality() {
        assert_eq!(ChannelState::Open, ChannelState::Open);
        assert_ne!(ChannelState::Open, ChannelState::Connecting);
    }
}
