//! Transport traits
//!
//! Abstract interfaces the session programs against.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::{ChannelState, TransportError};

/// Realtime bidirectional media/data channel.
///
/// Readiness can be observed three ways, and a conforming implementation
/// must support all of them: the open notifier (data channel confirmed),
/// the connected notifier (session runtime level), and `channel_state`
/// polling. The session races all three and falls back to a bounded
/// timeout.
#[async_trait]
pub trait RealtimeTransport: Send + Sync {
    /// Open the channel using a short-lived credential.
    async fn open(&self, credential: &str) -> Result<(), TransportError>;

    /// Graceful session-level disconnect.
    async fn disconnect(&self) -> Result<(), TransportError>;

    /// Forceful interrupt of any in-flight model output.
    async fn interrupt(&self) -> Result<(), TransportError>;

    /// Close the underlying channel and release transport resources.
    async fn close(&self) -> Result<(), TransportError>;

    /// Current data channel state.
    fn channel_state(&self) -> ChannelState;

    /// Resolves to `true` when the data channel is confirmed open.
    fn open_notifier(&self) -> watch::Receiver<bool>;

    /// Resolves to `true` when the session runtime reports connected.
    fn connected_notifier(&self) -> watch::Receiver<bool>;
}

/// Local audio capture owned by exactly one session.
pub trait AudioCapture: Send + Sync {
    /// Stop all capture tracks.
    fn stop_tracks(&self) -> Result<(), TransportError>;

    /// Release the playback/capture element.
    fn release(&self) -> Result<(), TransportError>;
}

impl std::fmt::Debug for dyn AudioCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn AudioCapture")
    }
}

/// Acquires the local audio device for a new session.
#[async_trait]
pub trait AudioDeviceProvider: Send + Sync {
    /// Acquire capture. Denied or missing devices surface as
    /// [`TransportError::DeviceUnavailable`].
    async fn acquire(&self) -> Result<Arc<dyn AudioCapture>, TransportError>;
}

/// Builds the transport for a session, bound to its audio capture.
pub trait TransportFactory: Send + Sync {
    fn create(
        &self,
        audio: Arc<dyn AudioCapture>,
    ) -> Result<Arc<dyn RealtimeTransport>, TransportError>;
}
