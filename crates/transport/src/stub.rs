//! Stub transport implementations
//!
//! In-process doubles for tests and local development. The stub transport
//! records every lifecycle call so tests can assert on the teardown
//! sequence, and exposes manual switches for the readiness signals.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use crate::traits::{AudioCapture, AudioDeviceProvider, RealtimeTransport, TransportFactory};
use crate::{ChannelState, TransportError};

/// Configurable in-process transport double.
pub struct StubTransport {
    state: RwLock<ChannelState>,
    open_tx: watch::Sender<bool>,
    connected_tx: watch::Sender<bool>,
    calls: Mutex<Vec<&'static str>>,
    open_on_connect: bool,
    fail_disconnect: bool,
    fail_interrupt: bool,
    fail_close: bool,
}

impl StubTransport {
    pub fn new() -> Self {
        let (open_tx, _) = watch::channel(false);
        let (connected_tx, _) = watch::channel(false);
        Self {
            state: RwLock::new(ChannelState::New),
            open_tx,
            connected_tx,
            calls: Mutex::new(Vec::new()),
            open_on_connect: false,
            fail_disconnect: false,
            fail_interrupt: false,
            fail_close: false,
        }
    }

    /// Announce the channel open as soon as `open` is called.
    pub fn open_on_connect(mut self) -> Self {
        self.open_on_connect = true;
        self
    }

    /// Make every teardown-sequence step fail.
    pub fn failing_teardown(mut self) -> Self {
        self.fail_disconnect = true;
        self.fail_interrupt = true;
        self.fail_close = true;
        self
    }

    /// Mark the data channel open and fire the open notifier.
    pub fn mark_channel_open(&self) {
        *self.state.write() = ChannelState::Open;
        // send_replace: the flag must flip even if nobody subscribed yet.
        self.open_tx.send_replace(true);
    }

    /// Fire the runtime-level connected notifier.
    pub fn mark_connected(&self) {
        self.connected_tx.send_replace(true);
    }

    /// Set the polled channel state without firing any notifier.
    pub fn set_channel_state(&self, state: ChannelState) {
        *self.state.write() = state;
    }

    /// Lifecycle calls observed so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().push(call);
    }
}

impl Default for StubTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimeTransport for StubTransport {
    async fn open(&self, _credential: &str) -> Result<(), TransportError> {
        self.record("open");
        *self.state.write() = ChannelState::Connecting;
        if self.open_on_connect {
            self.mark_channel_open();
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        self.record("disconnect");
        if self.fail_disconnect {
            return Err(TransportError::Internal("stub disconnect failure".into()));
        }
        Ok(())
    }

    async fn interrupt(&self) -> Result<(), TransportError> {
        self.record("interrupt");
        if self.fail_interrupt {
            return Err(TransportError::Internal("stub interrupt failure".into()));
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.record("close");
        if self.fail_close {
            return Err(TransportError::Internal("stub close failure".into()));
        }
        *self.state.write() = ChannelState::Closed;
        Ok(())
    }

    fn channel_state(&self) -> ChannelState {
        *self.state.read()
    }

    fn open_notifier(&self) -> watch::Receiver<bool> {
        self.open_tx.subscribe()
    }

    fn connected_notifier(&self) -> watch::Receiver<bool> {
        self.connected_tx.subscribe()
    }
}

/// Audio capture double recording its release calls.
pub struct StubCapture {
    calls: Mutex<Vec<&'static str>>,
    fail_stop: bool,
}

impl StubCapture {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_stop: false,
        }
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }
}

impl Default for StubCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioCapture for StubCapture {
    fn stop_tracks(&self) -> Result<(), TransportError> {
        self.calls.lock().push("stop_tracks");
        if self.fail_stop {
            return Err(TransportError::Internal("stub track stop failure".into()));
        }
        Ok(())
    }

    fn release(&self) -> Result<(), TransportError> {
        self.calls.lock().push("release");
        Ok(())
    }
}

/// Device provider double; can simulate a denied microphone.
pub struct StubDeviceProvider {
    capture: Arc<StubCapture>,
    deny: bool,
}

impl StubDeviceProvider {
    pub fn new(capture: Arc<StubCapture>) -> Self {
        Self {
            capture,
            deny: false,
        }
    }

    pub fn denied() -> Self {
        Self {
            capture: Arc::new(StubCapture::new()),
            deny: true,
        }
    }
}

#[async_trait]
impl AudioDeviceProvider for StubDeviceProvider {
    async fn acquire(&self) -> Result<Arc<dyn AudioCapture>, TransportError> {
        if self.deny {
            return Err(TransportError::DeviceUnavailable(
                "microphone permission denied".to_string(),
            ));
        }
        Ok(self.capture.clone())
    }
}

/// Factory handing out one prebuilt stub transport, so tests keep a handle
/// to drive its readiness signals.
pub struct StubTransportFactory {
    transport: Arc<StubTransport>,
}

impl StubTransportFactory {
    pub fn new(transport: Arc<StubTransport>) -> Self {
        Self { transport }
    }
}

impl TransportFactory for StubTransportFactory {
    fn create(
        &self,
        _audio: Arc<dyn AudioCapture>,
    ) -> Result<Arc<dyn RealtimeTransport>, TransportError> {
        Ok(self.transport.clone())
    }
}
