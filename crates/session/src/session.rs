//! Sales session lifecycle

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use voice_sales_agent::{build_sales_graph, AgentGraph};
use voice_sales_config::SessionTimingConfig;
use voice_sales_core::{ReadinessGate, SessionEvents, TerminationRequestor};
use voice_sales_persistence::FeedbackStore;
use voice_sales_rag::EmbeddingProvider;
use voice_sales_tools::{build_toolset, SalesToolset, ToolContext};
use voice_sales_transport::{
    AudioCapture, AudioDeviceProvider, RealtimeTransport, TransportFactory,
};

use crate::credential::CredentialSource;
use crate::readiness::{wait_until_ready, ReadinessOutcome};
use crate::SessionError;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Resources acquired, graph built, no network yet
    Constructing,
    /// Credential fetched / transport opening / readiness wait
    Connecting,
    /// Readiness signal resolved
    Ready,
    /// Conversation live
    Active,
    /// Teardown in progress
    Ending,
    /// Terminal; repeated stops are no-ops
    Stopped,
}

/// Session timing knobs
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub readiness_timeout: Duration,
    pub readiness_poll: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&SessionTimingConfig::default())
    }
}

impl From<&SessionTimingConfig> for SessionConfig {
    fn from(timing: &SessionTimingConfig) -> Self {
        Self {
            readiness_timeout: Duration::from_millis(timing.readiness_timeout_ms),
            readiness_poll: Duration::from_millis(timing.readiness_poll_ms),
        }
    }
}

/// External collaborators a session is built from.
///
/// Each session owns its own tool and graph instances built over these;
/// nothing is shared through process-global registries.
#[derive(Clone)]
pub struct SessionCollaborators {
    pub devices: Arc<dyn AudioDeviceProvider>,
    pub transport: Arc<dyn TransportFactory>,
    pub credentials: Arc<dyn CredentialSource>,
    pub store: Arc<dyn FeedbackStore>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub events: SessionEvents,
}

/// Resource handles and state shared between the session, its stop path,
/// and the tool-driven termination listener.
struct SessionInner {
    id: String,
    state: RwLock<SessionState>,
    transport: Arc<dyn RealtimeTransport>,
    audio: Arc<dyn AudioCapture>,
}

impl SessionInner {
    fn state(&self) -> SessionState {
        *self.state.read()
    }

    fn set_state(&self, state: SessionState) {
        *self.state.write() = state;
    }

    /// Claim the teardown. Only one caller wins; later callers (a second
    /// `stop`, a tool termination racing a stop) see `false` and do
    /// nothing.
    fn begin_ending(&self) -> bool {
        let mut state = self.state.write();
        match *state {
            SessionState::Ending | SessionState::Stopped => false,
            _ => {
                *state = SessionState::Ending;
                true
            }
        }
    }

    /// Release every resource, in order, swallowing per-step failures.
    ///
    /// The sequence always runs to completion and always lands in
    /// `Stopped`; a failed step is logged and the remaining resources are
    /// still released.
    async fn release_resources(&self) {
        if let Err(e) = self.transport.disconnect().await {
            tracing::warn!(session_id = %self.id, error = %e, "Graceful disconnect failed");
        }
        if let Err(e) = self.transport.interrupt().await {
            tracing::warn!(session_id = %self.id, error = %e, "Interrupt failed");
        }
        if let Err(e) = self.audio.stop_tracks() {
            tracing::warn!(session_id = %self.id, error = %e, "Audio track stop failed");
        }
        if let Err(e) = self.transport.close().await {
            tracing::warn!(session_id = %self.id, error = %e, "Transport close failed");
        }
        if let Err(e) = self.audio.release() {
            tracing::warn!(session_id = %self.id, error = %e, "Audio release failed");
        }

        self.set_state(SessionState::Stopped);
        tracing::info!(session_id = %self.id, "Session stopped");
    }
}

/// One call attempt.
///
/// Exclusively owns its transport and audio handles. Callbacks in
/// [`SessionEvents`] are borrowed views into caller-owned state.
pub struct SalesSession {
    inner: Arc<SessionInner>,
    gate: ReadinessGate,
    graph: AgentGraph,
    toolset: SalesToolset,
    credentials: Arc<dyn CredentialSource>,
    config: SessionConfig,
}

impl std::fmt::Debug for SalesSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesSession")
            .field("id", &self.inner.id)
            .field("state", &self.inner.state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SalesSession {
    /// Build a session: acquire audio, construct the transport, wire the
    /// termination path, then tools, then the agent graph. No network I/O
    /// happens here.
    ///
    /// Construction is ordered so the teardown routine exists before any
    /// tool does: the requestor handed to `end_call` is fully defined, not
    /// a forward reference patched in later.
    pub async fn create(
        config: SessionConfig,
        collaborators: SessionCollaborators,
    ) -> Result<Self, SessionError> {
        let audio = collaborators
            .devices
            .acquire()
            .await
            .map_err(|e| SessionError::Device(e.to_string()))?;

        let transport = collaborators.transport.create(audio.clone())?;

        let inner = Arc::new(SessionInner {
            id: uuid::Uuid::new_v4().to_string(),
            state: RwLock::new(SessionState::Constructing),
            transport,
            audio,
        });

        let (terminator, mut end_rx) = TerminationRequestor::channel();
        {
            let inner = inner.clone();
            let events = collaborators.events.clone();
            tokio::spawn(async move {
                if end_rx.recv().await.is_some() && inner.begin_ending() {
                    tracing::info!(session_id = %inner.id, "Termination requested by tool");
                    inner.release_resources().await;
                    // Only tool-driven termination notifies the host;
                    // caller-initiated stops already know.
                    events.emit_session_ended();
                }
            });
        }

        let gate = ReadinessGate::new();
        let toolset = build_toolset(ToolContext {
            gate: gate.clone(),
            events: collaborators.events.clone(),
            store: collaborators.store.clone(),
            embedder: collaborators.embedder.clone(),
            terminator,
        });
        let graph = build_sales_graph(&toolset)?;

        tracing::info!(session_id = %inner.id, "Created session");

        Ok(Self {
            inner,
            gate,
            graph,
            toolset,
            credentials: collaborators.credentials,
            config,
        })
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn state(&self) -> SessionState {
        self.inner.state()
    }

    pub fn graph(&self) -> &AgentGraph {
        &self.graph
    }

    pub fn toolset(&self) -> &SalesToolset {
        &self.toolset
    }

    /// The readiness gate tools are serialized behind. Exposed for
    /// harnesses that drive tools directly.
    pub fn gate(&self) -> &ReadinessGate {
        &self.gate
    }

    /// Fetch an ephemeral credential, open the transport with it, and
    /// block until readiness is observed (or the fail-open bound passes).
    /// Resolves the readiness gate exactly once.
    pub async fn connect(&self) -> Result<(), SessionError> {
        self.inner.set_state(SessionState::Connecting);

        let credential = self.credentials.issue().await?;
        self.inner.transport.open(credential.secret()).await?;

        let outcome = wait_until_ready(
            self.inner.transport.as_ref(),
            self.config.readiness_timeout,
            self.config.readiness_poll,
        )
        .await;

        match outcome {
            ReadinessOutcome::TimedOut => {
                tracing::warn!(
                    session_id = %self.inner.id,
                    timeout_ms = self.config.readiness_timeout.as_millis() as u64,
                    "Readiness not confirmed within bound; proceeding anyway"
                );
            }
            observed => {
                tracing::debug!(session_id = %self.inner.id, ?observed, "Readiness observed");
            }
        }

        self.gate.open();
        self.inner.set_state(SessionState::Ready);
        tracing::info!(session_id = %self.inner.id, "Session ready");

        // The conversation is live from the caller's perspective as soon
        // as connect returns.
        self.inner.set_state(SessionState::Active);
        Ok(())
    }

    /// Idempotent teardown. Runs the full resource-release sequence once;
    /// later calls are no-ops. Does not emit the session-ended event.
    pub async fn stop(&self) {
        if !self.inner.begin_ending() {
            return;
        }
        tracing::info!(session_id = %self.inner.id, "Stopping session");
        self.inner.release_resources().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_from_timing() {
        let timing = SessionTimingConfig {
            readiness_timeout_ms: 2_500,
            readiness_poll_ms: 50,
        };
        let config = SessionConfig::from(&timing);
        assert_eq!(config.readiness_timeout, Duration::from_millis(2_500));
        assert_eq!(config.readiness_poll, Duration::from_millis(50));
    }
}
