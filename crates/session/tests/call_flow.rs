//! End-to-end call flow against stub collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use voice_sales_core::SessionEvents;
use voice_sales_persistence::MemoryFeedbackStore;
use voice_sales_rag::HashEmbedder;
use voice_sales_session::{
    SalesSession, SessionCollaborators, SessionConfig, SessionError, SessionState, StubCredentials,
};
use voice_sales_transport::{StubCapture, StubDeviceProvider, StubTransport, StubTransportFactory};

const DIM: usize = 16;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct World {
    transport: Arc<StubTransport>,
    capture: Arc<StubCapture>,
    store: Arc<MemoryFeedbackStore>,
    profile_calls: Arc<AtomicUsize>,
    ended_calls: Arc<AtomicUsize>,
}

impl World {
    fn new(transport: StubTransport) -> Self {
        init_tracing();
        Self {
            transport: Arc::new(transport),
            capture: Arc::new(StubCapture::new()),
            store: Arc::new(MemoryFeedbackStore::new(DIM)),
            profile_calls: Arc::new(AtomicUsize::new(0)),
            ended_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn collaborators(&self, credentials: StubCredentials) -> SessionCollaborators {
        let profile = self.profile_calls.clone();
        let ended = self.ended_calls.clone();
        SessionCollaborators {
            devices: Arc::new(StubDeviceProvider::new(self.capture.clone())),
            transport: Arc::new(StubTransportFactory::new(self.transport.clone())),
            credentials: Arc::new(credentials),
            store: self.store.clone(),
            embedder: Arc::new(HashEmbedder::new(DIM)),
            events: SessionEvents::new()
                .on_personal_data(move |_| {
                    profile.fetch_add(1, Ordering::SeqCst);
                })
                .on_session_ended(move || {
                    ended.fetch_add(1, Ordering::SeqCst);
                }),
        }
    }

    async fn wait_for_ended(&self) {
        for _ in 0..100 {
            if self.ended_calls.load(Ordering::SeqCst) > 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("session-ended notification never arrived");
    }
}

fn config() -> SessionConfig {
    SessionConfig {
        readiness_timeout: Duration::from_secs(2),
        readiness_poll: Duration::from_millis(10),
    }
}

fn personal_data() -> serde_json::Value {
    json!({
        "name": "Laura",
        "age": 34,
        "budget": 30000.0,
        "capacity": 5,
        "car_type": "SUV",
    })
}

#[tokio::test]
async fn tool_side_effects_wait_for_connect() {
    let world = World::new(StubTransport::new().open_on_connect());
    let session = SalesSession::create(config(), world.collaborators(StubCredentials::ok("ek_test")))
        .await
        .unwrap();
    assert_eq!(session.state(), SessionState::Constructing);

    // The runtime may invoke a tool before the channel exists.
    let tool = session.toolset().set_personal_data.clone();
    let pending = tokio::spawn(async move { tool.execute(personal_data()).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(world.profile_calls.load(Ordering::SeqCst), 0);
    assert!(!pending.is_finished());

    session.connect().await.unwrap();
    assert_eq!(session.state(), SessionState::Active);

    let output = pending.await.unwrap().unwrap();
    assert!(output.text.contains("Laura"));
    assert_eq!(world.profile_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn full_call_flow_ends_via_tool() {
    let world = World::new(StubTransport::new().open_on_connect());
    let session = SalesSession::create(config(), world.collaborators(StubCredentials::ok("ek_test")))
        .await
        .unwrap();
    session.connect().await.unwrap();

    let toolset = session.toolset().clone();
    toolset
        .save_feedback
        .execute(json!({
            "name": "Laura",
            "age": 34,
            "budget": 30000.0,
            "capacity": 5,
            "car_type": "SUV",
            "feedback": "loved the trunk space",
            "rating": 5,
        }))
        .await
        .unwrap();
    assert_eq!(world.store.len(), 1);

    let matches = toolset
        .find_similar
        .execute(json!({"query": "family focused buyer"}))
        .await
        .unwrap();
    assert!(matches.text.contains("Laura"));

    let goodbye = toolset.end_call.execute(json!({})).await.unwrap();
    assert!(!goodbye.is_error);

    world.wait_for_ended().await;
    assert_eq!(world.ended_calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.state(), SessionState::Stopped);

    // Teardown ran the full release sequence in order.
    assert_eq!(
        world.transport.calls(),
        ["open", "disconnect", "interrupt", "close"]
    );
    assert_eq!(world.capture.calls(), ["stop_tracks", "release"]);

    // A later caller-initiated stop is a no-op and does not re-notify.
    session.stop().await;
    assert_eq!(world.ended_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        world.transport.calls(),
        ["open", "disconnect", "interrupt", "close"]
    );
}

#[tokio::test]
async fn invalid_tool_input_keeps_session_active() {
    let world = World::new(StubTransport::new().open_on_connect());
    let session = SalesSession::create(config(), world.collaborators(StubCredentials::ok("ek_test")))
        .await
        .unwrap();
    session.connect().await.unwrap();

    let mut input = personal_data();
    input["budget"] = json!(-100.0);

    let registry = session.toolset().registry();
    let output = registry.dispatch("set_personal_data", input).await;
    assert!(output.is_error);

    // The failure is contained as tool failure text; the call goes on.
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(world.profile_calls.load(Ordering::SeqCst), 0);

    let retry = registry.dispatch("set_personal_data", personal_data()).await;
    assert!(!retry.is_error);
    assert_eq!(world.profile_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn denied_device_fails_creation() {
    let world = World::new(StubTransport::new());
    let mut collaborators = world.collaborators(StubCredentials::ok("ek_test"));
    collaborators.devices = Arc::new(StubDeviceProvider::denied());

    let err = SalesSession::create(config(), collaborators).await.unwrap_err();
    assert!(matches!(err, SessionError::Device(_)));
}

#[tokio::test]
async fn credential_failure_never_reaches_ready() {
    let world = World::new(StubTransport::new().open_on_connect());
    let session = SalesSession::create(
        config(),
        world.collaborators(StubCredentials::failing("issuer returned 500 Internal Server Error")),
    )
    .await
    .unwrap();

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, SessionError::Credential(_)));
    assert_eq!(session.state(), SessionState::Connecting);
    assert!(!session.gate().is_open());
    // The transport was never opened.
    assert!(world.transport.calls().is_empty());
}

#[tokio::test]
async fn stop_is_idempotent() {
    let world = World::new(StubTransport::new().open_on_connect());
    let session = SalesSession::create(config(), world.collaborators(StubCredentials::ok("ek_test")))
        .await
        .unwrap();
    session.connect().await.unwrap();

    session.stop().await;
    assert_eq!(session.state(), SessionState::Stopped);
    let calls_after_first = world.transport.calls();

    session.stop().await;
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(world.transport.calls(), calls_after_first);
    // Caller-initiated stop never notifies the host.
    assert_eq!(world.ended_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn teardown_failures_are_swallowed() {
    let world = World::new(StubTransport::new().open_on_connect().failing_teardown());
    let session = SalesSession::create(config(), world.collaborators(StubCredentials::ok("ek_test")))
        .await
        .unwrap();
    session.connect().await.unwrap();

    // Every step fails; the sequence still runs to completion and the
    // session still lands in Stopped.
    session.stop().await;
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(
        world.transport.calls(),
        ["open", "disconnect", "interrupt", "close"]
    );
    assert_eq!(world.capture.calls(), ["stop_tracks", "release"]);
}

#[tokio::test]
async fn end_call_after_stop_does_not_notify() {
    let world = World::new(StubTransport::new().open_on_connect());
    let session = SalesSession::create(config(), world.collaborators(StubCredentials::ok("ek_test")))
        .await
        .unwrap();
    session.connect().await.unwrap();
    session.stop().await;

    let toolset = session.toolset().clone();
    toolset.end_call.execute(json!({})).await.unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(world.ended_calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.state(), SessionState::Stopped);
}

#[tokio::test]
async fn readiness_times_out_fail_open() {
    // Transport never announces anything; connect must still return and
    // release the gate after the bound.
    let world = World::new(StubTransport::new());
    let session = SalesSession::create(
        SessionConfig {
            readiness_timeout: Duration::from_millis(100),
            readiness_poll: Duration::from_millis(10),
        },
        world.collaborators(StubCredentials::ok("ek_test")),
    )
    .await
    .unwrap();

    session.connect().await.unwrap();
    assert!(session.gate().is_open());
    assert_eq!(session.state(), SessionState::Active);
}
