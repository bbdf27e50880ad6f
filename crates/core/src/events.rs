//! Caller-facing session event callbacks
//!
//! The hosting UI supplies these when creating a session. The session never
//! owns caller state; it only borrows these handlers for the lifetime of
//! the call.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::profile::PersonalData;

type PersonalDataHandler = dyn Fn(PersonalData) + Send + Sync;
type SessionEndedHandler = dyn Fn() + Send + Sync;

/// Output callbacks supplied by the session's host.
///
/// Both handlers are optional. A handler that panics is contained and
/// logged; a misbehaving host must not take the conversation down with it.
#[derive(Clone, Default)]
pub struct SessionEvents {
    on_personal_data: Option<Arc<PersonalDataHandler>>,
    on_session_ended: Option<Arc<SessionEndedHandler>>,
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the profile snapshot handler, invoked synchronously from the
    /// data-capture tool, once per tool call, never retried.
    pub fn on_personal_data(mut self, handler: impl Fn(PersonalData) + Send + Sync + 'static) -> Self {
        self.on_personal_data = Some(Arc::new(handler));
        self
    }

    /// Set the session-ended handler, invoked at most once and only for
    /// tool-driven termination.
    pub fn on_session_ended(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_ended = Some(Arc::new(handler));
        self
    }

    /// Forward a profile snapshot to the host.
    pub fn emit_personal_data(&self, data: PersonalData) {
        if let Some(handler) = &self.on_personal_data {
            let handler = handler.clone();
            if catch_unwind(AssertUnwindSafe(move || handler(data))).is_err() {
                tracing::warn!("on_personal_data callback panicked; continuing conversation");
            }
        }
    }

    /// Notify the host that the call ended.
    pub fn emit_session_ended(&self) {
        if let Some(handler) = &self.on_session_ended {
            let handler = handler.clone();
            if catch_unwind(AssertUnwindSafe(move || handler())).is_err() {
                tracing::warn!("on_session_ended callback panicked");
            }
        }
    }
}

impl std::fmt::Debug for SessionEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEvents")
            .field("on_personal_data", &self.on_personal_data.is_some())
            .field("on_session_ended", &self.on_session_ended.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample() -> PersonalData {
        PersonalData {
            name: "Marco".to_string(),
            phone: None,
            age: 41,
            budget: 24_000.0,
            capacity: 4,
            car_type: "Sedan".to_string(),
        }
    }

    #[test]
    fn test_emit_personal_data() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let events = SessionEvents::new().on_personal_data(move |data| {
            assert_eq!(data.name, "Marco");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        events.emit_personal_data(sample());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_callback_is_contained() {
        let events = SessionEvents::new().on_personal_data(|_| panic!("host bug"));
        // Must not unwind into the caller.
        events.emit_personal_data(sample());
    }

    #[test]
    fn test_missing_handlers_are_noops() {
        let events = SessionEvents::new();
        events.emit_personal_data(sample());
        events.emit_session_ended();
    }
}
