//! Tool-driven call termination
//!
//! The `end_call` tool needs a way to request full session teardown, but
//! tools must be handed a fully defined handle rather than a forward
//! reference that gets patched in later. The requestor is therefore built
//! in two phases: the session constructs the channel after its resource
//! handles exist, then passes the sender side into tool construction.

use tokio::sync::mpsc;

/// Handle a tool invokes to request session teardown.
///
/// The session owns the receiving side and runs its resource-release
/// sequence (plus the external "session ended" notification) when the
/// first request arrives.
#[derive(Debug, Clone)]
pub struct TerminationRequestor {
    tx: mpsc::Sender<()>,
}

impl TerminationRequestor {
    /// Create a requestor and the receiver the session listens on.
    pub fn channel() -> (Self, mpsc::Receiver<()>) {
        // Capacity 1: termination is a one-shot request; duplicates from
        // concurrent end_call invocations are dropped.
        let (tx, rx) = mpsc::channel(1);
        (Self { tx }, rx)
    }

    /// Request teardown. Returns `true` if the request was delivered,
    /// `false` if one is already pending or the session is gone.
    pub fn request_end(&self) -> bool {
        self.tx.try_send(()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_delivers_once() {
        let (requestor, mut rx) = TerminationRequestor::channel();
        assert!(requestor.request_end());
        // Second request while the first is still pending is dropped.
        assert!(!requestor.request_end());

        rx.recv().await.unwrap();
    }

    #[tokio::test]
    async fn test_request_after_session_gone() {
        let (requestor, rx) = TerminationRequestor::channel();
        drop(rx);
        assert!(!requestor.request_end());
    }
}
