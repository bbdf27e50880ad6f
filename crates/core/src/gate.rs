//! Readiness gate
//!
//! A one-shot broadcast signal that every tool execution awaits before
//! producing an externally visible effect. The session resolves the gate
//! once its data channel is confirmed bidirectional; resolving unblocks all
//! current waiters, and late subscribers pass through immediately.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared one-shot readiness signal.
///
/// Cloning is cheap; all clones observe the same gate. The underlying
/// channel is never closed while any clone is alive, so waiters cannot
/// observe a spurious release.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    tx: Arc<watch::Sender<bool>>,
}

impl ReadinessGate {
    /// Create a gate in the unresolved state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Resolve the gate, releasing all waiters.
    ///
    /// Returns `true` on the call that performed the transition; repeated
    /// calls are no-ops returning `false`.
    pub fn open(&self) -> bool {
        self.tx.send_if_modified(|open| {
            if *open {
                false
            } else {
                *open = true;
                true
            }
        })
    }

    /// Has the gate been resolved?
    pub fn is_open(&self) -> bool {
        *self.tx.borrow()
    }

    /// Obtain a waiter handle for this gate.
    pub fn subscribe(&self) -> ReadinessSignal {
        ReadinessSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}

/// A waiter on a [`ReadinessGate`].
#[derive(Debug)]
pub struct ReadinessSignal {
    rx: watch::Receiver<bool>,
}

impl ReadinessSignal {
    /// Wait until the gate resolves. Returns immediately if it already has.
    pub async fn wait(&mut self) {
        // The sender lives inside every gate clone, so this only errors if
        // the whole session (tools included) is already gone.
        let _ = self.rx.wait_for(|open| *open).await;
    }

    /// Non-blocking check.
    pub fn is_open(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_open_releases_waiters() {
        let gate = ReadinessGate::new();
        let mut signal = gate.subscribe();

        let waiter = tokio::spawn(async move {
            signal.wait().await;
        });

        // The waiter must still be pending before the gate resolves.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        assert!(gate.open());
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_late_subscriber_passes_immediately() {
        let gate = ReadinessGate::new();
        gate.open();

        let mut signal = gate.subscribe();
        // Must not hang.
        tokio::time::timeout(Duration::from_millis(100), signal.wait())
            .await
            .expect("late subscriber should pass through");
    }

    #[tokio::test]
    async fn test_open_is_one_shot() {
        let gate = ReadinessGate::new();
        assert!(gate.open());
        assert!(!gate.open());
        assert!(gate.is_open());
    }

    #[tokio::test]
    async fn test_broadcast_to_many_waiters() {
        let gate = ReadinessGate::new();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let mut signal = gate.subscribe();
            handles.push(tokio::spawn(async move { signal.wait().await }));
        }

        gate.open();
        for handle in handles {
            handle.await.unwrap();
        }
    }
}
