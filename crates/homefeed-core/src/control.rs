//! Teardown signalling for in-flight fetches.
//!
//! A controller owns one `AbortToken` and hands clones to every retry run it
//! starts. Disposing the controller trips the token; the retry loop observes it
//! while awaiting the remote call or sleeping between attempts and stops
//! without scheduling another attempt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Default)]
struct AbortInner {
    aborted: AtomicBool,
    notify: Notify,
}

/// Shared, clonable abort flag with an awaitable trip signal.
#[derive(Clone, Default)]
pub struct AbortToken {
    inner: Arc<AbortInner>,
}

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the token. Idempotent; wakes every task waiting in [`aborted`](Self::aborted).
    pub fn abort(&self) {
        self.inner.aborted.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.load(Ordering::Acquire)
    }

    /// Resolves once the token has been tripped.
    pub async fn aborted(&self) {
        loop {
            // Register before checking the flag so a concurrent `abort` is not missed.
            let notified = self.inner.notify.notified();
            if self.is_aborted() {
                return;
            }
            notified.await;
        }
    }
}

impl std::fmt::Debug for AbortToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbortToken")
            .field("aborted", &self.is_aborted())
            .finish()
    }
}
