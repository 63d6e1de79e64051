//! Instrumentation hook invoked by the retry loop.

use std::fmt::Display;
use std::time::Duration;

/// Final result of a retry run, as reported to observers.
#[derive(Clone, Copy)]
pub enum RetryOutcome<'a> {
    Succeeded { attempts: u32 },
    Exhausted { attempts: u32, error: &'a dyn Display },
    Aborted { attempts: u32 },
}

/// Receives attempt-start, attempt-failure and final-outcome events.
///
/// All methods default to no-ops so implementors can pick what they need.
/// `label` names the logical operation (e.g. `"list_features"`).
pub trait RetryObserver: Send + Sync {
    fn on_attempt_start(&self, _label: &str, _attempt: u32, _max_attempts: u32) {}

    /// `next_delay` is `None` when this failure ends the run.
    fn on_attempt_failure(
        &self,
        _label: &str,
        _attempt: u32,
        _error: &dyn Display,
        _next_delay: Option<Duration>,
    ) {
    }

    fn on_outcome(&self, _label: &str, _outcome: RetryOutcome<'_>) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RetryObserver for NoopObserver {}

/// Default observer: structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RetryObserver for TracingObserver {
    fn on_attempt_start(&self, label: &str, attempt: u32, max_attempts: u32) {
        tracing::debug!(op = label, attempt, max_attempts, "attempt started");
    }

    fn on_attempt_failure(
        &self,
        label: &str,
        attempt: u32,
        error: &dyn Display,
        next_delay: Option<Duration>,
    ) {
        match next_delay {
            Some(delay) => tracing::warn!(
                op = label,
                attempt,
                error = %error,
                delay_ms = delay.as_millis() as u64,
                "attempt failed, retrying"
            ),
            None => tracing::warn!(op = label, attempt, error = %error, "attempt failed"),
        }
    }

    fn on_outcome(&self, label: &str, outcome: RetryOutcome<'_>) {
        match outcome {
            RetryOutcome::Succeeded { attempts } if attempts > 1 => {
                tracing::info!(op = label, attempts, "succeeded after retry")
            }
            RetryOutcome::Succeeded { attempts } => {
                tracing::debug!(op = label, attempts, "succeeded")
            }
            RetryOutcome::Exhausted { attempts, error } => {
                tracing::error!(op = label, attempts, error = %error, "all attempts failed")
            }
            RetryOutcome::Aborted { attempts } => {
                tracing::debug!(op = label, attempts, "aborted")
            }
        }
    }
}
