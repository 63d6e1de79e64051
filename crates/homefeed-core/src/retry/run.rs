//! Retry loop: run an async operation until success or the policy says stop.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::observer::{RetryObserver, RetryOutcome, TracingObserver};
use super::policy::{RetryDecision, RetryPolicy};
use crate::control::AbortToken;

/// Value produced by a successful run plus the attempts it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Success<T> {
    pub value: T,
    pub attempts: u32,
}

/// Why a retry run ended without a value.
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed; `error` is the last attempt's error, untouched.
    Exhausted { error: E, attempts: u32 },
    /// The abort token tripped; no further attempts were made.
    Aborted { attempts: u32 },
}

impl<E> RetryError<E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } | RetryError::Aborted { attempts } => *attempts,
        }
    }

    /// The last operation error, if the run was not aborted.
    pub fn into_error(self) -> Option<E> {
        match self {
            RetryError::Exhausted { error, .. } => Some(error),
            RetryError::Aborted { .. } => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted { error, .. } => write!(f, "{}", error),
            RetryError::Aborted { attempts } => {
                write!(f, "operation aborted after {} attempt(s)", attempts)
            }
        }
    }
}

impl<E> std::error::Error for RetryError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RetryError::Exhausted { error, .. } => error.source(),
            RetryError::Aborted { .. } => None,
        }
    }
}

/// Sequential retry executor: one attempt at a time, backoff between attempts,
/// abortable through an optional [`AbortToken`].
#[derive(Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
    observer: Arc<dyn RetryObserver>,
    abort: Option<AbortToken>,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            observer: Arc::new(TracingObserver),
            abort: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_abort(mut self, token: AbortToken) -> Self {
        self.abort = Some(token);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` under the policy. `label` tags observer events.
    pub async fn run<F, Fut, T, E>(
        &self,
        label: &str,
        mut operation: F,
    ) -> Result<Success<T>, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1u32;
        loop {
            if self.is_aborted() {
                return Err(self.aborted(label, attempt - 1));
            }
            self.observer.on_attempt_start(label, attempt, max_attempts);

            let result = match &self.abort {
                Some(token) => tokio::select! {
                    result = operation() => result,
                    _ = token.aborted() => return Err(self.aborted(label, attempt)),
                },
                None => operation().await,
            };

            match result {
                Ok(value) => {
                    self.observer
                        .on_outcome(label, RetryOutcome::Succeeded { attempts: attempt });
                    return Ok(Success {
                        value,
                        attempts: attempt,
                    });
                }
                Err(error) => match self.policy.decide(attempt) {
                    RetryDecision::NoRetry => {
                        self.observer
                            .on_attempt_failure(label, attempt, &error, None);
                        self.observer.on_outcome(
                            label,
                            RetryOutcome::Exhausted {
                                attempts: attempt,
                                error: &error,
                            },
                        );
                        return Err(RetryError::Exhausted {
                            error,
                            attempts: attempt,
                        });
                    }
                    RetryDecision::RetryAfter(delay) => {
                        self.observer
                            .on_attempt_failure(label, attempt, &error, Some(delay));
                        if !self.sleep(delay).await {
                            return Err(self.aborted(label, attempt));
                        }
                        attempt += 1;
                    }
                },
            }
        }
    }

    /// Sleep for `delay`; returns false if aborted first.
    async fn sleep(&self, delay: Duration) -> bool {
        match &self.abort {
            Some(token) => tokio::select! {
                _ = tokio::time::sleep(delay) => true,
                _ = token.aborted() => false,
            },
            None => {
                tokio::time::sleep(delay).await;
                true
            }
        }
    }

    fn is_aborted(&self) -> bool {
        self.abort.as_ref().is_some_and(AbortToken::is_aborted)
    }

    fn aborted<E>(&self, label: &str, attempts: u32) -> RetryError<E> {
        self.observer
            .on_outcome(label, RetryOutcome::Aborted { attempts });
        RetryError::Aborted { attempts }
    }
}

/// Runs `operation` until it succeeds or `policy` is exhausted, returning the
/// value or the last error unchanged. Events go to the tracing observer.
pub async fn run_with_retry<F, Fut, T, E>(policy: &RetryPolicy, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    match RetryExecutor::new(*policy).run("operation", operation).await {
        Ok(success) => Ok(success.value),
        Err(RetryError::Exhausted { error, .. }) => Err(error),
        Err(RetryError::Aborted { .. }) => unreachable!("executor has no abort token"),
    }
}
