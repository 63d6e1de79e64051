use rand::Rng;
use std::time::Duration;
use thiserror::Error;

/// Fraction of the computed delay that jitter may add or remove.
pub const JITTER_RATIO: f64 = 0.25;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Attempt budget spent; surface the error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Rejected policy parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("backoff_factor must be a finite number greater than 1 (got {0})")]
    BackoffFactor(f64),
}

/// Exponential backoff policy with a cap and optional jitter.
///
/// Fields are fixed at construction; [`RetryPolicy::new`] validates them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    backoff_factor: f64,
    jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
        backoff_factor: f64,
        jitter: bool,
    ) -> Result<Self, PolicyError> {
        if max_attempts == 0 {
            return Err(PolicyError::ZeroAttempts);
        }
        if !backoff_factor.is_finite() || backoff_factor <= 1.0 {
            return Err(PolicyError::BackoffFactor(backoff_factor));
        }
        Ok(Self {
            max_attempts,
            base_delay,
            max_delay,
            backoff_factor,
            jitter,
        })
    }

    /// Single attempt, no retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    pub fn jitter(&self) -> bool {
        self.jitter
    }

    /// Un-jittered delay after failed attempt `attempt` (1-based):
    /// `min(base_delay * backoff_factor^(attempt-1), max_delay)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled = self.base_delay.as_nanos() as f64 * self.backoff_factor.powi(exp);
        let cap = self.max_delay.as_nanos() as f64;
        if !scaled.is_finite() || scaled >= cap {
            return self.max_delay;
        }
        Duration::from_nanos(scaled.round() as u64)
    }

    /// Perturb `delay` by a uniform offset within ±[`JITTER_RATIO`] of itself.
    /// Never negative; never above `delay * (1 + JITTER_RATIO)`.
    pub fn apply_jitter<R: Rng>(delay: Duration, rng: &mut R) -> Duration {
        let span = delay.as_nanos() as f64 * JITTER_RATIO;
        if span <= 0.0 {
            return delay;
        }
        let offset = rng.gen_range(-span..=span);
        let jittered = (delay.as_nanos() as f64 + offset).max(0.0);
        Duration::from_nanos(jittered.round() as u64)
    }

    /// Delay to sleep after failed attempt `attempt`, jittered when enabled.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay = self.backoff_delay(attempt);
        if self.jitter {
            Self::apply_jitter(delay, &mut rand::thread_rng())
        } else {
            delay
        }
    }

    /// Decide what to do after attempt `attempt` (1-based) failed.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.delay_for(attempt))
    }
}
