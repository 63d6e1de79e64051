//! Retry and backoff.
//!
//! [`RetryPolicy`] owns the exponential backoff arithmetic (cap and jitter);
//! [`RetryExecutor`] drives an async operation through it sequentially and
//! reports each step to a [`RetryObserver`].

mod observer;
mod policy;
mod run;

pub use observer::{NoopObserver, RetryObserver, RetryOutcome, TracingObserver};
pub use policy::{PolicyError, RetryDecision, RetryPolicy, JITTER_RATIO};
pub use run::{run_with_retry, RetryError, RetryExecutor, Success};
