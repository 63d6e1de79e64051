//! Feature screen controller: owns the data lifecycle and the view state.
//!
//! Every load goes through [`RetryExecutor`]; the outcome is mapped onto a
//! single [`ViewState`]. At most one load runs per controller; triggers that
//! arrive while one is in flight are ignored. Disposing the controller aborts
//! the in-flight load and freezes the state.

mod notice;
mod state;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::control::AbortToken;
use crate::feature::{self, Feature};
use crate::remote::FeatureStore;
use crate::retry::{RetryError, RetryExecutor, RetryObserver, RetryPolicy, TracingObserver};

pub use notice::{Notice, LOAD_FAILED_TITLE};
pub use state::ViewState;

const NOTICE_CAPACITY: usize = 16;

/// Result of a `load`/`retry`/`refresh` trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The load ran to completion and produced this state.
    Completed(ViewState),
    /// Another load was in flight; nothing was started.
    AlreadyLoading,
    /// The controller was disposed; no state was written.
    Disposed,
}

/// Clears the in-flight flag when the load finishes or its future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FeatureFetchController {
    store: Arc<dyn FeatureStore>,
    policy: RetryPolicy,
    observer: Arc<dyn RetryObserver>,
    precheck_connectivity: bool,
    state: watch::Sender<ViewState>,
    notices: broadcast::Sender<Notice>,
    in_flight: AtomicBool,
    abort: AbortToken,
}

impl FeatureFetchController {
    /// New controller in the `Loading` state. Nothing is fetched until
    /// [`load`](Self::load) or [`mount`](Self::mount).
    pub fn new(store: Arc<dyn FeatureStore>, policy: RetryPolicy) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            store,
            policy,
            observer: Arc::new(TracingObserver),
            precheck_connectivity: false,
            state,
            notices,
            in_flight: AtomicBool::new(false),
            abort: AbortToken::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Probe the store before listing, inside the same retried operation.
    pub fn with_connectivity_precheck(mut self, enabled: bool) -> Self {
        self.precheck_connectivity = enabled;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state replacement.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Receiver for error alerts and selection notices sent from now on.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn is_disposed(&self) -> bool {
        self.abort.is_aborted()
    }

    /// Start the initial load on the runtime (screen mount).
    ///
    /// The spawned task holds its own `Arc` until the load settles, so
    /// dropping the caller's handle does not abort it. Call
    /// [`dispose`](Self::dispose) to tear down a mounted load.
    pub fn mount(self: &Arc<Self>) -> JoinHandle<LoadOutcome> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.load().await })
    }

    /// Fetch the feature list and replace the state with the outcome.
    pub async fn load(&self) -> LoadOutcome {
        if self.is_disposed() {
            return LoadOutcome::Disposed;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("load already in flight; trigger ignored");
            return LoadOutcome::AlreadyLoading;
        }
        let _in_flight = InFlight(&self.in_flight);

        self.transition(ViewState::Loading);

        let executor = RetryExecutor::new(self.policy)
            .with_observer(Arc::clone(&self.observer))
            .with_abort(self.abort.clone());
        let store = &self.store;
        let precheck = self.precheck_connectivity;
        let result = executor
            .run("list_features", || async move {
                if precheck {
                    store.check_connectivity().await?;
                }
                store.list_features().await
            })
            .await;

        if self.is_disposed() {
            return LoadOutcome::Disposed;
        }

        let next = match result {
            Ok(success) => ViewState::from_features(feature::normalize(success.value)),
            Err(RetryError::Aborted { .. }) => return LoadOutcome::Disposed,
            Err(RetryError::Exhausted { error, attempts }) => {
                let message = error.to_string();
                ViewState::Failed { message, attempts }
            }
        };
        self.transition(next.clone());
        if let ViewState::Failed { message, .. } = &next {
            self.notify(Notice::Error {
                title: LOAD_FAILED_TITLE.to_string(),
                message: message.clone(),
            });
        }
        LoadOutcome::Completed(next)
    }

    /// Re-run the load after a failure.
    pub async fn retry(&self) -> LoadOutcome {
        if !self.state.borrow().offers_retry() {
            tracing::debug!("retry requested outside Failed state");
        }
        self.load().await
    }

    /// Re-run the load from a populated or empty screen.
    pub async fn refresh(&self) -> LoadOutcome {
        if !self.state.borrow().offers_refresh() {
            tracing::debug!("refresh requested outside Empty/Ready state");
        }
        self.load().await
    }

    /// Surface the chosen feature on the notice channel. State is unchanged.
    pub fn select_feature(&self, feature: &Feature) {
        tracing::info!(id = %feature.id, title = %feature.title, "feature selected");
        self.notify(Notice::FeatureSelected {
            title: feature.title.clone(),
            subtitle: feature.subtitle.clone(),
        });
    }

    /// Tear down: abort any in-flight load and stop all further state writes.
    ///
    /// Dropping the controller does the same, but only once no mounted load
    /// still holds a reference.
    pub fn dispose(&self) {
        if !self.is_disposed() {
            tracing::debug!("controller disposed");
        }
        self.abort.abort();
    }

    fn transition(&self, next: ViewState) {
        if self.is_disposed() {
            return;
        }
        self.state.send_replace(next);
    }

    fn notify(&self, notice: Notice) {
        if self.is_disposed() {
            return;
        }
        // No subscribers is fine; the notice is simply dropped.
        let _ = self.notices.send(notice);
    }
}

impl Drop for FeatureFetchController {
    fn drop(&mut self) {
        self.abort.abort();
    }
}
