//! In-memory `FeatureStore` with scripted list responses and call counters.
//!
//! List responses are consumed from a queue; once it is empty the `fallback`
//! response repeats forever. A gated store holds every list call until the
//! test releases it.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

use homefeed_core::feature::{Feature, FeatureId, FeaturePatch, NewFeature};
use homefeed_core::remote::{FeatureStore, RemoteError};

type ListResult = Result<Vec<Feature>, RemoteError>;

pub struct ScriptedStore {
    script: Mutex<VecDeque<ListResult>>,
    fallback: ListResult,
    connectivity: Mutex<VecDeque<Result<(), RemoteError>>>,
    gate: Option<Semaphore>,
    list_calls: AtomicU32,
    connectivity_calls: AtomicU32,
}

impl ScriptedStore {
    /// Every list call returns `result` (after any scripted responses).
    pub fn always(result: ListResult) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: result,
            connectivity: Mutex::new(VecDeque::new()),
            gate: None,
            list_calls: AtomicU32::new(0),
            connectivity_calls: AtomicU32::new(0),
        }
    }

    /// Queue a one-shot list response ahead of the fallback.
    pub fn then(self, result: ListResult) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    /// Queue a one-shot connectivity result (default: reachable).
    pub fn then_connectivity(self, result: Result<(), RemoteError>) -> Self {
        self.connectivity.lock().unwrap().push_back(result);
        self
    }

    /// Hold list calls until [`release`](Self::release).
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Let one held list call proceed.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn connectivity_calls(&self) -> u32 {
        self.connectivity_calls.load(Ordering::SeqCst)
    }

    /// Yield until at least `n` list calls have started.
    pub async fn wait_for_list_calls(&self, n: u32) {
        while self.list_calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl FeatureStore for ScriptedStore {
    async fn list_features(&self) -> Result<Vec<Feature>, RemoteError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }

    async fn create_feature(&self, input: &NewFeature) -> Result<Feature, RemoteError> {
        Ok(Feature {
            id: FeatureId::new(format!("new-{}", input.order)),
            title: input.title.clone(),
            subtitle: input.subtitle.clone(),
            icon: input.icon.clone(),
            order: input.order,
            created_at: None,
            updated_at: None,
        })
    }

    async fn update_feature(
        &self,
        id: &FeatureId,
        _patch: &FeaturePatch,
    ) -> Result<Feature, RemoteError> {
        Err(RemoteError::other(format!("no feature {id}")))
    }

    async fn delete_feature(&self, _id: &FeatureId) -> Result<(), RemoteError> {
        Ok(())
    }

    async fn check_connectivity(&self) -> Result<(), RemoteError> {
        self.connectivity_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.connectivity.lock().unwrap().pop_front();
        next.unwrap_or(Ok(()))
    }
}
