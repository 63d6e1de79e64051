//! Remote feature store.
//!
//! [`FeatureStore`] is the narrow CRUD contract the controller and CLI consume;
//! [`RestFeatureStore`] implements it against a PostgREST-style HTTPS endpoint.

mod classify;
mod error;
mod http;
mod rest;

use async_trait::async_trait;

use crate::feature::{Feature, FeatureId, FeaturePatch, NewFeature};

pub use classify::{classify_curl_error, classify_http_status};
pub use error::{ErrorKind, RemoteError};
pub use rest::RestFeatureStore;

#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// All features, ascending by `order`.
    async fn list_features(&self) -> Result<Vec<Feature>, RemoteError>;

    async fn create_feature(&self, input: &NewFeature) -> Result<Feature, RemoteError>;

    /// Apply `patch`; the store stamps `updated_at`.
    async fn update_feature(
        &self,
        id: &FeatureId,
        patch: &FeaturePatch,
    ) -> Result<Feature, RemoteError>;

    async fn delete_feature(&self, id: &FeatureId) -> Result<(), RemoteError>;

    /// Cheap reachability probe. Stores without one report reachable.
    async fn check_connectivity(&self) -> Result<(), RemoteError> {
        Ok(())
    }
}
