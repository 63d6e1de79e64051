//! Connection diagnostics: is the remote store reachable, and how fast.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

use crate::remote::{ErrorKind, FeatureStore};

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDiagnostics {
    pub reachable: bool,
    /// Time taken by the probe, successful or not.
    pub latency: Duration,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
    pub checked_at: DateTime<Utc>,
}

/// Probe `store` once (no retries) and report the result.
pub async fn run_connection_diagnostics(store: &dyn FeatureStore) -> ConnectionDiagnostics {
    let checked_at = Utc::now();
    let started = Instant::now();
    let result = store.check_connectivity().await;
    let latency = started.elapsed();

    match result {
        Ok(()) => {
            tracing::info!(latency_ms = latency.as_millis() as u64, "remote store reachable");
            ConnectionDiagnostics {
                reachable: true,
                latency,
                error: None,
                error_kind: None,
                checked_at,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, kind = ?e.kind(), "remote store unreachable");
            ConnectionDiagnostics {
                reachable: false,
                latency,
                error: Some(e.to_string()),
                error_kind: Some(e.kind()),
                checked_at,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Feature, FeatureId, FeaturePatch, NewFeature};
    use crate::remote::RemoteError;
    use async_trait::async_trait;

    struct Probe(Option<RemoteError>);

    #[async_trait]
    impl FeatureStore for Probe {
        async fn list_features(&self) -> Result<Vec<Feature>, RemoteError> {
            Ok(Vec::new())
        }
        async fn create_feature(&self, _: &NewFeature) -> Result<Feature, RemoteError> {
            Err(RemoteError::other("unsupported"))
        }
        async fn update_feature(
            &self,
            _: &FeatureId,
            _: &FeaturePatch,
        ) -> Result<Feature, RemoteError> {
            Err(RemoteError::other("unsupported"))
        }
        async fn delete_feature(&self, _: &FeatureId) -> Result<(), RemoteError> {
            Err(RemoteError::other("unsupported"))
        }
        async fn check_connectivity(&self) -> Result<(), RemoteError> {
            match &self.0 {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn reachable_store() {
        let report = run_connection_diagnostics(&Probe(None)).await;
        assert!(report.reachable);
        assert!(report.error.is_none());
    }

    #[tokio::test]
    async fn unreachable_store_reports_error_and_kind() {
        let err = RemoteError::new(ErrorKind::Timeout, "Remote endpoint not reachable: timed out");
        let report = run_connection_diagnostics(&Probe(Some(err))).await;
        assert!(!report.reachable);
        assert_eq!(
            report.error.as_deref(),
            Some("Remote endpoint not reachable: timed out")
        );
        assert_eq!(report.error_kind, Some(ErrorKind::Timeout));
    }
}
