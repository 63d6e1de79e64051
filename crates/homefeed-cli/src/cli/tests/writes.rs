//! Write commands against a store whose first response is lost.

use crate::cli::commands::{run_add, run_update};
use async_trait::async_trait;
use homefeed_core::feature::{Feature, FeatureId, FeaturePatch, NewFeature};
use homefeed_core::remote::{ErrorKind, FeatureStore, RemoteError};
use homefeed_core::retry::RetryPolicy;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Commits every write, but the first reply times out.
#[derive(Default)]
struct DropsFirstReply {
    rows: Mutex<Vec<Feature>>,
    calls: AtomicU32,
}

impl DropsFirstReply {
    fn reply(&self, row: Feature) -> Result<Feature, RemoteError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(RemoteError::new(ErrorKind::Timeout, "operation timed out"));
        }
        Ok(row)
    }
}

#[async_trait]
impl FeatureStore for DropsFirstReply {
    async fn list_features(&self) -> Result<Vec<Feature>, RemoteError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn create_feature(&self, input: &NewFeature) -> Result<Feature, RemoteError> {
        let row = Feature {
            id: FeatureId::new(format!("row-{}", self.calls.load(Ordering::SeqCst))),
            title: input.title.clone(),
            subtitle: input.subtitle.clone(),
            icon: input.icon.clone(),
            order: input.order,
            created_at: None,
            updated_at: None,
        };
        self.rows.lock().unwrap().push(row.clone());
        self.reply(row)
    }

    async fn update_feature(
        &self,
        id: &FeatureId,
        patch: &FeaturePatch,
    ) -> Result<Feature, RemoteError> {
        let row = {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|r| &r.id == id)
                .ok_or_else(|| RemoteError::other(format!("no feature {id}")))?;
            if let Some(order) = patch.order {
                row.order = order;
            }
            row.clone()
        };
        self.reply(row)
    }

    async fn delete_feature(&self, _id: &FeatureId) -> Result<(), RemoteError> {
        Ok(())
    }
}

fn three_instant_attempts() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO, Duration::ZERO, 2.0, false).unwrap()
}

fn input() -> NewFeature {
    NewFeature {
        title: "Scanner".to_string(),
        subtitle: None,
        icon: None,
        order: 1,
    }
}

#[tokio::test]
async fn add_does_not_repeat_a_committed_insert() {
    let store = DropsFirstReply::default();

    let result = run_add(&store, &input()).await;

    assert!(result.is_err());
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn update_is_retried_with_configured_policy() {
    let store = DropsFirstReply::default();
    store.rows.lock().unwrap().push(Feature {
        id: FeatureId::from("abc"),
        title: "Scanner".to_string(),
        subtitle: None,
        icon: None,
        order: 1,
        created_at: None,
        updated_at: None,
    });
    let patch = FeaturePatch {
        order: Some(4),
        ..FeaturePatch::default()
    };

    run_update(&store, &three_instant_attempts(), &FeatureId::from("abc"), &patch)
        .await
        .unwrap();

    assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    let rows = store.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].order, 4);
}
