//! `homefeed remove <id>` – delete a feature.

use anyhow::Result;
use homefeed_core::feature::FeatureId;
use homefeed_core::remote::FeatureStore;
use homefeed_core::retry::{run_with_retry, RetryPolicy};

pub async fn run_remove(
    store: &dyn FeatureStore,
    policy: &RetryPolicy,
    id: &FeatureId,
) -> Result<()> {
    run_with_retry(policy, || store.delete_feature(id)).await?;
    println!("Removed feature {id}");
    Ok(())
}
