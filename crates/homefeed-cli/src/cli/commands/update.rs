//! `homefeed update <id> [--title ..] [--subtitle ..] [--icon ..] [--order ..]`

use anyhow::Result;
use homefeed_core::feature::{FeatureId, FeaturePatch};
use homefeed_core::remote::FeatureStore;
use homefeed_core::retry::{run_with_retry, RetryPolicy};

use super::render_feature_line;

pub async fn run_update(
    store: &dyn FeatureStore,
    policy: &RetryPolicy,
    id: &FeatureId,
    patch: &FeaturePatch,
) -> Result<()> {
    patch.validate()?;
    let updated = run_with_retry(policy, || store.update_feature(id, patch)).await?;
    println!("Updated {}", render_feature_line(&updated));
    Ok(())
}
