//! `homefeed add <title>` – create a feature.

use anyhow::Result;
use homefeed_core::feature::NewFeature;
use homefeed_core::remote::FeatureStore;
use homefeed_core::retry::{run_with_retry, RetryPolicy};

use super::render_feature_line;

/// Inserts are not repeat-safe: a response lost after the row was committed
/// would create a duplicate on retry. One attempt only; the user re-runs.
pub async fn run_add(store: &dyn FeatureStore, input: &NewFeature) -> Result<()> {
    input.validate()?;
    let created = run_with_retry(&RetryPolicy::no_retry(), || store.create_feature(input)).await?;
    println!("Created {}", render_feature_line(&created));
    Ok(())
}
