//! `homefeed diagnose` – single connectivity probe, no retries.

use anyhow::{bail, Result};
use homefeed_core::diagnostics::run_connection_diagnostics;
use homefeed_core::remote::FeatureStore;

pub async fn run_diagnose(store: &dyn FeatureStore) -> Result<()> {
    let report = run_connection_diagnostics(store).await;
    let latency_ms = report.latency.as_millis();
    let checked = report.checked_at.format("%Y-%m-%d %H:%M:%S UTC");
    if report.reachable {
        println!("reachable   yes ({latency_ms} ms, checked {checked})");
        return Ok(());
    }
    println!("reachable   no ({latency_ms} ms, checked {checked})");
    if let Some(kind) = report.error_kind {
        println!("kind        {:?}", kind);
    }
    bail!(report
        .error
        .unwrap_or_else(|| "remote endpoint not reachable".to_string()))
}
