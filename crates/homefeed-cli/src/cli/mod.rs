//! CLI for the home feature feed.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use homefeed_core::config;
use homefeed_core::feature::{FeatureId, FeaturePatch, NewFeature};
use homefeed_core::remote::{FeatureStore, RestFeatureStore};
use std::sync::Arc;

use commands::{run_add, run_diagnose, run_remove, run_show, run_update};

/// Top-level CLI for the home feature feed.
#[derive(Debug, Parser)]
#[command(name = "homefeed")]
#[command(about = "Browse and manage the home screen feature list", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch and display the feature list.
    Show {
        /// Keep the screen open: `r` retry/refresh, `s <n>` select, `q` quit.
        #[arg(long, short)]
        interactive: bool,
    },

    /// Create a feature.
    Add {
        /// Display title.
        title: String,
        #[arg(long)]
        subtitle: Option<String>,
        /// Icon name: Package, Code, Smartphone, Navigation, Settings, Star, Shield or Zap.
        #[arg(long)]
        icon: Option<String>,
        /// Position in the list (ascending).
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        order: i64,
    },

    /// Change fields of an existing feature. Only the given fields are sent.
    Update {
        /// Feature identifier.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subtitle: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        order: Option<i64>,
    },

    /// Delete a feature by ID.
    Remove {
        /// Feature identifier.
        id: String,
    },

    /// Check that the remote endpoint is reachable and report latency.
    Diagnose,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        // Missing or malformed endpoint settings stop here, before any request.
        let settings = cfg
            .remote
            .resolve()
            .context("remote endpoint is not configured")?;
        let policy = cfg.retry_policy()?;
        let store: Arc<dyn FeatureStore> = Arc::new(RestFeatureStore::new(settings));

        match cli.command {
            CliCommand::Show { interactive } => {
                run_show(store, policy, cfg.precheck_connectivity, interactive).await?
            }
            CliCommand::Add {
                title,
                subtitle,
                icon,
                order,
            } => {
                let input = NewFeature {
                    title,
                    subtitle,
                    icon,
                    order,
                };
                run_add(store.as_ref(), &input).await?
            }
            CliCommand::Update {
                id,
                title,
                subtitle,
                icon,
                order,
            } => {
                let patch = FeaturePatch {
                    title,
                    subtitle,
                    icon,
                    order,
                };
                run_update(store.as_ref(), &policy, &FeatureId::new(id), &patch).await?
            }
            CliCommand::Remove { id } => {
                run_remove(store.as_ref(), &policy, &FeatureId::new(id)).await?
            }
            CliCommand::Diagnose => run_diagnose(store.as_ref()).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
