//! # catalog-sentry
//!
//! Entry point for the existence reconciliation run.
//!
//! ## Sequence
//!
//! 1. Resolve configuration from the environment (fail fast).
//! 2. Wire the catalog, cloud, and tracker clients.
//! 3. Run one reconciliation pass over every catalog group.
//! 4. Hand the discrepancy report to ticket sync (or print it with
//!    `--dry-run`).
//!
//! An unreachable catalog service skips the pass entirely; everything
//! else in the pass degrades per project or per resource.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sentry_catalog::CkanClient;
use sentry_cloud::{CloudConfig, GcpRestClient, HttpEndpointCheck, StaticTokenProvider};
use sentry_core::RunStatus;
use sentry_reconciler::{CatalogReconciler, ReconcilerConfig};
use sentry_tracker::{JiraClient, TicketSync};

mod cli;
mod config;

use cli::Cli;
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let app = AppConfig::from_env(!cli.dry_run)?;

    let catalog = Arc::new(CkanClient::new(app.catalog.clone())?);
    let token = Arc::new(StaticTokenProvider::new(app.cloud_token.clone()));
    let cloud = Arc::new(GcpRestClient::new(CloudConfig::googleapis()?, token)?);
    let endpoint = Arc::new(HttpEndpointCheck::new(AppConfig::http_timeout())?);

    let mut reconciler_config = ReconcilerConfig::default();
    if let Some(secs) = cli.probe_timeout_secs {
        reconciler_config = reconciler_config.probe_timeout(Duration::from_secs(secs));
    }

    let engine = CatalogReconciler::new(catalog, cloud, endpoint, reconciler_config);
    let status = engine.run().await.context("reconciliation pass failed")?;

    let discrepancies = match status {
        RunStatus::Skipped { reason } => {
            info!(reason = %reason, "Catalog existence check has not run");
            bail!("pass skipped: {reason}");
        }
        RunStatus::Completed { discrepancies } => discrepancies,
    };
    info!(
        discrepancies = discrepancies.len(),
        "Catalog existence check has run"
    );

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&discrepancies)?);
        return Ok(());
    }

    let tracker_config = app
        .tracker
        .context("tracker configuration is required outside --dry-run")?;
    let sync_config = AppConfig::sync_config(&tracker_config);
    let tracker = Arc::new(JiraClient::new(tracker_config)?);
    let sync = TicketSync::new(tracker, sync_config);

    let report = sync.run(&discrepancies).await?;
    info!(
        created = report.created.len(),
        deduplicated = report.deduplicated,
        "Run complete"
    );
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
