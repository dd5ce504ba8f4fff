//! CLI definition using clap.

use clap::Parser;

/// catalog-sentry - catalog/cloud existence reconciliation
#[derive(Parser, Debug)]
#[command(name = "catalog-sentry")]
#[command(version)]
#[command(about = "Reconciles the declarative data catalog against live cloud state")]
#[command(
    long_about = "Walks every catalog group (one per cloud project), probes each declared \
resource against the project's live inventory, and files a tracker ticket for every \
declared-but-missing resource that does not already have one open."
)]
pub struct Cli {
    /// Print the discrepancy report as JSON and skip ticket filing
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Per-probe deadline in seconds
    #[arg(long)]
    pub probe_timeout_secs: Option<u64>,
}
