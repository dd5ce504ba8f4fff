//! The tracker capability trait and its wire-facing types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A tracker sprint/iteration id.
pub type SprintId = u64;

/// One existing issue, as returned by the dedup search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueSummary {
    /// Issue key (e.g. `DAT-123`).
    pub key: String,
    /// Issue title.
    pub summary: String,
}

/// A ticket to create. Project, issue type, and epic link are fixed
/// client-side configuration, not per-ticket data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicket {
    /// Convention-formatted title (see [`crate::title`]).
    pub summary: String,
    /// Human-readable body describing the missing resource path.
    pub description: String,
}

/// The tracker operations Ticket Sync needs.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// Search issues matching a query; returns key + title per hit.
    async fn search_summaries(&self, jql: &str) -> Result<Vec<IssueSummary>>;

    /// Create all tickets in one call; returns created issue keys in
    /// order. Partial failure is an error (no fallback creation).
    async fn bulk_create(&self, tickets: &[NewTicket]) -> Result<Vec<String>>;

    /// Resolve the board's current active sprint (falling back to the
    /// most recent sprint when none is active).
    async fn active_sprint(&self) -> Result<SprintId>;

    /// Bind all issues to a sprint in one call.
    async fn bind_to_sprint(&self, sprint: SprintId, issue_keys: &[String]) -> Result<()>;
}
