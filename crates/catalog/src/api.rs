//! The capability trait the reconciler consumes.

use async_trait::async_trait;
use sentry_core::{CatalogGroup, CatalogPackage};

use crate::error::Result;

/// Read-only view of the catalog service.
///
/// The engine takes this as an injected dependency so tests can swap in
/// an in-memory fake; only the shapes the reconciler needs are exposed.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Whether the catalog service answers at all. A `false` here
    /// short-circuits the whole reconciliation pass.
    async fn is_reachable(&self) -> bool;

    /// List all group ids. Groups are keyed by cloud project id.
    async fn group_list(&self) -> Result<Vec<String>>;

    /// Fetch a group with its datasets included.
    async fn group_show(&self, project_id: &str) -> Result<CatalogGroup>;

    /// Fetch the full package, including its `resources` sequence.
    async fn package_show(&self, package_id: &str) -> Result<CatalogPackage>;
}
