//! Live per-project inventories fetched from the cloud platform.

use std::collections::HashSet;

use crate::kind::ResourceKind;

/// The live listings for one cloud project, fetched at most once per
/// reconciliation pass and shared by every package reconciler for that
/// project (read-then-check: built fully before any probe runs).
#[derive(Debug, Clone, Default)]
pub struct ProjectInventory {
    /// Service identifiers enabled on the project.
    pub enabled_services: HashSet<String>,
    /// Topic names (short form, final path segment).
    pub topics: HashSet<String>,
    /// Subscription names (short form).
    pub subscriptions: HashSet<String>,
    /// Bucket names.
    pub buckets: HashSet<String>,
    /// Relational instance names.
    pub sql_instances: HashSet<String>,
    /// Database names across all instances.
    pub sql_databases: HashSet<String>,
    /// Columnar dataset ids.
    pub bigquery_datasets: HashSet<String>,
}

impl ProjectInventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a platform service is enabled on the project.
    pub fn has_service(&self, service: &str) -> bool {
        self.enabled_services.contains(service)
    }

    /// The inventory set backing a list-membership kind, or `None` for
    /// kinds that are not checked by list membership.
    pub fn set_for(&self, kind: ResourceKind) -> Option<&HashSet<String>> {
        match kind {
            ResourceKind::BlobStorage => Some(&self.buckets),
            ResourceKind::Topic => Some(&self.topics),
            ResourceKind::Subscription => Some(&self.subscriptions),
            ResourceKind::SqlInstance => Some(&self.sql_instances),
            ResourceKind::SqlDatabase => Some(&self.sql_databases),
            ResourceKind::BigqueryDataset => Some(&self.bigquery_datasets),
            ResourceKind::Datastore
            | ResourceKind::DatastoreIndex
            | ResourceKind::Firestore
            | ResourceKind::Api => None,
        }
    }

    /// Exact-match membership test for a list-membership kind.
    ///
    /// Topic and subscription names compare on the final `/`-separated
    /// segment only; the catalog sometimes declares the fully qualified
    /// path while the inventory holds short names. Everything else is
    /// case-sensitive exact match, no normalization.
    pub fn contains(&self, kind: ResourceKind, name: &str) -> bool {
        let needle = match kind {
            ResourceKind::Topic | ResourceKind::Subscription => {
                name.rsplit('/').next().unwrap_or(name)
            }
            _ => name,
        };
        self.set_for(kind)
            .is_some_and(|set| set.contains(needle))
    }
}
