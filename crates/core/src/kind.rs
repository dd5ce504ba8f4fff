//! The closed set of resource formats the engine can check.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A declared backing-resource format from the catalog.
///
/// Catalog entries carry the format as a free-form string; only the
/// variants below are probed. Anything else parses to `None` and is
/// skipped by the reconciler (skip, not flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Object-storage bucket.
    #[serde(rename = "blob-storage")]
    BlobStorage,
    /// Pub/sub topic.
    #[serde(rename = "topic")]
    Topic,
    /// Pub/sub subscription.
    #[serde(rename = "subscription")]
    Subscription,
    /// Relational database instance.
    #[serde(rename = "cloudsql-instance")]
    SqlInstance,
    /// Database within a relational instance.
    #[serde(rename = "cloudsql-db")]
    SqlDatabase,
    /// Columnar dataset.
    #[serde(rename = "bigquery-dataset")]
    BigqueryDataset,
    /// Key-value document store (service-enablement check).
    #[serde(rename = "datastore")]
    Datastore,
    /// Document-store index (service-enablement check).
    #[serde(rename = "datastore-index")]
    DatastoreIndex,
    /// Document database (service-enablement check).
    #[serde(rename = "firestore")]
    Firestore,
    /// Generic HTTP endpoint, checked with a plain GET.
    #[serde(rename = "API")]
    Api,
}

impl ResourceKind {
    /// All kinds, in catalog-listing order.
    pub const ALL: [Self; 10] = [
        Self::BlobStorage,
        Self::Topic,
        Self::Subscription,
        Self::SqlInstance,
        Self::SqlDatabase,
        Self::BigqueryDataset,
        Self::Datastore,
        Self::DatastoreIndex,
        Self::Firestore,
        Self::Api,
    ];

    /// Parse a catalog format string. Unknown formats yield `None`.
    pub fn parse(format: &str) -> Option<Self> {
        match format {
            "blob-storage" => Some(Self::BlobStorage),
            "topic" => Some(Self::Topic),
            "subscription" => Some(Self::Subscription),
            "cloudsql-instance" => Some(Self::SqlInstance),
            "cloudsql-db" => Some(Self::SqlDatabase),
            "bigquery-dataset" => Some(Self::BigqueryDataset),
            "datastore" => Some(Self::Datastore),
            "datastore-index" => Some(Self::DatastoreIndex),
            "firestore" => Some(Self::Firestore),
            "API" => Some(Self::Api),
            _ => None,
        }
    }

    /// The canonical catalog string for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BlobStorage => "blob-storage",
            Self::Topic => "topic",
            Self::Subscription => "subscription",
            Self::SqlInstance => "cloudsql-instance",
            Self::SqlDatabase => "cloudsql-db",
            Self::BigqueryDataset => "bigquery-dataset",
            Self::Datastore => "datastore",
            Self::DatastoreIndex => "datastore-index",
            Self::Firestore => "firestore",
            Self::Api => "API",
        }
    }

    /// For service-flag kinds, the platform service identifier whose
    /// enablement stands in for existence. `None` for per-resource kinds.
    pub const fn service_flag(self) -> Option<&'static str> {
        match self {
            Self::Datastore | Self::DatastoreIndex => Some("datastore.googleapis.com"),
            Self::Firestore => Some("firestore.googleapis.com"),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
