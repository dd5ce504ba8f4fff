//! Catalog-side entities: groups, packages, declared resources.
//!
//! These mirror the shapes returned by the catalog service's `group_show`
//! and `package_show` actions. They are immutable for the duration of one
//! reconciliation pass.

use serde::{Deserialize, Serialize};

/// A declared backing resource inside a catalog package.
///
/// `name` and `format` are optional on the wire; the reconciler skips
/// entries that lack either (with a diagnostic, never a discrepancy).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogResource {
    /// Declared resource name.
    #[serde(default)]
    pub name: Option<String>,
    /// Declared resource format (free-form on the wire).
    #[serde(default)]
    pub format: Option<String>,
    /// Optional access URL; also the probe target for API-kind resources.
    #[serde(default)]
    pub url: Option<String>,
}

impl CatalogResource {
    /// Build a resource with both required fields set.
    pub fn new(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            format: Some(format.into()),
            url: None,
        }
    }

    /// Set the access URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// One dataset and its declared resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPackage {
    /// Package identifier used for `package_show`.
    #[serde(default)]
    pub id: String,
    /// Package name as stored in the catalog.
    pub name: String,
    /// Declared backing resources. May be empty (a no-op for reconciliation).
    #[serde(default)]
    pub resources: Vec<CatalogResource>,
}

impl CatalogPackage {
    /// The display name used in discrepancies: underscores become hyphens,
    /// matching the convention the catalog applies to URLs.
    pub fn display_name(&self) -> String {
        self.name.replace('_', "-")
    }
}

/// A catalog group; one per cloud project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogGroup {
    /// The cloud project id this group maps to.
    pub project_id: String,
    /// Packages in catalog-listing order.
    #[serde(default)]
    pub packages: Vec<CatalogPackage>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn display_name_replaces_underscores() {
        let package = CatalogPackage {
            id: "p1".into(),
            name: "traffic_sensor_data".into(),
            resources: vec![],
        };
        assert_eq!(package.display_name(), "traffic-sensor-data");
    }

    #[test]
    fn resource_deserializes_with_missing_fields() {
        let resource: CatalogResource = serde_json::from_str(r#"{"name":"bkt1"}"#).unwrap();
        assert_eq!(resource.name.as_deref(), Some("bkt1"));
        assert_eq!(resource.format, None);
        assert_eq!(resource.url, None);
    }

    #[test]
    fn package_deserializes_without_resources() {
        let package: CatalogPackage =
            serde_json::from_str(r#"{"id":"x","name":"empty-set"}"#).unwrap();
        assert!(package.resources.is_empty());
    }
}
