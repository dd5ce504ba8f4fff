//! The canonical discrepancy record and its report timestamp.

use chrono::Utc;
use chrono_tz::Europe::Amsterdam;
use serde::{Deserialize, Serialize};

/// Message for a declared resource missing from the live inventory.
pub const MSG_RESOURCE_NOT_FOUND: &str = "Resource not found";
/// Message for a whole cloud project missing from the platform.
pub const MSG_PROJECT_NOT_FOUND: &str = "Project not found";
/// `type` value carried by the synthetic project-level discrepancy.
pub const TYPE_PROJECT: &str = "GCP Project";
/// `package_name` carried by the synthetic project-level discrepancy.
pub const PACKAGE_PROJECT: &str = "google-cloud-project";

/// One declared-but-missing resource (or a synthetic project-missing
/// record). Immutable once created; consumed by ticket sync.
///
/// Serializes to the downstream report shape: `message`, `project_id`,
/// `package_name`, `resource_name`, `type`, `access_url`, `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// Kind string: [`MSG_RESOURCE_NOT_FOUND`] or [`MSG_PROJECT_NOT_FOUND`].
    pub message: String,
    /// Owning cloud project.
    pub project_id: String,
    /// Display name of the owning package.
    pub package_name: String,
    /// The declared resource name that could not be found.
    pub resource_name: String,
    /// The declared format, or [`TYPE_PROJECT`] for the synthetic record.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Console/access URL for manual follow-up; may be empty.
    pub access_url: String,
    /// Report timestamp, stamped at creation time.
    pub timestamp: String,
}

impl Discrepancy {
    /// A declared resource probed `NotFound`.
    ///
    /// A non-empty declared URL is decorated with the owning project as a
    /// query parameter so the link lands in the right console context.
    pub fn resource_not_found(
        project_id: impl Into<String>,
        package_name: impl Into<String>,
        resource_name: impl Into<String>,
        resource_type: impl Into<String>,
        declared_url: &str,
    ) -> Self {
        let project_id = project_id.into();
        let access_url = if declared_url.is_empty() {
            String::new()
        } else {
            format!("{declared_url}?project={project_id}")
        };
        Self {
            message: MSG_RESOURCE_NOT_FOUND.to_string(),
            project_id,
            package_name: package_name.into(),
            resource_name: resource_name.into(),
            resource_type: resource_type.into(),
            access_url,
            timestamp: report_timestamp(),
        }
    }

    /// The synthetic record for a project the cloud platform does not know.
    ///
    /// Carries the same field set as every other discrepancy so ticket
    /// sync never branches on shape.
    pub fn project_not_found(project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        let access_url =
            format!("https://console.cloud.google.com/home/dashboard?project={project_id}");
        Self {
            message: MSG_PROJECT_NOT_FOUND.to_string(),
            project_id: project_id.clone(),
            package_name: PACKAGE_PROJECT.to_string(),
            resource_name: project_id,
            resource_type: TYPE_PROJECT.to_string(),
            access_url,
            timestamp: report_timestamp(),
        }
    }

    /// Whether this is the synthetic project-level record.
    pub fn is_project_level(&self) -> bool {
        self.resource_type == TYPE_PROJECT
    }
}

/// Render the report timestamp: Amsterdam wall time, microsecond
/// precision, literal `Z` suffix.
///
/// The `Z` is *not* a UTC marker here; downstream consumers were built
/// against this exact regional-time-with-Z rendering, so it is preserved
/// verbatim.
pub fn report_timestamp() -> String {
    Utc::now()
        .with_timezone(&Amsterdam)
        .format("%Y-%m-%dT%H:%M:%S.%6fZ")
        .to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn timestamp_has_microseconds_and_literal_z() {
        let ts = report_timestamp();
        // YYYY-MM-DDTHH:MM:SS.ffffffZ
        assert_eq!(ts.len(), 27, "unexpected timestamp shape: {ts}");
        assert!(ts.ends_with('Z'));
        let fractional = ts.get(20..26).unwrap();
        assert!(fractional.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(ts.get(10..11), Some("T"));
    }

    #[test]
    fn resource_record_decorates_declared_url() {
        let d = Discrepancy::resource_not_found(
            "proj-a",
            "traffic-data",
            "bkt1",
            "blob-storage",
            "https://console.cloud.google.com/storage/browser/bkt1",
        );
        assert_eq!(
            d.access_url,
            "https://console.cloud.google.com/storage/browser/bkt1?project=proj-a"
        );
        assert_eq!(d.message, MSG_RESOURCE_NOT_FOUND);
        assert!(!d.is_project_level());
    }

    #[test]
    fn resource_record_leaves_missing_url_empty() {
        let d = Discrepancy::resource_not_found("proj-a", "pkg", "t1", "topic", "");
        assert_eq!(d.access_url, "");
    }

    #[test]
    fn project_record_carries_full_field_set() {
        let d = Discrepancy::project_not_found("proj-b");
        assert_eq!(d.message, MSG_PROJECT_NOT_FOUND);
        assert_eq!(d.project_id, "proj-b");
        assert_eq!(d.package_name, PACKAGE_PROJECT);
        assert_eq!(d.resource_name, "proj-b");
        assert_eq!(d.resource_type, TYPE_PROJECT);
        assert!(d.access_url.contains("project=proj-b"));
        assert!(d.is_project_level());
    }

    #[test]
    fn report_shape_uses_wire_field_names() {
        let d = Discrepancy::resource_not_found("p", "pkg", "r", "topic", "");
        let value = serde_json::to_value(&d).unwrap();
        let obj = value.as_object().unwrap();
        for field in [
            "message",
            "project_id",
            "package_name",
            "resource_name",
            "type",
            "access_url",
            "timestamp",
        ] {
            assert!(obj.contains_key(field), "missing field {field}");
        }
        assert_eq!(obj.len(), 7);
    }
}
