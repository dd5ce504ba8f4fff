//! Environment-backed runtime configuration.
//!
//! Each variable is read once at startup; a missing required variable
//! aborts before any network call is made.

use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use sentry_catalog::CatalogConfig;
use sentry_tracker::{SyncConfig, TrackerConfig};

/// Everything the binary needs, resolved from the environment.
#[derive(Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    /// Pre-acquired cloud platform access token.
    pub cloud_token: String,
    /// Present unless running with `--dry-run`.
    pub tracker: Option<TrackerConfig>,
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} is not set"))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Resolve configuration from the environment.
    ///
    /// # Errors
    ///
    /// Fails when a required variable is missing or malformed. Tracker
    /// variables are only required when `need_tracker` is set, so a dry
    /// run works without tracker credentials.
    pub fn from_env(need_tracker: bool) -> Result<Self> {
        let site_url = Url::parse(&required("CKAN_SITE_URL")?).context("CKAN_SITE_URL")?;
        let mut catalog = CatalogConfig::new(site_url);
        if let Some(key) = optional("CKAN_API_KEY") {
            catalog = catalog.api_key(key);
        }

        let cloud_token = required("GCP_ACCESS_TOKEN")?;

        let tracker = if need_tracker {
            let base_url = Url::parse(&required("JIRA_URL")?).context("JIRA_URL")?;
            let board_id: u64 = required("JIRA_BOARD_ID")?
                .parse()
                .context("JIRA_BOARD_ID must be a number")?;
            let mut config = TrackerConfig::new(
                base_url,
                required("JIRA_USER")?,
                required("JIRA_API_KEY")?,
                required("JIRA_PROJECT")?,
                board_id,
            );
            if let Some(epic) = optional("JIRA_EPIC") {
                config = config.epic(epic);
            }
            Some(config)
        } else {
            None
        };

        Ok(Self {
            catalog,
            cloud_token,
            tracker,
        })
    }

    /// Sync settings derived from the tracker configuration.
    pub fn sync_config(tracker: &TrackerConfig) -> SyncConfig {
        SyncConfig {
            project_key: tracker.project_key.clone(),
            issue_type: tracker.issue_type.clone(),
            epic_link: tracker.epic_link.clone(),
            ..SyncConfig::default()
        }
    }

    /// Shared per-request HTTP timeout for outbound clients.
    pub fn http_timeout() -> Duration {
        Duration::from_secs(30)
    }
}
