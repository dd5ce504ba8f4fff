//! Production catalog client over the CKAN-style action API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sentry_core::{CatalogGroup, CatalogPackage};
use tracing::{debug, error};
use url::Url;

use crate::api::CatalogApi;
use crate::error::{Error, Result};

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog site.
    pub site_url: Url,
    /// Optional API key sent in the `Authorization` header.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl CatalogConfig {
    /// Create a config for the given site.
    pub fn new(site_url: Url) -> Self {
        Self {
            site_url,
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Every action response arrives in a `{success, result}` envelope.
#[derive(Debug, Deserialize)]
struct ActionEnvelope<T> {
    #[serde(default)]
    success: bool,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct GroupShowResult {
    #[serde(default)]
    packages: Vec<CatalogPackage>,
}

/// Catalog client speaking the CKAN action protocol.
#[derive(Debug, Clone)]
pub struct CkanClient {
    config: CatalogConfig,
    http: reqwest::Client,
}

impl CkanClient {
    /// Build a client from config.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            if let Ok(value) = HeaderValue::from_str(key) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    fn action_url(&self, action: &str) -> Result<Url> {
        Ok(self.config.site_url.join(&format!("api/3/action/{action}"))?)
    }

    async fn call_action<T: DeserializeOwned>(
        &self,
        action: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.action_url(action)?;
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::action_failed(action, "404 Not Found"));
        }
        if !status.is_success() {
            return Err(Error::action_failed(action, status.to_string()));
        }
        let envelope: ActionEnvelope<T> = response.json().await?;
        if !envelope.success {
            return Err(Error::action_failed(action, "success flag was false"));
        }
        envelope
            .result
            .ok_or_else(|| Error::action_failed(action, "missing result payload"))
    }
}

#[async_trait::async_trait]
impl CatalogApi for CkanClient {
    async fn is_reachable(&self) -> bool {
        let reachable = match self.http.head(self.config.site_url.clone()).send().await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                debug!(error = %e, "Catalog reachability check failed");
                false
            }
        };
        if !reachable {
            error!(site = %self.config.site_url, "Catalog not reachable");
        }
        reachable
    }

    async fn group_list(&self) -> Result<Vec<String>> {
        self.call_action("group_list", &[]).await
    }

    async fn group_show(&self, project_id: &str) -> Result<CatalogGroup> {
        let result: GroupShowResult = self
            .call_action(
                "group_show",
                &[("id", project_id), ("include_datasets", "True")],
            )
            .await
            .map_err(|e| match e {
                Error::ActionFailed { reason, .. } if reason.starts_with("404") => {
                    Error::group_not_found(project_id)
                }
                other => other,
            })?;
        Ok(CatalogGroup {
            project_id: project_id.to_string(),
            packages: result.packages,
        })
    }

    async fn package_show(&self, package_id: &str) -> Result<CatalogPackage> {
        self.call_action("package_show", &[("id", package_id)])
            .await
            .map_err(|e| match e {
                Error::ActionFailed { reason, .. } if reason.starts_with("404") => {
                    Error::package_not_found(package_id)
                }
                other => other,
            })
    }
}
