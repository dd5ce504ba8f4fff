//! REST implementation of the inventory capabilities.
//!
//! One thin client over the platform's five listing surfaces. Every
//! listing paginates with `nextPageToken`; every call carries a bearer
//! token from the injected [`TokenProvider`]. HTTP 404 maps to the
//! project-missing condition, 403 to a forbidden error; both are
//! recovered by the reconciler, never here.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::api::CloudInventoryApi;
use crate::error::{Error, Result};
use crate::token::TokenProvider;

/// Base URLs and timeout for the platform REST surfaces.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Service-usage API base (enabled-service listing).
    pub service_usage_base: Url,
    /// Pub/sub API base.
    pub pubsub_base: Url,
    /// Object-storage API base.
    pub storage_base: Url,
    /// Relational-admin API base.
    pub sql_base: Url,
    /// Columnar-store API base.
    pub bigquery_base: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

// Defaults point at the public googleapis hosts; parsing them cannot
// fail, but the constructor stays fallible to avoid a panic path.
impl CloudConfig {
    /// Production endpoints.
    pub fn googleapis() -> Result<Self> {
        Ok(Self {
            service_usage_base: Url::parse("https://serviceusage.googleapis.com/v1/")?,
            pubsub_base: Url::parse("https://pubsub.googleapis.com/v1/")?,
            storage_base: Url::parse("https://storage.googleapis.com/storage/v1/")?,
            sql_base: Url::parse("https://sqladmin.googleapis.com/sql/v1beta4/")?,
            bigquery_base: Url::parse("https://bigquery.googleapis.com/bigquery/v2/")?,
            timeout: Duration::from_secs(30),
        })
    }

    /// Point every surface at one base; used against a local stub.
    pub fn single_host(base: Url) -> Self {
        Self {
            service_usage_base: base.clone(),
            pubsub_base: base.clone(),
            storage_base: base.clone(),
            sql_base: base.clone(),
            bigquery_base: base,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ServicesPage {
    #[serde(default)]
    services: Vec<ServiceEntry>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceEntry {
    config: Option<NamedEntry>,
}

#[derive(Debug, Deserialize)]
struct NamedEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TopicsPage {
    #[serde(default)]
    topics: Vec<NamedEntry>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionsPage {
    #[serde(default)]
    subscriptions: Vec<NamedEntry>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemsPage {
    #[serde(default)]
    items: Vec<NamedEntry>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DatasetsPage {
    #[serde(default)]
    datasets: Vec<DatasetEntry>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DatasetEntry {
    #[serde(rename = "datasetReference")]
    dataset_reference: Option<DatasetReference>,
}

#[derive(Debug, Deserialize)]
struct DatasetReference {
    #[serde(rename = "datasetId")]
    dataset_id: String,
}

/// Shortens `projects/p/topics/t1` to `t1`.
fn short_name(full: &str) -> String {
    full.rsplit('/').next().unwrap_or(full).to_string()
}

/// Inventory client over the platform REST APIs.
pub struct GcpRestClient {
    config: CloudConfig,
    token: Arc<dyn TokenProvider>,
    http: reqwest::Client,
}

impl GcpRestClient {
    /// Build a client from config and a token provider.
    pub fn new(config: CloudConfig, token: Arc<dyn TokenProvider>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            config,
            token,
            http,
        })
    }

    /// One authenticated GET, with status→error mapping.
    async fn get_page<T: DeserializeOwned>(
        &self,
        base: &Url,
        path: &str,
        query: &[(&str, &str)],
        page_token: Option<&str>,
        project_id: &str,
        what: &str,
    ) -> Result<T> {
        let url = base.join(path)?;
        let token = self.token.access_token().await?;
        let mut request = self.http.get(url).bearer_auth(token).query(query);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        let response = request.send().await?;
        let status = response.status();
        match status {
            reqwest::StatusCode::NOT_FOUND => Err(Error::project_not_found(project_id)),
            reqwest::StatusCode::FORBIDDEN => Err(Error::forbidden(project_id, what)),
            s if !s.is_success() => Err(Error::api_failed(what, s.to_string())),
            _ => Ok(response.json().await?),
        }
    }

    /// Drive a paginated listing to completion.
    async fn collect_pages<T, F>(
        &self,
        base: &Url,
        path: &str,
        query: &[(&str, &str)],
        project_id: &str,
        what: &str,
        mut extract: F,
    ) -> Result<Vec<String>>
    where
        T: DeserializeOwned,
        F: FnMut(T) -> (Vec<String>, Option<String>),
    {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page: T = self
                .get_page(base, path, query, page_token.as_deref(), project_id, what)
                .await?;
            let (mut batch, next) = extract(page);
            names.append(&mut batch);
            match next {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        debug!(project_id, what, count = names.len(), "Listed inventory");
        Ok(names)
    }
}

#[async_trait]
impl CloudInventoryApi for GcpRestClient {
    async fn list_enabled_services(&self, project_id: &str) -> Result<Vec<String>> {
        self.collect_pages::<ServicesPage, _>(
            &self.config.service_usage_base,
            &format!("projects/{project_id}/services"),
            &[("filter", "state:ENABLED")],
            project_id,
            "services",
            |page| {
                let names = page
                    .services
                    .into_iter()
                    .filter_map(|s| s.config.map(|c| c.name))
                    .collect();
                (names, page.next_page_token)
            },
        )
        .await
    }

    async fn list_topics(&self, project_id: &str) -> Result<Vec<String>> {
        self.collect_pages::<TopicsPage, _>(
            &self.config.pubsub_base,
            &format!("projects/{project_id}/topics"),
            &[],
            project_id,
            "topics",
            |page| {
                let names = page.topics.iter().map(|t| short_name(&t.name)).collect();
                (names, page.next_page_token)
            },
        )
        .await
    }

    async fn list_subscriptions(&self, project_id: &str) -> Result<Vec<String>> {
        self.collect_pages::<SubscriptionsPage, _>(
            &self.config.pubsub_base,
            &format!("projects/{project_id}/subscriptions"),
            &[],
            project_id,
            "subscriptions",
            |page| {
                let names = page
                    .subscriptions
                    .iter()
                    .map(|s| short_name(&s.name))
                    .collect();
                (names, page.next_page_token)
            },
        )
        .await
    }

    async fn list_buckets(&self, project_id: &str) -> Result<Vec<String>> {
        self.collect_pages::<ItemsPage, _>(
            &self.config.storage_base,
            "b",
            &[("project", project_id)],
            project_id,
            "buckets",
            |page| {
                let names = page.items.into_iter().map(|i| i.name).collect();
                (names, page.next_page_token)
            },
        )
        .await
    }

    async fn list_sql_instances(&self, project_id: &str) -> Result<Vec<String>> {
        self.collect_pages::<ItemsPage, _>(
            &self.config.sql_base,
            &format!("projects/{project_id}/instances"),
            &[],
            project_id,
            "sql instances",
            |page| {
                let names = page.items.into_iter().map(|i| i.name).collect();
                (names, page.next_page_token)
            },
        )
        .await
    }

    async fn list_sql_databases(&self, project_id: &str, instance: &str) -> Result<Vec<String>> {
        self.collect_pages::<ItemsPage, _>(
            &self.config.sql_base,
            &format!("projects/{project_id}/instances/{instance}/databases"),
            &[],
            project_id,
            "sql databases",
            |page| {
                let names = page.items.into_iter().map(|i| i.name).collect();
                (names, page.next_page_token)
            },
        )
        .await
    }

    async fn list_bigquery_datasets(&self, project_id: &str) -> Result<Vec<String>> {
        self.collect_pages::<DatasetsPage, _>(
            &self.config.bigquery_base,
            &format!("projects/{project_id}/datasets"),
            &[],
            project_id,
            "bigquery datasets",
            |page| {
                let names = page
                    .datasets
                    .into_iter()
                    .filter_map(|d| d.dataset_reference.map(|r| r.dataset_id))
                    .collect();
                (names, page.next_page_token)
            },
        )
        .await
    }
}
