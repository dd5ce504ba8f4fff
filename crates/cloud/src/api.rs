//! Capability traits the reconciler consumes, plus the HTTP endpoint check.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;

/// Live per-kind listings for one cloud project.
///
/// Each method lists one resource kind; the project reconciler calls
/// each at most once per project per pass.
#[async_trait]
pub trait CloudInventoryApi: Send + Sync {
    /// Identifiers of services enabled on the project.
    async fn list_enabled_services(&self, project_id: &str) -> Result<Vec<String>>;

    /// Topic names, short form.
    async fn list_topics(&self, project_id: &str) -> Result<Vec<String>>;

    /// Subscription names, short form.
    async fn list_subscriptions(&self, project_id: &str) -> Result<Vec<String>>;

    /// Bucket names.
    async fn list_buckets(&self, project_id: &str) -> Result<Vec<String>>;

    /// Relational instance names.
    async fn list_sql_instances(&self, project_id: &str) -> Result<Vec<String>>;

    /// Database names within one instance.
    async fn list_sql_databases(&self, project_id: &str, instance: &str) -> Result<Vec<String>>;

    /// Columnar dataset ids.
    async fn list_bigquery_datasets(&self, project_id: &str) -> Result<Vec<String>>;
}

/// Existence check for API-kind resources: a plain GET against the
/// declared URL.
#[async_trait]
pub trait EndpointCheck: Send + Sync {
    /// `true` iff the endpoint answered with a successful status.
    async fn is_ok(&self, url: &str) -> Result<bool>;
}

/// Production endpoint check over a plain HTTP client.
#[derive(Debug, Clone)]
pub struct HttpEndpointCheck {
    http: reqwest::Client,
}

impl HttpEndpointCheck {
    /// Build a check with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl EndpointCheck for HttpEndpointCheck {
    async fn is_ok(&self, url: &str) -> Result<bool> {
        let response = self.http.get(url).send().await?;
        let ok = response.status().is_success();
        if !ok {
            debug!(url, status = %response.status(), "Endpoint check failed");
        }
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn endpoint_check_accepts_2xx_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/up"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let check = HttpEndpointCheck::new(Duration::from_secs(5)).unwrap();
        assert!(check.is_ok(&format!("{}/up", server.uri())).await.unwrap());
        assert!(!check.is_ok(&format!("{}/down", server.uri())).await.unwrap());
    }
}
