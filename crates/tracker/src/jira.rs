//! Production tracker client over the Jira REST and Agile APIs.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use url::Url;

use crate::api::{IssueSummary, NewTicket, SprintId, TrackerApi};
use crate::error::{Error, Result};

/// Connection and field configuration for the tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Tracker base URL.
    pub base_url: Url,
    /// Basic-auth user.
    pub user: String,
    /// Basic-auth API token.
    pub api_token: String,
    /// Project key new tickets are filed under.
    pub project_key: String,
    /// Issue type for new tickets.
    pub issue_type: String,
    /// Epic the tickets belong to (issue key of the epic).
    pub epic_link: Option<String>,
    /// Custom-field id carrying the epic link on this instance.
    pub epic_field: String,
    /// Scrum board whose active sprint new tickets are bound to.
    pub board_id: u64,
    /// Search/sprint page size.
    pub page_size: u32,
    /// Request timeout.
    pub timeout: Duration,
}

impl TrackerConfig {
    /// Minimal config; the rest takes common defaults.
    pub fn new(
        base_url: Url,
        user: impl Into<String>,
        api_token: impl Into<String>,
        project_key: impl Into<String>,
        board_id: u64,
    ) -> Self {
        Self {
            base_url,
            user: user.into(),
            api_token: api_token.into(),
            project_key: project_key.into(),
            issue_type: "Bug".to_string(),
            epic_link: None,
            epic_field: "customfield_10008".to_string(),
            board_id,
            page_size: 50,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the epic the tickets link to.
    #[must_use]
    pub fn epic(mut self, epic_link: impl Into<String>) -> Self {
        self.epic_link = Some(epic_link.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    issues: Vec<SearchIssue>,
    #[serde(default)]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct SearchIssue {
    key: String,
    fields: SearchFields,
}

#[derive(Debug, Deserialize)]
struct SearchFields {
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct BulkCreated {
    #[serde(default)]
    issues: Vec<CreatedIssue>,
    #[serde(default)]
    errors: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: String,
}

#[derive(Debug, Deserialize)]
struct SprintPage {
    #[serde(default)]
    values: Vec<Sprint>,
    #[serde(default, rename = "isLast")]
    is_last: bool,
}

#[derive(Debug, Deserialize)]
struct Sprint {
    id: SprintId,
    #[serde(default)]
    state: String,
}

/// Tracker client speaking the Jira REST v2 and Agile 1.0 protocols.
pub struct JiraClient {
    config: TrackerConfig,
    http: reqwest::Client,
}

impl JiraClient {
    /// Build a client; fails fast on empty credentials so a
    /// misconfigured sync never reaches the ticket step.
    pub fn new(config: TrackerConfig) -> Result<Self> {
        if config.user.is_empty() || config.api_token.is_empty() {
            return Err(Error::config("tracker credentials are not set"));
        }
        if config.project_key.is_empty() {
            return Err(Error::config("tracker project key is not set"));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.config.base_url.join(path)?)
    }

    fn ticket_fields(&self, ticket: &NewTicket) -> Value {
        let mut fields = Map::new();
        fields.insert(
            "project".into(),
            json!({ "key": self.config.project_key }),
        );
        fields.insert("summary".into(), json!(ticket.summary));
        fields.insert("description".into(), json!(ticket.description));
        fields.insert(
            "issuetype".into(),
            json!({ "name": self.config.issue_type }),
        );
        if let Some(epic) = &self.config.epic_link {
            fields.insert(self.config.epic_field.clone(), json!(epic));
        }
        json!({ "fields": Value::Object(fields) })
    }
}

#[async_trait]
impl TrackerApi for JiraClient {
    async fn search_summaries(&self, jql: &str) -> Result<Vec<IssueSummary>> {
        let url = self.endpoint("rest/api/2/search")?;
        let mut summaries = Vec::new();
        let mut start_at: u32 = 0;
        loop {
            let response = self
                .http
                .get(url.clone())
                .basic_auth(&self.config.user, Some(&self.config.api_token))
                .query(&[
                    ("jql", jql.to_string()),
                    ("fields", "summary".to_string()),
                    ("startAt", start_at.to_string()),
                    ("maxResults", self.config.page_size.to_string()),
                ])
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(Error::search_failed(response.status().to_string()));
            }
            let page: SearchPage = response.json().await?;
            let batch = page.issues.len() as u32;
            summaries.extend(page.issues.into_iter().map(|i| IssueSummary {
                key: i.key,
                summary: i.fields.summary,
            }));
            start_at = start_at.saturating_add(batch);
            if batch == 0 || start_at >= page.total {
                break;
            }
        }
        debug!(hits = summaries.len(), "Dedup search complete");
        Ok(summaries)
    }

    async fn bulk_create(&self, tickets: &[NewTicket]) -> Result<Vec<String>> {
        let url = self.endpoint("rest/api/2/issue/bulk")?;
        let payload = json!({
            "issueUpdates": tickets.iter().map(|t| self.ticket_fields(t)).collect::<Vec<_>>(),
        });
        let response = self
            .http
            .post(url)
            .basic_auth(&self.config.user, Some(&self.config.api_token))
            .json(&payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::create_failed(response.status().to_string()));
        }
        let created: BulkCreated = response.json().await?;
        if !created.errors.is_empty() {
            return Err(Error::create_failed(format!(
                "{} of {} tickets rejected",
                created.errors.len(),
                tickets.len()
            )));
        }
        let keys: Vec<String> = created.issues.into_iter().map(|i| i.key).collect();
        info!(created = keys.len(), "Created tracker tickets");
        Ok(keys)
    }

    async fn active_sprint(&self) -> Result<SprintId> {
        let url = self.endpoint(&format!(
            "rest/agile/1.0/board/{}/sprint",
            self.config.board_id
        ))?;
        let mut sprints: Vec<Sprint> = Vec::new();
        let mut start_at: u32 = 0;
        loop {
            let response = self
                .http
                .get(url.clone())
                .basic_auth(&self.config.user, Some(&self.config.api_token))
                .query(&[
                    ("startAt", start_at.to_string()),
                    ("maxResults", self.config.page_size.to_string()),
                ])
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(Error::sprint_failed(response.status().to_string()));
            }
            let page: SprintPage = response.json().await?;
            let batch = page.values.len() as u32;
            sprints.extend(page.values);
            start_at = start_at.saturating_add(batch);
            if page.is_last || batch == 0 {
                break;
            }
        }

        // The earliest active sprint wins when several are open; an
        // idle board falls back to its most recent sprint.
        let chosen = sprints
            .iter()
            .find(|s| s.state.eq_ignore_ascii_case("active"))
            .or_else(|| sprints.last())
            .map(|s| s.id)
            .ok_or(Error::NoSprint {
                board_id: self.config.board_id,
            })?;
        Ok(chosen)
    }

    async fn bind_to_sprint(&self, sprint: SprintId, issue_keys: &[String]) -> Result<()> {
        let url = self.endpoint(&format!("rest/agile/1.0/sprint/{sprint}/issue"))?;
        let response = self
            .http
            .post(url)
            .basic_auth(&self.config.user, Some(&self.config.api_token))
            .json(&json!({ "issues": issue_keys }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::sprint_failed(format!(
                "binding {} issues returned {}",
                issue_keys.len(),
                response.status()
            )));
        }
        info!(sprint, issues = issue_keys.len(), "Bound tickets to sprint");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> JiraClient {
        let config = TrackerConfig::new(
            Url::parse(&server.uri()).unwrap(),
            "svc-user",
            "svc-token",
            "DAT",
            7,
        )
        .epic("DAT-100");
        JiraClient::new(config).unwrap()
    }

    #[test]
    fn empty_credentials_fail_fast() {
        let config = TrackerConfig::new(
            Url::parse("https://tracker.test").unwrap(),
            "",
            "",
            "DAT",
            7,
        );
        assert!(matches!(
            JiraClient::new(config),
            Err(Error::Config { .. })
        ));
    }

    #[tokio::test]
    async fn search_pages_through_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("startAt", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "issues": [{"key": "DAT-1", "fields": {"summary": "Resource not found: 'bkt1'"}}],
                "total": 2
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("startAt", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "issues": [{"key": "DAT-2", "fields": {"summary": "Resource not found: 'topicX'"}}],
                "total": 2
            })))
            .mount(&server)
            .await;

        let hits = client_for(&server)
            .search_summaries("project = DAT")
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].key, "DAT-2");
    }

    #[tokio::test]
    async fn bulk_create_sends_fixed_fields_and_returns_keys() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue/bulk"))
            .and(body_partial_json(serde_json::json!({
                "issueUpdates": [{
                    "fields": {
                        "project": {"key": "DAT"},
                        "issuetype": {"name": "Bug"},
                        "customfield_10008": "DAT-100"
                    }
                }]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "issues": [{"id": "10010", "key": "DAT-11"}],
                "errors": []
            })))
            .mount(&server)
            .await;

        let keys = client_for(&server)
            .bulk_create(&[NewTicket {
                summary: "Resource not found: 'bkt1'".into(),
                description: "proj-a/traffic-data/bkt1".into(),
            }])
            .await
            .unwrap();
        assert_eq!(keys, vec!["DAT-11"]);
    }

    #[tokio::test]
    async fn partial_bulk_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue/bulk"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "issues": [],
                "errors": [{"status": 400}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .bulk_create(&[NewTicket {
                summary: "t".into(),
                description: "d".into(),
            }])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CreateFailed { .. }));
    }

    #[tokio::test]
    async fn active_sprint_picks_the_earliest_active_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/agile/1.0/board/7/sprint"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "values": [
                    {"id": 1, "state": "closed"},
                    {"id": 2, "state": "active"},
                    {"id": 3, "state": "active"},
                    {"id": 4, "state": "future"}
                ],
                "isLast": true
            })))
            .mount(&server)
            .await;

        let sprint = client_for(&server).active_sprint().await.unwrap();
        assert_eq!(sprint, 2);
    }

    #[tokio::test]
    async fn board_without_active_sprint_uses_the_most_recent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/agile/1.0/board/7/sprint"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "values": [
                    {"id": 1, "state": "closed"},
                    {"id": 4, "state": "closed"}
                ],
                "isLast": true
            })))
            .mount(&server)
            .await;

        let sprint = client_for(&server).active_sprint().await.unwrap();
        assert_eq!(sprint, 4);
    }

    #[tokio::test]
    async fn binding_posts_all_keys_at_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/agile/1.0/sprint/2/issue"))
            .and(body_partial_json(serde_json::json!({
                "issues": ["DAT-11", "DAT-12"]
            })))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        client_for(&server)
            .bind_to_sprint(2, &["DAT-11".into(), "DAT-12".into()])
            .await
            .unwrap();
    }
}
