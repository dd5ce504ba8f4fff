//! Ticket Sync: the deduplicating bridge from discrepancies to tickets.
//!
//! Runs strictly after the reconciliation pass completes (never
//! incrementally), because the dedup search reflects tracker state at
//! one point in time. Every discrepancy handed in is exactly either
//! deduplicated against an open ticket or included in the bulk-create
//! attempt; nothing is dropped silently.

use std::collections::HashMap;
use std::sync::Arc;

use sentry_core::Discrepancy;
use tracing::{error, info};

use crate::api::{NewTicket, TrackerApi};
use crate::error::Result;
use crate::title;

/// Scope of the dedup query.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Project the dedup query is scoped to.
    pub project_key: String,
    /// Issue type new tickets carry (and the dedup query filters on).
    pub issue_type: String,
    /// Epic the tickets belong to.
    pub epic_link: Option<String>,
    /// Statuses that count as "done" and fall out of dedup.
    pub done_statuses: Vec<String>,
    /// Marker substring every conventional title contains.
    pub marker: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            project_key: String::new(),
            issue_type: "Bug".to_string(),
            epic_link: None,
            done_statuses: vec!["Done".to_string(), "Cancelled".to_string()],
            // Matches both "Resource not found: '..'" and
            // "Project not found: '..'" titles.
            marker: "not found".to_string(),
        }
    }
}

/// What one sync run did.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Keys of tickets created this run.
    pub created: Vec<String>,
    /// Discrepancies skipped because an open ticket already covers them.
    pub deduplicated: usize,
}

/// The discrepancy→ticket bridge.
pub struct TicketSync {
    tracker: Arc<dyn TrackerApi>,
    config: SyncConfig,
}

impl TicketSync {
    /// Create a sync over the given tracker.
    pub fn new(tracker: Arc<dyn TrackerApi>, config: SyncConfig) -> Self {
        Self { tracker, config }
    }

    /// The dedup query: fixed issue type, not-done statuses, the epic,
    /// and the conventional title marker.
    fn dedup_jql(&self) -> String {
        let statuses = self.config.done_statuses.join(", ");
        let mut jql = String::new();
        if !self.config.project_key.is_empty() {
            jql.push_str(&format!("project = {} AND ", self.config.project_key));
        }
        jql.push_str(&format!(
            "issuetype = {} AND status not in ({statuses})",
            self.config.issue_type
        ));
        if let Some(epic) = &self.config.epic_link {
            jql.push_str(&format!(" AND \"Epic Link\" = {epic}"));
        }
        jql.push_str(&format!(" AND text ~ \"{}\"", self.config.marker));
        jql
    }

    /// Ticket body: the full catalog path for resource discrepancies, a
    /// project-only message for the synthetic record.
    fn describe(discrepancy: &Discrepancy) -> String {
        if discrepancy.is_project_level() {
            format!(
                "Project '{}' is declared in the data catalog but could not be found on the cloud platform.\nDashboard: {}",
                discrepancy.project_id, discrepancy.access_url
            )
        } else {
            format!(
                "Declared resource is missing on the cloud platform.\nPath: {}/{}/{}\nType: {}\nAccess URL: {}",
                discrepancy.project_id,
                discrepancy.package_name,
                discrepancy.resource_name,
                discrepancy.resource_type,
                discrepancy.access_url
            )
        }
    }

    /// Run one sync over the full discrepancy sequence of a pass.
    ///
    /// Idempotent against unchanged catalog/cloud/tracker state: the
    /// membership test runs against live tracker state, so a re-run
    /// creates zero tickets.
    pub async fn run(&self, discrepancies: &[Discrepancy]) -> Result<SyncReport> {
        if discrepancies.is_empty() {
            info!("No discrepancies to report");
            return Ok(SyncReport::default());
        }

        let jql = self.dedup_jql();
        let existing = self.tracker.search_summaries(&jql).await?;
        // Title parse is the inverse of the naming convention; a title
        // that fails to parse simply never matches (dedup fails open).
        let index: HashMap<String, String> = existing
            .iter()
            .filter_map(|issue| {
                title::parse_resource_name(&issue.summary).map(|name| (name, issue.key.clone()))
            })
            .collect();

        let mut tickets = Vec::new();
        let mut deduplicated = 0usize;
        for discrepancy in discrepancies {
            if let Some(key) = index.get(&discrepancy.resource_name) {
                info!(
                    resource = %discrepancy.resource_name,
                    ticket = %key,
                    "Already reported, skipping"
                );
                deduplicated = deduplicated.saturating_add(1);
                continue;
            }
            tickets.push(NewTicket {
                summary: title::format_title(&discrepancy.message, &discrepancy.resource_name),
                description: Self::describe(discrepancy),
            });
        }

        if tickets.is_empty() {
            info!(deduplicated, "All discrepancies already have open tickets");
            return Ok(SyncReport {
                created: Vec::new(),
                deduplicated,
            });
        }

        let created = self.tracker.bulk_create(&tickets).await.map_err(|e| {
            error!(tickets = tickets.len(), error = %e, "Bulk ticket creation failed");
            e
        })?;

        let sprint = self.tracker.active_sprint().await?;
        if let Err(e) = self.tracker.bind_to_sprint(sprint, &created).await {
            // The tickets exist but are unbound; enumerate them so the
            // binding can be reconciled by hand.
            error!(sprint, orphaned = ?created, error = %e, "Sprint binding failed");
            return Err(e);
        }

        info!(created = created.len(), deduplicated, "Ticket sync complete");
        Ok(SyncReport {
            created,
            deduplicated,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Mutex;

    use async_trait::async_trait;
    use sentry_core::Discrepancy;

    use super::*;
    use crate::api::{IssueSummary, SprintId};
    use crate::error::Error;

    /// Tracker fake whose search reflects previously created tickets,
    /// like the real thing.
    #[derive(Default)]
    struct FakeTracker {
        open: Mutex<Vec<IssueSummary>>,
        bound: Mutex<Vec<(SprintId, Vec<String>)>>,
        fail_create: bool,
    }

    #[async_trait]
    impl TrackerApi for FakeTracker {
        async fn search_summaries(&self, _jql: &str) -> Result<Vec<IssueSummary>> {
            Ok(self.open.lock().unwrap().clone())
        }

        async fn bulk_create(&self, tickets: &[NewTicket]) -> Result<Vec<String>> {
            if self.fail_create {
                return Err(Error::create_failed("simulated outage"));
            }
            let mut open = self.open.lock().unwrap();
            let mut keys = Vec::new();
            for ticket in tickets {
                let key = format!("DAT-{}", open.len() + 1);
                open.push(IssueSummary {
                    key: key.clone(),
                    summary: ticket.summary.clone(),
                });
                keys.push(key);
            }
            Ok(keys)
        }

        async fn active_sprint(&self) -> Result<SprintId> {
            Ok(42)
        }

        async fn bind_to_sprint(&self, sprint: SprintId, issue_keys: &[String]) -> Result<()> {
            self.bound
                .lock()
                .unwrap()
                .push((sprint, issue_keys.to_vec()));
            Ok(())
        }
    }

    fn discrepancies() -> Vec<Discrepancy> {
        vec![
            Discrepancy::resource_not_found("proj-a", "traffic-data", "bkt1", "blob-storage", ""),
            Discrepancy::resource_not_found("proj-a", "traffic-data", "topicX", "topic", ""),
        ]
    }

    #[tokio::test]
    async fn first_run_creates_and_binds_all_tickets() {
        let tracker = Arc::new(FakeTracker::default());
        let sync = TicketSync::new(tracker.clone(), SyncConfig::default());

        let report = sync.run(&discrepancies()).await.unwrap();
        assert_eq!(report.created.len(), 2);
        assert_eq!(report.deduplicated, 0);

        let bound = tracker.bound.lock().unwrap();
        assert_eq!(bound.len(), 1);
        assert_eq!(bound[0].0, 42);
        assert_eq!(bound[0].1.len(), 2);
    }

    #[tokio::test]
    async fn second_run_with_same_state_creates_nothing() {
        let tracker = Arc::new(FakeTracker::default());
        let sync = TicketSync::new(tracker.clone(), SyncConfig::default());

        let first = sync.run(&discrepancies()).await.unwrap();
        assert_eq!(first.created.len(), 2);

        let second = sync.run(&discrepancies()).await.unwrap();
        assert!(second.created.is_empty());
        assert_eq!(second.deduplicated, 2);
        // Only the first run bound anything.
        assert_eq!(tracker.bound.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn open_ticket_from_an_earlier_pass_dedups_by_title() {
        let tracker = Arc::new(FakeTracker::default());
        tracker.open.lock().unwrap().push(IssueSummary {
            key: "DAT-7".into(),
            summary: "Resource not found: 'topicX'".into(),
        });
        let sync = TicketSync::new(tracker.clone(), SyncConfig::default());

        let report = sync.run(&discrepancies()).await.unwrap();
        assert_eq!(report.deduplicated, 1);
        assert_eq!(report.created.len(), 1);
        let open = tracker.open.lock().unwrap();
        assert!(open.iter().any(|i| i.summary.contains("'bkt1'")));
    }

    #[tokio::test]
    async fn project_level_record_gets_a_project_only_body() {
        let d = Discrepancy::project_not_found("proj-b");
        let body = TicketSync::describe(&d);
        assert!(body.contains("proj-b"));
        assert!(!body.contains("google-cloud-project/"));
    }

    #[tokio::test]
    async fn empty_input_never_touches_the_tracker() {
        let tracker = Arc::new(FakeTracker::default());
        let sync = TicketSync::new(tracker.clone(), SyncConfig::default());

        let report = sync.run(&[]).await.unwrap();
        assert!(report.created.is_empty());
        assert!(tracker.open.lock().unwrap().is_empty());
        assert!(tracker.bound.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_failure_surfaces_as_an_error() {
        let tracker = Arc::new(FakeTracker {
            fail_create: true,
            ..Default::default()
        });
        let sync = TicketSync::new(tracker, SyncConfig::default());

        let err = sync.run(&discrepancies()).await.unwrap_err();
        assert!(matches!(err, Error::CreateFailed { .. }));
    }

    #[test]
    fn jql_scopes_type_status_epic_and_marker() {
        let config = SyncConfig {
            project_key: "DAT".into(),
            epic_link: Some("DAT-100".into()),
            ..Default::default()
        };
        let sync = TicketSync::new(Arc::new(FakeTracker::default()), config);
        let jql = sync.dedup_jql();
        assert!(jql.starts_with("project = DAT AND "));
        assert!(jql.contains("issuetype = Bug"));
        assert!(jql.contains("status not in (Done, Cancelled)"));
        assert!(jql.contains("\"Epic Link\" = DAT-100"));
        assert!(jql.contains("text ~ \"not found\""));
    }
}
