//! The pass-level driver: catalog walk and report aggregation.

use std::sync::Arc;

use sentry_catalog::CatalogApi;
use sentry_cloud::{CloudInventoryApi, EndpointCheck};
use sentry_core::RunStatus;
use tracing::{info, warn};

use crate::config::ReconcilerConfig;
use crate::error::Result;
use crate::probe::ProbeRegistry;
use crate::project::ProjectReconciler;

/// Drives one full reconciliation pass: reachability gate, group walk,
/// per-project reconciliation, and aggregation into the final report.
pub struct CatalogReconciler {
    catalog: Arc<dyn CatalogApi>,
    projects: ProjectReconciler,
}

impl CatalogReconciler {
    /// Wire the engine from injected capabilities with the standard
    /// probe table.
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        cloud: Arc<dyn CloudInventoryApi>,
        endpoint: Arc<dyn EndpointCheck>,
        config: ReconcilerConfig,
    ) -> Self {
        Self::with_registry(
            catalog,
            cloud,
            Arc::new(ProbeRegistry::standard(endpoint)),
            config,
        )
    }

    /// Wire the engine with a custom probe table.
    pub fn with_registry(
        catalog: Arc<dyn CatalogApi>,
        cloud: Arc<dyn CloudInventoryApi>,
        registry: Arc<ProbeRegistry>,
        config: ReconcilerConfig,
    ) -> Self {
        let projects = ProjectReconciler::new(catalog.clone(), cloud, registry, config);
        Self { catalog, projects }
    }

    /// Run one pass.
    ///
    /// An unreachable catalog short-circuits to [`RunStatus::Skipped`]
    /// with no partial report. Catalog failures mid-walk are fatal; all
    /// cloud-side failures are recovered per project or per resource.
    pub async fn run(&self) -> Result<RunStatus> {
        if !self.catalog.is_reachable().await {
            return Ok(RunStatus::Skipped {
                reason: "catalog service unreachable".into(),
            });
        }

        let groups = self.catalog.group_list().await?;
        info!(projects = groups.len(), "Starting reconciliation pass");

        let mut discrepancies = Vec::new();
        for project_id in groups {
            let group = match self.catalog.group_show(&project_id).await {
                Ok(group) => group,
                Err(sentry_catalog::Error::GroupNotFound { .. }) => {
                    warn!(project_id, "Group vanished between list and show, skipping");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            discrepancies.extend(self.projects.reconcile(&group).await?);
        }

        info!(discrepancies = discrepancies.len(), "Reconciliation pass complete");
        Ok(RunStatus::Completed { discrepancies })
    }
}
