//! Per-project reconciliation: inventory building and package driving.

use std::collections::HashSet;
use std::sync::Arc;

use sentry_catalog::CatalogApi;
use sentry_cloud::CloudInventoryApi;
use sentry_core::{CatalogGroup, Discrepancy, ProjectInventory};
use tracing::{info, warn};

use crate::config::ReconcilerConfig;
use crate::error::Result;
use crate::package::PackageReconciler;
use crate::probe::ProbeRegistry;

/// Services that gate each inventory kind: a project without the service
/// enabled gets an empty inventory for that kind without a listing call.
const SVC_PUBSUB: &str = "pubsub.googleapis.com";
const SVC_STORAGE: &str = "storage-api.googleapis.com";
const SVC_SQL: &str = "sqladmin.googleapis.com";
const SVC_BIGQUERY: &str = "bigquery.googleapis.com";

/// What building a project's inventory concluded.
enum InventoryBuild {
    /// Inventory ready; `project_missing` is set when some listing
    /// reported the project gone (the synthetic discrepancy is emitted
    /// at most once).
    Ready {
        inventory: Box<ProjectInventory>,
        project_missing: bool,
    },
    /// The enabled-services listing itself reported the project gone;
    /// nothing else was fetched and no packages should be probed.
    ProjectGone,
}

/// Reconciles one catalog group (one cloud project).
pub struct ProjectReconciler {
    catalog: Arc<dyn CatalogApi>,
    cloud: Arc<dyn CloudInventoryApi>,
    packages: PackageReconciler,
}

impl ProjectReconciler {
    /// Create a project reconciler from injected capabilities.
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        cloud: Arc<dyn CloudInventoryApi>,
        registry: Arc<ProbeRegistry>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            catalog,
            cloud,
            packages: PackageReconciler::new(registry, config),
        }
    }

    /// Reconcile every package of `group` against live cloud state.
    ///
    /// Returns discrepancies in catalog-listing order; the synthetic
    /// project-missing record, when present, comes first. Only catalog
    /// failures propagate (fatal to the pass); cloud failures degrade
    /// locally.
    pub async fn reconcile(&self, group: &CatalogGroup) -> Result<Vec<Discrepancy>> {
        let project_id = group.project_id.as_str();
        info!(project_id, packages = group.packages.len(), "Reconciling project");

        let (inventory, mut discrepancies) = match self.build_inventory(project_id).await {
            InventoryBuild::ProjectGone => {
                info!(project_id, "Project not found on the cloud platform, skipping packages");
                return Ok(vec![Discrepancy::project_not_found(project_id)]);
            }
            InventoryBuild::Ready {
                inventory,
                project_missing,
            } => {
                let synthetic = if project_missing {
                    vec![Discrepancy::project_not_found(project_id)]
                } else {
                    Vec::new()
                };
                (inventory, synthetic)
            }
        };

        for package in &group.packages {
            let full = match self.catalog.package_show(&package.id).await {
                Ok(full) => full,
                Err(sentry_catalog::Error::PackageNotFound { .. }) => {
                    warn!(package = %package.name, "Package vanished from catalog, skipping");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            discrepancies.extend(
                self.packages
                    .reconcile(project_id, &full, &inventory)
                    .await,
            );
        }
        Ok(discrepancies)
    }

    /// Fetch the enabled-service set and every gated inventory kind,
    /// each at most once. Cloud failures never propagate: a missing
    /// project marks the build, anything else degrades to an empty set.
    async fn build_inventory(&self, project_id: &str) -> InventoryBuild {
        let mut inventory = ProjectInventory::new();
        let mut project_missing = false;

        match self.cloud.list_enabled_services(project_id).await {
            Ok(services) => inventory.enabled_services = services.into_iter().collect(),
            Err(e) if e.is_project_not_found() => {
                return InventoryBuild::ProjectGone;
            }
            Err(e) => {
                warn!(project_id, error = %e, "Service listing failed, degrading to empty set");
            }
        }

        if inventory.has_service(SVC_PUBSUB) {
            inventory.topics = self
                .fetch(project_id, "topics", &mut project_missing, self.cloud.list_topics(project_id))
                .await;
            inventory.subscriptions = self
                .fetch(
                    project_id,
                    "subscriptions",
                    &mut project_missing,
                    self.cloud.list_subscriptions(project_id),
                )
                .await;
        }
        if inventory.has_service(SVC_STORAGE) {
            inventory.buckets = self
                .fetch(
                    project_id,
                    "buckets",
                    &mut project_missing,
                    self.cloud.list_buckets(project_id),
                )
                .await;
        }
        if inventory.has_service(SVC_SQL) {
            inventory.sql_instances = self
                .fetch(
                    project_id,
                    "sql instances",
                    &mut project_missing,
                    self.cloud.list_sql_instances(project_id),
                )
                .await;
            let mut databases = HashSet::new();
            for instance in inventory.sql_instances.clone() {
                databases.extend(
                    self.fetch(
                        project_id,
                        "sql databases",
                        &mut project_missing,
                        self.cloud.list_sql_databases(project_id, &instance),
                    )
                    .await,
                );
            }
            inventory.sql_databases = databases;
        }
        if inventory.has_service(SVC_BIGQUERY) {
            inventory.bigquery_datasets = self
                .fetch(
                    project_id,
                    "bigquery datasets",
                    &mut project_missing,
                    self.cloud.list_bigquery_datasets(project_id),
                )
                .await;
        }

        InventoryBuild::Ready {
            inventory: Box::new(inventory),
            project_missing,
        }
    }

    /// Guard one inventory listing: project-missing marks the build
    /// (once), any other failure degrades to an empty set.
    async fn fetch(
        &self,
        project_id: &str,
        what: &str,
        project_missing: &mut bool,
        listing: impl std::future::Future<Output = sentry_cloud::Result<Vec<String>>>,
    ) -> HashSet<String> {
        match listing.await {
            Ok(names) => names.into_iter().collect(),
            Err(e) if e.is_project_not_found() => {
                if !*project_missing {
                    info!(project_id, what, "Project not found while listing inventory");
                }
                *project_missing = true;
                HashSet::new()
            }
            Err(e) => {
                warn!(project_id, what, error = %e, "Inventory listing failed, using empty set");
                HashSet::new()
            }
        }
    }
}
