//! Per-package reconciliation with per-probe deadlines.

use std::sync::Arc;

use sentry_core::{CatalogPackage, Discrepancy, ProbeOutcome, ProjectInventory, ResourceKind};
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::ReconcilerConfig;
use crate::probe::{ProbeRegistry, ResourceSpec};

/// Walks one package's declared resources and collects a discrepancy for
/// every probe that comes back `NotFound`.
///
/// Failure isolation lives here: each probe runs under the configured
/// deadline, timeouts and indeterminate verdicts are skipped (never
/// flagged), and nothing a single resource does can stop its siblings.
pub struct PackageReconciler {
    registry: Arc<ProbeRegistry>,
    config: ReconcilerConfig,
}

impl PackageReconciler {
    /// Create a reconciler over the given strategy table.
    pub fn new(registry: Arc<ProbeRegistry>, config: ReconcilerConfig) -> Self {
        Self { registry, config }
    }

    /// Probe every declared resource of `package` against `inventory`.
    ///
    /// Returns discrepancies in declaration order.
    pub async fn reconcile(
        &self,
        project_id: &str,
        package: &CatalogPackage,
        inventory: &ProjectInventory,
    ) -> Vec<Discrepancy> {
        let package_name = package.display_name();
        if package.resources.is_empty() {
            info!(package = %package_name, "Dataset does not have any resources");
            return Vec::new();
        }

        let mut discrepancies = Vec::new();
        for resource in &package.resources {
            let (Some(name), Some(format)) = (resource.name.as_deref(), resource.format.as_deref())
            else {
                info!(
                    package = %package_name,
                    ?resource,
                    "Resource does not have the correct fields"
                );
                continue;
            };
            let Some(kind) = ResourceKind::parse(format) else {
                debug!(resource = name, format, "Skipping resource with unhandled format");
                continue;
            };
            let Some(probe) = self.registry.get(kind) else {
                debug!(resource = name, %kind, "No probe registered for kind");
                continue;
            };

            let spec = ResourceSpec {
                name: name.to_string(),
                kind,
                url: resource.url.clone(),
            };
            let outcome = match timeout(self.config.probe_timeout, probe.probe(&spec, inventory))
                .await
            {
                Ok(outcome) => outcome,
                Err(_) => ProbeOutcome::indeterminate("probe deadline exceeded"),
            };

            match outcome {
                ProbeOutcome::Found => {}
                ProbeOutcome::NotFound => {
                    discrepancies.push(Discrepancy::resource_not_found(
                        project_id,
                        &package_name,
                        name,
                        kind.as_str(),
                        resource.url.as_deref().unwrap_or(""),
                    ));
                }
                ProbeOutcome::Indeterminate { reason } => {
                    debug!(resource = name, %kind, reason, "Probe indeterminate, skipping");
                }
            }
        }
        discrepancies
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use sentry_core::CatalogResource;

    use super::*;
    use crate::probe::Probe;

    struct NeverEndpoint;

    #[async_trait]
    impl sentry_cloud::EndpointCheck for NeverEndpoint {
        async fn is_ok(&self, _url: &str) -> sentry_cloud::Result<bool> {
            Ok(false)
        }
    }

    struct CountingProbe {
        calls: Arc<AtomicUsize>,
        inner: Arc<dyn Probe>,
    }

    #[async_trait]
    impl Probe for CountingProbe {
        async fn probe(
            &self,
            resource: &ResourceSpec,
            inventory: &ProjectInventory,
        ) -> ProbeOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.probe(resource, inventory).await
        }
    }

    struct SlowProbe;

    #[async_trait]
    impl Probe for SlowProbe {
        async fn probe(
            &self,
            _resource: &ResourceSpec,
            _inventory: &ProjectInventory,
        ) -> ProbeOutcome {
            tokio::time::sleep(Duration::from_secs(600)).await;
            ProbeOutcome::NotFound
        }
    }

    fn package(resources: Vec<CatalogResource>) -> CatalogPackage {
        CatalogPackage {
            id: "pkg-1".into(),
            name: "traffic_data".into(),
            resources,
        }
    }

    fn counted_registry(calls: Arc<AtomicUsize>) -> ProbeRegistry {
        let mut registry = ProbeRegistry::standard(Arc::new(NeverEndpoint));
        for kind in ResourceKind::ALL {
            let inner = registry.get(kind).unwrap().clone();
            registry.register(
                kind,
                Arc::new(CountingProbe {
                    calls: calls.clone(),
                    inner,
                }),
            );
        }
        registry
    }

    #[tokio::test]
    async fn empty_package_probes_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let reconciler = PackageReconciler::new(
            Arc::new(counted_registry(calls.clone())),
            ReconcilerConfig::default(),
        );

        let result = reconciler
            .reconcile("proj-a", &package(vec![]), &ProjectInventory::new())
            .await;
        assert!(result.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unrecognized_format_is_skipped_without_probing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let reconciler = PackageReconciler::new(
            Arc::new(counted_registry(calls.clone())),
            ReconcilerConfig::default(),
        );

        let pkg = package(vec![CatalogResource::new("sheet1", "spreadsheet")]);
        let result = reconciler
            .reconcile("proj-a", &pkg, &ProjectInventory::new())
            .await;
        assert!(result.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_fields_are_skipped_without_probing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let reconciler = PackageReconciler::new(
            Arc::new(counted_registry(calls.clone())),
            ReconcilerConfig::default(),
        );

        let pkg = package(vec![
            CatalogResource {
                name: Some("nameless-format".into()),
                format: None,
                url: None,
            },
            CatalogResource {
                name: None,
                format: Some("topic".into()),
                url: None,
            },
        ]);
        let result = reconciler
            .reconcile("proj-a", &pkg, &ProjectInventory::new())
            .await;
        assert!(result.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn matching_bucket_yields_no_discrepancy() {
        let reconciler = PackageReconciler::new(
            Arc::new(ProbeRegistry::standard(Arc::new(NeverEndpoint))),
            ReconcilerConfig::default(),
        );
        let mut inventory = ProjectInventory::new();
        inventory.buckets.insert("bkt1".into());

        let pkg = package(vec![CatalogResource::new("bkt1", "blob-storage")]);
        let result = reconciler.reconcile("proj-a", &pkg, &inventory).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn missing_bucket_yields_one_typed_discrepancy() {
        let reconciler = PackageReconciler::new(
            Arc::new(ProbeRegistry::standard(Arc::new(NeverEndpoint))),
            ReconcilerConfig::default(),
        );

        let pkg = package(vec![CatalogResource::new("bkt1", "blob-storage")]);
        let result = reconciler
            .reconcile("proj-a", &pkg, &ProjectInventory::new())
            .await;
        assert_eq!(result.len(), 1);
        let d = &result[0];
        assert_eq!(d.message, "Resource not found");
        assert_eq!(d.resource_type, "blob-storage");
        assert_eq!(d.resource_name, "bkt1");
        assert_eq!(d.project_id, "proj-a");
        assert_eq!(d.package_name, "traffic-data");
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_probe_is_skipped_and_siblings_still_run() {
        let mut registry = ProbeRegistry::standard(Arc::new(NeverEndpoint));
        registry.register(ResourceKind::BlobStorage, Arc::new(SlowProbe));
        let reconciler = PackageReconciler::new(
            Arc::new(registry),
            ReconcilerConfig::default().probe_timeout(Duration::from_secs(1)),
        );

        let mut inventory = ProjectInventory::new();
        inventory.topics.insert("t-present".into());

        let pkg = package(vec![
            CatalogResource::new("slow-bucket", "blob-storage"),
            CatalogResource::new("t-present", "topic"),
            CatalogResource::new("t-absent", "topic"),
        ]);
        let result = reconciler.reconcile("proj-a", &pkg, &inventory).await;

        // The slow probe timed out: no flag for it, but the siblings
        // still got real verdicts.
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].resource_name, "t-absent");
        assert_eq!(result[0].resource_type, "topic");
    }
}
