//! Probe strategies, one per resource kind, behind a registry.
//!
//! The registry replaces per-kind branching in the reconcilers: adding a
//! new resource kind means registering a strategy, not editing control
//! flow.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sentry_core::{ProbeOutcome, ProjectInventory, ResourceKind};
use sentry_cloud::EndpointCheck;
use tracing::debug;

/// A declared resource after field validation: name and kind are known
/// to be present, the URL may not be.
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    /// Declared resource name.
    pub name: String,
    /// Parsed resource kind.
    pub kind: ResourceKind,
    /// Declared access URL, if any.
    pub url: Option<String>,
}

/// One existence-check strategy.
///
/// Implementations must return a verdict, never raise: transport
/// problems inside a probe classify the single resource, they do not
/// propagate.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Decide whether the declared resource exists.
    async fn probe(&self, resource: &ResourceSpec, inventory: &ProjectInventory) -> ProbeOutcome;
}

/// Found iff the name is a member of the kind's live inventory set.
struct MembershipProbe;

#[async_trait]
impl Probe for MembershipProbe {
    async fn probe(&self, resource: &ResourceSpec, inventory: &ProjectInventory) -> ProbeOutcome {
        inventory.contains(resource.kind, &resource.name).into()
    }
}

/// Found iff the project has the kind's platform service enabled.
///
/// This is a feature-enablement check, not a per-resource one: every
/// datastore/firestore resource of a project shares the same verdict.
struct ServiceFlagProbe {
    service: &'static str,
}

#[async_trait]
impl Probe for ServiceFlagProbe {
    async fn probe(&self, _resource: &ResourceSpec, inventory: &ProjectInventory) -> ProbeOutcome {
        inventory.has_service(self.service).into()
    }
}

/// Found iff a GET against the declared URL answers successfully.
///
/// A resource without a URL is trivially found (there is nothing to
/// check). A transport error counts as not-found for this one resource.
struct ApiProbe {
    endpoint: Arc<dyn EndpointCheck>,
}

#[async_trait]
impl Probe for ApiProbe {
    async fn probe(&self, resource: &ResourceSpec, _inventory: &ProjectInventory) -> ProbeOutcome {
        let Some(url) = resource.url.as_deref().filter(|u| !u.is_empty()) else {
            return ProbeOutcome::Found;
        };
        match self.endpoint.is_ok(url).await {
            Ok(ok) => ok.into(),
            Err(e) => {
                debug!(resource = %resource.name, url, error = %e, "Endpoint probe errored");
                ProbeOutcome::NotFound
            }
        }
    }
}

/// Kind-keyed strategy table.
pub struct ProbeRegistry {
    probes: HashMap<ResourceKind, Arc<dyn Probe>>,
}

impl ProbeRegistry {
    /// The standard table: membership probes for listed kinds, service
    /// flags for the document stores, the HTTP check for API resources.
    pub fn standard(endpoint: Arc<dyn EndpointCheck>) -> Self {
        let membership: Arc<dyn Probe> = Arc::new(MembershipProbe);
        let mut probes: HashMap<ResourceKind, Arc<dyn Probe>> = HashMap::new();
        for kind in ResourceKind::ALL {
            let probe: Arc<dyn Probe> = match kind {
                ResourceKind::Api => Arc::new(ApiProbe {
                    endpoint: endpoint.clone(),
                }),
                _ => match kind.service_flag() {
                    Some(service) => Arc::new(ServiceFlagProbe { service }),
                    None => membership.clone(),
                },
            };
            probes.insert(kind, probe);
        }
        Self { probes }
    }

    /// Replace or add the strategy for one kind.
    pub fn register(&mut self, kind: ResourceKind, probe: Arc<dyn Probe>) {
        self.probes.insert(kind, probe);
    }

    /// Look up the strategy for a kind.
    pub fn get(&self, kind: ResourceKind) -> Option<&Arc<dyn Probe>> {
        self.probes.get(&kind)
    }
}
