//! # sentry-reconciler
//!
//! The resource existence reconciliation engine. Walks catalog groups
//! (one per cloud project), builds each project's live inventory exactly
//! once, probes every declared resource through a kind-keyed strategy
//! registry, and aggregates `NotFound` verdicts into the canonical
//! discrepancy report.
//!
//! # Failure isolation
//!
//! The engine's core invariant: one resource's timeout, transport error,
//! or malformed catalog entry never aborts its siblings, its package, or
//! its project. Every probe runs under a per-call deadline and returns a
//! typed [`ProbeOutcome`](sentry_core::ProbeOutcome) instead of raising.
//! Only an unreachable catalog service stops a pass, and that surfaces
//! as [`RunStatus::Skipped`](sentry_core::RunStatus) rather than a
//! partial report.

pub mod config;
pub mod engine;
pub mod error;
pub mod package;
pub mod probe;
pub mod project;

pub use config::ReconcilerConfig;
pub use engine::CatalogReconciler;
pub use error::{Error, Result};
pub use package::PackageReconciler;
pub use probe::{Probe, ProbeRegistry, ResourceSpec};
pub use project::ProjectReconciler;
