//! # sentry-core
//!
//! Domain model for the catalog existence reconciliation engine.
//!
//! This crate defines the vocabulary shared by every other crate:
//!
//! - **Catalog entities** - groups, packages, and their declared resources
//! - **Resource kinds** - the closed set of backing-resource formats the
//!   engine knows how to probe
//! - **Inventories** - the live, per-project listings fetched from the
//!   cloud platform
//! - **Probe outcomes** - the typed `Found | NotFound | Indeterminate`
//!   verdict returned by every existence check
//! - **Discrepancies** - the canonical report record for a declared
//!   resource that could not be found
//!
//! No I/O happens here; clients and reconcilers live in sibling crates.

pub mod catalog;
pub mod discrepancy;
pub mod inventory;
pub mod kind;
pub mod outcome;

pub use catalog::{CatalogGroup, CatalogPackage, CatalogResource};
pub use discrepancy::{report_timestamp, Discrepancy};
pub use inventory::ProjectInventory;
pub use kind::ResourceKind;
pub use outcome::{ProbeOutcome, RunStatus};
