//! # sentry-catalog
//!
//! Client for the catalog service (a CKAN-style API). The reconciliation
//! engine depends only on the [`CatalogApi`] capability trait; the
//! [`CkanClient`] here is the production implementation over the
//! service's `group_list` / `group_show` / `package_show` actions.

pub mod api;
pub mod client;
pub mod error;

pub use api::CatalogApi;
pub use client::{CatalogConfig, CkanClient};
pub use error::{Error, Result};
