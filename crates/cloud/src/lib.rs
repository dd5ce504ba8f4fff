//! # sentry-cloud
//!
//! Cloud-platform capabilities consumed by the reconciliation engine:
//! the enabled-service listing, per-kind live inventories, and the plain
//! HTTP check used for API-kind resources.
//!
//! The engine depends on the [`CloudInventoryApi`] and [`EndpointCheck`]
//! traits only; [`GcpRestClient`] and [`HttpEndpointCheck`] are the
//! production implementations over the platform's REST surfaces.
//! Credential acquisition stays behind the [`TokenProvider`] seam.

pub mod api;
pub mod error;
pub mod rest;
pub mod token;

pub use api::{CloudInventoryApi, EndpointCheck, HttpEndpointCheck};
pub use error::{Error, Result};
pub use rest::{CloudConfig, GcpRestClient};
pub use token::{StaticTokenProvider, TokenProvider};
