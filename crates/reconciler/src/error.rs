//! Error types for the reconciliation engine.
//!
//! Only collaborator failures that are fatal to a whole pass surface
//! here; per-resource and per-project conditions are recovered inside
//! the reconcilers and never become errors.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal engine errors.
#[derive(Error, Debug)]
pub enum Error {
    /// The catalog service failed mid-pass (beyond the initial
    /// reachability short-circuit).
    #[error("catalog error: {0}")]
    Catalog(#[from] sentry_catalog::Error),
}
