//! Error types for the tracker crate.
//!
//! Everything here is fatal to the sync step: silently dropping
//! discrepancies would be worse than stopping.

use thiserror::Error;

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the issue tracker.
#[derive(Error, Debug)]
pub enum Error {
    /// Tracker configuration or credentials are missing/invalid.
    #[error("tracker configuration error: {reason}")]
    Config { reason: String },

    /// The dedup search failed.
    #[error("issue search failed: {reason}")]
    SearchFailed { reason: String },

    /// Bulk creation failed (partially or totally). No per-ticket
    /// fallback is attempted.
    #[error("bulk issue creation failed: {reason}")]
    CreateFailed { reason: String },

    /// The board has no sprints to bind to.
    #[error("no sprint found for board {board_id}")]
    NoSprint { board_id: u64 },

    /// Sprint lookup or binding failed.
    #[error("sprint operation failed: {reason}")]
    SprintFailed { reason: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parse error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a search error.
    pub fn search_failed(reason: impl Into<String>) -> Self {
        Self::SearchFailed {
            reason: reason.into(),
        }
    }

    /// Create a creation error.
    pub fn create_failed(reason: impl Into<String>) -> Self {
        Self::CreateFailed {
            reason: reason.into(),
        }
    }

    /// Create a sprint error.
    pub fn sprint_failed(reason: impl Into<String>) -> Self {
        Self::SprintFailed {
            reason: reason.into(),
        }
    }
}
