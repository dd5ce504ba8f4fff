//! Error types for the cloud crate.

use thiserror::Error;

/// Result type for cloud operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the cloud platform's listing and check APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// The platform does not know the project. Recovered locally by the
    /// reconciler into a single synthetic discrepancy.
    #[error("project '{project_id}' not found on the cloud platform")]
    ProjectNotFound { project_id: String },

    /// The caller is not allowed to list this resource kind.
    #[error("access forbidden while listing {what} for '{project_id}'")]
    Forbidden { project_id: String, what: String },

    /// A listing call failed for any other reason.
    #[error("cloud API '{what}' failed: {reason}")]
    ApiFailed { what: String, reason: String },

    /// Token provider could not supply a credential.
    #[error("token acquisition failed: {reason}")]
    Token { reason: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parse error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Create a project-not-found error.
    pub fn project_not_found(project_id: impl Into<String>) -> Self {
        Self::ProjectNotFound {
            project_id: project_id.into(),
        }
    }

    /// Create a forbidden error.
    pub fn forbidden(project_id: impl Into<String>, what: impl Into<String>) -> Self {
        Self::Forbidden {
            project_id: project_id.into(),
            what: what.into(),
        }
    }

    /// Create an API-failed error.
    pub fn api_failed(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ApiFailed {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Create a token error.
    pub fn token(reason: impl Into<String>) -> Self {
        Self::Token {
            reason: reason.into(),
        }
    }

    /// Whether this error means the whole project is missing.
    pub const fn is_project_not_found(&self) -> bool {
        matches!(self, Self::ProjectNotFound { .. })
    }
}
