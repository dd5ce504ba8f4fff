//! Error types for the catalog crate.

use thiserror::Error;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the catalog service.
///
/// Reachability is not an error: the engine consumes it as a boolean
/// gate and short-circuits the pass.
#[derive(Error, Debug)]
pub enum Error {
    /// A catalog action reported failure or returned an unusable payload.
    #[error("catalog action '{action}' failed: {reason}")]
    ActionFailed { action: String, reason: String },

    /// The requested group does not exist in the catalog.
    #[error("catalog group '{group}' not found")]
    GroupNotFound { group: String },

    /// The requested package does not exist in the catalog.
    #[error("catalog package '{package}' not found")]
    PackageNotFound { package: String },

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
    /// Create an action-failed error.
    pub fn action_failed(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ActionFailed {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Create a group-not-found error.
    pub fn group_not_found(group: impl Into<String>) -> Self {
        Self::GroupNotFound {
            group: group.into(),
        }
    }

    /// Create a package-not-found error.
    pub fn package_not_found(package: impl Into<String>) -> Self {
        Self::PackageNotFound {
            package: package.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_action_and_reason() {
        let err = Error::action_failed("group_list", "500 Internal Server Error");
        assert!(err.to_string().contains("group_list"));
        assert!(err.to_string().contains("500"));
    }
}
