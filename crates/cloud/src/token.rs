//! Credential seam: the engine never acquires tokens itself.

use async_trait::async_trait;

use crate::error::Result;

/// Supplies bearer tokens for platform API calls.
///
/// Token refresh, delegation, and signing are external concerns; the
/// reconciler just asks for a usable token per request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A currently valid access token.
    async fn access_token(&self) -> Result<String>;
}

/// A fixed, externally supplied token (e.g. injected via environment by
/// the surrounding orchestration).
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wrap an already acquired token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}
