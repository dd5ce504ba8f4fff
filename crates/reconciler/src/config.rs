//! Configuration for the reconciliation engine.

use std::time::Duration;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Wall-clock budget for a single probe. On expiry the resource is
    /// classified indeterminate and skipped, never flagged.
    pub probe_timeout: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(20),
        }
    }
}

impl ReconcilerConfig {
    /// Override the per-probe deadline.
    #[must_use]
    pub const fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }
}
