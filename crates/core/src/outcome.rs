//! Typed probe verdicts and the pass-level status signal.

use crate::discrepancy::Discrepancy;

/// The verdict of a single existence probe.
///
/// Conceptually each resource moves `Unchecked -> {Found, NotFound,
/// Indeterminate}` exactly once. `Indeterminate` covers timeouts and
/// transient probe failures; it deliberately suppresses the flag rather
/// than raising one, so slow backends never produce false positives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The resource exists.
    Found,
    /// The resource is declared but absent; emits a discrepancy.
    NotFound,
    /// The probe could not decide; skipped, no discrepancy.
    Indeterminate {
        /// Why the verdict could not be reached (timeout, transport error).
        reason: String,
    },
}

impl ProbeOutcome {
    /// Build an indeterminate verdict.
    pub fn indeterminate(reason: impl Into<String>) -> Self {
        Self::Indeterminate {
            reason: reason.into(),
        }
    }

    /// Whether this verdict emits a discrepancy.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<bool> for ProbeOutcome {
    fn from(found: bool) -> Self {
        if found { Self::Found } else { Self::NotFound }
    }
}

/// Whether a reconciliation pass actually executed.
///
/// `Skipped` is the short-circuit signal for an unreachable catalog
/// service; no partial report is emitted in that case.
#[derive(Debug, Clone)]
pub enum RunStatus {
    /// The pass ran to completion over every project.
    Completed {
        /// All discrepancies, in catalog-listing order.
        discrepancies: Vec<Discrepancy>,
    },
    /// The pass did not run.
    Skipped {
        /// Why the pass was skipped.
        reason: String,
    },
}

impl RunStatus {
    /// `true` when the pass executed.
    pub const fn executed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_conversion_matches_membership_semantics() {
        assert_eq!(ProbeOutcome::from(true), ProbeOutcome::Found);
        assert_eq!(ProbeOutcome::from(false), ProbeOutcome::NotFound);
        assert!(ProbeOutcome::NotFound.is_not_found());
        assert!(!ProbeOutcome::indeterminate("timeout").is_not_found());
    }

    #[test]
    fn skipped_pass_did_not_execute() {
        let status = RunStatus::Skipped {
            reason: "catalog unreachable".into(),
        };
        assert!(!status.executed());
        let status = RunStatus::Completed {
            discrepancies: vec![],
        };
        assert!(status.executed());
    }
}
