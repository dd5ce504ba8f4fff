//! The ticket-title convention and its inverse.
//!
//! Titles are the dedup fingerprint: `"<kind>: '<resource name>'"`,
//! e.g. `Resource not found: 'bkt1'`. The parse below is the exact
//! inverse of [`format_title`] and is shared by every dedup path.
//!
//! Known fragility, preserved for compatibility: a resource name that
//! itself contains `'` still parses (the capture is greedy to the last
//! quote), but a name whose trailing quote is missing, or a hand-edited
//! title, round-trips wrong. When parsing fails the dedup fails *open*
//! and a duplicate ticket may be created; do not "fix" the convention
//! without migrating the open tickets that use it.

use std::sync::OnceLock;

use regex::Regex;

// The literal pattern cannot fail to compile; the tests below pin it.
#[allow(clippy::unwrap_used)]
fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^.*: '(.*)'$").unwrap())
}

/// Render the conventional ticket title for a discrepancy.
pub fn format_title(message: &str, resource_name: &str) -> String {
    format!("{message}: '{resource_name}'")
}

/// Recover the resource name from a conventional title, if it parses.
pub fn parse_resource_name(title: &str) -> Option<String> {
    title_pattern()
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn format_and_parse_are_inverse() {
        let title = format_title("Resource not found", "bkt1");
        assert_eq!(title, "Resource not found: 'bkt1'");
        assert_eq!(parse_resource_name(&title).as_deref(), Some("bkt1"));
    }

    #[test]
    fn project_titles_parse_too() {
        let title = format_title("Project not found", "proj-b");
        assert_eq!(parse_resource_name(&title).as_deref(), Some("proj-b"));
    }

    #[test]
    fn embedded_quotes_survive_the_round_trip() {
        // The greedy capture keeps everything between the first ": '"
        // boundary's quote and the final quote.
        let title = format_title("Resource not found", "it's-a-topic");
        assert_eq!(
            parse_resource_name(&title).as_deref(),
            Some("it's-a-topic")
        );
    }

    #[test]
    fn unconventional_titles_do_not_parse() {
        assert_eq!(parse_resource_name("Investigate flaky ingest"), None);
        assert_eq!(parse_resource_name("Resource not found: bkt1"), None);
    }
}
