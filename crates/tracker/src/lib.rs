//! # sentry-tracker
//!
//! The bridge from discrepancies to issue-tracker tickets. The tracker
//! is the sole persistence layer for "already reported": dedup works by
//! searching open tickets and parsing their convention-formatted titles
//! back into resource names, so re-running the engine against unchanged
//! state files nothing new.
//!
//! [`TicketSync`] drives the sequence: dedup search, title parse, bulk
//! create, sprint bind. [`JiraClient`] is the production [`TrackerApi`];
//! tests use in-memory fakes.

pub mod api;
pub mod error;
pub mod jira;
pub mod sync;
pub mod title;

pub use api::{IssueSummary, NewTicket, SprintId, TrackerApi};
pub use error::{Error, Result};
pub use jira::{JiraClient, TrackerConfig};
pub use sync::{SyncConfig, SyncReport, TicketSync};
