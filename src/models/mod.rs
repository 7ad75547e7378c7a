// src/models/mod.rs

//! Domain models for the scanner.
//!
//! Data flows one way through these types: raw markup becomes
//! [`ElementRecord`]s, rules turn records into [`Issue`]s, and the
//! orchestrator folds issues into a [`ScanResult`].

mod config;
mod element;
mod issue;
mod report;

// Re-export all public types
pub use config::{Config, OutputConfig, ScannerConfig};
pub use element::{
    ElementRecord, ExtractedElements, SNIPPET_ELLIPSIS, SNIPPET_MAX_CHARS, truncate_snippet,
};
pub use issue::{Issue, IssueType, IssueTypeInfo, Severity, wcag};
pub(crate) use report::count_severities;
pub use report::{PageResult, ScanMode, ScanRequest, ScanResult};
