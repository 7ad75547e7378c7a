//! Scan request and result structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Issue, IssueType, Severity};

/// Single page or bounded same-site crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    #[default]
    Single,
    Full,
}

/// Inbound scan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub url: String,
    #[serde(default)]
    pub mode: ScanMode,
}

impl ScanRequest {
    pub fn new(url: impl Into<String>, mode: ScanMode) -> Self {
        Self {
            url: url.into(),
            mode,
        }
    }

    /// Parse and validate the target URL.
    ///
    /// Only absolute `http`/`https` URLs with a host are accepted.
    pub fn target(&self) -> Result<Url> {
        let url = Url::parse(self.url.trim()).map_err(|e| AppError::invalid_url(&self.url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::invalid_url(
                &self.url,
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(AppError::invalid_url(&self.url, "missing host"));
        }
        Ok(url)
    }
}

/// Issues found on one fetched page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub url: String,
    pub issues: Vec<Issue>,
    pub total_issues: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

impl PageResult {
    /// Build a page result, deriving the counts from `issues`.
    pub fn new(url: impl Into<String>, issues: Vec<Issue>) -> Self {
        let (error_count, warning_count) = count_severities(&issues);
        Self {
            url: url.into(),
            total_issues: issues.len(),
            error_count,
            warning_count,
            issues,
        }
    }

    /// Zero-issue result for a page that could not be fetched.
    pub fn empty(url: impl Into<String>) -> Self {
        Self::new(url, Vec::new())
    }
}

/// Aggregated result of one scan invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub url: String,
    pub scanned_at: DateTime<Utc>,
    pub scan_mode: ScanMode,
    pub pages_scanned: usize,
    pub total_issues: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub passed_checks: usize,
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_results: Option<Vec<PageResult>>,
}

impl ScanResult {
    /// Issues grouped by type in report order; empty groups are omitted.
    pub fn issues_by_type(&self) -> Vec<(IssueType, Vec<&Issue>)> {
        IssueType::ALL
            .iter()
            .filter_map(|ty| {
                let group: Vec<&Issue> =
                    self.issues.iter().filter(|i| i.issue_type == *ty).collect();
                (!group.is_empty()).then_some((*ty, group))
            })
            .collect()
    }
}

/// Count `(errors, warnings)`.
pub(crate) fn count_severities(issues: &[Issue]) -> (usize, usize) {
    issues
        .iter()
        .fold((0, 0), |(errors, warnings), issue| match issue.severity {
            Severity::Error => (errors + 1, warnings),
            Severity::Warning => (errors, warnings + 1),
        })
}
