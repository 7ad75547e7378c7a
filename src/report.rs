// src/report.rs

//! Plain-text scan reports.

use crate::models::{ScanMode, ScanResult};
use crate::services::CHECKS_PERFORMED;

const RULE: &str = "------------------------------------------------------------";

/// Render a scan result for terminal output.
///
/// Issues are grouped by type in report order; types without issues are
/// left out.
pub fn render_text(result: &ScanResult) -> String {
    let mut lines = vec![
        format!("Accessibility report for {}", result.url),
        format!(
            "Scanned at {} ({}, {} page{})",
            result.scanned_at.format("%Y-%m-%d %H:%M:%S UTC"),
            match result.scan_mode {
                ScanMode::Single => "single page",
                ScanMode::Full => "full site",
            },
            result.pages_scanned,
            if result.pages_scanned == 1 { "" } else { "s" }
        ),
        RULE.to_string(),
        format!(
            "Issues: {}  Errors: {}  Warnings: {}  Passed checks: {}/{}",
            result.total_issues,
            result.error_count,
            result.warning_count,
            result.passed_checks,
            CHECKS_PERFORMED
        ),
    ];

    if result.issues.is_empty() {
        lines.push(String::new());
        lines.push("No issues found.".to_string());
    }

    for (issue_type, issues) in result.issues_by_type() {
        let info = issue_type.info();
        lines.push(String::new());
        lines.push(format!("{} ({})", info.label, issues.len()));
        lines.push(format!("  {}", info.description));

        for issue in issues {
            lines.push(format!(
                "  [{}] {} - {}",
                issue.severity, issue.element, issue.description
            ));
            lines.push(format!("      WCAG {}", issue.wcag_reference));
            if !issue.code_snippet.is_empty() {
                lines.push(format!("      {}", issue.code_snippet));
            }
        }
    }

    if let Some(pages) = &result.page_results {
        lines.push(String::new());
        lines.push(RULE.to_string());
        lines.push("Pages".to_string());
        for page in pages {
            lines.push(format!(
                "  {}  {} issue(s), {} error(s), {} warning(s)",
                page.url, page.total_issues, page.error_count, page.warning_count
            ));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}
