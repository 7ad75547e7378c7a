// src/pipeline/aggregate.rs

//! Page and scan result construction.

use chrono::Utc;

use crate::models::{
    ExtractedElements, Issue, PageResult, ScanMode, ScanResult, count_severities,
};
use crate::services::{CHECKS, extract, run_all};

/// Extract and evaluate one page. Never fails.
pub fn scan_document(url: &str, html: &str) -> PageResult {
    scan_elements(url, &extract(html))
}

/// Evaluate already extracted elements.
pub fn scan_elements(url: &str, elements: &ExtractedElements) -> PageResult {
    if elements.is_empty() {
        log::debug!("{}: no elements extracted", url);
        return PageResult::new(url, run_all(elements));
    }
    log::debug!(
        "{}: {} elements ({} images, {} links, {} buttons, {} headings, {} interactive)",
        url,
        elements.len(),
        elements.images.len(),
        elements.links.len(),
        elements.buttons.len(),
        elements.headings.len(),
        elements.interactive.len()
    );
    PageResult::new(url, run_all(elements))
}

/// Check groups that produced no issue at all.
pub fn passed_checks<'a>(issues: impl IntoIterator<Item = &'a Issue> + Clone) -> usize {
    CHECKS
        .iter()
        .filter(|check| {
            !issues
                .clone()
                .into_iter()
                .any(|issue| issue.issue_type == check.issue_type)
        })
        .count()
}

/// Fold page results, in discovery order, into one scan result.
///
/// Page-level results are only attached for full scans covering more than
/// one page.
pub fn build_scan_result(url: &str, mode: ScanMode, pages: Vec<PageResult>) -> ScanResult {
    let issues: Vec<Issue> = pages.iter().flat_map(|p| p.issues.iter().cloned()).collect();
    let (error_count, warning_count) = count_severities(&issues);
    let pages_scanned = pages.len();

    ScanResult {
        url: url.to_string(),
        scanned_at: Utc::now(),
        scan_mode: mode,
        pages_scanned,
        total_issues: issues.len(),
        error_count,
        warning_count,
        passed_checks: passed_checks(&issues),
        issues,
        page_results: (mode == ScanMode::Full && pages_scanned > 1).then_some(pages),
    }
}
