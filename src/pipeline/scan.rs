// src/pipeline/scan.rs

//! Scan orchestration.

use std::time::Instant;

use futures::stream::{self, StreamExt};
use url::Url;

use crate::error::Result;
use crate::models::{PageResult, ScanMode, ScanRequest, ScanResult, ScannerConfig};
use crate::pipeline::aggregate::{build_scan_result, scan_elements};
use crate::pipeline::discover::discover_links;
use crate::services::{PageFetcher, extract};

/// Runs single-page and bounded full-site scans.
pub struct Scanner<F: PageFetcher> {
    fetcher: F,
    config: ScannerConfig,
}

impl<F: PageFetcher> Scanner<F> {
    pub fn new(fetcher: F, config: ScannerConfig) -> Self {
        Self { fetcher, config }
    }

    /// Scan the requested URL.
    ///
    /// Failure to fetch the seed page fails the scan. In full mode, extra
    /// pages are best-effort: a page that cannot be fetched is reported with
    /// zero issues.
    pub async fn scan(&self, request: &ScanRequest) -> Result<ScanResult> {
        let started = Instant::now();
        let seed = request.target()?;
        let seed_label = request.url.trim();
        log::info!("Starting {:?} scan of {}", request.mode, seed);

        let html = self.fetcher.fetch(&seed).await?;
        let elements = extract(&html);
        let mut pages = vec![scan_elements(seed_label, &elements)];

        if request.mode == ScanMode::Full {
            let limit = self.config.max_pages.saturating_sub(1);
            let targets = discover_links(&seed, &elements.links, limit);
            log::info!("Following {} same-site link(s)", targets.len());
            pages.extend(self.scan_pages(targets).await);
        }

        let result = build_scan_result(seed_label, request.mode, pages);
        log::info!(
            "Scan of {} complete: {} page(s), {} issue(s) ({} errors, {} warnings) in {:.2?}",
            seed_label,
            result.pages_scanned,
            result.total_issues,
            result.error_count,
            result.warning_count,
            started.elapsed()
        );
        Ok(result)
    }

    /// Fetch and scan extra pages, keeping discovery order.
    async fn scan_pages(&self, targets: Vec<Url>) -> Vec<PageResult> {
        let concurrency = self.config.max_concurrent.max(1);

        stream::iter(targets)
            .map(|url| async move {
                match self.fetcher.fetch(&url).await {
                    Ok(html) => scan_elements(url.as_str(), &extract(&html)),
                    Err(e) => {
                        log::warn!("Skipping {}: {}", url, e);
                        PageResult::empty(url.as_str())
                    }
                }
            })
            .buffered(concurrency)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;
    use crate::models::IssueType;

    /// Serves canned pages; everything else is a 404.
    #[derive(Default)]
    struct StubFetcher {
        pages: HashMap<String, String>,
        delays_ms: HashMap<String, u64>,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn with(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        fn delayed(mut self, url: &str, html: &str, ms: u64) -> Self {
            self.delays_ms.insert(url.to_string(), ms);
            self.with(url, html)
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            if let Some(ms) = self.delays_ms.get(url.as_str()) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| AppError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                    reason: "Not Found".into(),
                })
        }
    }

    fn scanner(fetcher: StubFetcher) -> Scanner<StubFetcher> {
        Scanner::new(fetcher, ScannerConfig::default())
    }

    #[tokio::test]
    async fn test_single_scan_reports_seed_only() {
        let fetcher = StubFetcher::default().with(
            "https://example.com/",
            r#"<h1>Home</h1><img src="logo.png"><a href="/about">About</a>"#,
        );
        let scanner = scanner(fetcher);
        let result = scanner
            .scan(&ScanRequest::new("https://example.com/", ScanMode::Single))
            .await
            .unwrap();

        assert_eq!(result.url, "https://example.com/");
        assert_eq!(result.pages_scanned, 1);
        assert_eq!(result.total_issues, 1);
        assert_eq!(result.issues[0].issue_type, IssueType::MissingAltText);
        assert_eq!(result.passed_checks, 4);
        assert!(result.page_results.is_none());
        assert_eq!(scanner.fetcher.requested(), ["https://example.com/"]);
    }

    #[tokio::test]
    async fn test_full_scan_caps_pages() {
        let links: String = (0..15)
            .map(|i| format!(r#"<a href="/p{i}">Page {i}</a>"#))
            .collect();
        let mut fetcher = StubFetcher::default().with("https://example.com/", &format!("<h1>x</h1>{links}"));
        for i in 0..15 {
            fetcher = fetcher.with(&format!("https://example.com/p{i}"), "<h1>p</h1>");
        }

        let scanner = scanner(fetcher);
        let result = scanner
            .scan(&ScanRequest::new("https://example.com/", ScanMode::Full))
            .await
            .unwrap();

        assert_eq!(result.pages_scanned, 10);
        assert_eq!(scanner.fetcher.requested().len(), 10);
        let pages = result.page_results.unwrap();
        assert_eq!(pages.len(), 10);
        assert_eq!(pages[0].url, "https://example.com/");
        assert_eq!(pages[1].url, "https://example.com/p0");
        assert_eq!(pages[9].url, "https://example.com/p8");
    }

    #[tokio::test]
    async fn test_full_scan_tolerates_failed_subpage() {
        let fetcher = StubFetcher::default()
            .with(
                "https://example.com/",
                r#"<h1>Home</h1><a href="/ok">Ok</a><a href="/missing">Gone</a>"#,
            )
            .with("https://example.com/ok", r#"<h1>Ok</h1><img src="x">"#);

        let result = scanner(fetcher)
            .scan(&ScanRequest::new("https://example.com/", ScanMode::Full))
            .await
            .unwrap();

        assert_eq!(result.pages_scanned, 3);
        let pages = result.page_results.unwrap();
        assert_eq!(pages[1].url, "https://example.com/ok");
        assert_eq!(pages[1].total_issues, 1);
        assert_eq!(pages[2].url, "https://example.com/missing");
        assert_eq!(pages[2].total_issues, 0);
        assert_eq!(result.total_issues, 1);
        assert_eq!(result.total_issues, result.error_count + result.warning_count);
    }

    #[tokio::test]
    async fn test_full_scan_without_links_has_no_page_results() {
        let fetcher = StubFetcher::default().with("https://example.com/", "<h1>Alone</h1>");
        let result = scanner(fetcher)
            .scan(&ScanRequest::new("https://example.com/", ScanMode::Full))
            .await
            .unwrap();
        assert_eq!(result.pages_scanned, 1);
        assert!(result.page_results.is_none());
        assert_eq!(result.passed_checks, 5);
    }

    #[tokio::test]
    async fn test_seed_failure_fails_scan() {
        let err = scanner(StubFetcher::default())
            .scan(&ScanRequest::new("https://example.com/", ScanMode::Full))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_fetching() {
        let scanner = scanner(StubFetcher::default());
        let err = scanner
            .scan(&ScanRequest::new("ftp://example.com", ScanMode::Single))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl { .. }));
        assert!(scanner.fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_issues_follow_page_order() {
        let fetcher = StubFetcher::default()
            .with(
                "https://example.com/",
                r#"<h1>Home</h1><a href="/a">A</a><a href="/b">B</a>"#,
            )
            .with("https://example.com/a", r#"<h1>A</h1><a href="/"></a>"#)
            .with("https://example.com/b", r#"<h2>B</h2>"#);

        let result = scanner(fetcher)
            .scan(&ScanRequest::new("https://example.com/", ScanMode::Full))
            .await
            .unwrap();

        let types: Vec<IssueType> = result.issues.iter().map(|i| i.issue_type).collect();
        assert_eq!(types, [IssueType::EmptyLink, IssueType::HeadingHierarchy]);
        assert_eq!(result.passed_checks, 3);
    }

    #[tokio::test]
    async fn test_slow_pages_keep_discovery_order() {
        let fetcher = StubFetcher::default()
            .with(
                "https://example.com/",
                r#"<h1>Home</h1><a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
            )
            .delayed("https://example.com/a", r#"<h2>A</h2>"#, 60)
            .delayed("https://example.com/b", r#"<a href="/"></a>"#, 30)
            .delayed("https://example.com/c", r#"<img src="c.png">"#, 1);

        let result = scanner(fetcher)
            .scan(&ScanRequest::new("https://example.com/", ScanMode::Full))
            .await
            .unwrap();

        let urls: Vec<String> = result
            .page_results
            .unwrap()
            .into_iter()
            .map(|page| page.url)
            .collect();
        assert_eq!(
            urls,
            [
                "https://example.com/",
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c",
            ]
        );

        let types: Vec<IssueType> = result.issues.iter().map(|i| i.issue_type).collect();
        assert_eq!(
            types,
            [
                IssueType::HeadingHierarchy,
                IssueType::EmptyLink,
                IssueType::MissingAltText,
            ]
        );
    }
}
