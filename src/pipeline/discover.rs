// src/pipeline/discover.rs

//! Same-site link discovery for full-site scans.

use std::collections::HashSet;

use url::Url;

use crate::models::ElementRecord;
use crate::utils::url::{is_same_origin, resolve_link};

/// Pick up to `limit` same-origin pages linked from the seed page.
///
/// Links keep first-seen document order. Fragments are dropped before
/// de-duplication and the seed itself is never returned.
pub fn discover_links(seed: &Url, links: &[ElementRecord], limit: usize) -> Vec<Url> {
    let mut seed_key = seed.clone();
    seed_key.set_fragment(None);

    let mut seen: HashSet<String> = HashSet::from([seed_key.to_string()]);
    let mut pages = Vec::new();

    for href in links.iter().filter_map(|link| link.attr("href")) {
        if pages.len() >= limit {
            break;
        }
        let Some(url) = resolve_link(seed, href) else {
            continue;
        };
        if !is_same_origin(seed, &url) {
            continue;
        }
        if seen.insert(url.to_string()) {
            pages.push(url);
        }
    }

    log::debug!("Discovered {} same-site page(s) from {}", pages.len(), seed);
    pages
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn link(href: &str) -> ElementRecord {
        let attrs = HashMap::from([("href".to_string(), href.to_string())]);
        ElementRecord::new("a", attrs, "x", "<a>x</a>", 0)
    }

    fn seed() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_filters_and_dedups() {
        let links = vec![
            link("/about"),
            link("/about#team"),
            link("https://other.com/"),
            link("mailto:hi@example.com"),
            link("#main"),
            link("/"),
            link("contact"),
            link("http://example.com/insecure"),
        ];
        let pages = discover_links(&seed(), &links, 9);
        let pages: Vec<&str> = pages.iter().map(Url::as_str).collect();
        assert_eq!(
            pages,
            ["https://example.com/about", "https://example.com/contact"]
        );
    }

    #[test]
    fn test_caps_at_limit() {
        let links: Vec<_> = (0..15).map(|i| link(&format!("/page-{i}"))).collect();
        let pages = discover_links(&seed(), &links, 9);
        assert_eq!(pages.len(), 9);
        assert_eq!(pages[0].as_str(), "https://example.com/page-0");
        assert_eq!(pages[8].as_str(), "https://example.com/page-8");
    }

    #[test]
    fn test_anchors_without_href_are_ignored() {
        let anchor = ElementRecord::new("a", HashMap::new(), "x", "<a>x</a>", 0);
        assert!(discover_links(&seed(), &[anchor], 9).is_empty());
    }
}
