// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Schemes that never lead to another page on the site.
const NON_PAGE_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "data:"];

/// Prefix `https://` when the input has no scheme.
///
/// # Examples
/// ```
/// use accessiscan::utils::url::normalize_input;
///
/// assert_eq!(normalize_input(" example.com "), "https://example.com");
/// assert_eq!(normalize_input("http://example.com"), "http://example.com");
/// ```
pub fn normalize_input(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// True when both URLs share scheme, host and port.
pub fn is_same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Resolve an `href` into a followable page URL.
///
/// Returns `None` for fragments, non-page schemes, unparsable values and
/// anything that is not `http`/`https`. The fragment is dropped.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if NON_PAGE_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}
