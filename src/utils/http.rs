// src/utils/http.rs

//! HTTP client utilities.

use std::error::Error as _;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};

use crate::error::{AppError, Result};
use crate::models::ScannerConfig;

/// Media types accepted for scanning.
const HTML_MEDIA_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Body phrases served by bot-protection interstitials.
const BLOCK_MARKERS: &[&str] = &[
    "captcha",
    "access denied",
    "are you a robot",
    "attention required",
    "request blocked",
];

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ScannerConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    if let Ok(language) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(header::ACCEPT_LANGUAGE, language);
    }

    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AppError::internal(format!("failed to build HTTP client: {e}")))
}

/// True when a `Content-Type` value names an HTML media type.
pub fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    HTML_MEDIA_TYPES.iter().any(|t| content_type.contains(t))
}

/// Turn a response into page text, or the matching error.
pub async fn read_html(url: &str, response: Response, timeout_secs: u64) -> Result<String> {
    let status = response.status();

    if !status.is_success() {
        let blocked_header = response.headers().contains_key("cf-mitigated");
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(url, status, blocked_header, &body));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !is_html_content_type(&content_type) {
        return Err(AppError::NotHtml {
            url: url.to_string(),
            content_type: if content_type.is_empty() {
                "unknown".to_string()
            } else {
                content_type
            },
        });
    }

    response
        .text()
        .await
        .map_err(|e| classify(url, &e, timeout_secs))
}

/// Map a non-2xx status to `Blocked` or `HttpStatus`.
pub fn status_error(url: &str, status: StatusCode, blocked_header: bool, body: &str) -> AppError {
    let denial = matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );
    let body = body.to_lowercase();
    if denial && (blocked_header || BLOCK_MARKERS.iter().any(|m| body.contains(m))) {
        return AppError::Blocked {
            url: url.to_string(),
            status: status.as_u16(),
        };
    }

    AppError::HttpStatus {
        url: url.to_string(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}

/// Classify a transport error into the scan error taxonomy.
pub fn classify(url: &str, error: &reqwest::Error, timeout_secs: u64) -> AppError {
    if error.is_timeout() {
        return AppError::Timeout {
            url: url.to_string(),
            secs: timeout_secs,
        };
    }

    // The top-level message embeds the URL, so only the sources are matched.
    let causes = source_chain(error);
    classify_message(url, &causes).unwrap_or_else(|| {
        let message = format!("{error}{causes}");
        if error.is_connect() {
            AppError::unreachable(url, message)
        } else {
            AppError::internal(format!("request to {url} failed: {message}"))
        }
    })
}

/// Match TLS and DNS failures by the wording of their error sources.
fn classify_message(url: &str, chain: &str) -> Option<AppError> {
    let lower = chain.to_lowercase();
    if ["certificate", "tls", "ssl", "handshake"]
        .iter()
        .any(|m| lower.contains(m))
    {
        return Some(AppError::tls(url, chain.trim_start_matches(": ")));
    }
    if ["dns error", "failed to lookup", "name or service not known", "no such host"]
        .iter()
        .any(|m| lower.contains(m))
    {
        return Some(AppError::unreachable(url, chain.trim_start_matches(": ")));
    }
    None
}

/// Flatten the sources of an error into `": cause: cause"` form.
fn source_chain(error: &reqwest::Error) -> String {
    let mut message = String::new();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
