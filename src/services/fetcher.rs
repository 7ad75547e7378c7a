//! Page fetching.
//!
//! The orchestrator only sees [`PageFetcher`]; [`HttpFetcher`] is the
//! network-backed implementation.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::Result;
use crate::models::ScannerConfig;
use crate::utils::http;

/// Source of page markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the HTML text at `url`.
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// Fetches pages over HTTP with a hard per-request timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    /// Create a fetcher from scanner settings.
    pub fn new(config: &ScannerConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        log::debug!("Fetching {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| http::classify(url.as_str(), &e, self.timeout_secs))?;

        http::read_html(url.as_str(), response, self.timeout_secs).await
    }
}
