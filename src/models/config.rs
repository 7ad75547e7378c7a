//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scanner.user_agent.trim().is_empty() {
            return Err(AppError::validation("scanner.user_agent is empty"));
        }
        if self.scanner.timeout_secs == 0 {
            return Err(AppError::validation("scanner.timeout_secs must be > 0"));
        }
        if self.scanner.max_pages == 0 {
            return Err(AppError::validation("scanner.max_pages must be > 0"));
        }
        if self.scanner.max_concurrent == 0 {
            return Err(AppError::validation("scanner.max_concurrent must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept-Language header for HTTP requests
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Hard per-fetch timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Page cap for full-site scans, seed included
    #[serde(default = "defaults::max_pages")]
    pub max_pages: usize,

    /// Maximum fetches in flight during a full-site scan
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            accept_language: defaults::accept_language(),
            timeout_secs: defaults::timeout(),
            max_pages: defaults::max_pages(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON reports
    #[serde(default = "defaults::pretty_json")]
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: defaults::pretty_json(),
        }
    }
}

mod defaults {
    // Scanner defaults
    pub fn user_agent() -> String {
        "AccessiScan/1.0 (Web Accessibility Checker)".into()
    }
    pub fn accept_language() -> String {
        "en-US,en;q=0.5".into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn max_pages() -> usize {
        10
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Output defaults
    pub fn pretty_json() -> bool {
        true
    }
}
