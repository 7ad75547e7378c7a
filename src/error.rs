// src/error.rs

//! Unified error handling for the scanner.
//!
//! Markup extraction and rule evaluation never fail; every variant that can
//! end a scan comes from the network boundary or from the caller's input.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input URL failed syntax validation
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// DNS resolution or connection failure
    #[error("Unreachable host for {url}: {message}")]
    UnreachableHost { url: String, message: String },

    /// Fetch exceeded the time budget
    #[error("Request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// Target denied automated access
    #[error("Access to {url} was blocked (HTTP {status})")]
    Blocked { url: String, status: u16 },

    /// Response was not an HTML document
    #[error("{url} is not an HTML page (content-type: {content_type})")]
    NotHtml { url: String, content_type: String },

    /// Non-2xx response from the target
    #[error("HTTP error for {url}: {status} {reason}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },

    /// Certificate or secure-channel failure
    #[error("TLS error for {url}: {message}")]
    Tls { url: String, message: String },

    /// Any other unexpected failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an unreachable host error.
    pub fn unreachable(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::UnreachableHost {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a TLS error.
    pub fn tls(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Tls {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl fmt::Display) -> Self {
        Self::Internal(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Stable machine-readable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::UnreachableHost { .. } => ErrorKind::UnreachableHost,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Blocked { .. } => ErrorKind::Blocked,
            Self::NotHtml { .. } => ErrorKind::NotHtml,
            Self::HttpStatus { .. } => ErrorKind::HttpError,
            Self::Tls { .. } => ErrorKind::TlsError,
            Self::Internal(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Toml(_)
            | Self::Config(_)
            | Self::Validation(_) => ErrorKind::Internal,
        }
    }
}

/// Error taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUrl,
    UnreachableHost,
    Timeout,
    Blocked,
    NotHtml,
    HttpError,
    TlsError,
    Internal,
}

impl ErrorKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidUrl => "invalid_url",
            ErrorKind::UnreachableHost => "unreachable_host",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Blocked => "blocked",
            ErrorKind::NotHtml => "not_html",
            ErrorKind::HttpError => "http_error",
            ErrorKind::TlsError => "tls_error",
            ErrorKind::Internal => "internal",
        }
    }

    /// Whether a "Try Again" action makes sense for this kind.
    ///
    /// Only an invalid URL needs the caller to change its input.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ErrorKind::InvalidUrl)
    }

    /// HTTP status an API layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::InvalidUrl => 400,
            ErrorKind::Blocked => 403,
            ErrorKind::UnreachableHost => 404,
            ErrorKind::NotHtml => 422,
            ErrorKind::TlsError | ErrorKind::HttpError => 502,
            ErrorKind::Timeout => 504,
            ErrorKind::Internal => 500,
        }
    }

    /// Human-readable message for end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::InvalidUrl => "Invalid URL format. Please enter a valid website URL.",
            ErrorKind::UnreachableHost => "Website not found. Please check the URL and try again.",
            ErrorKind::Timeout => "The website took too long to respond. Please try again.",
            ErrorKind::Blocked => {
                "This website blocks automated scanning due to security restrictions."
            }
            ErrorKind::NotHtml => "The URL does not point to an HTML page.",
            ErrorKind::HttpError => "The website returned an error response. Please try again.",
            ErrorKind::TlsError => "Unable to establish a secure connection to the website.",
            ErrorKind::Internal => "Failed to scan website. Please try again.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
