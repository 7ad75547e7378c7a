//! AWS Lambda entry point for AccessiScan
//!
//! Deploy with `cargo lambda build --release --features lambda`.
//!
//! The event is a scan request, either directly (`{"url": ..., "mode": ...}`)
//! or wrapped as a JSON string in an API Gateway style `body` field.
//!
//! ## Environment Variables
//!
//! - `ACCESSISCAN_CONFIG`: Path to a bundled TOML config (default: `accessiscan.toml`)
//! - `RUST_LOG`: Log level (e.g., `info`, `debug`)

use std::sync::Arc;

use accessiscan::{
    error::{AppError, Result},
    models::{Config, ScanRequest, ScanResult},
    pipeline::Scanner,
    services::HttpFetcher,
    utils::url::normalize_input,
};
use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use serde_json::{Value, json};
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type LambdaScanner = Scanner<HttpFetcher>;

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> std::result::Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("AccessiScan Lambda starting...");

    let config_path =
        std::env::var("ACCESSISCAN_CONFIG").unwrap_or_else(|_| "accessiscan.toml".to_string());
    let config = Config::load_or_default(&config_path);
    config.validate()?;

    let fetcher = HttpFetcher::new(&config.scanner)?;
    let scanner = Arc::new(Scanner::new(fetcher, config.scanner));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let scanner = Arc::clone(&scanner);
        async move { handler(&scanner, event).await }
    }))
    .await
}

/// Handler for AWS Lambda events.
#[instrument(skip_all)]
async fn handler(
    scanner: &LambdaScanner,
    event: LambdaEvent<Value>,
) -> std::result::Result<Value, LambdaError> {
    match run_scan(scanner, event.payload).await {
        Ok(result) => {
            info!(
                url = %result.url,
                pages = result.pages_scanned,
                issues = result.total_issues,
                "Scan complete"
            );
            Ok(serde_json::to_value(&result)?)
        }
        Err(e) => {
            error!("Scan failed: {}", e);
            Ok(error_payload(&e))
        }
    }
}

async fn run_scan(scanner: &LambdaScanner, payload: Value) -> Result<ScanResult> {
    let mut request = parse_request(payload)?;
    request.url = normalize_input(&request.url);
    scanner.scan(&request).await
}

/// Accept the request directly or inside a string `body`.
fn parse_request(payload: Value) -> Result<ScanRequest> {
    let payload = match payload.get("body").and_then(Value::as_str) {
        Some(body) => serde_json::from_str(body).map_err(|e| AppError::invalid_url("", e))?,
        None => payload,
    };
    serde_json::from_value(payload).map_err(|e| AppError::invalid_url("", e))
}

fn error_payload(e: &AppError) -> Value {
    let kind = e.kind();
    json!({
        "status": kind.status_code(),
        "kind": kind,
        "message": kind.user_message(),
        "retryable": kind.is_retryable(),
    })
}

#[cfg(test)]
mod tests {
    use accessiscan::models::ScanMode;

    use super::*;

    #[test]
    fn test_parse_direct_and_wrapped_requests() {
        let direct = parse_request(json!({"url": "https://example.com", "mode": "full"})).unwrap();
        assert_eq!(direct.mode, ScanMode::Full);

        let wrapped = parse_request(json!({"body": "{\"url\":\"example.com\"}"})).unwrap();
        assert_eq!(wrapped.url, "example.com");
        assert_eq!(wrapped.mode, ScanMode::Single);
    }

    #[test]
    fn test_malformed_request_is_invalid_url() {
        let err = parse_request(json!({"mode": "single"})).unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl { .. }));
    }

    #[test]
    fn test_error_payload_shape() {
        let payload = error_payload(&AppError::Blocked {
            url: "https://example.com".into(),
            status: 403,
        });
        assert_eq!(payload["status"], 403);
        assert_eq!(payload["kind"], "blocked");
        assert_eq!(payload["retryable"], true);
        assert!(payload["message"].as_str().unwrap().contains("blocks automated scanning"));
    }
}
