//! Service layer for the scanner.
//!
//! This module contains the core engine:
//! - Attribute parsing (`parse_attributes`)
//! - Markup extraction (`extract`)
//! - Accessibility rules (`run_all`)
//! - Page fetching (`PageFetcher`, `HttpFetcher`)

pub mod attributes;
pub mod extractor;
mod fetcher;
pub mod rules;

pub use attributes::parse_attributes;
pub use extractor::extract;
pub use fetcher::{HttpFetcher, PageFetcher};
pub use rules::{CHECKS, CHECKS_PERFORMED, run_all};
