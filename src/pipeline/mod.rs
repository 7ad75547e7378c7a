//! Pipeline entry points for scan operations.
//!
//! - `scan_document`: Evaluate one HTML document
//! - `Scanner::scan`: Fetch and evaluate a page or a bounded set of same-site pages

pub mod aggregate;
pub mod discover;
pub mod scan;

pub use aggregate::{build_scan_result, passed_checks, scan_document, scan_elements};
pub use discover::discover_links;
pub use scan::Scanner;
