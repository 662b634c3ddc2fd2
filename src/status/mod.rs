//! Status detection and normalization.
//!
//! This module provides:
//! - Severity classification of free text
//! - Permissive text extraction from JSON of unknown shape
//! - Structural scraping of aggregated status payloads
//! - Recovery of JSON state embedded in HTML pages
//! - The TTL cache for aggregated-platform results

pub mod cache;
mod embedded;
mod structural;
mod severity;
mod text;

use regex::Regex;

// Re-export public API
pub use cache::{Clock, StatusCache, StatusMap, SystemClock};
pub use embedded::extract_embedded_json;
pub use structural::{index_by_slug, NormalizedStatusEntry, StatusScraper};
pub use severity::{classify, Severity};
pub use text::{nested_value, pick_first_string};

/// Helper function to safely compile a regex pattern, panicking with a detailed error message
/// if compilation fails. Used for static regex patterns that are compile-time constants.
pub(crate) fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}
