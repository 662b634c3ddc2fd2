//! Recovery of JSON state embedded in HTML pages.
//!
//! Status pages built with front-end frameworks ship their initial state as a
//! JavaScript assignment or as a JSON script tag. When the JSON APIs are
//! unavailable this is the only machine-readable copy of the data.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use super::compile_regex_unsafe;

/// Global-state assignments tried in order (Apollo, Next.js, Nuxt).
static INLINE_STATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        ("APOLLO_STATE", r"(?s)window\.__APOLLO_STATE__\s*=\s*(\{.*?\});"),
        ("NEXT_DATA", r"(?s)window\.__NEXT_DATA__\s*=\s*(\{.*?\});"),
        ("NUXT", r"(?s)window\.__NUXT__\s*=\s*(\{.*?\});"),
    ]
    .into_iter()
    .map(|(context, pattern)| compile_regex_unsafe(pattern, context))
    .collect()
});

/// Id of the JSON data script tag emitted by Next.js.
const NEXT_DATA_SELECTOR: &str = "script#__NEXT_DATA__";

/// Extracts an embedded JSON document from an HTML page.
///
/// The inline global-state assignments are tried first; a match that does not
/// parse moves on to the next pattern. The `__NEXT_DATA__` script tag is the
/// last resort, and a parse failure there ends the search.
pub fn extract_embedded_json(html: &str) -> Option<Value> {
    for pattern in INLINE_STATE_PATTERNS.iter() {
        let Some(captured) = pattern.captures(html).and_then(|c| c.get(1)) else {
            continue;
        };
        match serde_json::from_str(captured.as_str()) {
            Ok(value) => return Some(value),
            Err(e) => log::debug!("Embedded state did not parse as JSON: {}", e),
        }
    }

    let selector = Selector::parse(NEXT_DATA_SELECTOR).ok()?;
    let document = Html::parse_document(html);
    let script = document.select(&selector).next()?;
    let body: String = script.text().collect();
    match serde_json::from_str(body.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("__NEXT_DATA__ script did not parse as JSON: {}", e);
            None
        }
    }
}
