//! Structural scraping of aggregated status payloads.
//!
//! Upstream aggregated status sources publish their data in shapes that change
//! without notice. Instead of binding to a schema, the scraper walks the whole
//! document and treats any object that has a status-like field and names a
//! recognized platform as a status record.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::Value;

use super::severity::{classify, Severity};
use super::text::{nested_value, pick_first_string};
use crate::config::MAX_SCRAPE_DEPTH;

/// Fields checked, in order, for the platform a record describes.
const SLUG_PATHS: &[&str] = &[
    "slug",
    "service.slug",
    "service",
    "platform",
    "product",
    "name",
    "title",
];

/// Fields checked, in order, for the record's headline status.
const STATUS_TEXT_PATHS: &[&str] = &[
    "status.description",
    "status.title",
    "status.state",
    "status.status",
    "status",
    "status_text",
    "statusDescription",
    "status_description",
    "indicator",
    "state",
    "current_status",
    "currentStatus",
];

/// Fields checked, in order, for incident details.
const DETAIL_TEXT_PATHS: &[&str] = &[
    "latest_update.title",
    "latest_update.description",
    "latestUpdate.title",
    "latestUpdate.description",
    "last_incident.title",
    "lastIncident.title",
    "incident.title",
    "incident.description",
    "message",
    "subtitle",
    "description",
    "body",
];

/// Substrings that mark an object key as status-like.
const STATUS_KEY_MARKERS: &[&str] = &["status", "incident", "indicator", "state"];

const NO_STATUS_TEXT: &str = "No official information";
const NO_DESCRIPTOR: &str = "No official details";

/// A status record recovered from an aggregated payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedStatusEntry {
    /// Recognized platform the record describes
    pub slug: String,
    /// Severity inferred from the status and detail text
    pub severity: Severity,
    /// Headline status text
    pub status_text: String,
    /// Incident details, possibly empty
    pub detail_text: String,
    /// Human-readable, emoji-tagged summary
    pub message: String,
}

/// Walks unknown JSON documents looking for status records about a fixed set
/// of platforms.
#[derive(Debug, Clone)]
pub struct StatusScraper {
    slugs: Vec<String>,
    label: String,
}

impl StatusScraper {
    /// Creates a scraper recognizing `slugs`; `label` names the source in
    /// composed messages.
    pub fn new<I, S>(slugs: I, label: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slugs: slugs
                .into_iter()
                .map(|s| s.into().to_lowercase())
                .collect(),
            label: label.into(),
        }
    }

    /// Collects every status record in `document`, in depth-first order.
    ///
    /// Each node is visited at most once and traversal always continues into
    /// the children of a node, whether or not the node itself was a record.
    pub fn scrape(&self, document: &Value) -> Vec<NormalizedStatusEntry> {
        let mut collected = Vec::new();
        let mut seen = HashSet::new();
        self.visit(document, 0, &mut seen, &mut collected);
        collected
    }

    fn visit(
        &self,
        node: &Value,
        depth: usize,
        seen: &mut HashSet<*const Value>,
        collected: &mut Vec<NormalizedStatusEntry>,
    ) {
        if !(node.is_object() || node.is_array()) {
            return;
        }
        if depth > MAX_SCRAPE_DEPTH {
            log::debug!("Status scrape stopped at depth {}", depth);
            return;
        }
        if !seen.insert(node as *const Value) {
            return;
        }

        match node {
            Value::Object(map) => {
                let status_like = map.keys().any(|key| {
                    let key = key.to_lowercase();
                    STATUS_KEY_MARKERS.iter().any(|marker| key.contains(marker))
                });
                if status_like {
                    if let Some(entry) = self.normalize(node) {
                        collected.push(entry);
                    }
                }
                for child in map.values() {
                    self.visit(child, depth + 1, seen, collected);
                }
            }
            Value::Array(items) => {
                for child in items {
                    self.visit(child, depth + 1, seen, collected);
                }
            }
            _ => {}
        }
    }

    /// Turns one candidate object into a status record.
    ///
    /// Returns `None` when the object does not name a recognized platform.
    pub fn normalize(&self, record: &Value) -> Option<NormalizedStatusEntry> {
        let slug = SLUG_PATHS.iter().find_map(|path| {
            nested_value(record, path)
                .and_then(Value::as_str)
                .and_then(|value| self.detect_slug(value))
        })?;

        let mut status_text = pick_first_string(record, STATUS_TEXT_PATHS);
        if status_text.is_empty() {
            status_text = NO_STATUS_TEXT.to_string();
        }
        let detail_text = pick_first_string(record, DETAIL_TEXT_PATHS);

        let severity = classify(format!("{} {}", status_text, detail_text).trim());
        let message = self.compose_message(severity, &status_text, &detail_text);

        Some(NormalizedStatusEntry {
            slug: slug.to_string(),
            severity,
            status_text,
            detail_text,
            message,
        })
    }

    fn detect_slug(&self, value: &str) -> Option<&str> {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        self.slugs
            .iter()
            .find(|slug| normalized.contains(slug.as_str()))
            .map(String::as_str)
    }

    fn compose_message(&self, severity: Severity, status_text: &str, detail_text: &str) -> String {
        let mut parts = Vec::with_capacity(2);
        if !status_text.is_empty() {
            parts.push(status_text);
        }
        if !detail_text.is_empty() && detail_text != status_text {
            parts.push(detail_text);
        }
        let descriptor = if parts.is_empty() {
            NO_DESCRIPTOR.to_string()
        } else {
            parts.join(" - ")
        };
        severity.state(format!("{}: {}", self.label, descriptor))
    }
}

/// Indexes scraped records by slug.
///
/// When several records share a slug, the one with the strictly longest
/// `detail_text` wins; on a tie the record found first is kept.
pub fn index_by_slug(
    entries: Vec<NormalizedStatusEntry>,
) -> HashMap<String, NormalizedStatusEntry> {
    let mut indexed: HashMap<String, NormalizedStatusEntry> = HashMap::new();
    for entry in entries {
        let replace = indexed
            .get(&entry.slug)
            .is_none_or(|current| entry.detail_text.len() > current.detail_text.len());
        if replace {
            indexed.insert(entry.slug.clone(), entry);
        }
    }
    indexed
}
