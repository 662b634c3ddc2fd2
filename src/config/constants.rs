//! Configuration constants.
//!
//! This module defines the timeouts, cache lifetimes, upstream endpoints and
//! keyword sets used by the provider strategies.

use std::time::Duration;

/// Default User-Agent header sent with every probe.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str = "HealthCheckMonitor/1.0";

/// Default location of the targets document.
pub const DEFAULT_SITES_PATH: &str = "data/sites.json";

// Network operation timeouts
/// Default bounded-fetch timeout in seconds (generic reachability, webhooks)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Timeout for vendor status APIs, health endpoints and the aggregated-platform source
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(8);
/// Timeout for a single webhook delivery
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// Maximum response body size in bytes (2MB)
///
/// Larger bodies are rejected before they reach the JSON or HTML parsers.
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

// Aggregated-platform result cache
/// How long a non-empty scrape result is reused
pub const STATUS_CACHE_SUCCESS_TTL: Duration = Duration::from_secs(60);
/// How long an empty/failed scrape is remembered before the upstream is retried
pub const STATUS_CACHE_FAILURE_TTL: Duration = Duration::from_secs(15);

/// Maximum nesting depth the structural scraper descends into.
///
/// `serde_json::Value` is a tree so cycles cannot occur, but a hostile payload
/// can still be nested deep enough to exhaust the stack.
pub const MAX_SCRAPE_DEPTH: usize = 128;

// Aggregated-platform upstream (Meta status)
/// JSON API endpoints tried in order
pub const META_STATUS_ENDPOINTS: &[&str] = &[
    "https://metastatus.com/api/status",
    "https://metastatus.com/api/statuses",
];
/// Public HTML status page used when every API endpoint fails
pub const META_STATUS_PAGE_URL: &str = "https://metastatus.com/";
/// Label shown in composed aggregated-platform messages
pub const META_STATUS_LABEL: &str = "MetaStatus";
/// Target name -> platform slug
pub const META_PLATFORMS: &[(&str, &str)] = &[
    ("facebook", "facebook"),
    ("instagram", "instagram"),
    ("whatsapp", "whatsapp"),
];
/// Accept header for the aggregated-platform source (API first, HTML fallback)
pub const META_STATUS_ACCEPT: &str = "application/json,text/html;q=0.9,*/*;q=0.8";

// Cloud incidents feed
/// Google Cloud incidents feed
pub const CLOUD_INCIDENTS_URL: &str = "https://status.cloud.google.com/incidents.json";
/// An open incident counts when its service name contains one of these
pub const CLOUD_INCIDENT_KEYWORDS: &[&str] = &["gemini", "vertex", "generative"];

// Built-in strategy table
/// Target served by a JSON health endpoint reporting `checks.vps_ping.alive`
pub const HEALTH_ENDPOINT_TARGETS: &[&str] = &["vps_soul23"];
/// Targets hosted on a Statuspage-compatible vendor status page
pub const STATUSPAGE_TARGETS: &[&str] = &["openai", "canva", "cloudflare"];
/// Targets checked through the cloud incidents feed
pub const CLOUD_INCIDENT_TARGETS: &[&str] = &["google_gemini"];
/// Targets whose health endpoint reports `{"status": "ok"}`
pub const API_STATUS_TARGETS: &[&str] = &["formbricks"];

/// Dotted path of the liveness flag inside a health-endpoint document
pub const HEALTH_ALIVE_PATH: &str = "checks.vps_ping.alive";
