//! Statuspage-compatible vendor status pages.
//!
//! Vendors hosting their status page on Statuspage expose a summary document
//! at `<base>/api/v2/summary.json` whose `status.indicator` is `"none"` when
//! every component is operational.

use serde_json::Value;

use crate::config::PROVIDER_TIMEOUT;
use crate::fetch::BoundedFetcher;
use crate::status::{nested_value, Severity};

use super::CheckResult;

const SUMMARY_PATH: &str = "/api/v2/summary.json";

fn summary_url(base: &str) -> String {
    format!("{}{}", base.trim().trim_end_matches('/'), SUMMARY_PATH)
}

/// Checks the vendor status page rooted at `base`.
pub async fn check_statuspage(fetcher: &BoundedFetcher, base: &str) -> CheckResult {
    let url = summary_url(base);
    let response = match fetcher.get_text(&url, Some(PROVIDER_TIMEOUT), None).await {
        Ok(response) => response,
        Err(e) => {
            log::debug!("Status page {} unreachable: {}", url, e);
            return CheckResult::new(None, Severity::Down.state("verification error"));
        }
    };
    if !response.is_ok() {
        return CheckResult::new(Some(response.status), Severity::Down.state(response.status));
    }

    let summary = match response.json() {
        Ok(summary) => summary,
        Err(e) => {
            log::debug!("Status page {} returned invalid JSON: {}", url, e);
            return CheckResult::new(
                Some(response.status),
                Severity::Down.state("verification error"),
            );
        }
    };
    let description = nested_value(&summary, "status.description")
        .and_then(Value::as_str)
        .unwrap_or("no description");
    let severity = match nested_value(&summary, "status.indicator").and_then(Value::as_str) {
        Some("none") => Severity::Ok,
        _ => Severity::Warn,
    };
    CheckResult::new(Some(response.status), severity.state(description))
}
