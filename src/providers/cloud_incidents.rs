//! Cloud incidents feed.
//!
//! The feed is a JSON array of incidents. An incident is active while it has
//! no `end` timestamp, and it is relevant when its `service_name` mentions one
//! of the configured keywords.

use serde_json::Value;

use crate::config::{Upstreams, PROVIDER_TIMEOUT};
use crate::fetch::BoundedFetcher;
use crate::status::Severity;

use super::{check_reachability, CheckResult};

fn is_active(incident: &Value) -> bool {
    match incident.get("end") {
        None | Some(Value::Null) => true,
        Some(Value::String(end)) => end.is_empty(),
        Some(_) => false,
    }
}

fn is_relevant(incident: &Value, keywords: &[String]) -> bool {
    let service = incident
        .get("service_name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();
    keywords.iter().any(|keyword| service.contains(keyword.as_str()))
}

/// Counts active incidents whose service matches one of `keywords`.
///
/// Returns `None` when the feed is not an array.
pub(crate) fn count_active_incidents(feed: &Value, keywords: &[String]) -> Option<usize> {
    let incidents = feed.as_array()?;
    Some(
        incidents
            .iter()
            .filter(|incident| is_active(incident) && is_relevant(incident, keywords))
            .count(),
    )
}

/// Checks the cloud incidents feed; `display_address` is probed for plain
/// reachability when the feed cannot be read.
pub async fn check_cloud_incidents(
    fetcher: &BoundedFetcher,
    upstreams: &Upstreams,
    display_address: &str,
) -> CheckResult {
    let feed_url = upstreams.cloud_incidents.as_str();
    match fetcher.get_text(feed_url, Some(PROVIDER_TIMEOUT), None).await {
        Ok(response) if response.is_ok() => {
            let keywords: Vec<String> = upstreams
                .cloud_incident_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect();
            match response
                .json()
                .ok()
                .and_then(|feed| count_active_incidents(&feed, &keywords))
            {
                Some(0) => {
                    return CheckResult::new(
                        Some(response.status),
                        Severity::Ok.state("No active Google AI incidents"),
                    )
                }
                Some(active) => {
                    return CheckResult::new(
                        Some(response.status),
                        Severity::Warn.state(format!("{} active incidents", active)),
                    )
                }
                None => log::debug!("Incidents feed {} is not a JSON array", feed_url),
            }
        }
        Ok(response) => {
            log::debug!("Incidents feed {} answered {}", feed_url, response.status)
        }
        Err(e) => log::debug!("Incidents feed {} unreachable: {}", feed_url, e),
    }
    check_reachability(fetcher, display_address).await
}
