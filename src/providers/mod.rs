//! Provider strategies.
//!
//! Each target is checked by exactly one strategy, chosen from its name:
//! - explicit overrides from the targets document win;
//! - then the built-in table of well-known names;
//! - then membership in the aggregated-platform group;
//! - everything else gets a generic reachability probe.
//!
//! Strategies never fail: every transport or parse problem is folded into a
//! `down` (or `warn`) [`CheckResult`].

mod aggregated;
mod cloud_incidents;
mod health_endpoint;
mod reachability;
mod statuspage;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display as DisplayMacro, EnumIter as EnumIterMacro};

use crate::config::{
    Target, Upstreams, API_STATUS_TARGETS, CLOUD_INCIDENT_TARGETS, HEALTH_ENDPOINT_TARGETS,
    META_PLATFORMS, STATUSPAGE_TARGETS,
};
use crate::fetch::BoundedFetcher;
use crate::status::StatusCache;

pub use aggregated::AggregatedPlatform;
pub use cloud_incidents::check_cloud_incidents;
pub use health_endpoint::{check_api_status, check_health_endpoint};
pub use reachability::{check_reachability, describe_code};
pub use statuspage::check_statuspage;

/// Detection strategies a target can be dispatched to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DisplayMacro, EnumIterMacro,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKind {
    /// JSON health endpoint exposing a nested liveness flag
    HealthEndpoint,
    /// Statuspage-compatible vendor status page
    #[serde(rename = "statuspage")]
    #[strum(serialize = "statuspage")]
    StatusPage,
    /// Cloud incidents feed filtered by service keywords
    CloudIncidents,
    /// Health endpoint answering `{"status": "ok"}`
    ApiStatus,
    /// Shared upstream reporting on several platforms at once
    AggregatedPlatform,
    /// Plain HTTP status probe
    Reachability,
}

/// Outcome of one target check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// HTTP status observed by the probe; `Some(0)` when the target was
    /// unreachable, `None` when the strategy reports a message only
    pub code: Option<u16>,
    /// Emoji-tagged human-readable state
    pub message: String,
}

impl CheckResult {
    /// Creates a result from an optional code and a message.
    pub fn new(code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Resolves a target name to its strategy.
#[derive(Debug, Clone, Default)]
pub struct StrategyTable {
    overrides: HashMap<String, StrategyKind>,
}

impl StrategyTable {
    /// Creates a table with per-name overrides on top of the built-in one.
    pub fn new(overrides: HashMap<String, StrategyKind>) -> Self {
        Self { overrides }
    }

    /// Selects the strategy for `name`.
    pub fn select(&self, name: &str) -> StrategyKind {
        if let Some(kind) = self.overrides.get(name) {
            return *kind;
        }
        builtin_strategy(name)
            .or_else(|| is_platform(name).then_some(StrategyKind::AggregatedPlatform))
            .unwrap_or(StrategyKind::Reachability)
    }
}

fn builtin_strategy(name: &str) -> Option<StrategyKind> {
    let table: [(&[&str], StrategyKind); 4] = [
        (HEALTH_ENDPOINT_TARGETS, StrategyKind::HealthEndpoint),
        (STATUSPAGE_TARGETS, StrategyKind::StatusPage),
        (CLOUD_INCIDENT_TARGETS, StrategyKind::CloudIncidents),
        (API_STATUS_TARGETS, StrategyKind::ApiStatus),
    ];
    table
        .into_iter()
        .find(|(names, _)| names.contains(&name))
        .map(|(_, kind)| kind)
}

fn is_platform(name: &str) -> bool {
    META_PLATFORMS.iter().any(|(key, _)| *key == name)
}

/// Runs strategies against targets.
///
/// Owns the aggregated-platform cache, so one instance should live as long
/// as the process to get the cache's benefit across runs.
#[derive(Debug)]
pub struct Providers {
    fetcher: BoundedFetcher,
    upstreams: Upstreams,
    aggregated: AggregatedPlatform,
}

impl Providers {
    /// Creates the provider set with its own cache.
    pub fn new(fetcher: BoundedFetcher, upstreams: Upstreams, cache: StatusCache) -> Self {
        let aggregated = AggregatedPlatform::new(&upstreams, cache);
        Self {
            fetcher,
            upstreams,
            aggregated,
        }
    }

    /// The fetcher shared by every strategy.
    pub fn fetcher(&self) -> &BoundedFetcher {
        &self.fetcher
    }

    /// Checks `target` with the strategy `kind`.
    pub async fn check(&self, kind: StrategyKind, target: &Target) -> CheckResult {
        log::debug!("Checking {} with {} strategy", target.name, kind);
        let address = target.address.as_str();
        match kind {
            StrategyKind::HealthEndpoint => check_health_endpoint(&self.fetcher, address).await,
            StrategyKind::StatusPage => check_statuspage(&self.fetcher, address).await,
            StrategyKind::CloudIncidents => {
                check_cloud_incidents(&self.fetcher, &self.upstreams, address).await
            }
            StrategyKind::ApiStatus => check_api_status(&self.fetcher, address).await,
            StrategyKind::AggregatedPlatform => {
                match self.aggregated.status_for(&self.fetcher, &target.name).await {
                    Some(message) => CheckResult::new(None, message),
                    None => {
                        log::debug!(
                            "No aggregated status for {}, falling back to reachability",
                            target.name
                        );
                        check_reachability(&self.fetcher, address).await
                    }
                }
            }
            StrategyKind::Reachability => check_reachability(&self.fetcher, address).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_builtin_exact_names() {
        let table = StrategyTable::default();
        assert_eq!(table.select("vps_soul23"), StrategyKind::HealthEndpoint);
        assert_eq!(table.select("openai"), StrategyKind::StatusPage);
        assert_eq!(table.select("cloudflare"), StrategyKind::StatusPage);
        assert_eq!(table.select("google_gemini"), StrategyKind::CloudIncidents);
        assert_eq!(table.select("formbricks"), StrategyKind::ApiStatus);
    }

    #[test]
    fn test_platform_group_membership() {
        let table = StrategyTable::default();
        for name in ["facebook", "instagram", "whatsapp"] {
            assert_eq!(table.select(name), StrategyKind::AggregatedPlatform);
        }
    }

    #[test]
    fn test_unknown_names_fall_back_to_reachability() {
        let table = StrategyTable::default();
        assert_eq!(table.select("example"), StrategyKind::Reachability);
        assert_eq!(table.select("OpenAI"), StrategyKind::Reachability);
        assert_eq!(table.select(""), StrategyKind::Reachability);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let table = StrategyTable::new(HashMap::from([
            ("openai".to_string(), StrategyKind::Reachability),
            ("my_api".to_string(), StrategyKind::ApiStatus),
        ]));
        assert_eq!(table.select("openai"), StrategyKind::Reachability);
        assert_eq!(table.select("my_api"), StrategyKind::ApiStatus);
        assert_eq!(table.select("canva"), StrategyKind::StatusPage);
    }

    #[test]
    fn test_kind_names_match_serde_names() {
        for kind in StrategyKind::iter() {
            let serialized = serde_json::to_value(kind).unwrap();
            assert_eq!(serialized, serde_json::json!(kind.to_string()));
        }
        let parsed: StrategyKind = serde_json::from_str(r#""aggregated_platform""#).unwrap();
        assert_eq!(parsed, StrategyKind::AggregatedPlatform);
    }
}
