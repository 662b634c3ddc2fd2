//! Section building and report assembly.
//!
//! A report is flat per section: every target contributes three keys,
//! `<name>_status` (probe code or `null`), `<name>_state` (human-readable
//! state) and `<name>_url` (the address exactly as configured).

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::{SitesDocument, Target, TargetGroup};
use crate::providers::{CheckResult, Providers, StrategyTable};

/// One checked target.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionEntry {
    /// The target as configured
    pub target: Target,
    /// Outcome of its strategy
    pub result: CheckResult,
}

/// Results for one group of targets, in configured order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    /// Checked targets
    pub entries: Vec<SectionEntry>,
}

impl Section {
    /// Looks up the result for `name`.
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.entries
            .iter()
            .find(|entry| entry.target.name == name)
            .map(|entry| &entry.result)
    }

    /// Number of checked targets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the section has no targets.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len() * 3))?;
        for SectionEntry { target, result } in &self.entries {
            map.serialize_entry(&format!("{}_status", target.name), &result.code)?;
            map.serialize_entry(&format!("{}_state", target.name), &result.message)?;
            map.serialize_entry(&format!("{}_url", target.name), &target.address)?;
        }
        map.end()
    }
}

/// The outcome of one health-check run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Start of the run, RFC 3339 UTC with milliseconds
    pub timestamp: String,
    /// Sections keyed by group name, in report order
    pub sections: Vec<(String, Section)>,
    /// Wall-clock duration of the checks, rounded to two decimals
    pub execution_time_seconds: f64,
}

impl Report {
    /// Looks up a section by group name.
    pub fn section(&self, group: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, section)| section)
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len() + 2))?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        for (name, section) in &self.sections {
            map.serialize_entry(name, section)?;
        }
        map.serialize_entry("execution_time_seconds", &self.execution_time_seconds)?;
        map.end()
    }
}

/// Checks every target of `group` in order, one at a time.
pub async fn build_section(
    providers: &Providers,
    table: &StrategyTable,
    group: &TargetGroup,
) -> Section {
    let mut entries = Vec::with_capacity(group.len());
    for target in group.iter() {
        let kind = table.select(&target.name);
        let result = providers.check(kind, target).await;
        log::debug!("{} -> {}", target.name, result.message);
        entries.push(SectionEntry {
            target: target.clone(),
            result,
        });
    }
    Section { entries }
}

/// Runs every group of `sites` and assembles the report.
pub async fn assemble_report(providers: &Providers, sites: &SitesDocument) -> Report {
    let started = Instant::now();
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let table = StrategyTable::new(sites.strategies.clone());

    let mut sections = Vec::with_capacity(3);
    for (name, group) in sites.groups() {
        let section = build_section(providers, &table, group).await;
        log::info!("Checked {} {} targets", section.len(), name);
        sections.push((name.to_string(), section));
    }

    Report {
        timestamp,
        sections,
        execution_time_seconds: round_seconds(started.elapsed().as_secs_f64()),
    }
}

/// Rounds a duration in seconds to two decimal places.
pub(crate) fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
