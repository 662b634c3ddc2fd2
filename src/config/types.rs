//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    CLOUD_INCIDENTS_URL, CLOUD_INCIDENT_KEYWORDS, DEFAULT_SITES_PATH, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, META_STATUS_ENDPOINTS, META_STATUS_PAGE_URL,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Upstream status sources queried by the provider strategies.
///
/// Production defaults point at the real providers; tests point them at a
/// mock server.
#[derive(Debug, Clone)]
pub struct Upstreams {
    /// Aggregated-platform JSON API endpoints, tried in order
    pub meta_status_endpoints: Vec<String>,
    /// Aggregated-platform HTML status page (last resort)
    pub meta_status_page: String,
    /// Cloud incidents feed
    pub cloud_incidents: String,
    /// Service-name keywords that make a cloud incident relevant
    pub cloud_incident_keywords: Vec<String>,
}

impl Default for Upstreams {
    fn default() -> Self {
        Self {
            meta_status_endpoints: META_STATUS_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            meta_status_page: META_STATUS_PAGE_URL.to_string(),
            cloud_incidents: CLOUD_INCIDENTS_URL.to_string(),
            cloud_incident_keywords: CLOUD_INCIDENT_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Health checker configuration.
///
/// Parsed from the command line by the binary, or constructed directly by
/// library users.
///
/// # Examples
///
/// ```no_run
/// use health_checker::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     sites: PathBuf::from("data/sites.json"),
///     webhook_urls: vec!["https://hooks.example.com/health".to_string()],
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "health_checker",
    about = "Checks every configured target and prints a JSON health report"
)]
pub struct Config {
    /// Targets document (JSON)
    #[arg(long, default_value = DEFAULT_SITES_PATH)]
    pub sites: PathBuf,

    /// Webhook subscribers that receive the report (comma-separated)
    #[arg(
        long,
        env = "WEBHOOK_URLS",
        value_delimiter = ',',
        value_parser = parse_webhook_url
    )]
    pub webhook_urls: Vec<String>,

    /// Default per-request timeout in seconds (at least 1)
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Serve reports over HTTP on this port instead of running once
    #[arg(long)]
    pub serve: Option<u16>,

    /// Upstream status sources
    #[arg(skip)]
    pub upstreams: Upstreams,
}

impl Config {
    /// Subscriber URLs with surrounding whitespace removed and blanks dropped.
    pub fn subscribers(&self) -> Vec<String> {
        self.webhook_urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn parse_webhook_url(raw: &str) -> Result<String, String> {
    Ok(raw.trim().to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sites: PathBuf::from(DEFAULT_SITES_PATH),
            webhook_urls: Vec::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            serve: None,
            upstreams: Upstreams::default(),
        }
    }
}
