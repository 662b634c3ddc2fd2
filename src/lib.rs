//! health_checker library: multi-source service health aggregation
//!
//! This library checks a set of named targets (internal services, vendor
//! platforms, external sites), each with the detection strategy its name
//! calls for, and assembles the outcomes into a single JSON report that can
//! be broadcast to webhook subscribers.
//!
//! # Example
//!
//! ```no_run
//! use health_checker::{Config, run_health_check};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     sites: std::path::PathBuf::from("data/sites.json"),
//!     ..Default::default()
//! };
//!
//! let report = run_health_check(config).await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod providers;
pub mod report;
pub mod status;
pub mod status_server;
pub mod webhook;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::ErrorEnvelope;
pub use report::Report;
pub use run::{run_health_check, HealthChecker};

// Internal run module (contains the top-level run logic)
mod run {
    use std::time::Duration;

    use anyhow::{Context, Result};

    use crate::config::{load_sites, Config};
    use crate::error_handling::InitializationError;
    use crate::fetch::BoundedFetcher;
    use crate::initialization::init_client;
    use crate::providers::Providers;
    use crate::report::{assemble_report, Report};
    use crate::status::StatusCache;
    use crate::webhook::broadcast;

    /// Long-lived health checker.
    ///
    /// Holds the HTTP client and the aggregated-platform cache, so repeated
    /// runs on the same instance (e.g. from the serving layer) share both.
    #[derive(Debug)]
    pub struct HealthChecker {
        config: Config,
        providers: Providers,
    }

    impl HealthChecker {
        /// Creates a checker with a fresh cache on the system clock.
        ///
        /// # Errors
        ///
        /// Returns `InitializationError::HttpClientError` if the HTTP client
        /// cannot be built.
        pub fn new(config: Config) -> Result<Self, InitializationError> {
            Self::with_cache(config, StatusCache::default())
        }

        /// Creates a checker around an existing cache.
        ///
        /// # Errors
        ///
        /// Returns `InitializationError::HttpClientError` if the HTTP client
        /// cannot be built.
        pub fn with_cache(config: Config, cache: StatusCache) -> Result<Self, InitializationError> {
            let timeout = Duration::from_secs(config.timeout_seconds);
            let client = init_client(&config.user_agent, timeout)?;
            let fetcher = BoundedFetcher::new(client, timeout);
            let providers = Providers::new(fetcher, config.upstreams.clone(), cache);
            Ok(Self { config, providers })
        }

        /// Runs one health check.
        ///
        /// Targets are read fresh from the sites file on every run. Webhook
        /// subscribers receive the report after it has been assembled; their
        /// failures never fail the run.
        ///
        /// # Errors
        ///
        /// Returns an error if the targets document cannot be loaded. Individual
        /// target failures are reported inside the report instead.
        pub async fn run(&self) -> Result<Report> {
            let sites = load_sites(&self.config.sites)
                .await
                .context("Failed to load targets document")?;

            let report = assemble_report(&self.providers, &sites).await;
            log::info!(
                "Health check finished in {:.2}s",
                report.execution_time_seconds
            );

            let subscribers = self.config.subscribers();
            broadcast(self.providers.fetcher(), &subscribers, &report).await;
            Ok(report)
        }
    }

    /// Runs a single health check with the provided configuration.
    ///
    /// This is the main entry point for the library. A fresh process-wide
    /// state is created for the run; use [`HealthChecker`] directly to keep
    /// the aggregated-platform cache across runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized or the
    /// targets document cannot be loaded.
    pub async fn run_health_check(config: Config) -> Result<Report> {
        let checker = HealthChecker::new(config).context("Failed to initialize HTTP client")?;
        checker.run().await
    }
}
