//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `health_checker` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Printing the report (stdout) or the error envelope (stderr)
//!
//! All core functionality is implemented in the library crate.

use std::io::Write;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use health_checker::initialization::init_logger_with;
use health_checker::status_server::start_status_server;
use health_checker::{run_health_check, Config, ErrorEnvelope, HealthChecker};

/// Serializes `value` as JSON indented with four spaces.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize JSON output")?;
    String::from_utf8(buf).context("Serialized JSON is not UTF-8")
}

fn fail(error: &anyhow::Error) -> ! {
    let envelope = ErrorEnvelope::from_run_error(error);
    match to_pretty_json(&envelope) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("health_checker error: {:#}", error),
    }
    process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // so WEBHOOK_URLS can be kept next to the binary instead of exported
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if let Some(port) = config.serve {
        let checker = match HealthChecker::new(config) {
            Ok(checker) => Arc::new(checker),
            Err(e) => fail(&anyhow::Error::new(e).context("Failed to initialize HTTP client")),
        };
        if let Err(e) = start_status_server(port, checker).await {
            fail(&e);
        }
        return Ok(());
    }

    match run_health_check(config).await {
        Ok(report) => {
            let json = match to_pretty_json(&report) {
                Ok(json) => json,
                Err(e) => fail(&e),
            };
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write report")?;
            Ok(())
        }
        Err(e) => fail(&e),
    }
}
