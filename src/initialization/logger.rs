//! Logger setup.
//!
//! Log lines go to stderr so stdout only ever carries the JSON report.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter};

/// Crates that log at a lower level than the checker itself.
const QUIET_MODULES: &[(&str, LevelFilter)] = &[
    // html5ever's tree builder complains about most real-world status pages
    ("html5ever", LevelFilter::Error),
    ("selectors", LevelFilter::Warn),
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    ("axum", LevelFilter::Info),
];

fn plain_level(level: Level) -> (&'static str, ColoredString) {
    let name = level.to_string();
    match level {
        Level::Error => ("❌", name.red()),
        Level::Warn => ("⚠️", name.yellow()),
        Level::Info => ("✔️", name.green()),
        Level::Debug => ("🔍", name.blue()),
        Level::Trace => ("🔬", name.purple()),
    }
}

/// Installs `env_logger` with the given level and line format.
///
/// `RUST_LOG` is read first and `level` then overrides it for this crate and
/// as the global default.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    builder.target(env_logger::Target::Stderr);
    for (module, filter) in QUIET_MODULES {
        builder.filter_module(module, *filter);
    }
    builder.filter_module("health_checker", level);

    match format {
        LogFormat::Json => {
            colored::control::set_override(false);
            builder.format(|buf, record| {
                let line = serde_json::json!({
                    "ts": chrono::Utc::now().timestamp_millis(),
                    "level": record.level().as_str(),
                    "target": record.target(),
                    "msg": record.args().to_string(),
                });
                writeln!(buf, "{}", line)
            });
        }
        LogFormat::Plain => {
            colored::control::set_override(true);
            builder.format(|buf, record| {
                let (emoji, level) = plain_level(record.level());
                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    emoji,
                    record.target().cyan(),
                    level,
                    record.args()
                )
            });
        }
    }

    // try_init so a second call (tests, embedding) errors instead of panicking
    builder.try_init().map_err(InitializationError::from)
}
