//! Error type definitions.
//!
//! This module defines all error types used throughout the application and the
//! envelope used to report a failed run.

use std::path::PathBuf;
use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for loading the targets document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The targets file could not be read.
    #[error("Cannot load targets from {}", .path.display())]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The targets file is not valid JSON of the expected shape.
    #[error("Cannot load targets")]
    Parse(#[source] serde_json::Error),
}

/// Error types for a single bounded HTTP request.
///
/// Every variant means the target is unreachable from the caller's point of
/// view; strategies downgrade these to a `down` result.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not complete within its deadline and was cancelled.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The address could not be turned into a URL.
    #[error("invalid address '{0}'")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("cannot encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The response body exceeded the size limit.
    #[error("response body larger than {0} bytes")]
    BodyTooLarge(usize),

    /// Transport, protocol or body error reported by the HTTP client.
    #[error("{0}")]
    Request(#[from] ReqwestError),
}

/// JSON error envelope printed (or served) when a run fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Short, stable description of what failed
    pub error: String,
    /// Full error chain
    pub details: String,
}

impl ErrorEnvelope {
    /// Builds the envelope for a failed health-check run.
    pub fn from_run_error(error: &anyhow::Error) -> Self {
        Self {
            error: "Health checker failed".to_string(),
            details: format!("{:#}", error),
        }
    }
}
