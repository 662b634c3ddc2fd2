//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, cache lifetimes, upstream endpoints)
//! - CLI option types and parsing
//! - The targets document loader

mod constants;
mod sites;
mod types;

// Re-export all constants
pub use constants::*;
pub use sites::{load_sites, SitesDocument, Target, TargetGroup};
pub use types::{Config, LogFormat, LogLevel, Upstreams};
