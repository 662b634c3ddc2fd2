//! Error handling.
//!
//! Errors are categorized into:
//! - **Initialization**: logger or HTTP client setup failed (fatal)
//! - **Configuration**: the targets document could not be loaded (fatal)
//! - **Fetch**: a single bounded request failed (always recovered by the caller)
//!
//! A fatal failure is reported to the user as an [`ErrorEnvelope`].

mod types;

// Re-export public API
pub use types::{ConfigError, ErrorEnvelope, FetchError, InitializationError};
