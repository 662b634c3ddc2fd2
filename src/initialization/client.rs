//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

/// Initializes the HTTP client shared by every strategy.
///
/// Creates a `reqwest::Client` configured with:
/// - the given User-Agent header
/// - a client-wide timeout (each request still carries its own deadline)
/// - redirect following (up to 10 hops)
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(user_agent.to_string())
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}
