//! Bounded HTTP fetching.
//!
//! Every outbound request goes through [`BoundedFetcher`], which enforces a
//! deadline on the whole exchange (connect, headers and body). When the
//! deadline passes the in-flight future is dropped, which cancels the
//! underlying connection, and the caller sees [`FetchError::Timeout`].

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Serialize;

use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::error_handling::FetchError;

/// Status code and body of a completed request.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl FetchedResponse {
    /// Whether the upstream answered `200 OK`.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// HTTP client wrapper that bounds every request by a timeout.
#[derive(Debug, Clone)]
pub struct BoundedFetcher {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl BoundedFetcher {
    /// Creates a fetcher around an already configured client.
    pub fn new(client: reqwest::Client, default_timeout: Duration) -> Self {
        Self {
            client,
            default_timeout,
        }
    }

    /// Issues a GET and returns only the status code.
    ///
    /// The body is not read, so large pages cost nothing beyond their headers.
    pub async fn get_status(
        &self,
        address: &str,
        timeout: Option<Duration>,
    ) -> Result<u16, FetchError> {
        let url = normalize_target_url(address)?;
        let timeout = timeout.unwrap_or(self.default_timeout);
        let request = self.client.get(url).timeout(timeout);
        let response = bounded(timeout, request.send()).await??;
        Ok(response.status().as_u16())
    }

    /// Issues a GET and reads the full body within the same deadline.
    ///
    /// Bodies larger than [`MAX_RESPONSE_BODY_SIZE`] are rejected with
    /// [`FetchError::BodyTooLarge`], whether the size is announced in
    /// `Content-Length` or only discovered while reading.
    pub async fn get_text(
        &self,
        address: &str,
        timeout: Option<Duration>,
        accept: Option<&'static str>,
    ) -> Result<FetchedResponse, FetchError> {
        let url = normalize_target_url(address)?;
        let timeout = timeout.unwrap_or(self.default_timeout);
        let mut request = self.client.get(url).timeout(timeout);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, HeaderValue::from_static(accept));
        }
        bounded(timeout, async move {
            let mut response = request.send().await?;
            let status = response.status().as_u16();
            if let Some(length) = response.content_length() {
                if length > MAX_RESPONSE_BODY_SIZE as u64 {
                    log::debug!("Skipping large body: {} bytes announced", length);
                    return Err(FetchError::BodyTooLarge(MAX_RESPONSE_BODY_SIZE));
                }
            }
            let mut bytes = Vec::new();
            while let Some(chunk) = response.chunk().await? {
                if bytes.len() + chunk.len() > MAX_RESPONSE_BODY_SIZE {
                    log::debug!("Skipping large body: over {} bytes", MAX_RESPONSE_BODY_SIZE);
                    return Err(FetchError::BodyTooLarge(MAX_RESPONSE_BODY_SIZE));
                }
                bytes.extend_from_slice(&chunk);
            }
            let body = String::from_utf8_lossy(&bytes).into_owned();
            Ok::<_, FetchError>(FetchedResponse { status, body })
        })
        .await?
    }

    /// POSTs a JSON document and returns the response status code.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        address: &str,
        payload: &T,
        timeout: Option<Duration>,
    ) -> Result<u16, FetchError> {
        let url = normalize_target_url(address)?;
        let timeout = timeout.unwrap_or(self.default_timeout);
        let body = serde_json::to_vec(payload)?;
        let request = self
            .client
            .post(url)
            .timeout(timeout)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body);
        let response = bounded(timeout, request.send()).await??;
        Ok(response.status().as_u16())
    }
}

/// Runs `fut` and cancels it if it has not completed within `timeout`.
pub async fn bounded<F: Future>(timeout: Duration, fut: F) -> Result<F::Output, FetchError> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| FetchError::Timeout(timeout))
}

/// Turns a target address into a URL.
///
/// Addresses without a scheme (bare IPs, `host:port`, bare hostnames) are
/// probed over plain HTTP.
pub fn normalize_target_url(address: &str) -> Result<url::Url, FetchError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidUrl(address.to_string()));
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };
    url::Url::parse(&candidate).map_err(|_| FetchError::InvalidUrl(address.to_string()))
}
