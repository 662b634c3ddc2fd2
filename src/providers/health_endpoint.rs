//! JSON health endpoints.
//!
//! Two shapes are supported: a liveness document with a nested boolean
//! (`checks.vps_ping.alive`) and a plain `{"status": "ok"}` API health answer.

use serde_json::Value;

use crate::config::{HEALTH_ALIVE_PATH, PROVIDER_TIMEOUT};
use crate::fetch::BoundedFetcher;
use crate::status::{nested_value, Severity};

use super::CheckResult;

/// Checks a health endpoint reporting a nested `alive` flag.
pub async fn check_health_endpoint(fetcher: &BoundedFetcher, address: &str) -> CheckResult {
    let response = match fetcher.get_text(address, Some(PROVIDER_TIMEOUT), None).await {
        Ok(response) => response,
        Err(e) => {
            log::debug!("Health endpoint {} unreachable: {}", address, e);
            return CheckResult::new(None, Severity::Down.state(format!("connection error: {}", e)));
        }
    };
    if !response.is_ok() {
        return CheckResult::new(
            Some(response.status),
            Severity::Down.state(format!("endpoint status: {}", response.status)),
        );
    }

    let code = Some(response.status);
    match response.json() {
        Ok(document) => match nested_value(&document, HEALTH_ALIVE_PATH) {
            Some(Value::Bool(true)) => CheckResult::new(code, Severity::Ok.state("reachable")),
            _ => CheckResult::new(code, Severity::Down.state("reported alive: false")),
        },
        Err(e) => CheckResult::new(code, Severity::Down.state(format!("connection error: {}", e))),
    }
}

/// Checks an API health endpoint answering `{"status": "ok"}`.
pub async fn check_api_status(fetcher: &BoundedFetcher, address: &str) -> CheckResult {
    let response = match fetcher.get_text(address, Some(PROVIDER_TIMEOUT), None).await {
        Ok(response) => response,
        Err(e) => {
            log::debug!("API health endpoint {} unreachable: {}", address, e);
            return CheckResult::new(None, Severity::Down.state("network error"));
        }
    };
    if !response.is_ok() {
        return CheckResult::new(
            Some(response.status),
            Severity::Down.state(format!("code: {}", response.status)),
        );
    }

    let code = Some(response.status);
    let status = response.json().ok().and_then(|document| match document.get("status") {
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | Some(Value::Bool(false)) | None => None,
        Some(other) => Some(other.to_string()),
    });
    match status.as_deref() {
        Some("ok") => CheckResult::new(code, Severity::Ok.state("API health: ok")),
        Some(other) => CheckResult::new(code, Severity::Warn.state(other)),
        None => CheckResult::new(code, Severity::Warn.state("no JSON")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use serde_json::json;
    use std::time::Duration;

    fn fetcher() -> BoundedFetcher {
        BoundedFetcher::new(reqwest::Client::new(), Duration::from_secs(2))
    }

    fn serve(server: &Server, responder: impl httptest::responders::Responder + 'static) {
        server.expect(
            Expectation::matching(request::method_path("GET", "/health")).respond_with(responder),
        );
    }

    #[tokio::test]
    async fn test_alive_true_is_ok() {
        let server = Server::run();
        serve(
            &server,
            json_encoded(json!({"checks": {"vps_ping": {"alive": true, "latency_ms": 4}}})),
        );
        let result = check_health_endpoint(&fetcher(), &server.url_str("/health")).await;
        assert_eq!(result.code, Some(200));
        assert_eq!(result.message, "🟢 OK (reachable)");
    }

    #[tokio::test]
    async fn test_alive_false_or_missing_is_down() {
        for body in [
            json!({"checks": {"vps_ping": {"alive": false}}}),
            json!({"checks": {}}),
            json!({"checks": {"vps_ping": {"alive": "yes"}}}),
        ] {
            let server = Server::run();
            serve(&server, json_encoded(body));
            let result = check_health_endpoint(&fetcher(), &server.url_str("/health")).await;
            assert_eq!(result.message, "🔴 Down (reported alive: false)");
        }
    }

    #[tokio::test]
    async fn test_health_endpoint_non_200_is_down_with_code() {
        let server = Server::run();
        serve(&server, status_code(500));
        let result = check_health_endpoint(&fetcher(), &server.url_str("/health")).await;
        assert_eq!(result.code, Some(500));
        assert_eq!(result.message, "🔴 Down (endpoint status: 500)");
    }

    #[tokio::test]
    async fn test_health_endpoint_unreachable_reports_error_text() {
        let result = check_health_endpoint(&fetcher(), "http://127.0.0.1:9/health").await;
        assert_eq!(result.code, None);
        assert!(result.message.starts_with("🔴 Down (connection error: "));
    }

    #[tokio::test]
    async fn test_api_status_ok() {
        let server = Server::run();
        serve(&server, json_encoded(json!({"status": "ok"})));
        let result = check_api_status(&fetcher(), &server.url_str("/health")).await;
        assert_eq!(result.code, Some(200));
        assert_eq!(result.message, "🟢 OK (API health: ok)");
    }

    #[tokio::test]
    async fn test_api_status_other_value_is_warning() {
        let server = Server::run();
        serve(&server, json_encoded(json!({"status": "degraded"})));
        let result = check_api_status(&fetcher(), &server.url_str("/health")).await;
        assert_eq!(result.message, "🟡 Warning (degraded)");
    }

    #[tokio::test]
    async fn test_api_status_without_json_is_warning() {
        let server = Server::run();
        serve(&server, status_code(200).body("OK"));
        let result = check_api_status(&fetcher(), &server.url_str("/health")).await;
        assert_eq!(result.message, "🟡 Warning (no JSON)");
    }

    #[tokio::test]
    async fn test_api_status_non_200_is_down() {
        let server = Server::run();
        serve(&server, status_code(404));
        let result = check_api_status(&fetcher(), &server.url_str("/health")).await;
        assert_eq!(result.code, Some(404));
        assert_eq!(result.message, "🔴 Down (code: 404)");
    }

    #[tokio::test]
    async fn test_api_status_network_error() {
        let result = check_api_status(&fetcher(), "http://127.0.0.1:9/api/health").await;
        assert_eq!(result.code, None);
        assert_eq!(result.message, "🔴 Down (network error)");
    }
}
