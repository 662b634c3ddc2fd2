//! Webhook broadcasting.
//!
//! The finished report is POSTed to every subscriber at once. Deliveries are
//! independent: a failing subscriber is logged and skipped, and never affects
//! the other deliveries or the run itself.

use futures::future::join_all;
use serde::Serialize;

use crate::config::WEBHOOK_TIMEOUT;
use crate::fetch::BoundedFetcher;

/// Outcome of one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The subscriber answered with this status code
    Delivered(u16),
    /// The request could not be completed
    Failed(String),
}

/// POSTs `payload` to every URL in `subscribers` concurrently.
///
/// Waits for every delivery to settle and returns their outcomes in
/// subscriber order.
pub async fn broadcast<T: Serialize + ?Sized>(
    fetcher: &BoundedFetcher,
    subscribers: &[String],
    payload: &T,
) -> Vec<Delivery> {
    if subscribers.is_empty() {
        return Vec::new();
    }
    log::info!("Delivering report to {} webhook(s)", subscribers.len());

    let deliveries = subscribers.iter().map(|url| async move {
        match fetcher.post_json(url, payload, Some(WEBHOOK_TIMEOUT)).await {
            Ok(status) => {
                log::debug!("Webhook {} answered {}", url, status);
                Delivery::Delivered(status)
            }
            Err(e) => {
                log::warn!("Webhook {} failed: {}", url, e);
                Delivery::Failed(e.to_string())
            }
        }
    });
    join_all(deliveries).await
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

    #[tokio::test]
    async fn test_no_subscribers_is_noop() {
        let outcomes = broadcast(&fetcher(), &[], &json!({"a": 1})).await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_one_failing_subscriber_does_not_affect_another() {
        let server = Server::run();
        let report = json!({"timestamp": "2025-01-01T00:00:00.000Z", "execution_time_seconds": 0.1});
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/ok"),
                request::headers(contains(("content-type", "application/json"))),
                request::body(json_decoded(eq(report.clone()))),
            ])
            .times(1)
            .respond_with(status_code(200)),
        );
        server.expect(
            Expectation::matching(request::method_path("POST", "/broken"))
                .times(1)
                .respond_with(status_code(500)),
        );
        let subscribers = vec![
            server.url_str("/broken"),
            "http://127.0.0.1:9/unreachable".to_string(),
            server.url_str("/ok"),
        ];

        let outcomes = broadcast(&fetcher(), &subscribers, &report).await;
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0], Delivery::Delivered(500));
        assert!(matches!(outcomes[1], Delivery::Failed(_)));
        assert_eq!(outcomes[2], Delivery::Delivered(200));
    }

    #[tokio::test]
    async fn test_deliveries_run_concurrently() {
        let server = Server::run();
        for path in ["/a", "/b", "/c"] {
            server.expect(
                Expectation::matching(request::method_path("POST", path)).respond_with(
                    delay_and_then(Duration::from_millis(500), status_code(204)),
                ),
            );
        }
        let subscribers: Vec<String> = ["/a", "/b", "/c"].iter().map(|p| server.url_str(p)).collect();

        let started = std::time::Instant::now();
        let outcomes = broadcast(&fetcher(), &subscribers, &json!({})).await;
        assert!(outcomes.iter().all(|o| *o == Delivery::Delivered(204)));
        assert!(started.elapsed() < Duration::from_millis(1400));
    }
}
