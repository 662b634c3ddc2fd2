//! Aggregated-platform strategy.
//!
//! One upstream status source reports on several platforms at once. The
//! upstream payload is fetched (JSON APIs first, then the HTML status page),
//! scraped into per-platform records and cached, so checking every platform
//! in a run costs a single upstream round trip.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::{
    Upstreams, META_PLATFORMS, META_STATUS_ACCEPT, META_STATUS_LABEL, PROVIDER_TIMEOUT,
};
use crate::fetch::BoundedFetcher;
use crate::status::{
    extract_embedded_json, index_by_slug, StatusCache, StatusMap, StatusScraper,
};

/// Status lookups against the aggregated-platform source.
#[derive(Debug)]
pub struct AggregatedPlatform {
    endpoints: Vec<String>,
    page: String,
    platforms: HashMap<String, String>,
    scraper: StatusScraper,
    cache: StatusCache,
}

impl AggregatedPlatform {
    /// Creates the strategy over the configured upstream endpoints.
    pub fn new(upstreams: &Upstreams, cache: StatusCache) -> Self {
        let platforms: HashMap<String, String> = META_PLATFORMS
            .iter()
            .map(|(key, slug)| (key.to_string(), slug.to_string()))
            .collect();
        let mut slugs: Vec<&str> = META_PLATFORMS.iter().map(|(_, slug)| *slug).collect();
        slugs.dedup();
        Self {
            endpoints: upstreams.meta_status_endpoints.clone(),
            page: upstreams.meta_status_page.clone(),
            platforms,
            scraper: StatusScraper::new(slugs, META_STATUS_LABEL),
            cache,
        }
    }

    /// Returns the official status message for `platform_key`.
    ///
    /// `None` when the key is not a recognized platform, when the upstream
    /// could not be read, or when it did not mention this platform.
    pub async fn status_for(&self, fetcher: &BoundedFetcher, platform_key: &str) -> Option<String> {
        let slug = self.platforms.get(platform_key)?;
        let map = self
            .cache
            .get_or_refresh(|| self.fetch_status_map(fetcher))
            .await?;
        map.get(slug).map(|entry| entry.message.clone())
    }

    async fn fetch_status_map(&self, fetcher: &BoundedFetcher) -> StatusMap {
        match self.fetch_payload(fetcher).await {
            Some(document) => {
                let map = index_by_slug(self.scraper.scrape(&document));
                log::debug!("Aggregated status source listed {} platforms", map.len());
                map
            }
            None => {
                log::warn!("Aggregated status source unavailable");
                StatusMap::new()
            }
        }
    }

    async fn fetch_payload(&self, fetcher: &BoundedFetcher) -> Option<Value> {
        for endpoint in &self.endpoints {
            match fetcher
                .get_text(endpoint, Some(PROVIDER_TIMEOUT), Some(META_STATUS_ACCEPT))
                .await
            {
                Ok(response) if response.is_ok() => match response.json() {
                    Ok(document) => return Some(document),
                    Err(e) => log::debug!("{} did not return JSON: {}", endpoint, e),
                },
                Ok(response) => log::debug!("{} answered {}", endpoint, response.status),
                Err(e) => log::debug!("{} unreachable: {}", endpoint, e),
            }
        }

        match fetcher
            .get_text(&self.page, Some(PROVIDER_TIMEOUT), Some(META_STATUS_ACCEPT))
            .await
        {
            Ok(response) if response.is_ok() => extract_embedded_json(&response.body),
            Ok(response) => {
                log::debug!("{} answered {}", self.page, response.status);
                None
            }
            Err(e) => {
                log::debug!("{} unreachable: {}", self.page, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::status::cache::tests::FakeClock;

    fn fetcher() -> BoundedFetcher {
        BoundedFetcher::new(reqwest::Client::new(), Duration::from_secs(2))
    }

    fn upstreams(server: &Server) -> Upstreams {
        Upstreams {
            meta_status_endpoints: vec![
                server.url_str("/api/status"),
                server.url_str("/api/statuses"),
            ],
            meta_status_page: server.url_str("/"),
            ..Upstreams::default()
        }
    }

    fn strategy(server: &Server, clock: Arc<FakeClock>) -> AggregatedPlatform {
        AggregatedPlatform::new(&upstreams(server), StatusCache::new(clock))
    }

    fn wrapped_outage() -> Value {
        json!({
            "data": {
                "page": {
                    "services": [
                        {"slug": "facebook", "status": "Major outage reported"},
                        {"slug": "instagram", "status": "Operational"}
                    ]
                }
            }
        })
    }

    #[tokio::test]
    async fn test_finds_nested_record_and_reuses_cache() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/api/status"),
                request::headers(contains(("accept", META_STATUS_ACCEPT))),
            ])
            .times(1)
            .respond_with(json_encoded(wrapped_outage())),
        );
        let platform = strategy(&server, FakeClock::new());
        let fetcher = fetcher();

        let facebook = platform.status_for(&fetcher, "facebook").await;
        assert_eq!(
            facebook.as_deref(),
            Some("🔴 Down (MetaStatus: Major outage reported)")
        );
        let instagram = platform.status_for(&fetcher, "instagram").await;
        assert_eq!(instagram.as_deref(), Some("🟢 OK (MetaStatus: Operational)"));
        assert_eq!(platform.status_for(&fetcher, "whatsapp").await, None);
    }

    #[tokio::test]
    async fn test_unknown_platform_never_fetches() {
        let server = Server::run();
        let platform = strategy(&server, FakeClock::new());
        assert_eq!(platform.status_for(&fetcher(), "myspace").await, None);
    }

    #[tokio::test]
    async fn test_second_endpoint_used_when_first_fails() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/api/status"))
                .respond_with(status_code(200).body("<html>not json</html>")),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/api/statuses")).respond_with(
                json_encoded(json!([{"platform": "WhatsApp", "state": "Partial degradation"}])),
            ),
        );
        let platform = strategy(&server, FakeClock::new());
        let message = platform.status_for(&fetcher(), "whatsapp").await;
        assert_eq!(
            message.as_deref(),
            Some("🟡 Warning (MetaStatus: Partial degradation)")
        );
    }

    #[tokio::test]
    async fn test_oversized_endpoint_body_moves_to_next_source() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/api/status")).respond_with(
                status_code(200).body(" ".repeat(crate::config::MAX_RESPONSE_BODY_SIZE + 1)),
            ),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/api/statuses")).respond_with(
                json_encoded(json!([{"platform": "Instagram", "status": "Operational"}])),
            ),
        );
        let platform = strategy(&server, FakeClock::new());
        let message = platform.status_for(&fetcher(), "instagram").await;
        assert_eq!(message.as_deref(), Some("🟢 OK (MetaStatus: Operational)"));
    }

    #[tokio::test]
    async fn test_html_page_fallback() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/api/status"))
                .respond_with(status_code(500)),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/api/statuses"))
                .respond_with(status_code(404)),
        );
        let html = r#"<html><body><script id="__NEXT_DATA__" type="application/json">
            {"props": {"pageProps": {"statuses": [
                {"name": "Facebook", "status": {"description": "Healthy"}}
            ]}}}
        </script></body></html>"#;
        server.expect(
            Expectation::matching(request::method_path("GET", "/"))
                .respond_with(status_code(200).body(html)),
        );
        let platform = strategy(&server, FakeClock::new());
        let message = platform.status_for(&fetcher(), "facebook").await;
        assert_eq!(message.as_deref(), Some("🟢 OK (MetaStatus: Healthy)"));
    }

    #[tokio::test]
    async fn test_failure_is_cached_for_failure_ttl() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/api/status"))
                .times(2)
                .respond_with(status_code(503)),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/api/statuses"))
                .times(2)
                .respond_with(status_code(503)),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/"))
                .times(2)
                .respond_with(status_code(200).body("<html>maintenance</html>")),
        );
        let clock = FakeClock::new();
        let platform = strategy(&server, clock.clone());
        let fetcher = fetcher();

        assert_eq!(platform.status_for(&fetcher, "facebook").await, None);
        clock.advance(Duration::from_secs(5));
        assert_eq!(platform.status_for(&fetcher, "instagram").await, None);
        clock.advance(Duration::from_secs(11));
        assert_eq!(platform.status_for(&fetcher, "facebook").await, None);
    }

    #[tokio::test]
    async fn test_success_expires_after_ttl() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/api/status"))
                .times(2)
                .respond_with(json_encoded(wrapped_outage())),
        );
        let clock = FakeClock::new();
        let platform = strategy(&server, clock.clone());
        let fetcher = fetcher();

        assert!(platform.status_for(&fetcher, "facebook").await.is_some());
        clock.advance(Duration::from_secs(59));
        assert!(platform.status_for(&fetcher, "facebook").await.is_some());
        clock.advance(Duration::from_secs(2));
        assert!(platform.status_for(&fetcher, "facebook").await.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_slugs_keep_longest_detail() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/api/status")).respond_with(
                json_encoded(json!({
                    "summary": {"slug": "facebook", "status": "Degraded", "message": "Slow"},
                    "incidents": [{
                        "slug": "facebook",
                        "status": "Degraded",
                        "message": "Slow photo uploads in some regions"
                    }]
                })),
            ),
        );
        let platform = strategy(&server, FakeClock::new());
        let message = platform.status_for(&fetcher(), "facebook").await;
        assert_eq!(
            message.as_deref(),
            Some("🟡 Warning (MetaStatus: Degraded - Slow photo uploads in some regions)")
        );
    }
}
