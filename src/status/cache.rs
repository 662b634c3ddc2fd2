//! TTL cache for aggregated-platform scrape results.
//!
//! The cache holds one value: the slug index produced by the most recent
//! scrape, or an explicit "no result" marker. Both expire; a failed scrape
//! expires sooner so the upstream is retried quickly.
//!
//! Access goes through [`StatusCache::get_or_refresh`], which holds an async
//! mutex across the refresh. Concurrent callers therefore wait for the single
//! in-flight upstream fetch instead of starting their own.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use super::structural::NormalizedStatusEntry;
use crate::config::{STATUS_CACHE_FAILURE_TTL, STATUS_CACHE_SUCCESS_TTL};

/// Scraped records indexed by slug.
pub type StatusMap = HashMap<String, NormalizedStatusEntry>;

/// Source of the current time, injectable for tests.
pub trait Clock: Send + Sync {
    /// Current monotonic time.
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Default)]
struct CacheSlot {
    expires_at: Option<Instant>,
    entries: Option<Arc<StatusMap>>,
}

/// Process-lifetime cache of the latest aggregated-platform result.
pub struct StatusCache {
    slot: Mutex<CacheSlot>,
    clock: Arc<dyn Clock>,
    success_ttl: Duration,
    failure_ttl: Duration,
}

impl std::fmt::Debug for StatusCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusCache")
            .field("success_ttl", &self.success_ttl)
            .field("failure_ttl", &self.failure_ttl)
            .finish_non_exhaustive()
    }
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl StatusCache {
    /// Creates an empty cache with the standard 60s / 15s lifetimes.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttls(clock, STATUS_CACHE_SUCCESS_TTL, STATUS_CACHE_FAILURE_TTL)
    }

    /// Creates an empty cache with custom lifetimes.
    pub fn with_ttls(clock: Arc<dyn Clock>, success_ttl: Duration, failure_ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(CacheSlot::default()),
            clock,
            success_ttl,
            failure_ttl,
        }
    }

    /// Returns the cached index, refreshing it with `refresh` when expired.
    ///
    /// An empty refresh result is cached as "no result" for the failure TTL
    /// and reported as `None`.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Option<Arc<StatusMap>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StatusMap>,
    {
        let mut slot = self.slot.lock().await;
        let now = self.clock.now();
        if slot.expires_at.is_some_and(|expires_at| now < expires_at) {
            log::debug!("Aggregated status cache hit");
            return slot.entries.clone();
        }

        log::debug!("Aggregated status cache miss, refreshing");
        let fresh = refresh().await;
        let now = self.clock.now();
        if fresh.is_empty() {
            slot.entries = None;
            slot.expires_at = Some(now + self.failure_ttl);
        } else {
            slot.entries = Some(Arc::new(fresh));
            slot.expires_at = Some(now + self.success_ttl);
        }
        slot.entries.clone()
    }
}
