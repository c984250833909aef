//! TTL cache for computed edge responses

use crate::monitoring::Sweep;
use crate::monitoring::metrics::helpers::ratio;
use crate::utils::error::Result;
use crate::utils::time::{Clock, to_delta};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::trace;

/// A cached value and its freshness window
#[derive(Debug, Clone)]
pub struct EdgeCacheEntry<V> {
    pub data: V,
    pub timestamp: DateTime<Utc>,
    pub ttl: Duration,
}

impl<V> EdgeCacheEntry<V> {
    /// Valid while `timestamp + ttl > now`
    #[inline]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.timestamp + to_delta(self.ttl) > now
    }
}

/// Whether a lookup was served from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.hits + self.misses)
    }
}

/// Keyed TTL cache with compute-on-miss
///
/// Concurrent misses for the same key each run `compute`; the last writer
/// wins. Entries leave only through TTL expiry.
#[derive(Debug)]
pub struct EdgeCache<V> {
    entries: DashMap<String, EdgeCacheEntry<V>>,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<V: Clone + Send + Sync> EdgeCache<V> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Return the fresh value for `key`, computing and storing it on a miss
    pub async fn get_or_compute<F, Fut>(&self, key: &str, ttl: Duration, compute: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        self.get_or_compute_traced(key, ttl, compute)
            .await
            .map(|(value, _)| value)
    }

    /// Like [`get_or_compute`](Self::get_or_compute), also reporting hit or miss
    pub async fn get_or_compute_traced<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<(V, CacheStatus)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key, "Edge cache hit");
            return Ok((value, CacheStatus::Hit));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(key, "Edge cache miss");

        // Failed computations are not cached
        let value = compute().await?;
        self.insert(key, value.clone(), ttl);
        Ok((value, CacheStatus::Miss))
    }

    /// Fresh value for `key`, dropping the entry if it has expired
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let fresh = self
            .entries
            .get(key)
            .and_then(|entry| entry.is_fresh(now).then(|| entry.data.clone()));

        if fresh.is_none() && self.entries.remove_if(key, |_, e| !e.is_fresh(now)).is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        fresh
    }

    pub fn insert(&self, key: &str, data: V, ttl: Duration) {
        let entry = EdgeCacheEntry {
            data,
            timestamp: self.clock.now(),
            ttl,
        };
        self.entries.insert(key.to_string(), entry);
    }

    /// Remove every expired entry, returning how many were removed
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));
        let removed = before.saturating_sub(self.entries.len());
        self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

impl<V: Clone + Send + Sync> Sweep for EdgeCache<V> {
    fn name(&self) -> &'static str {
        "edge_cache"
    }

    fn sweep(&self) -> usize {
        self.sweep_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::MonitorError;
    use crate::utils::time::MockClock;
    use std::sync::atomic::AtomicUsize;

    fn cache() -> (EdgeCache<String>, MockClock) {
        let clock = MockClock::new();
        (EdgeCache::new(Arc::new(clock.clone())), clock)
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let (cache, _) = cache();
        let calls = AtomicUsize::new(0);
        let ttl = Duration::from_secs(60);

        let compute = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("rendered".to_string())
        };

        let (first, status) = cache.get_or_compute_traced("k", ttl, compute).await.unwrap();
        assert_eq!(first, "rendered");
        assert_eq!(status, CacheStatus::Miss);

        let (second, status) = cache
            .get_or_compute_traced("k", ttl, || async { Ok("other".to_string()) })
            .await
            .unwrap();
        assert_eq!(second, "rendered");
        assert_eq!(status, CacheStatus::Hit);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[tokio::test]
    async fn test_expired_entry_recomputes() {
        let (cache, clock) = cache();
        let ttl = Duration::from_secs(60);

        cache
            .get_or_compute("k", ttl, || async { Ok("v1".to_string()) })
            .await
            .unwrap();

        clock.advance(Duration::from_secs(59));
        let value = cache
            .get_or_compute("k", ttl, || async { Ok("v2".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "v1");

        // timestamp + ttl == now is no longer fresh
        clock.advance(Duration::from_secs(1));
        let value = cache
            .get_or_compute("k", ttl, || async { Ok("v2".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "v2");
    }

    #[tokio::test]
    async fn test_compute_error_is_not_cached() {
        let (cache, _) = cache();
        let ttl = Duration::from_secs(60);

        let result = cache
            .get_or_compute("k", ttl, || async { Err(MonitorError::fetch("upstream down")) })
            .await;
        assert!(matches!(result, Err(MonitorError::Fetch(_))));
        assert!(cache.is_empty());

        let value = cache
            .get_or_compute("k", ttl, || async { Ok("ok".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "ok");
    }

    #[test]
    fn test_get_drops_expired_entry() {
        let (cache, clock) = cache();
        cache.insert("k", "v".to_string(), Duration::from_secs(1));

        clock.advance(Duration::from_secs(2));

        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_sweep_expired() {
        let (cache, clock) = cache();
        cache.insert("short", "a".to_string(), Duration::from_secs(10));
        cache.insert("long", "b".to_string(), Duration::from_secs(100));

        clock.advance(Duration::from_secs(10));

        assert_eq!(cache.sweep_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("long").as_deref(), Some("b"));
    }

    #[test]
    fn test_cache_status_strings() {
        assert_eq!(CacheStatus::Hit.to_string(), "HIT");
        assert_eq!(CacheStatus::Miss.as_str(), "MISS");
    }
}
