//! Sliding-window rate limiter keyed by client fingerprint

use super::store::{InMemoryRequestLog, RequestLog};
use crate::config::EdgeRateLimitConfig;
use crate::monitoring::Sweep;
use crate::utils::error::Result;
use crate::utils::time::{Clock, to_delta};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Rate limit decision for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests in the window, including this one when allowed
    pub current_count: u32,
    pub limit: u32,
    pub remaining: u32,
    /// Seconds until the oldest request leaves the window, only set when rejected
    pub retry_after_secs: Option<u64>,
}

/// Allows at most `max_requests` per fingerprint in any trailing window
#[derive(Debug)]
pub struct EdgeRateLimiter {
    config: EdgeRateLimitConfig,
    log: Arc<dyn RequestLog>,
    clock: Arc<dyn Clock>,
    rejected: AtomicU64,
}

impl EdgeRateLimiter {
    pub fn new(config: EdgeRateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_log(config, Arc::new(InMemoryRequestLog::new()), clock)
    }

    pub fn with_log(
        config: EdgeRateLimitConfig,
        log: Arc<dyn RequestLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            log,
            clock,
            rejected: AtomicU64::new(0),
        }
    }

    /// Check `fingerprint` and record the request when it is allowed
    pub async fn check(&self, fingerprint: &str) -> Result<RateLimitDecision> {
        let limit = self.config.max_requests;
        if !self.config.enabled {
            return Ok(RateLimitDecision {
                allowed: true,
                current_count: 0,
                limit,
                remaining: limit,
                retry_after_secs: None,
            });
        }

        let window = self.config.window();
        let now = self.clock.now();
        let cutoff = now - to_delta(window);

        let state = self
            .log
            .check_and_record(fingerprint, now, cutoff, limit)
            .await?;

        let retry_after_secs = if state.admitted {
            None
        } else {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            debug!(
                fingerprint,
                count = state.count,
                limit,
                "Edge rate limit exceeded"
            );
            let wait = state
                .oldest
                .map(|oldest| (oldest + to_delta(window) - now).to_std().unwrap_or_default())
                .unwrap_or(window);
            Some(ceil_secs(wait).max(1))
        };

        Ok(RateLimitDecision {
            allowed: state.admitted,
            current_count: state.count,
            limit,
            remaining: limit.saturating_sub(state.count),
            retry_after_secs,
        })
    }

    /// Whether the request from `fingerprint` must be rejected
    pub async fn rate_limited(&self, fingerprint: &str) -> Result<bool> {
        self.check(fingerprint).await.map(|d| !d.allowed)
    }

    /// Requests rejected since startup
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &EdgeRateLimitConfig {
        &self.config
    }
}

impl Sweep for EdgeRateLimiter {
    fn name(&self) -> &'static str {
        "edge_rate_limit"
    }

    fn sweep(&self) -> usize {
        let cutoff = self.clock.now() - to_delta(self.config.window());
        self.log.prune(cutoff)
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
