//! Request timestamp storage for the sliding-window limiter

use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::fmt::Debug;

/// Outcome of one atomic check-and-record against a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    /// Whether `now` was appended
    pub admitted: bool,
    /// Timestamps in the window after the operation
    pub count: u32,
    /// Oldest timestamp still in the window
    pub oldest: Option<DateTime<Utc>>,
}

/// Per-fingerprint request timestamps
///
/// Implementations must make `check_and_record` atomic per fingerprint.
#[async_trait]
pub trait RequestLog: Send + Sync + Debug {
    /// Drop timestamps at or before `cutoff`, then append `now` if fewer
    /// than `limit` remain
    async fn check_and_record(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
        cutoff: DateTime<Utc>,
        limit: u32,
    ) -> Result<WindowState>;

    /// Timestamps currently stored for `fingerprint`, oldest first
    async fn window(&self, fingerprint: &str) -> Result<Vec<DateTime<Utc>>>;

    /// Forget fingerprints with no timestamp after `cutoff`
    fn prune(&self, cutoff: DateTime<Utc>) -> usize;
}

/// Process-local request log
#[derive(Debug, Default)]
pub struct InMemoryRequestLog {
    windows: DashMap<String, Vec<DateTime<Utc>>>,
}

impl InMemoryRequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fingerprints tracked
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[async_trait]
impl RequestLog for InMemoryRequestLog {
    async fn check_and_record(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
        cutoff: DateTime<Utc>,
        limit: u32,
    ) -> Result<WindowState> {
        // Holding the entry locks the shard, which makes this atomic per key
        let mut window = self.windows.entry(fingerprint.to_string()).or_default();
        window.retain(|&ts| ts > cutoff);

        let admitted = (window.len() as u64) < u64::from(limit);
        if admitted {
            window.push(now);
        }

        Ok(WindowState {
            admitted,
            count: window.len() as u32,
            oldest: window.first().copied(),
        })
    }

    async fn window(&self, fingerprint: &str) -> Result<Vec<DateTime<Utc>>> {
        Ok(self
            .windows
            .get(fingerprint)
            .map(|w| w.clone())
            .unwrap_or_default())
    }

    fn prune(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, window| window.last().is_some_and(|&ts| ts > cutoff));
        before.saturating_sub(self.windows.len())
    }
}
