//! Time-ordered storage with retention-based eviction

use crate::monitoring::types::{AlertRecord, MetricRecord};
use crate::utils::time::is_older_than;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;

/// Items that carry the instant they were recorded
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for MetricRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for AlertRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Append-only queue that drops entries older than the retention window
///
/// Entries are appended in completion order, which is timestamp order, so
/// expiry only ever needs to look at the front of the queue.
#[derive(Debug, Clone)]
pub struct RetentionQueue<T> {
    items: VecDeque<T>,
    retention: Duration,
}

impl<T: Timestamped + Clone> RetentionQueue<T> {
    pub fn new(retention: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            retention,
        }
    }

    /// Append an item, then evict the expired prefix. Returns the evicted count.
    pub fn push(&mut self, item: T, now: DateTime<Utc>) -> usize {
        self.items.push_back(item);
        self.sweep(now)
    }

    /// Evict every leading item older than the retention window
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let cut = self
            .items
            .iter()
            .position(|item| !is_older_than(item.timestamp(), now, self.retention))
            .unwrap_or(self.items.len());
        self.items.drain(..cut);
        cut
    }

    /// Items recorded at or after `since`, oldest first
    pub fn since(&self, since: DateTime<Utc>) -> Vec<T> {
        let mut items: Vec<T> = self
            .items
            .iter()
            .filter(|item| item.timestamp() >= since)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.timestamp());
        items
    }

    /// The `limit` most recent items, newest first
    pub fn latest(&self, limit: usize) -> Vec<T> {
        self.items.iter().rev().take(limit).cloned().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }
}
