//! Type definitions for request metrics, route statistics and alerts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Memory figures captured at one instant, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Resident set size of this process
    pub rss: u64,
    /// Virtual memory of this process
    pub virtual_memory: u64,
    /// Memory in use across the host
    pub system_used: u64,
    /// Total memory of the host
    pub system_total: u64,
}

impl MemorySnapshot {
    /// Ratio of used to total host memory, 0.0 when the total is unknown
    ///
    /// This is a host-wide figure: memory held by other processes counts
    /// towards it.
    pub fn usage_ratio(&self) -> f64 {
        if self.system_total == 0 {
            0.0
        } else {
            self.system_used as f64 / self.system_total as f64
        }
    }
}

/// Aggregate CPU utilisation across all logical cores
///
/// Measured system-wide between span start and finish, so concurrent load
/// from other processes is included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuUsage {
    /// Busy time over total time, as a percentage
    pub percent: f64,
}

/// One sampled request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// When the response passed back through the middleware
    pub timestamp: DateTime<Utc>,
    /// Matched route pattern, or the raw path when nothing matched
    pub route: String,
    /// HTTP method
    pub method: String,
    /// Wall-clock handling time in milliseconds
    pub response_time_ms: f64,
    /// Response status
    pub status_code: u16,
    /// Memory at completion
    pub memory: MemorySnapshot,
    /// Change in resident set size over the request
    pub memory_delta: i64,
    /// CPU utilisation over the request
    pub cpu: CpuUsage,
    /// In-flight requests at completion, this one included
    pub active_connections: u64,
    /// 1 when the status is an error, otherwise 0
    pub error_count: u8,
    /// Cache hits reported by the handler
    pub cache_hits: u64,
    /// Cache misses reported by the handler
    pub cache_misses: u64,
}

impl MetricRecord {
    /// Key used by the route aggregator, e.g. `GET /vehicles/{id}`
    pub fn route_key(&self) -> String {
        route_key(&self.method, &self.route)
    }

    /// Whether the response counts as an error
    #[inline]
    pub fn is_error(&self) -> bool {
        self.error_count > 0
    }
}

/// Build an aggregator key from a method and route
pub fn route_key(method: &str, route: &str) -> String {
    format!("{} {}", method, route)
}

/// Running statistics for one route key
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteStat {
    pub count: u64,
    /// Sum of response times in milliseconds
    pub total_time: f64,
    pub errors: u64,
    pub avg_response_time: f64,
}

/// Which rule raised an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    ResponseTime,
    MemoryUsage,
    ErrorRate,
    CpuUsage,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::ResponseTime => "response_time",
            AlertType::MemoryUsage => "memory_usage",
            AlertType::ErrorRate => "error_rate",
            AlertType::CpuUsage => "cpu_usage",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert severity levels, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Low => write!(f, "LOW"),
            AlertSeverity::Medium => write!(f, "MEDIUM"),
            AlertSeverity::High => write!(f, "HIGH"),
            AlertSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// An emitted threshold alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: uuid::Uuid,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Observed value that crossed the threshold
    pub value: f64,
    pub threshold: f64,
    /// Route of the metric that triggered the alert
    pub route: Option<String>,
}

/// Headline numbers over a report window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Sampled requests in the window
    pub total_requests: u64,
    /// Sampled error responses in the window
    pub total_errors: u64,
    pub error_rate: f64,
    pub avg_response_time_ms: f64,
    pub p50_response_time_ms: f64,
    pub p95_response_time_ms: f64,
    pub p99_response_time_ms: f64,
    /// Hits over hits plus misses, 0.0 when no cache traffic was reported
    pub cache_hit_rate: f64,
    /// Requests in flight when the report was built
    pub active_connections: u64,
    /// Alerts masked by the cooldown since startup
    pub alerts_suppressed: u64,
}

/// Snapshot returned by the performance report accessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub generated_at: DateTime<Utc>,
    pub window_secs: u64,
    pub summary: PerformanceSummary,
    /// Route table since startup, keyed by `METHOD route`
    pub routes: HashMap<String, RouteStat>,
    /// Metrics inside the window, oldest first
    pub metrics: Vec<MetricRecord>,
    /// Alerts inside the window, oldest first
    pub alerts: Vec<AlertRecord>,
}
