//! Request performance monitoring
//!
//! Sampled requests become [`MetricRecord`]s that feed the per-route
//! aggregator and the threshold alert evaluator. All state is in-memory and
//! owned by a [`MonitoringSystem`].

pub mod alerts;
pub mod background;
pub mod metrics;
pub mod routes;
mod system;
pub mod types;

pub use background::{Sweep, SweepScheduler};
pub use system::MonitoringSystem;
pub use types::{
    AlertRecord, AlertSeverity, AlertType, CpuUsage, MemorySnapshot, MetricRecord,
    PerformanceReport, PerformanceSummary, RouteStat,
};
