//! Core MonitoringSystem implementation

use crate::config::MonitoringConfig;
use crate::utils::error::{MonitorError, Result};
use crate::utils::time::{Clock, system_clock, to_delta};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, trace};

use super::alerts::AlertEvaluator;
use super::background::Sweep;
use super::metrics::helpers::{calculate_average, calculate_percentile, ratio};
use super::metrics::{MetricsCollector, RequestSpan, ResourceProbe, RetentionQueue, SysinfoProbe};
use super::routes::RouteAggregator;
use super::types::*;

/// Monitoring context shared by the middleware, handlers and sweeper
///
/// Cloning is cheap; every clone observes the same state.
#[derive(Debug, Clone)]
pub struct MonitoringSystem {
    config: Arc<MonitoringConfig>,
    clock: Arc<dyn Clock>,
    collector: Arc<MetricsCollector>,
    routes: Arc<RouteAggregator>,
    alerts: Arc<AlertEvaluator>,
    metrics: Arc<RwLock<RetentionQueue<MetricRecord>>>,
    start_time: Instant,
}

impl MonitoringSystem {
    /// Create a monitoring system reading resources through `sysinfo`
    pub fn new(config: &MonitoringConfig) -> Self {
        Self::with_probe(config, Arc::new(SysinfoProbe::new()), system_clock())
    }

    /// Create a monitoring system with an explicit probe and clock
    pub fn with_probe(
        config: &MonitoringConfig,
        probe: Arc<dyn ResourceProbe>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(
            sample_rate = config.sample_rate,
            retention_secs = config.retention_secs,
            cooldown_secs = config.alerts.cooldown_secs,
            "Initializing monitoring system"
        );

        let collector = MetricsCollector::new(config.sample_rate, probe, clock.clone());
        let alerts = AlertEvaluator::new(config.alerts.clone(), config.retention(), clock.clone());

        Self {
            config: Arc::new(config.clone()),
            clock,
            collector: Arc::new(collector),
            routes: Arc::new(RouteAggregator::new()),
            alerts: Arc::new(alerts),
            metrics: Arc::new(RwLock::new(RetentionQueue::new(config.retention()))),
            start_time: Instant::now(),
        }
    }

    /// Open a span for an incoming request, or `None` when unsampled
    pub fn begin_request(&self, method: &str, route: &str) -> Option<RequestSpan> {
        if !self.config.enabled {
            return None;
        }
        self.collector.begin(method, route)
    }

    /// Finalise a span and record the resulting metric
    pub fn complete_request(
        &self,
        span: RequestSpan,
        status_code: u16,
        cache_hits: u64,
        cache_misses: u64,
    ) -> Result<Option<AlertRecord>> {
        let metric = self
            .collector
            .finish(span, status_code, cache_hits, cache_misses)?;
        self.record(metric)
    }

    /// Fold a finished metric into route stats and alerts, then store it
    pub fn record(&self, metric: MetricRecord) -> Result<Option<AlertRecord>> {
        if !metric.response_time_ms.is_finite() || metric.response_time_ms < 0.0 {
            return Err(MonitorError::monitoring(format!(
                "invalid response time {} for {}",
                metric.response_time_ms,
                metric.route_key()
            )));
        }

        let route_key = metric.route_key();
        self.routes
            .record(&route_key, metric.response_time_ms, metric.is_error());
        let error_rate = self.routes.error_rate();

        let alert = self.alerts.check(&metric, error_rate);

        let now = self.clock.now();
        let evicted = self.metrics.write().push(metric, now);
        if evicted > 0 {
            trace!(evicted, "Evicted expired metrics");
        }

        Ok(alert)
    }

    /// Build a performance report over the trailing `window`
    pub fn report(&self, window: Duration) -> PerformanceReport {
        let now = self.clock.now();
        let since = now - to_delta(window);

        let metrics = self.metrics.read().since(since);
        let summary = self.summarize(&metrics);

        PerformanceReport {
            generated_at: now,
            window_secs: window.as_secs(),
            summary,
            routes: self.routes.snapshot(),
            metrics,
            alerts: self.alerts.since(since),
        }
    }

    fn summarize(&self, metrics: &[MetricRecord]) -> PerformanceSummary {
        let total_requests = metrics.len() as u64;
        let total_errors = metrics.iter().filter(|m| m.is_error()).count() as u64;

        let mut times: Vec<f64> = metrics.iter().map(|m| m.response_time_ms).collect();
        times.sort_by(f64::total_cmp);

        let (hits, misses) = metrics.iter().fold((0u64, 0u64), |(h, m), metric| {
            (h + metric.cache_hits, m + metric.cache_misses)
        });

        PerformanceSummary {
            total_requests,
            total_errors,
            error_rate: ratio(total_errors, total_requests),
            avg_response_time_ms: calculate_average(&times),
            p50_response_time_ms: calculate_percentile(&times, 0.50),
            p95_response_time_ms: calculate_percentile(&times, 0.95),
            p99_response_time_ms: calculate_percentile(&times, 0.99),
            cache_hit_rate: ratio(hits, hits + misses),
            active_connections: self.collector.in_flight(),
            alerts_suppressed: self.alerts.stats().suppressed,
        }
    }

    /// Most recent metrics, newest first
    pub fn recent_metrics(&self, limit: usize) -> Vec<MetricRecord> {
        self.metrics.read().latest(limit)
    }

    pub fn metric_count(&self) -> usize {
        self.metrics.read().len()
    }

    pub fn route_stats(&self) -> HashMap<String, RouteStat> {
        self.routes.snapshot()
    }

    /// Most recent alerts, newest first
    pub fn alert_history(&self, limit: usize) -> Vec<AlertRecord> {
        self.alerts.history(limit)
    }

    pub fn collector(&self) -> &MetricsCollector {
        &self.collector
    }

    pub fn routes(&self) -> &RouteAggregator {
        &self.routes
    }

    pub fn alerts(&self) -> &AlertEvaluator {
        &self.alerts
    }

    pub fn config(&self) -> &MonitoringConfig {
        &self.config
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Sweep for MonitoringSystem {
    fn name(&self) -> &'static str {
        "monitoring"
    }

    fn sweep(&self) -> usize {
        let now = self.clock.now();
        let metrics = self.metrics.write().sweep(now);
        metrics + self.alerts.sweep()
    }
}
