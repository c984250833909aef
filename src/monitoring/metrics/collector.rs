//! Request sampling and metric finalisation

use super::probe::{CpuSnapshot, ResourceProbe};
use crate::monitoring::types::{CpuUsage, MemorySnapshot, MetricRecord};
use crate::utils::error::Result;
use crate::utils::time::Clock;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{trace, warn};

/// Samples requests and turns finished spans into metric records
#[derive(Debug)]
pub struct MetricsCollector {
    sample_rate: f64,
    probe: Arc<dyn ResourceProbe>,
    clock: Arc<dyn Clock>,
    in_flight: Arc<AtomicU64>,
    sampled: AtomicU64,
    skipped: AtomicU64,
}

/// Counters describing the sample gate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SamplingStats {
    pub sampled: u64,
    pub skipped: u64,
    pub in_flight: u64,
}

/// A sampled request that has not completed yet
///
/// Dropping the span without passing it to [`MetricsCollector::finish`]
/// releases the in-flight gauge and records nothing.
#[derive(Debug)]
pub struct RequestSpan {
    method: String,
    route: String,
    started: Instant,
    cpu_before: CpuSnapshot,
    memory_before: MemorySnapshot,
    _gauge: InFlightGuard,
}

impl RequestSpan {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn route(&self) -> &str {
        &self.route
    }
}

#[derive(Debug)]
struct InFlightGuard(Arc<AtomicU64>);

impl InFlightGuard {
    fn acquire(gauge: &Arc<AtomicU64>) -> Self {
        gauge.fetch_add(1, Ordering::AcqRel);
        Self(Arc::clone(gauge))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl MetricsCollector {
    pub fn new(sample_rate: f64, probe: Arc<dyn ResourceProbe>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sample_rate: sample_rate.clamp(0.0, 1.0),
            probe,
            clock,
            in_flight: Arc::new(AtomicU64::new(0)),
            sampled: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn should_sample(&self) -> bool {
        if self.sample_rate >= 1.0 {
            true
        } else if self.sample_rate <= 0.0 {
            false
        } else {
            rand::thread_rng().gen_bool(self.sample_rate)
        }
    }

    /// Apply the sample gate and, when sampled, open a span
    ///
    /// A probe failure leaves the request unsampled.
    pub fn begin(&self, method: &str, route: &str) -> Option<RequestSpan> {
        if !self.should_sample() {
            self.skipped.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let baseline = self
            .probe
            .cpu()
            .and_then(|cpu| self.probe.memory().map(|memory| (cpu, memory)));
        let (cpu_before, memory_before) = match baseline {
            Ok(baseline) => baseline,
            Err(e) => {
                warn!(
                    error = %e,
                    %method,
                    %route,
                    "Resource probe failed, request not sampled"
                );
                self.skipped.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };
        self.sampled.fetch_add(1, Ordering::Relaxed);

        trace!(%method, %route, "Sampling request");
        Some(RequestSpan {
            method: method.to_string(),
            route: route.to_string(),
            started: Instant::now(),
            cpu_before,
            memory_before,
            _gauge: InFlightGuard::acquire(&self.in_flight),
        })
    }

    /// Close a span and build its metric record
    pub fn finish(
        &self,
        span: RequestSpan,
        status_code: u16,
        cache_hits: u64,
        cache_misses: u64,
    ) -> Result<MetricRecord> {
        let response_time_ms = span.started.elapsed().as_secs_f64() * 1000.0;
        let cpu = CpuUsage {
            percent: self.probe.cpu()?.percent_since(&span.cpu_before),
        };
        let memory = self.probe.memory()?;
        let memory_delta = memory.rss as i64 - span.memory_before.rss as i64;
        let active_connections = self.in_flight.load(Ordering::Acquire);

        Ok(MetricRecord {
            timestamp: self.clock.now(),
            route: span.route,
            method: span.method,
            response_time_ms,
            status_code,
            memory,
            memory_delta,
            cpu,
            active_connections,
            error_count: u8::from(status_code >= 400),
            cache_hits,
            cache_misses,
        })
    }

    /// Requests currently inside a sampled span
    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> SamplingStats {
        SamplingStats {
            sampled: self.sampled.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            in_flight: self.in_flight(),
        }
    }
}
