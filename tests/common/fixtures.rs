//! Test fixtures and data factories
//!
//! Provides factory methods for creating test data with sensible defaults.

use bytes::Bytes;
use chrono::Utc;
use std::io::Cursor;
use std::sync::Arc;
use storefront_monitor::config::Config;
use storefront_monitor::edge::{EdgeServices, HttpImageSource, ImageSource};
use storefront_monitor::monitoring::metrics::StaticProbe;
use storefront_monitor::monitoring::{CpuUsage, MemorySnapshot, MetricRecord, MonitoringSystem};
use storefront_monitor::server::AppState;
use storefront_monitor::utils::time::{Clock, MockClock};

/// Configuration that samples every request
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.app.monitoring.sample_rate = 1.0;
    config
}

/// Encode a blank PNG of the given size
pub fn png_bytes(width: u32, height: u32) -> Bytes {
    let mut buf = Vec::new();
    image::DynamicImage::new_rgb8(width, height)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode png");
    Bytes::from(buf)
}

/// Factory for metric records
pub struct MetricFactory;

impl MetricFactory {
    /// A healthy 200 response on `route`
    pub fn ok(route: &str, response_time_ms: f64) -> MetricRecord {
        MetricRecord {
            route: route.to_string(),
            method: "GET".to_string(),
            status_code: 200,
            response_time_ms,
            memory: MemorySnapshot {
                rss: 64 * 1024 * 1024,
                virtual_memory: 256 * 1024 * 1024,
                system_used: 4,
                system_total: 16,
            },
            memory_delta: 0,
            cpu: CpuUsage { percent: 12.5 },
            active_connections: 1,
            timestamp: Utc::now(),
            cache_hits: 0,
            cache_misses: 0,
            error_count: 0,
        }
    }

    /// A failed response on `route`
    pub fn error(route: &str, status_code: u16) -> MetricRecord {
        MetricRecord {
            status_code,
            error_count: 1,
            ..Self::ok(route, 25.0)
        }
    }
}

/// Components wired to a static probe and a shared mock clock
pub struct TestHarness {
    pub probe: Arc<StaticProbe>,
    pub clock: Arc<MockClock>,
    pub state: AppState,
}

impl TestHarness {
    /// Harness that fetches images over HTTP
    pub fn with_config(config: Config) -> Self {
        let source = HttpImageSource::new(&config.edge().image).expect("http client");
        Self::new(config, Arc::new(source))
    }

    pub fn new(config: Config, source: Arc<dyn ImageSource>) -> Self {
        let probe = Arc::new(StaticProbe::default());
        let clock = Arc::new(MockClock::new());
        let shared: Arc<dyn Clock> = clock.clone();

        let monitoring =
            MonitoringSystem::with_probe(config.monitoring(), probe.clone(), shared.clone());
        let edge = EdgeServices::with_source(config.edge(), source, shared);

        Self {
            probe,
            clock,
            state: AppState::from_parts(config, monitoring, edge),
        }
    }

    pub fn monitoring(&self) -> &MonitoringSystem {
        &self.state.monitoring
    }
}
