//! Configuration data models
//!
//! This module defines all configuration structures used by the monitor.

pub mod app;
pub mod edge;
pub mod logging;
pub mod monitoring;
pub mod server;

pub use app::*;
pub use edge::*;
pub use logging::*;
pub use monitoring::*;
pub use server::*;

/// Default bind host
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default graceful shutdown timeout in seconds
pub fn default_shutdown_timeout() -> u64 {
    30
}

/// Default probability that a request is instrumented
pub fn default_sample_rate() -> f64 {
    0.1
}

/// Default metric and alert retention (24 hours)
pub fn default_retention_secs() -> u64 {
    24 * 60 * 60
}

/// Default interval between background sweeps (5 minutes)
pub fn default_sweep_interval_secs() -> u64 {
    300
}

/// Default window for the performance report (1 hour)
pub fn default_report_window_secs() -> u64 {
    3600
}

pub fn default_response_time_threshold_ms() -> f64 {
    1000.0
}

pub fn default_memory_ratio_threshold() -> f64 {
    0.80
}

pub fn default_error_rate_threshold() -> f64 {
    0.05
}

pub fn default_cpu_percent_threshold() -> f64 {
    80.0
}

/// Default global alert cooldown (5 minutes)
pub fn default_alert_cooldown_secs() -> u64 {
    300
}

pub fn default_cache_ttl_secs() -> u64 {
    3600
}

/// Default requests allowed per client fingerprint per window
pub fn default_rate_limit_max() -> u32 {
    100
}

pub fn default_rate_limit_window_secs() -> u64 {
    60
}

pub fn default_max_dimension() -> u32 {
    4096
}

pub fn default_image_quality() -> u8 {
    80
}

pub fn default_fetch_timeout_secs() -> u64 {
    10
}

/// Default cap on downloaded source images (20MB)
pub fn default_max_source_bytes() -> usize {
    20 * 1024 * 1024
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
