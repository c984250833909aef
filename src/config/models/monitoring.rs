//! Monitoring configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Enable request instrumentation
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Probability (0.0 to 1.0) that a request is instrumented
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
    /// How long metrics and alerts are kept, in seconds
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
    /// Interval between background sweeps, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Default window for the performance report, in seconds
    #[serde(default = "default_report_window_secs")]
    pub report_window_secs: u64,
    /// Alert thresholds
    #[serde(default)]
    pub alerts: AlertConfig,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sample_rate: default_sample_rate(),
            retention_secs: default_retention_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            report_window_secs: default_report_window_secs(),
            alerts: AlertConfig::default(),
        }
    }
}

impl MonitoringConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn report_window(&self) -> Duration {
        Duration::from_secs(self.report_window_secs)
    }
}

/// Alert thresholds and cooldown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Response time threshold in milliseconds
    #[serde(default = "default_response_time_threshold_ms")]
    pub response_time_ms: f64,
    /// Used/total memory ratio threshold
    #[serde(default = "default_memory_ratio_threshold")]
    pub memory_ratio: f64,
    /// Global error rate threshold
    #[serde(default = "default_error_rate_threshold")]
    pub error_rate: f64,
    /// System CPU utilisation threshold in percent
    #[serde(default = "default_cpu_percent_threshold")]
    pub cpu_percent: f64,
    /// Evaluate the CPU rule (off by default)
    #[serde(default)]
    pub cpu_rule_enabled: bool,
    /// Minimum seconds between two emitted alerts of any type
    #[serde(default = "default_alert_cooldown_secs")]
    pub cooldown_secs: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            response_time_ms: default_response_time_threshold_ms(),
            memory_ratio: default_memory_ratio_threshold(),
            error_rate: default_error_rate_threshold(),
            cpu_percent: default_cpu_percent_threshold(),
            cpu_rule_enabled: false,
            cooldown_secs: default_alert_cooldown_secs(),
        }
    }
}

impl AlertConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}
