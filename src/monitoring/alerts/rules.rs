//! Threshold rules and severity buckets

use crate::config::AlertConfig;
use crate::monitoring::types::{AlertSeverity, AlertType, MetricRecord};

/// A rule that fired for one metric, before cooldown is applied
#[derive(Debug, Clone, PartialEq)]
pub struct AlertCandidate {
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub value: f64,
    pub threshold: f64,
    pub message: String,
}

pub fn response_time_severity(ms: f64) -> AlertSeverity {
    if ms > 5000.0 {
        AlertSeverity::Critical
    } else if ms > 2000.0 {
        AlertSeverity::High
    } else if ms > 1000.0 {
        AlertSeverity::Medium
    } else {
        AlertSeverity::Low
    }
}

pub fn memory_severity(ratio: f64) -> AlertSeverity {
    if ratio > 0.90 {
        AlertSeverity::Critical
    } else if ratio > 0.85 {
        AlertSeverity::High
    } else {
        AlertSeverity::Medium
    }
}

pub fn error_rate_severity(rate: f64) -> AlertSeverity {
    if rate > 0.20 {
        AlertSeverity::Critical
    } else if rate > 0.10 {
        AlertSeverity::High
    } else if rate > 0.05 {
        AlertSeverity::Medium
    } else {
        AlertSeverity::Low
    }
}

pub fn cpu_severity(percent: f64) -> AlertSeverity {
    if percent > 95.0 {
        AlertSeverity::Critical
    } else if percent > 90.0 {
        AlertSeverity::High
    } else {
        AlertSeverity::Medium
    }
}

/// Every rule crossed by `metric`, in evaluation order:
/// response time, memory, error rate, CPU.
pub fn evaluate(
    config: &AlertConfig,
    metric: &MetricRecord,
    error_rate: f64,
) -> Vec<AlertCandidate> {
    let mut fired = Vec::new();

    if metric.response_time_ms > config.response_time_ms {
        fired.push(AlertCandidate {
            alert_type: AlertType::ResponseTime,
            severity: response_time_severity(metric.response_time_ms),
            value: metric.response_time_ms,
            threshold: config.response_time_ms,
            message: format!(
                "Slow response on {}: {:.0}ms (threshold {:.0}ms)",
                metric.route_key(),
                metric.response_time_ms,
                config.response_time_ms
            ),
        });
    }

    let memory_ratio = metric.memory.usage_ratio();
    if memory_ratio > config.memory_ratio {
        fired.push(AlertCandidate {
            alert_type: AlertType::MemoryUsage,
            severity: memory_severity(memory_ratio),
            value: memory_ratio,
            threshold: config.memory_ratio,
            message: format!(
                "High host memory usage: {:.1}% of system memory in use (threshold {:.1}%)",
                memory_ratio * 100.0,
                config.memory_ratio * 100.0
            ),
        });
    }

    if error_rate > config.error_rate {
        fired.push(AlertCandidate {
            alert_type: AlertType::ErrorRate,
            severity: error_rate_severity(error_rate),
            value: error_rate,
            threshold: config.error_rate,
            message: format!(
                "High error rate: {:.1}% (threshold {:.1}%)",
                error_rate * 100.0,
                config.error_rate * 100.0
            ),
        });
    }

    if config.cpu_rule_enabled && metric.cpu.percent > config.cpu_percent {
        fired.push(AlertCandidate {
            alert_type: AlertType::CpuUsage,
            severity: cpu_severity(metric.cpu.percent),
            value: metric.cpu.percent,
            threshold: config.cpu_percent,
            message: format!(
                "High CPU usage: {:.1}% (threshold {:.1}%)",
                metric.cpu.percent, config.cpu_percent
            ),
        });
    }

    fired
}
