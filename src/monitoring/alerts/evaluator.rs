//! Alert evaluation behind a global cooldown

use super::rules::{self, AlertCandidate};
use crate::config::AlertConfig;
use crate::monitoring::metrics::RetentionQueue;
use crate::monitoring::types::{AlertRecord, AlertSeverity, MetricRecord};
use crate::utils::time::{Clock, to_delta};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

#[derive(Debug)]
struct AlertState {
    last_alert_time: Option<DateTime<Utc>>,
    history: RetentionQueue<AlertRecord>,
    emitted: u64,
    suppressed: u64,
}

/// Alert counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct AlertStats {
    pub emitted: u64,
    pub suppressed: u64,
    pub last_alert: Option<DateTime<Utc>>,
}

/// Checks metrics against thresholds and emits at most one alert per cooldown
///
/// The cooldown is shared by every alert type, so a crossing of one rule
/// masks crossings of all the others until it elapses.
#[derive(Debug)]
pub struct AlertEvaluator {
    config: AlertConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<AlertState>,
}

impl AlertEvaluator {
    pub fn new(config: AlertConfig, retention: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            state: Mutex::new(AlertState {
                last_alert_time: None,
                history: RetentionQueue::new(retention),
                emitted: 0,
                suppressed: 0,
            }),
        }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Evaluate one metric together with the current global error rate
    pub fn check(&self, metric: &MetricRecord, error_rate: f64) -> Option<AlertRecord> {
        let mut fired = rules::evaluate(&self.config, metric, error_rate);
        if fired.is_empty() {
            return None;
        }

        let now = self.clock.now();
        let mut state = self.state.lock();

        if let Some(last) = state.last_alert_time {
            if now - last < to_delta(self.config.cooldown()) {
                state.suppressed += fired.len() as u64;
                debug!(
                    suppressed = fired.len(),
                    route = %metric.route_key(),
                    "Alerts suppressed by cooldown"
                );
                return None;
            }
        }

        let first = fired.remove(0);
        state.suppressed += fired.len() as u64;
        state.last_alert_time = Some(now);
        state.emitted += 1;

        let alert = into_record(first, metric, now);
        state.history.push(alert.clone(), now);
        drop(state);

        log_alert(&alert);
        Some(alert)
    }

    /// Alerts recorded at or after `since`, oldest first
    pub fn since(&self, since: DateTime<Utc>) -> Vec<AlertRecord> {
        self.state.lock().history.since(since)
    }

    /// Most recent alerts, newest first
    pub fn history(&self, limit: usize) -> Vec<AlertRecord> {
        self.state.lock().history.latest(limit)
    }

    /// Drop alerts older than the retention window
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        self.state.lock().history.sweep(now)
    }

    pub fn stats(&self) -> AlertStats {
        let state = self.state.lock();
        AlertStats {
            emitted: state.emitted,
            suppressed: state.suppressed,
            last_alert: state.last_alert_time,
        }
    }
}

fn into_record(
    candidate: AlertCandidate,
    metric: &MetricRecord,
    now: DateTime<Utc>,
) -> AlertRecord {
    AlertRecord {
        id: uuid::Uuid::new_v4(),
        alert_type: candidate.alert_type,
        severity: candidate.severity,
        message: candidate.message,
        timestamp: now,
        value: candidate.value,
        threshold: candidate.threshold,
        route: Some(metric.route_key()),
    }
}

fn log_alert(alert: &AlertRecord) {
    match alert.severity {
        AlertSeverity::High | AlertSeverity::Critical => error!(
            alert_id = %alert.id,
            alert_type = %alert.alert_type,
            severity = %alert.severity,
            value = alert.value,
            threshold = alert.threshold,
            "{}",
            alert.message
        ),
        AlertSeverity::Low | AlertSeverity::Medium => warn!(
            alert_id = %alert.id,
            alert_type = %alert.alert_type,
            severity = %alert.severity,
            value = alert.value,
            threshold = alert.threshold,
            "{}",
            alert.message
        ),
    }
}
