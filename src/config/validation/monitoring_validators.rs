//! Monitoring configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for MonitoringConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating monitoring configuration");

        if !(0.0..=1.0).contains(&self.sample_rate) {
            return Err(format!(
                "Sample rate must be between 0.0 and 1.0, got {}",
                self.sample_rate
            ));
        }

        if self.retention_secs == 0 {
            return Err("Retention must be greater than 0".to_string());
        }

        if self.sweep_interval_secs == 0 {
            return Err("Sweep interval must be greater than 0".to_string());
        }

        if self.report_window_secs == 0 {
            return Err("Report window must be greater than 0".to_string());
        }

        self.alerts.validate()
    }
}

impl Validate for AlertConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.response_time_ms.is_finite() || self.response_time_ms <= 0.0 {
            return Err(format!(
                "Response time threshold must be a positive number, got {}",
                self.response_time_ms
            ));
        }

        if !(0.0..=1.0).contains(&self.memory_ratio) {
            return Err("Memory ratio threshold must be between 0.0 and 1.0".to_string());
        }

        if !(0.0..=1.0).contains(&self.error_rate) {
            return Err("Error rate threshold must be between 0.0 and 1.0".to_string());
        }

        // Range checks also reject NaN
        if !(0.0..=100.0).contains(&self.cpu_percent) {
            return Err(format!(
                "CPU threshold must be between 0 and 100, got {}",
                self.cpu_percent
            ));
        }

        Ok(())
    }
}
