//! Top-level application configuration

use super::*;
use crate::utils::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "STOREFRONT_";

/// Application configuration as it appears in the YAML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Metrics, route statistics and alerting
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    /// Edge cache, rate limiter and image optimizer
    #[serde(default)]
    pub edge: EdgeConfig,
    /// Log level and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Build a configuration from defaults plus process environment overrides
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `STOREFRONT_*` overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(workers) = var("WORKERS") {
            self.server.workers = Some(parse_env("WORKERS", &workers)?);
        }
        if let Some(rate) = var("SAMPLE_RATE") {
            self.monitoring.sample_rate = parse_env("SAMPLE_RATE", &rate)?;
        }
        if let Some(secs) = var("RETENTION_SECS") {
            self.monitoring.retention_secs = parse_env("RETENTION_SECS", &secs)?;
        }
        if let Some(secs) = var("ALERT_COOLDOWN_SECS") {
            self.monitoring.alerts.cooldown_secs = parse_env("ALERT_COOLDOWN_SECS", &secs)?;
        }
        if let Some(enabled) = var("CPU_ALERTS") {
            self.monitoring.alerts.cpu_rule_enabled = parse_env("CPU_ALERTS", &enabled)?;
        }
        if let Some(ttl) = var("CACHE_TTL_SECS") {
            self.edge.cache_ttl_secs = parse_env("CACHE_TTL_SECS", &ttl)?;
        }
        if let Some(max) = var("RATE_LIMIT_MAX") {
            self.edge.rate_limit.max_requests = parse_env("RATE_LIMIT_MAX", &max)?;
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("LOG_FORMAT") {
            self.logging.format = LogFormat::from_str(&format).map_err(MonitorError::Config)?;
        }

        Ok(self)
    }
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        MonitorError::config(format!("Invalid value for {}{}: {}", ENV_PREFIX, name, e))
    })
}
