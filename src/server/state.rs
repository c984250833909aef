//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::edge::EdgeServices;
use crate::monitoring::{MonitoringSystem, SweepScheduler};
use crate::utils::error::Result;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are cheap to clone and share their underlying state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Validated configuration (shared read-only)
    pub config: Arc<Config>,
    /// Request metrics, route stats and alerts
    pub monitoring: MonitoringSystem,
    /// Edge cache, rate limiter and image optimizer
    pub edge: EdgeServices,
    /// Background retention sweeper
    pub sweeper: Arc<SweepScheduler>,
}

impl AppState {
    /// Build state with the production probe, clock and image source
    pub fn new(config: Config) -> Result<Self> {
        let monitoring = MonitoringSystem::new(config.monitoring());
        let edge = EdgeServices::new(config.edge())?;
        Ok(Self::from_parts(config, monitoring, edge))
    }

    /// Assemble state from prebuilt components
    pub fn from_parts(config: Config, monitoring: MonitoringSystem, edge: EdgeServices) -> Self {
        let sweeper = SweepScheduler::new(config.monitoring().sweep_interval())
            .register(Arc::new(monitoring.clone()))
            .register(edge.cache.clone())
            .register(edge.limiter.clone());

        Self {
            config: Arc::new(config),
            monitoring,
            edge,
            sweeper: Arc::new(sweeper),
        }
    }
}
