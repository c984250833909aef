//! Server builder and run_server function
//!
//! This module provides the ServerBuilder for easier server configuration
//! and the run_server function for automatic configuration loading.

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{MonitorError, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/storefront.yaml";

/// Server builder for easier configuration
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| MonitorError::Config("Configuration is required".to_string()))?;

        HttpServer::new(&config)
    }
}

/// Load configuration from `path`, or from the environment when no path is given
///
/// A missing default file falls back to environment configuration; an
/// explicitly requested file must exist.
pub async fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(&path).await,
        None => match Config::from_file(DEFAULT_CONFIG_PATH).await {
            Ok(config) => {
                info!("Configuration file loaded from {}", DEFAULT_CONFIG_PATH);
                Ok(config)
            }
            Err(e) => {
                warn!(error = %e, "Default configuration file unavailable, using environment");
                Config::from_env()
            }
        },
    }
}

/// Run the server with the given configuration
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting storefront monitor");

    let server = ServerBuilder::new().with_config(config).build()?;
    let server_config = server.config();
    info!(
        "Server starting at: http://{}:{}",
        server_config.host, server_config.port
    );
    info!("Endpoints:");
    info!("   GET  /health - Health check");
    info!("   GET  /_monitoring/performance - Performance report");
    info!("   GET  /_monitoring/routes - Route statistics");
    info!("   GET  /_monitoring/alerts - Recent alerts");
    info!("   GET  /edge/image - Optimized images");

    server.start().await
}
