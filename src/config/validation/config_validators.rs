//! Validators for the application and server sections

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating application configuration");

        self.server
            .validate()
            .map_err(|e| format!("server: {}", e))?;
        self.monitoring
            .validate()
            .map_err(|e| format!("monitoring: {}", e))?;
        self.edge.validate().map_err(|e| format!("edge: {}", e))?;
        self.logging
            .validate()
            .map_err(|e| format!("logging: {}", e))?;

        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Port cannot be 0".to_string());
        }

        if self.workers == Some(0) {
            return Err("Worker count cannot be 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        tracing_subscriber::EnvFilter::try_new(&self.level)
            .map_err(|e| format!("Invalid log level '{}': {}", self.level, e))?;

        Ok(())
    }
}
