//! Error types for the storefront monitor

use thiserror::Error;

/// Result type alias for the storefront monitor
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Main error type for the storefront monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Instrumentation errors raised by the metrics pipeline
    #[error("Monitoring error: {0}")]
    Monitoring(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream fetch errors
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Image decode/resize/encode errors
    #[error("Transform error: {0}")]
    Transform(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
