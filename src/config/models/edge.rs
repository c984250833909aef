//! Edge cache, rate limit and image optimization configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Edge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// Mount the edge routes
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cache TTL in seconds for optimized images
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Per-client rate limiting
    #[serde(default)]
    pub rate_limit: EdgeRateLimitConfig,
    /// Image transform limits
    #[serde(default)]
    pub image: ImageConfig,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_ttl_secs: default_cache_ttl_secs(),
            rate_limit: EdgeRateLimitConfig::default(),
            image: ImageConfig::default(),
        }
    }
}

impl EdgeConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Sliding-window rate limit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum requests per client fingerprint per window
    #[serde(default = "default_rate_limit_max")]
    pub max_requests: u32,
    /// Window length in seconds
    #[serde(default = "default_rate_limit_window_secs")]
    pub window_secs: u64,
}

impl Default for EdgeRateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: default_rate_limit_max(),
            window_secs: default_rate_limit_window_secs(),
        }
    }
}

impl EdgeRateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Image transform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Largest accepted width or height
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    /// Quality used when `q` is absent
    #[serde(default = "default_image_quality")]
    pub default_quality: u8,
    /// Upstream fetch timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Largest accepted source image in bytes
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            default_quality: default_image_quality(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_source_bytes: default_max_source_bytes(),
        }
    }
}

impl ImageConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
