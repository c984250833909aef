//! Edge configuration validators

use super::trait_def::Validate;
use crate::config::models::*;

impl Validate for EdgeConfig {
    fn validate(&self) -> Result<(), String> {
        if self.cache_ttl_secs == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }

        self.rate_limit.validate()?;
        self.image.validate()
    }
}

impl Validate for EdgeRateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.max_requests == 0 {
            return Err("Rate limit max_requests must be greater than 0".to_string());
        }

        if self.window_secs == 0 {
            return Err("Rate limit window must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for ImageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_dimension == 0 {
            return Err("Max image dimension must be greater than 0".to_string());
        }

        if !(1..=100).contains(&self.default_quality) {
            return Err("Default image quality must be between 1 and 100".to_string());
        }

        if self.fetch_timeout_secs == 0 {
            return Err("Fetch timeout must be greater than 0".to_string());
        }

        if self.max_source_bytes == 0 {
            return Err("Max source size must be greater than 0".to_string());
        }

        Ok(())
    }
}
