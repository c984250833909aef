//! Edge caching, rate limiting and image optimization

pub mod cache;
pub mod fingerprint;
pub mod image;
pub mod rate_limit;

pub use cache::{CacheStats, CacheStatus, EdgeCache, EdgeCacheEntry};
pub use image::{HttpImageSource, ImageOptimizer, ImageSource, OptimizedImage};
pub use rate_limit::{EdgeRateLimiter, InMemoryRequestLog, RateLimitDecision, RequestLog};

use crate::config::EdgeConfig;
use crate::utils::error::Result;
use crate::utils::time::{Clock, system_clock};
use std::sync::Arc;
use tracing::info;

/// Shared edge components
#[derive(Debug, Clone)]
pub struct EdgeServices {
    pub config: Arc<EdgeConfig>,
    pub cache: Arc<EdgeCache<OptimizedImage>>,
    pub limiter: Arc<EdgeRateLimiter>,
    pub images: Arc<ImageOptimizer>,
}

impl EdgeServices {
    /// Build edge services that fetch originals over HTTP
    pub fn new(config: &EdgeConfig) -> Result<Self> {
        let source = Arc::new(HttpImageSource::new(&config.image)?);
        Ok(Self::with_source(config, source, system_clock()))
    }

    /// Build edge services around an explicit image source and clock
    pub fn with_source(
        config: &EdgeConfig,
        source: Arc<dyn ImageSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(
            cache_ttl_secs = config.cache_ttl_secs,
            rate_limit = config.rate_limit.max_requests,
            window_secs = config.rate_limit.window_secs,
            "Initializing edge services"
        );

        let cache = Arc::new(EdgeCache::new(clock.clone()));
        let limiter = Arc::new(EdgeRateLimiter::new(config.rate_limit.clone(), clock));
        let images = Arc::new(ImageOptimizer::new(
            config.image.clone(),
            source,
            cache.clone(),
            config.cache_ttl(),
        ));

        Self {
            config: Arc::new(config.clone()),
            cache,
            limiter,
            images,
        }
    }
}
