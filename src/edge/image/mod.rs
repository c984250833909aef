//! Edge image optimization
//!
//! Fetches an original through an [`ImageSource`], resizes and re-encodes
//! it, and caches the rendition under the request fingerprint.

mod params;
mod source;
mod transform;

pub use params::{ImageFormat, ImageQuery, ImageRequest};
pub use source::{HttpImageSource, ImageSource};
pub use transform::{OptimizedImage, optimize};

use super::cache::{CacheStatus, EdgeCache};
use crate::config::ImageConfig;
use crate::utils::error::{MonitorError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Serves image renditions through the edge cache
#[derive(Debug)]
pub struct ImageOptimizer {
    source: Arc<dyn ImageSource>,
    cache: Arc<EdgeCache<OptimizedImage>>,
    config: ImageConfig,
    ttl: Duration,
}

impl ImageOptimizer {
    pub fn new(
        config: ImageConfig,
        source: Arc<dyn ImageSource>,
        cache: Arc<EdgeCache<OptimizedImage>>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            config,
            ttl,
        }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the rendition for `request`, computing it on a cache miss
    pub async fn serve(
        &self,
        request: &ImageRequest,
        cache_key: &str,
    ) -> Result<(OptimizedImage, CacheStatus)> {
        self.cache
            .get_or_compute_traced(cache_key, self.ttl, || self.render(request))
            .await
    }

    async fn render(&self, request: &ImageRequest) -> Result<OptimizedImage> {
        let original = self.source.fetch(&request.url).await?;
        let request = request.clone();

        let rendition = tokio::task::spawn_blocking(move || optimize(&original, &request))
            .await
            .map_err(|e| MonitorError::internal(format!("Image task failed: {}", e)))?
            .inspect_err(|e| warn!(error = %e, "Image transform failed"))?;

        debug!(
            format = %rendition.format,
            width = rendition.width,
            height = rendition.height,
            bytes = rendition.len(),
            "Rendered image"
        );
        Ok(rendition)
    }
}
