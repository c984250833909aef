//! Source image fetching

use crate::config::ImageConfig;
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use std::fmt::Debug;
use tracing::debug;

/// Where original images come from
#[async_trait]
pub trait ImageSource: Send + Sync + Debug {
    /// Fetch the original bytes, returning `NotFound` when the image does not exist
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

/// Fetches source images over HTTP
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpImageSource {
    pub fn new(config: &ImageConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MonitorError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_bytes: config.max_source_bytes,
        })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        debug!(url, "Fetching source image");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(MonitorError::not_found(format!("Source image not found: {}", url)));
        }
        if !status.is_success() {
            return Err(MonitorError::fetch(format!(
                "Source returned {} for {}",
                status, url
            )));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes as u64 {
                return Err(MonitorError::fetch(format!(
                    "Source image is {} bytes, limit is {}",
                    len, self.max_bytes
                )));
            }
        }

        let body = response.bytes().await?;
        if body.len() > self.max_bytes {
            return Err(MonitorError::fetch(format!(
                "Source image is {} bytes, limit is {}",
                body.len(),
                self.max_bytes
            )));
        }

        Ok(body)
    }
}
