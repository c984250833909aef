//! Query parameters for the image endpoint

use crate::config::ImageConfig;
use crate::utils::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Output encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Avif,
    Webp,
    Jpeg,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Avif => "avif",
            ImageFormat::Webp => "webp",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Avif => "image/avif",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    /// Pick the best format the client accepts: AVIF, then WebP, else JPEG
    pub fn negotiate(accept: Option<&str>) -> Self {
        let accept = accept.unwrap_or_default().to_ascii_lowercase();
        if accept.contains("image/avif") {
            ImageFormat::Avif
        } else if accept.contains("image/webp") {
            ImageFormat::Webp
        } else {
            ImageFormat::Jpeg
        }
    }
}

impl FromStr for ImageFormat {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "avif" => Ok(ImageFormat::Avif),
            "webp" => Ok(ImageFormat::Webp),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            other => Err(MonitorError::validation(format!(
                "Unsupported image format '{}', expected webp, avif or jpeg",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw query string of `GET /edge/image`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
    pub w: Option<u32>,
    pub h: Option<u32>,
    pub f: Option<String>,
    pub q: Option<u32>,
}

/// A validated image request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: ImageFormat,
    pub quality: u8,
}

impl ImageRequest {
    /// Validate the query and resolve the output format against `Accept`
    ///
    /// A missing or unusable `url` is a bad request; out-of-range sizes,
    /// quality or format are validation errors.
    pub fn from_query(
        query: ImageQuery,
        accept: Option<&str>,
        config: &ImageConfig,
    ) -> Result<Self> {
        let url = query
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| MonitorError::bad_request("Missing required parameter 'url'"))?;

        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| MonitorError::bad_request(format!("Invalid source url: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MonitorError::bad_request("Source url must use http or https"));
        }

        let width = check_dimension("w", query.w, config.max_dimension)?;
        let height = check_dimension("h", query.h, config.max_dimension)?;

        let format = match query.f.as_deref() {
            Some(f) => f.parse()?,
            None => ImageFormat::negotiate(accept),
        };

        let quality = match query.q {
            None => config.default_quality,
            Some(q @ 1..=100) => q as u8,
            Some(q) => {
                return Err(MonitorError::validation(format!(
                    "Quality must be between 1 and 100, got {}",
                    q
                )));
            }
        };

        Ok(Self {
            url,
            width,
            height,
            format,
            quality,
        })
    }

    /// Resolved parameters that distinguish one rendition from another
    pub fn cache_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("url", self.url.clone()),
            ("f", self.format.as_str().to_string()),
            ("q", self.quality.to_string()),
        ];
        if let Some(w) = self.width {
            params.push(("w", w.to_string()));
        }
        if let Some(h) = self.height {
            params.push(("h", h.to_string()));
        }
        params
    }
}

fn check_dimension(name: &str, value: Option<u32>, max: u32) -> Result<Option<u32>> {
    match value {
        Some(v) if v == 0 || v > max => Err(MonitorError::validation(format!(
            "Parameter '{}' must be between 1 and {}, got {}",
            name, max, v
        ))),
        other => Ok(other),
    }
}
