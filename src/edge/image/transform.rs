//! Decode, resize and re-encode

use super::params::{ImageFormat, ImageRequest};
use crate::utils::error::Result;
use bytes::Bytes;
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

/// AVIF encoder speed, 1 (slowest) to 10 (fastest)
const AVIF_SPEED: u8 = 8;

/// An encoded rendition ready to serve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizedImage {
    pub bytes: Bytes,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl OptimizedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Produce the rendition described by `request` from the original bytes
pub fn optimize(source: &[u8], request: &ImageRequest) -> Result<OptimizedImage> {
    let image = image::load_from_memory(source)?;
    let image = resize(image, request.width, request.height);
    let bytes = encode(&image, request.format, request.quality)?;

    Ok(OptimizedImage {
        bytes: Bytes::from(bytes),
        format: request.format,
        width: image.width(),
        height: image.height(),
    })
}

/// Both dimensions fill and crop; one dimension keeps the aspect ratio
fn resize(image: DynamicImage, width: Option<u32>, height: Option<u32>) -> DynamicImage {
    match (width, height) {
        (Some(w), Some(h)) => image.resize_to_fill(w, h, FilterType::Lanczos3),
        (Some(w), None) => {
            let h = scale(image.height(), w, image.width());
            image.resize_exact(w, h, FilterType::Lanczos3)
        }
        (None, Some(h)) => {
            let w = scale(image.width(), h, image.height());
            image.resize_exact(w, h, FilterType::Lanczos3)
        }
        (None, None) => image,
    }
}

/// `side * target / reference`, rounded, at least 1
fn scale(side: u32, target: u32, reference: u32) -> u32 {
    let reference = u64::from(reference.max(1));
    let scaled = (u64::from(side) * u64::from(target) + reference / 2) / reference;
    scaled.clamp(1, u64::from(u32::MAX)) as u32
}

fn encode(image: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
        }
        ImageFormat::Webp => {
            let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
            rgba.write_with_encoder(WebPEncoder::new_lossless(&mut out))?;
        }
        ImageFormat::Avif => {
            let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
            rgba.write_with_encoder(AvifEncoder::new_with_speed_quality(
                &mut out, AVIF_SPEED, quality,
            ))?;
        }
    }
    Ok(out)
}
