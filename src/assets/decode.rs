//! Image load/encode boundary.
//!
//! Every image enters the core through [`load_image`] and leaves it as an [`EncodedImage`].

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{WarpmaskError, WarpmaskResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Default upload limit (5 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// MIME type of every payload produced by the core.
pub const PNG_MIME: &str = "image/png";

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a decoded image, used as a raster cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u64);

impl ImageId {
    fn next() -> Self {
        Self(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Decoded image in premultiplied RGBA8, ready for rendering.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Cache identity.
    pub id: ImageId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap straight-alpha RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> WarpmaskResult<Self> {
        check_dimensions(width, height)?;
        if rgba.len() != width as usize * height as usize * 4 {
            return Err(WarpmaskError::validation("rgba8 byte length mismatch"));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            id: ImageId::next(),
            width,
            height,
            rgba8_premul: Arc::new(rgba),
        })
    }

    /// Solid-color image, mostly useful for tests and placeholders.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> WarpmaskResult<Self> {
        check_dimensions(width, height)?;
        let pixels = rgba.repeat(width as usize * height as usize);
        Self::from_rgba8(width, height, pixels)
    }

    /// Pixel dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

/// Encoded image payload handed across the core boundary by value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub mime_type: String,
}

/// Validate and decode an incoming image.
///
/// Rejects non-`image/*` MIME types, payloads over `max_bytes`, undecodable data and images whose
/// sides exceed the rasterizer's 65535 px limit.
pub fn load_image(bytes: &[u8], mime_type: &str, max_bytes: usize) -> WarpmaskResult<PreparedImage> {
    if !mime_type.starts_with("image/") {
        tracing::warn!(mime_type, "rejected non-image payload");
        return Err(WarpmaskError::unsupported_image(format!(
            "'{mime_type}' is not an image type"
        )));
    }
    if bytes.len() > max_bytes {
        tracing::warn!(len = bytes.len(), max_bytes, "rejected oversized image");
        return Err(WarpmaskError::unsupported_image(format!(
            "file is {} bytes, the limit is {max_bytes}",
            bytes.len()
        )));
    }

    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| WarpmaskError::unsupported_image(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(width, height, mime_type, "decoded image");

    PreparedImage::from_rgba8(width, height, rgba.into_raw())
        .map_err(|e| WarpmaskError::unsupported_image(e.to_string()))
}

/// Encode premultiplied RGBA8 pixels as PNG.
pub fn encode_png_premul(width: u32, height: u32, rgba8_premul: &[u8]) -> WarpmaskResult<EncodedImage> {
    let mut straight = rgba8_premul.to_vec();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| WarpmaskError::render("rgba8 byte length mismatch"))?;
    encode_dynamic(image::DynamicImage::ImageRgba8(img))
}

/// Encode an 8-bit grayscale raster as PNG.
pub fn encode_png_luma(width: u32, height: u32, luma: &[u8]) -> WarpmaskResult<EncodedImage> {
    let img = image::GrayImage::from_raw(width, height, luma.to_vec())
        .ok_or_else(|| WarpmaskError::render("luma8 byte length mismatch"))?;
    encode_dynamic(image::DynamicImage::ImageLuma8(img))
}

fn encode_dynamic(img: image::DynamicImage) -> WarpmaskResult<EncodedImage> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(EncodedImage {
        bytes,
        mime_type: PNG_MIME.to_string(),
    })
}

pub(crate) fn check_dimensions(width: u32, height: u32) -> WarpmaskResult<()> {
    if width == 0 || height == 0 {
        return Err(WarpmaskError::validation("image has zero width or height"));
    }
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(WarpmaskError::validation(format!(
            "image {width}x{height} exceeds the 65535 px raster limit"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
