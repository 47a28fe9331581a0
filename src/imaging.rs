//! Image compression and thumbnail helpers.
//!
//! Every helper here reports failure as `None`. Decode and encode errors are
//! logged and swallowed so a bad pasteboard image never takes the app down.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView};

use crate::error::{CuImageError, CuImageResult};

/// Lowest JPEG quality the encoder accepts.
const MIN_JPEG_QUALITY: u8 = 1;

/// Highest JPEG quality (a compression factor of 1.0).
const MAX_JPEG_QUALITY: u8 = 100;

/// Convenience operations on decoded images.
pub trait ImageConvenience {
    /// Compress the image as JPEG.
    ///
    /// `factor` runs from 0.0 (maximum compression) to 1.0 (least
    /// compression). Values outside that range are clamped; NaN yields `None`.
    fn compressed_data(&self, factor: f32) -> Option<Vec<u8>>;

    /// Scale the image so its largest side is at most `max_size` pixels.
    ///
    /// Aspect ratio is preserved and images that already fit are copied
    /// unscaled. A fresh image is produced on every call.
    fn bounded_thumbnail(&self, max_size: f32) -> Option<DynamicImage>;
}

impl ImageConvenience for DynamicImage {
    fn compressed_data(&self, factor: f32) -> Option<Vec<u8>> {
        match encode_jpeg(self, factor) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("[IMAGE] Compression failed: {}", e);
                None
            }
        }
    }

    fn bounded_thumbnail(&self, max_size: f32) -> Option<DynamicImage> {
        let (width, height) = self.dimensions();
        let Some((thumb_width, thumb_height)) = thumbnail_dimensions(width, height, max_size)
        else {
            log::warn!(
                "[IMAGE] Cannot build a {} px thumbnail of a {}x{} image",
                max_size,
                width,
                height
            );
            return None;
        };

        if (thumb_width, thumb_height) == (width, height) {
            return Some(self.clone());
        }
        Some(self.thumbnail_exact(thumb_width, thumb_height))
    }
}

/// Decode `data` and compress it as JPEG. See [`ImageConvenience::compressed_data`].
pub fn compressed_data_from(data: &[u8], factor: f32) -> Option<Vec<u8>> {
    decode(data)?.compressed_data(factor)
}

/// Decode `data` and build a thumbnail. See [`ImageConvenience::bounded_thumbnail`].
pub fn thumbnail_from_data(data: &[u8], max_size: f32) -> Option<DynamicImage> {
    decode(data)?.bounded_thumbnail(max_size)
}

/// Map a compression factor onto the JPEG quality scale.
pub fn jpeg_quality(factor: f32) -> Option<u8> {
    if factor.is_nan() {
        return None;
    }
    let quality = (factor.clamp(0.0, 1.0) * f32::from(MAX_JPEG_QUALITY)).round() as u8;
    Some(quality.max(MIN_JPEG_QUALITY))
}

/// Compute thumbnail dimensions bounded by `max_size` on the long side.
///
/// Returns `None` for zero-sized sources and for `max_size` below one pixel.
pub fn thumbnail_dimensions(width: u32, height: u32, max_size: f32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 || max_size.is_nan() || max_size < 1.0 {
        return None;
    }

    let long_side = width.max(height);
    let limit = max_size.floor().min(u32::MAX as f32) as u32;
    if long_side <= limit {
        return Some((width, height));
    }

    let scale = f64::from(limit) / f64::from(long_side);
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, limit);
    Some((scaled(width), scaled(height)))
}

fn decode(data: &[u8]) -> Option<DynamicImage> {
    match image::load_from_memory(data) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("[IMAGE] Failed to decode image source: {}", e);
            None
        }
    }
}

fn encode_jpeg(image: &DynamicImage, factor: f32) -> CuImageResult<Vec<u8>> {
    let quality = jpeg_quality(factor)
        .ok_or_else(|| CuImageError::Encoding(format!("invalid compression factor {}", factor)))?;

    // JPEG has no alpha channel
    let rgb = image.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(CuImageError::Encoding("image has no pixels".to_string()));
    }

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        encoder
            .encode_image(&rgb)
            .map_err(|e| CuImageError::Encoding(e.to_string()))?;
    }

    Ok(buffer.into_inner())
}
