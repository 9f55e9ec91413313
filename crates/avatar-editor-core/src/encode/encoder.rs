//! Surface encoding for export.
//!
//! This module encodes RGBA pixel buffers using the `image` crate's
//! encoders. JPEG has no alpha channel, so translucent pixels are flattened
//! onto black first, as a browser canvas does when exporting JPEG.

use std::io::Cursor;

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use super::format::{jpeg_quality, ExportFormat};
use crate::surface::Surface;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Requested format is not one the exporter knows
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// The underlying encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: ExportFormat,
        message: String,
    },
}

/// Encode RGBA pixel data.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `format` - Output format
/// * `quality` - `0.0..=1.0`, used by JPEG only; out-of-range values use the
///   browser default of 0.92
///
/// # Example
///
/// ```ignore
/// use avatar_editor_core::encode::{encode_rgba, ExportFormat};
///
/// let pixels = vec![128u8; 10 * 10 * 4];
/// let png = encode_rgba(&pixels, 10, 10, ExportFormat::Png, 1.0).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
pub fn encode_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: ExportFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    let failed = |e: image::ImageError| EncodeError::EncodingFailed {
        format,
        message: e.to_string(),
    };

    match format {
        ExportFormat::Png => PngEncoder::new(&mut buffer)
            .write_image(pixels, width, height, ExtendedColorType::Rgba8)
            .map_err(failed)?,
        ExportFormat::Jpeg => {
            let rgb = flatten_onto_black(pixels);
            JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality))
                .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
                .map_err(failed)?
        }
        ExportFormat::Bmp => BmpEncoder::new(&mut buffer)
            .write_image(pixels, width, height, ExtendedColorType::Rgba8)
            .map_err(failed)?,
        // The image crate only ships a lossless WebP encoder
        ExportFormat::Webp => WebPEncoder::new_lossless(&mut buffer)
            .write_image(pixels, width, height, ExtendedColorType::Rgba8)
            .map_err(failed)?,
    }

    Ok(buffer.into_inner())
}

/// Encode a whole surface as straight-alpha RGBA.
pub fn encode_surface(
    surface: &Surface,
    format: ExportFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    let image = surface.to_rgba_image();
    encode_rgba(image.as_raw(), image.width(), image.height(), format, quality)
}

/// RGBA -> RGB, compositing each pixel over opaque black.
fn flatten_onto_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u32;
        for &c in &px[..3] {
            rgb.push(((c as u32 * a + 127) / 255) as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32) -> Vec<u8> {
        vec![128u8; (width * height * 4) as usize]
    }

    #[test]
    fn test_encode_png_magic() {
        let png = encode_rgba(&gray(8, 8), 8, 8, ExportFormat::Png, 1.0).unwrap();
        assert_eq!(&png[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let jpeg = encode_rgba(&gray(16, 16), 16, 16, ExportFormat::Jpeg, 0.9).unwrap();

        // SOI and EOI markers
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        let len = jpeg.len();
        assert_eq!(&jpeg[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_bmp_magic() {
        let bmp = encode_rgba(&gray(4, 4), 4, 4, ExportFormat::Bmp, 1.0).unwrap();
        assert_eq!(&bmp[0..2], b"BM");
    }

    #[test]
    fn test_encode_webp_magic() {
        let webp = encode_rgba(&gray(4, 4), 4, 4, ExportFormat::Webp, 0.5).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn test_encode_png_decodes_back_with_alpha() {
        let pixels = vec![10, 20, 30, 40, 50, 60, 70, 255];
        let png = encode_rgba(&pixels, 2, 1, ExportFormat::Png, 1.0).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded.as_raw(), &pixels);
    }

    #[test]
    fn test_encode_jpeg_quality_out_of_range_is_accepted() {
        assert!(encode_rgba(&gray(4, 4), 4, 4, ExportFormat::Jpeg, -3.0).is_ok());
        assert!(encode_rgba(&gray(4, 4), 4, 4, ExportFormat::Jpeg, f32::NAN).is_ok());
    }

    #[test]
    fn test_encode_invalid_pixel_data() {
        let result = encode_rgba(&gray(4, 3), 4, 4, ExportFormat::Png, 1.0);
        assert!(matches!(
            result,
            Err(EncodeError::InvalidPixelData { expected: 64, actual: 48 })
        ));
    }

    #[test]
    fn test_encode_zero_dimensions() {
        let result = encode_rgba(&[], 0, 4, ExportFormat::Png, 1.0);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_flatten_onto_black() {
        let rgba = [200, 100, 50, 255, 200, 100, 50, 0, 255, 255, 255, 128];
        assert_eq!(flatten_onto_black(&rgba), vec![200, 100, 50, 0, 0, 0, 128, 128, 128]);
    }

    #[test]
    fn test_encode_surface() {
        let surface = Surface::new(3, 2).unwrap();
        let png = encode_surface(&surface, ExportFormat::Png, 1.0).unwrap();

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }
}
