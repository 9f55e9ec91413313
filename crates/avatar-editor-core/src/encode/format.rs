//! Export formats and quality handling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EncodeError;

/// Quality used when the requested value is outside `0.0..=1.0`, matching
/// what browsers do for `canvas.toDataURL`.
pub const DEFAULT_QUALITY: f32 = 0.92;

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// Lossy JPEG; alpha is flattened onto black.
    Jpeg,
    /// Uncompressed BMP with alpha.
    Bmp,
    /// Lossless WebP with alpha.
    Webp,
}

impl ExportFormat {
    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Bmp => "image/bmp",
            ExportFormat::Webp => "image/webp",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = EncodeError;

    /// Accepts bare names (`"png"`, `"jpg"`) and MIME types (`"image/webp"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_prefix("image/").unwrap_or(&lower);
        match name {
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "bmp" => Ok(ExportFormat::Bmp),
            "webp" => Ok(ExportFormat::Webp),
            _ => Err(EncodeError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Clamp a `0.0..=1.0` quality, falling back to [`DEFAULT_QUALITY`] when it
/// is out of range or NaN.
pub fn normalize_quality(quality: f32) -> f32 {
    if (0.0..=1.0).contains(&quality) {
        quality
    } else {
        DEFAULT_QUALITY
    }
}

/// Map a `0.0..=1.0` quality to the JPEG encoder's `1..=100` scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    (normalize_quality(quality) * 100.0).round().clamp(1.0, 100.0) as u8
}
