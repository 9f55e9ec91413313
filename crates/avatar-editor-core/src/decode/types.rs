//! Core types for image decoding.

use image::{DynamicImage, Rgba, RgbaImage};
use thiserror::Error;

use crate::surface::Surface;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The file decoded to an image with no pixels.
    #[error("Image has zero width or height")]
    EmptyImage,
}

/// How a camera stored the picture relative to upright, from the EXIF
/// `Orientation` tag (values 1-8, see exiftool's tag table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Upright,
    Mirrored,
    UpsideDown,
    MirroredUpsideDown,
    /// Mirrored, then turned a quarter counter-clockwise.
    MirroredQuarterLeft,
    /// Needs a quarter turn clockwise to stand upright.
    QuarterLeft,
    /// Mirrored, then turned a quarter clockwise.
    MirroredQuarterRight,
    /// Needs a quarter turn counter-clockwise to stand upright.
    QuarterRight,
}

impl Orientation {
    /// Map an EXIF tag value. Unknown values are treated as upright.
    pub fn from_exif(tag: u32) -> Self {
        const TABLE: [Orientation; 8] = [
            Orientation::Upright,
            Orientation::Mirrored,
            Orientation::UpsideDown,
            Orientation::MirroredUpsideDown,
            Orientation::MirroredQuarterLeft,
            Orientation::QuarterLeft,
            Orientation::MirroredQuarterRight,
            Orientation::QuarterRight,
        ];
        tag.checked_sub(1)
            .and_then(|i| TABLE.get(i as usize).copied())
            .unwrap_or_default()
    }

    /// Rotate and flip `img` so it displays upright.
    pub fn make_upright(self, img: DynamicImage) -> DynamicImage {
        match self {
            Orientation::Upright => img,
            Orientation::Mirrored => img.fliph(),
            Orientation::UpsideDown => img.rotate180(),
            Orientation::MirroredUpsideDown => img.flipv(),
            Orientation::MirroredQuarterLeft => img.rotate90().fliph(),
            Orientation::QuarterLeft => img.rotate90(),
            Orientation::MirroredQuarterRight => img.rotate270().fliph(),
            Orientation::QuarterRight => img.rotate270(),
        }
    }
}

/// The image being edited: decoded RGBA pixels at their natural size.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    surface: Surface,
}

impl SourceImage {
    /// Take decoded pixels. Returns `None` for an empty image or one too
    /// large to hold.
    pub fn new(pixels: RgbaImage) -> Option<Self> {
        Surface::from_image(&pixels).map(|surface| Self { surface })
    }

    /// Natural width in pixels.
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Natural height in pixels.
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Straight-alpha pixel at natural coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        self.surface.pixel(x, y)
    }

    pub fn into_surface(self) -> Surface {
        self.surface
    }
}
