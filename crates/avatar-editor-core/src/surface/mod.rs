//! Off-screen RGBA drawing surfaces.
//!
//! A [`Surface`] wraps a `tiny_skia::Pixmap`. It is the raster the compositor
//! draws the on-screen frame into, and also the scratch target for the mask
//! stroke ring and the export crop. The handful of 2D-canvas primitives the
//! engine needs (clear, scaled image draws, rectangle fills, alpha masking
//! and cropping) map onto tiny-skia calls under a [`BlendMode`].
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, x grows right, y grows down
//! - Destination rectangles use `f64` and may be fractional or off-surface
//! - Fills are not anti-aliased: a pixel is covered when its center lies
//!   inside the rectangle
//!
//! # Sampling
//!
//! Scaled draws use nearest-neighbor filtering. Pixels are stored
//! premultiplied and converted back to straight alpha on read.

use image::{Rgba, RgbaImage};
use tiny_skia::{
    ColorU8, FilterQuality, IntRect, Mask, MaskType, Paint, Pixmap, PixmapPaint, Rect, Transform,
};

pub use tiny_skia::BlendMode;

use crate::color::Color;

/// Axis-aligned destination rectangle in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DrawRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle can cover any pixel at all.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
            || !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
    }

    fn to_skia(self) -> Option<Rect> {
        if self.is_degenerate() {
            return None;
        }
        Rect::from_xywh(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

/// An RGBA8 raster backed by a tiny-skia pixmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    /// Create a fully transparent surface.
    ///
    /// Returns `None` for a zero side or a size the pixmap cannot address.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    /// Copy a straight-alpha image into a new surface.
    pub fn from_image(image: &RgbaImage) -> Option<Self> {
        let mut surface = Self::new(image.width(), image.height())?;
        for (dst, src) in surface.pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Some(surface)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Straight-alpha pixel at `(x, y)`; transparent outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        match self.pixmap.pixel(x, y) {
            Some(p) => {
                let c = p.demultiply();
                Rgba([c.red(), c.green(), c.blue(), c.alpha()])
            }
            None => Rgba([0, 0, 0, 0]),
        }
    }

    /// Straight-alpha copy of the whole surface.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| self.pixel(x, y))
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Draw `src` scaled into `rect`.
    pub fn draw_surface(&mut self, src: &Surface, rect: DrawRect, mode: BlendMode) {
        if rect.is_degenerate() {
            return;
        }

        let sx = rect.width / src.width() as f64;
        let sy = rect.height / src.height() as f64;
        let transform =
            Transform::from_row(sx as f32, 0.0, 0.0, sy as f32, rect.x as f32, rect.y as f32);
        let paint = PixmapPaint {
            opacity: 1.0,
            blend_mode: mode,
            quality: FilterQuality::Nearest,
        };
        self.pixmap
            .draw_pixmap(0, 0, src.pixmap.as_ref(), &paint, transform, None);
    }

    /// Draw `src` at its natural size with its top-left corner at `(x, y)`.
    pub fn blit(&mut self, src: &Surface, x: i32, y: i32, mode: BlendMode) {
        let paint = PixmapPaint {
            opacity: 1.0,
            blend_mode: mode,
            quality: FilterQuality::Nearest,
        };
        self.pixmap.draw_pixmap(
            x,
            y,
            src.pixmap.as_ref(),
            &paint,
            Transform::identity(),
            None,
        );
    }

    /// Fill `rect` with a solid color.
    pub fn fill_rect(&mut self, rect: DrawRect, color: Color, mode: BlendMode) {
        let Some(rect) = rect.to_skia() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = false;
        paint.blend_mode = mode;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Fill the whole surface with a solid color.
    ///
    /// Every pixel is visited, so `SourceIn` recolors what is already drawn
    /// and leaves empty pixels empty.
    pub fn fill(&mut self, color: Color, mode: BlendMode) {
        let rect = DrawRect::new(0.0, 0.0, self.width() as f64, self.height() as f64);
        self.fill_rect(rect, color, mode);
    }

    /// Scale every pixel by the alpha of the same pixel in `stencil`.
    ///
    /// This is an unbounded destination-in: pixels where the stencil is
    /// empty are cleared. Sizes must match; a mismatched stencil is ignored.
    pub fn apply_alpha_mask(&mut self, stencil: &Surface) {
        if stencil.dimensions() != self.dimensions() {
            log::warn!(
                "alpha mask {:?} does not match surface {:?}",
                stencil.dimensions(),
                self.dimensions()
            );
            return;
        }
        let mask = Mask::from_pixmap(stencil.pixmap.as_ref(), MaskType::Alpha);
        self.pixmap.apply_mask(&mask);
    }

    /// Copy out the `width` x `height` region at `(x, y)`.
    ///
    /// Returns `None` unless the region lies entirely inside the surface.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Option<Surface> {
        let x = i32::try_from(x).ok()?;
        let y = i32::try_from(y).ok()?;
        let rect = IntRect::from_xywh(x, y, width, height)?;
        let pixmap = self.pixmap.clone_rect(rect)?;
        if (pixmap.width(), pixmap.height()) != (width, height) {
            return None;
        }
        Some(Surface { pixmap })
    }
}
