//! Crop mask: silhouette, overflow dimming and stroke ring.
//!
//! A mask is an image whose alpha channel defines the crop silhouette. It is
//! drawn at a fixed pixel size, always centered on the canvas, and defines
//! both the on-screen crop window and the export resolution.
//!
//! The asset arrives asynchronously. Until it does, the descriptor exists
//! but is not ready: clipping and stroke drawing are no-ops and frames still
//! render without mask effects.
//!
//! ## Stroke ring cache
//!
//! The ring surface is memoized on `(asset generation, style)`, so it is
//! rebuilt only when a new asset lands or the style actually changes.

mod ring;

pub use ring::{build_stroke_ring, ring_dimensions};

use crate::color::Color;
use crate::surface::{BlendMode, DrawRect, Surface};
use crate::transform::draw_center_coords;

/// Size and colors of a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskStyle {
    /// Mask width in pixels (also the export width).
    pub width: u32,
    /// Mask height in pixels (also the export height).
    pub height: u32,
    /// Outline thickness in pixels.
    pub stroke_width: u32,
    /// Outline color.
    pub stroke_color: Color,
    /// Translucent fill shown over the image outside the silhouette.
    pub overflow_color: Color,
}

impl Default for MaskStyle {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            stroke_width: 1,
            stroke_color: Color::rgb(204, 204, 204),
            overflow_color: Color::rgba(0, 0, 0, 153),
        }
    }
}

/// Cache key of a built ring.
type RingKey = (u64, MaskStyle);

/// A mask and its derived stroke ring.
#[derive(Debug, Clone)]
pub struct MaskDescriptor {
    style: MaskStyle,
    asset: Option<Surface>,
    asset_generation: u64,
    ring: Option<Surface>,
    ring_key: Option<RingKey>,
}

impl MaskDescriptor {
    /// A descriptor whose asset has not loaded yet.
    pub fn new(style: MaskStyle) -> Self {
        Self {
            style,
            asset: None,
            asset_generation: 0,
            ring: None,
            ring_key: None,
        }
    }

    /// A descriptor with its asset already available.
    pub fn with_asset(style: MaskStyle, asset: Surface) -> Self {
        let mut mask = Self::new(style);
        mask.set_asset(asset);
        mask
    }

    pub fn style(&self) -> &MaskStyle {
        &self.style
    }

    pub fn width(&self) -> u32 {
        self.style.width
    }

    pub fn height(&self) -> u32 {
        self.style.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.style.width, self.style.height)
    }

    pub fn overflow_color(&self) -> Color {
        self.style.overflow_color
    }

    /// The decoded mask asset, once loaded.
    pub fn asset(&self) -> Option<&Surface> {
        self.asset.as_ref()
    }

    /// The cached stroke ring, once built.
    pub fn ring(&self) -> Option<&Surface> {
        self.ring.as_ref()
    }

    /// Whether the asset has loaded and mask effects apply.
    pub fn is_ready(&self) -> bool {
        self.asset.is_some()
    }

    /// Install a freshly decoded asset and rebuild the ring.
    pub fn set_asset(&mut self, asset: Surface) {
        self.asset = Some(asset);
        self.asset_generation += 1;
        self.refresh_ring();
    }

    /// Change size or colors. The ring is rebuilt only if the style differs.
    pub fn set_style(&mut self, style: MaskStyle) {
        self.style = style;
        self.refresh_ring();
    }

    fn refresh_ring(&mut self) {
        let Some(asset) = self.asset.as_ref() else {
            return;
        };

        let key = (self.asset_generation, self.style);
        if self.ring_key == Some(key) {
            return;
        }

        log::debug!(
            "building {}x{} mask stroke ring (stroke {}px)",
            self.style.width,
            self.style.height,
            self.style.stroke_width
        );
        self.ring = build_stroke_ring(asset, &self.style);
        if self.ring.is_none() {
            log::warn!(
                "mask stroke ring of {:?} could not be allocated",
                ring_dimensions(&self.style)
            );
        }
        self.ring_key = Some(key);
    }

    /// Top-left corner of the mask window on a canvas of the given size.
    pub fn window_origin(&self, canvas: (u32, u32)) -> (i32, i32) {
        draw_center_coords(canvas, self.dimensions())
    }

    /// Keep only canvas pixels under the silhouette. No-op until ready.
    pub fn clip(&self, canvas: &mut Surface) {
        let Some(asset) = self.asset.as_ref() else {
            return;
        };
        let (width, height) = canvas.dimensions();
        let Some(mut stencil) = Surface::new(width, height) else {
            return;
        };
        let (dx, dy) = self.window_origin((width, height));
        let rect = DrawRect::new(
            dx as f64,
            dy as f64,
            self.style.width as f64,
            self.style.height as f64,
        );
        stencil.draw_surface(asset, rect, BlendMode::SourceOver);
        canvas.apply_alpha_mask(&stencil);
    }

    /// Draw the stroke ring centered on the canvas. No-op until ready.
    pub fn draw_stroke(&self, canvas: &mut Surface) {
        let Some(ring) = self.ring.as_ref() else {
            return;
        };
        let (dx, dy) = self.window_origin(canvas.dimensions());
        let stroke = i32::try_from(self.style.stroke_width).unwrap_or(i32::MAX);
        canvas.blit(
            ring,
            dx.saturating_sub(stroke),
            dy.saturating_sub(stroke),
            BlendMode::SourceOver,
        );
    }
}
