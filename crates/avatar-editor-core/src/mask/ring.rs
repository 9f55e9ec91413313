//! Stroke ring construction.
//!
//! The ring is the mask's outline of width `stroke_width`, pre-rendered once
//! so drawing the stroke later is a single blit. It is built on a surface
//! padded by the stroke width on every side:
//!
//! 1. Draw the mask asset stretched over the whole padded surface
//! 2. Erase the asset drawn inset by the stroke width (`destination-out`),
//!    leaving only the band between the two silhouettes
//! 3. Fill with the stroke color under `source-in`, so the band takes the
//!    stroke color whatever the asset's own colors were

use super::MaskStyle;
use crate::surface::{BlendMode, DrawRect, Surface};

/// Size of the padded ring surface for a style.
pub fn ring_dimensions(style: &MaskStyle) -> (u32, u32) {
    let pad = style.stroke_width.saturating_mul(2);
    (
        style.width.saturating_add(pad),
        style.height.saturating_add(pad),
    )
}

/// Render the outline ring of `asset` for the given style.
///
/// Returns `None` when the padded surface cannot be allocated.
pub fn build_stroke_ring(asset: &Surface, style: &MaskStyle) -> Option<Surface> {
    let (width, height) = ring_dimensions(style);
    let stroke = style.stroke_width as f64;

    let mut ring = Surface::new(width, height)?;

    let outer = DrawRect::new(0.0, 0.0, width as f64, height as f64);
    ring.draw_surface(asset, outer, BlendMode::SourceOver);

    let inner = DrawRect::new(stroke, stroke, style.width as f64, style.height as f64);
    ring.draw_surface(asset, inner, BlendMode::DestinationOut);

    ring.fill(style.stroke_color, BlendMode::SourceIn);
    Some(ring)
}
