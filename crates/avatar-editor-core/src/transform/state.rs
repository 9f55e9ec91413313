//! Pan/zoom state of the loaded image.

use serde::{Deserialize, Serialize};

use crate::surface::DrawRect;

/// Placement of the source image on the canvas.
///
/// `scale` is always positive and finite; operations that would break that
/// are rejected and leave the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    /// Canvas x of the image's top-left corner.
    pub x: f64,
    /// Canvas y of the image's top-left corner.
    pub y: f64,
    /// Uniform multiplier on the image's natural size.
    pub scale: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl TransformState {
    pub fn new(x: f64, y: f64, scale: f64) -> Self {
        Self { x, y, scale }
    }

    /// Back to `{0, 0, 1}`, as when a new image is loaded.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Translate the image by a canvas-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.x += dx;
        self.y += dy;
    }

    /// Multiply the scale by `factor` while keeping the canvas point
    /// `(cx, cy)` over the same image-space point.
    ///
    /// Solving `(cx - x) / scale == (cx - x') / (scale * factor)` for `x'`
    /// gives `x' = cx - (cx - x) * factor`, likewise for `y`.
    ///
    /// Returns `false` and leaves the state unchanged when the factor (or the
    /// resulting scale) is not positive and finite.
    pub fn zoom_about(&mut self, factor: f64, cx: f64, cy: f64) -> bool {
        let new_scale = self.scale * factor;
        if !(factor > 0.0 && factor.is_finite() && new_scale > 0.0 && new_scale.is_finite()) {
            return false;
        }
        if !cx.is_finite() || !cy.is_finite() {
            return false;
        }

        self.scale = new_scale;
        self.x = cx - (cx - self.x) * factor;
        self.y = cy - (cy - self.y) * factor;
        true
    }

    /// Image-space point under a canvas point.
    pub fn to_image_space(&self, cx: f64, cy: f64) -> (f64, f64) {
        ((cx - self.x) / self.scale, (cy - self.y) / self.scale)
    }

    /// Canvas point over an image-space point.
    pub fn to_canvas_space(&self, ix: f64, iy: f64) -> (f64, f64) {
        (ix * self.scale + self.x, iy * self.scale + self.y)
    }

    /// Destination rectangle of an image with the given natural size.
    pub fn draw_rect(&self, natural_width: u32, natural_height: u32) -> DrawRect {
        DrawRect::new(
            self.x,
            self.y,
            natural_width as f64 * self.scale,
            natural_height as f64 * self.scale,
        )
    }

    /// The same transform expressed relative to a sub-region whose top-left
    /// corner sits at `(ox, oy)` on the canvas.
    pub fn relative_to(&self, ox: f64, oy: f64) -> TransformState {
        TransformState::new(self.x - ox, self.y - oy, self.scale)
    }
}
