//! Frame compositing.
//!
//! Draw order for a frame with an image and a ready mask:
//!
//! 1. the image at its transformed rectangle (source-over)
//! 2. the mask asset, centered, as an alpha stencil so only the silhouette
//!    survives
//! 3. the overflow color over the image rectangle, behind what is left
//!    (destination-over)
//! 4. the image once more behind everything (destination-over), so the
//!    overflow tint shows only outside the silhouette
//! 5. the stroke ring on top
//!
//! Without an image the frame holds only the ring, and the caller gets a
//! [`PlaceholderLayout`] describing where to draw the prompt text.

use serde::Serialize;

use crate::decode::SourceImage;
use crate::mask::MaskDescriptor;
use crate::surface::{BlendMode, Surface};
use crate::transform::{canvas_center, TransformState};

/// Horizontal padding kept between placeholder text and the frame edges.
pub const PLACEHOLDER_PADDING: f64 = 20.0;

/// Where the host should draw the placeholder prompt.
///
/// Text rendering and word wrapping are left to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderLayout {
    pub text: String,
    pub center_x: f64,
    pub center_y: f64,
    /// Maximum line width; never negative.
    pub max_width: f64,
}

/// Result of compositing a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RenderOutcome {
    /// The canvas holds a complete frame.
    Frame,
    /// No image is loaded; the host should draw the prompt.
    Placeholder(PlaceholderLayout),
}

impl RenderOutcome {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, RenderOutcome::Placeholder(_))
    }
}

/// Composite one frame into `canvas`.
pub fn render(
    canvas: &mut Surface,
    state: &TransformState,
    image: Option<&SourceImage>,
    mask: Option<&MaskDescriptor>,
    placeholder_text: &str,
) -> RenderOutcome {
    canvas.clear();
    let mask = mask.filter(|m| m.is_ready());

    let Some(image) = image else {
        if let Some(mask) = mask {
            mask.draw_stroke(canvas);
        }
        return RenderOutcome::Placeholder(placeholder_layout(
            canvas.dimensions(),
            mask,
            placeholder_text,
        ));
    };

    let rect = state.draw_rect(image.width(), image.height());
    canvas.draw_surface(image.surface(), rect, BlendMode::SourceOver);

    if let Some(mask) = mask {
        mask.clip(canvas);
        canvas.fill_rect(rect, mask.overflow_color(), BlendMode::DestinationOver);
        canvas.draw_surface(image.surface(), rect, BlendMode::DestinationOver);
        mask.draw_stroke(canvas);
    }

    RenderOutcome::Frame
}

fn placeholder_layout(
    canvas: (u32, u32),
    mask: Option<&MaskDescriptor>,
    text: &str,
) -> PlaceholderLayout {
    let (center_x, center_y) = canvas_center(canvas);
    let available = mask.map_or(canvas.0, MaskDescriptor::width) as f64;

    PlaceholderLayout {
        text: text.to_string(),
        center_x,
        center_y,
        max_width: (available - 2.0 * PLACEHOLDER_PADDING).max(0.0),
    }
}
