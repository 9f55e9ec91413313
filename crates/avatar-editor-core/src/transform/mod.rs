//! Image placement on the canvas: pan offset, uniform scale and centering.
//!
//! The transform maps image space (natural pixels of the loaded image) to
//! canvas space:
//!
//! ```text
//! canvas = image * scale + (x, y)
//! ```
//!
//! # Coordinate System
//!
//! - `(x, y)` is the canvas position of the image's top-left corner
//! - `scale` multiplies the image's natural width and height
//! - Origin is the canvas top-left corner

mod state;

pub use state::TransformState;

/// Top-left corner that centers an object of `object` size inside `canvas`
/// size, snapped to whole pixels.
///
/// Odd leftover space rounds toward the top-left. The on-screen mask window,
/// the stroke ring and the export crop all use this origin, so they always
/// agree on where the mask sits.
///
/// # Example
///
/// ```ignore
/// use avatar_editor_core::transform::draw_center_coords;
///
/// assert_eq!(draw_center_coords((400, 400), (200, 200)), (100, 100));
/// assert_eq!(draw_center_coords((401, 400), (200, 200)), (100, 100));
/// ```
pub fn draw_center_coords(canvas: (u32, u32), object: (u32, u32)) -> (i32, i32) {
    (
        center_offset(canvas.0, object.0),
        center_offset(canvas.1, object.1),
    )
}

fn center_offset(canvas: u32, object: u32) -> i32 {
    let offset = (i64::from(canvas) - i64::from(object)).div_euclid(2);
    offset.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Center point of a canvas.
pub fn canvas_center(canvas: (u32, u32)) -> (f64, f64) {
    (canvas.0 as f64 / 2.0, canvas.1 as f64 / 2.0)
}
