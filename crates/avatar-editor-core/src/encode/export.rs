//! Export of the masked region.
//!
//! The export has exactly the mask's pixel size. The image is drawn onto a
//! stage that shares the canvas origin, using the on-screen transform
//! unchanged, and the mask window is then cut out at the same whole-pixel
//! origin the preview clips to. Whenever the window fits inside the canvas
//! the stage is canvas-sized and the export holds exactly the pixels the
//! preview shows inside the window. The silhouette itself is not applied:
//! consumers receive the full rectangular crop and apply their own shape.

use log::debug;

use super::encoder::{encode_surface, EncodeError};
use super::format::ExportFormat;
use crate::decode::SourceImage;
use crate::mask::MaskDescriptor;
use crate::surface::{BlendMode, Surface};
use crate::transform::{draw_center_coords, TransformState};

/// Render the crop window of a `canvas`-sized frame into a `crop`-sized
/// surface.
///
/// Returns `None` when the stage or the crop cannot be allocated.
pub fn render_crop(
    canvas: (u32, u32),
    crop: (u32, u32),
    state: &TransformState,
    image: &SourceImage,
) -> Option<Surface> {
    let (ox, oy) = draw_center_coords(canvas, crop);
    let (left, stage_w) = stage_span(canvas.0, ox, crop.0)?;
    let (top, stage_h) = stage_span(canvas.1, oy, crop.1)?;

    let mut stage = Surface::new(stage_w, stage_h)?;
    let rect = state
        .relative_to(left as f64, top as f64)
        .draw_rect(image.width(), image.height());
    stage.draw_surface(image.surface(), rect, BlendMode::SourceOver);

    let x = u32::try_from(i64::from(ox) - left).ok()?;
    let y = u32::try_from(i64::from(oy) - top).ok()?;
    stage.crop(x, y, crop.0, crop.1)
}

/// Start and length of the union of `0..canvas` and the window
/// `origin..origin + window` along one axis.
fn stage_span(canvas: u32, origin: i32, window: u32) -> Option<(i64, u32)> {
    let start = i64::from(origin).min(0);
    let end = i64::from(canvas).max(i64::from(origin) + i64::from(window));
    let len = u32::try_from(end - start).ok()?;
    Some((start, len))
}

/// Encode the current crop.
///
/// # Returns
///
/// * `Ok(None)` when no image is loaded
/// * the whole `canvas` as PNG when there is no ready mask, whatever
///   `format` asks for
/// * otherwise the mask-sized crop in `format`
pub fn export_crop(
    canvas: &Surface,
    state: &TransformState,
    image: Option<&SourceImage>,
    mask: Option<&MaskDescriptor>,
    format: ExportFormat,
    quality: f32,
) -> Result<Option<Vec<u8>>, EncodeError> {
    let Some(image) = image else {
        debug!("export requested without an image");
        return Ok(None);
    };

    let Some(mask) = mask.filter(|m| m.is_ready()) else {
        debug!("no mask loaded, exporting the whole canvas as PNG");
        return encode_surface(canvas, ExportFormat::Png, quality).map(Some);
    };

    let (width, height) = mask.dimensions();
    let crop = render_crop(canvas.dimensions(), (width, height), state, image)
        .ok_or(EncodeError::InvalidDimensions { width, height })?;
    let bytes = encode_surface(&crop, format, quality)?;
    debug!(
        "exported {}x{} crop as {} ({} bytes)",
        crop.width(),
        crop.height(),
        format,
        bytes.len()
    );
    Ok(Some(bytes))
}
