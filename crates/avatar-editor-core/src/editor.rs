//! The editor facade.
//!
//! [`AvatarEditor`] owns the canvas, the transform, the loaded image and the
//! mask, and keeps the frame current: every transform change and every
//! successful load re-renders before the call returns.
//!
//! Image and mask bytes arrive asynchronously from the host. A load is
//! started with `begin_*_load`, which hands out a [`LoadTicket`], and
//! completed with `finish_*_load`. Only the most recently issued ticket may
//! apply its result; anything older is reported as
//! [`LoadOutcome::Superseded`] and dropped.

use log::{debug, warn};
use serde::Serialize;

use crate::config::{validate_canvas_size, validate_mask_style, ConfigError, EditorOptions};
use crate::decode::{decode_image, decode_image_no_orientation, DecodeError, SourceImage};
use crate::encode::{export_crop, EncodeError, ExportFormat};
use crate::gesture::{GestureEvent, GestureInterpreter, GestureResponse};
use crate::mask::{MaskDescriptor, MaskStyle};
use crate::render::{render, RenderOutcome};
use crate::surface::Surface;
use crate::transform::TransformState;

/// Identity of a started load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LoadTicket {
    generation: u32,
}

impl LoadTicket {
    pub fn generation(self) -> u32 {
        self.generation
    }

    #[doc(hidden)]
    pub fn from_generation(generation: u32) -> Self {
        Self { generation }
    }
}

/// What happened to a finished load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadOutcome {
    /// The result was installed and the frame re-rendered.
    Applied,
    /// A newer load was started; the result was discarded.
    Superseded,
}

/// Generation counter behind [`LoadTicket`]s.
#[derive(Debug, Clone, Default)]
struct LoadGenerations {
    latest: u32,
}

impl LoadGenerations {
    fn issue(&mut self) -> LoadTicket {
        self.latest = self.latest.wrapping_add(1);
        LoadTicket {
            generation: self.latest,
        }
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.latest
    }
}

/// Interactive avatar crop editor.
#[derive(Debug, Clone)]
pub struct AvatarEditor {
    options: EditorOptions,
    canvas: Surface,
    state: TransformState,
    interpreter: GestureInterpreter,
    image: Option<SourceImage>,
    mask: Option<MaskDescriptor>,
    image_loads: LoadGenerations,
    mask_loads: LoadGenerations,
    outcome: RenderOutcome,
}

impl AvatarEditor {
    /// Create an editor with a `width` x `height` canvas.
    ///
    /// The mask descriptor exists from the start when a mask asset path is
    /// configured, but stays inert until [`finish_mask_load`] installs the
    /// decoded asset.
    ///
    /// [`finish_mask_load`]: AvatarEditor::finish_mask_load
    pub fn new(width: u32, height: u32, options: EditorOptions) -> Result<Self, ConfigError> {
        validate_canvas_size(width, height)?;
        options.validate()?;

        let interpreter = GestureInterpreter::new(options.scale_factor, options.gesture_timing());
        let mask = options
            .has_mask()
            .then(|| MaskDescriptor::new(options.mask_style()));

        let canvas =
            Surface::new(width, height).ok_or(ConfigError::InvalidCanvasSize { width, height })?;

        let mut editor = Self {
            options,
            canvas,
            state: TransformState::default(),
            interpreter,
            image: None,
            mask,
            image_loads: LoadGenerations::default(),
            mask_loads: LoadGenerations::default(),
            outcome: RenderOutcome::Frame,
        };
        editor.render();
        Ok(editor)
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// The most recently rendered frame.
    pub fn canvas(&self) -> &Surface {
        &self.canvas
    }

    pub fn transform(&self) -> &TransformState {
        &self.state
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn mask(&self) -> Option<&MaskDescriptor> {
        self.mask.as_ref()
    }

    /// Outcome of the most recent render.
    pub fn last_outcome(&self) -> &RenderOutcome {
        &self.outcome
    }

    /// Feed one interaction event. Transform changes are rendered before
    /// this returns.
    pub fn apply_gesture(&mut self, event: &GestureEvent) -> GestureResponse {
        let response = self.interpreter.apply(event, &mut self.state);
        if response.transform_changed {
            self.render();
        }
        response
    }

    /// Start an image load, superseding any load still in flight.
    pub fn begin_image_load(&mut self) -> LoadTicket {
        let ticket = self.image_loads.issue();
        debug!("image load {} started", ticket.generation);
        ticket
    }

    /// Complete an image load.
    ///
    /// On success the image replaces the current one, the transform resets
    /// and the frame renders once. On decode failure nothing changes.
    pub fn finish_image_load(
        &mut self,
        ticket: LoadTicket,
        bytes: &[u8],
    ) -> Result<LoadOutcome, DecodeError> {
        if !self.image_loads.is_current(ticket) {
            debug!("image load {} superseded", ticket.generation);
            return Ok(LoadOutcome::Superseded);
        }

        let image = decode_image(bytes).map_err(|e| {
            warn!("image load {} failed: {}", ticket.generation, e);
            e
        })?;

        debug!(
            "image load {} applied ({}x{})",
            ticket.generation,
            image.width(),
            image.height()
        );
        self.image = Some(image);
        self.state.reset();
        self.interpreter.reset_session();
        self.render();
        Ok(LoadOutcome::Applied)
    }

    /// Begin and finish an image load in one step.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<LoadOutcome, DecodeError> {
        let ticket = self.begin_image_load();
        self.finish_image_load(ticket, bytes)
    }

    /// Start a mask asset load.
    pub fn begin_mask_load(&mut self) -> LoadTicket {
        let ticket = self.mask_loads.issue();
        debug!("mask load {} started", ticket.generation);
        ticket
    }

    /// Complete a mask asset load, building the stroke ring and
    /// re-rendering.
    pub fn finish_mask_load(
        &mut self,
        ticket: LoadTicket,
        bytes: &[u8],
    ) -> Result<LoadOutcome, DecodeError> {
        if !self.mask_loads.is_current(ticket) {
            debug!("mask load {} superseded", ticket.generation);
            return Ok(LoadOutcome::Superseded);
        }

        let asset = decode_image_no_orientation(bytes).map_err(|e| {
            warn!("mask load {} failed: {}", ticket.generation, e);
            e
        })?;

        debug!("mask load {} applied", ticket.generation);
        let style = self.options.mask_style();
        self.mask
            .get_or_insert_with(|| MaskDescriptor::new(style))
            .set_asset(asset.into_surface());
        self.render();
        Ok(LoadOutcome::Applied)
    }

    /// Begin and finish a mask load in one step.
    pub fn load_mask(&mut self, bytes: &[u8]) -> Result<LoadOutcome, DecodeError> {
        let ticket = self.begin_mask_load();
        self.finish_mask_load(ticket, bytes)
    }

    /// Change the mask size or colors.
    pub fn set_mask_style(&mut self, style: MaskStyle) -> Result<(), ConfigError> {
        validate_mask_style(&style)?;

        self.options.mask_width = style.width;
        self.options.mask_height = style.height;
        self.options.mask_stroke_width = style.stroke_width;
        self.options.mask_stroke_color = style.stroke_color;
        self.options.mask_overflow_color = style.overflow_color;

        if let Some(mask) = self.mask.as_mut() {
            mask.set_style(style);
        }
        self.render();
        Ok(())
    }

    /// Replace the canvas with a blank one of a new size and re-render.
    pub fn resize_canvas(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        validate_canvas_size(width, height)?;
        if self.canvas.dimensions() == (width, height) {
            return Ok(());
        }

        debug!(
            "canvas resized from {}x{} to {}x{}",
            self.canvas.width(),
            self.canvas.height(),
            width,
            height
        );
        self.canvas =
            Surface::new(width, height).ok_or(ConfigError::InvalidCanvasSize { width, height })?;
        self.render();
        Ok(())
    }

    /// Redraw the frame from the current state.
    pub fn render(&mut self) -> RenderOutcome {
        self.outcome = render(
            &mut self.canvas,
            &self.state,
            self.image.as_ref(),
            self.mask.as_ref(),
            &self.options.placeholder_text,
        );
        self.outcome.clone()
    }

    /// Encode the current crop. `Ok(None)` when no image is loaded.
    pub fn export(
        &self,
        format: ExportFormat,
        quality: f32,
    ) -> Result<Option<Vec<u8>>, EncodeError> {
        export_crop(
            &self.canvas,
            &self.state,
            self.image.as_ref(),
            self.mask.as_ref(),
            format,
            quality,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::gesture::Point;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    fn photo(width: u32, height: u32) -> Vec<u8> {
        png_bytes(&RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 40, 255])
        }))
    }

    fn square_mask() -> Vec<u8> {
        png_bytes(&RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])))
    }

    fn masked_options() -> EditorOptions {
        EditorOptions {
            mask_asset_path: Some("mask.png".to_string()),
            ..Default::default()
        }
    }

    fn wheel_in(x: f64, y: f64) -> GestureEvent {
        GestureEvent::Wheel {
            position: Point::new(x, y),
            delta_y: -100.0,
        }
    }

    #[test]
    fn test_new_validates() {
        assert!(matches!(
            AvatarEditor::new(0, 10, EditorOptions::default()),
            Err(ConfigError::InvalidCanvasSize { .. })
        ));

        let options = EditorOptions {
            scale_factor: 0.9,
            ..Default::default()
        };
        assert!(matches!(
            AvatarEditor::new(10, 10, options),
            Err(ConfigError::InvalidScaleFactor(_))
        ));
    }

    #[test]
    fn test_starts_with_placeholder() {
        let editor = AvatarEditor::new(400, 400, EditorOptions::default()).unwrap();
        assert!(editor.last_outcome().is_placeholder());
        assert!(editor.mask().is_none());
    }

    #[test]
    fn test_mask_descriptor_created_when_configured() {
        let editor = AvatarEditor::new(400, 400, masked_options()).unwrap();
        let mask = editor.mask().unwrap();
        assert!(!mask.is_ready());
        assert_eq!(mask.dimensions(), (200, 200));
    }

    #[test]
    fn test_load_image_resets_and_renders() {
        let mut editor = AvatarEditor::new(400, 400, EditorOptions::default()).unwrap();
        editor.apply_gesture(&wheel_in(10.0, 10.0));
        assert_ne!(*editor.transform(), TransformState::default());

        let outcome = editor.load_image(&photo(100, 100)).unwrap();

        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(*editor.transform(), TransformState::default());
        assert_eq!(*editor.last_outcome(), RenderOutcome::Frame);
        assert_eq!(editor.canvas().pixel(5, 7), Rgba([5, 7, 40, 255]));
    }

    #[test]
    fn test_stale_image_load_is_superseded() {
        let mut editor = AvatarEditor::new(50, 50, EditorOptions::default()).unwrap();
        let first = editor.begin_image_load();
        let second = editor.begin_image_load();

        assert_eq!(editor.finish_image_load(second, &photo(10, 10)).unwrap(), LoadOutcome::Applied);
        assert_eq!(
            editor.finish_image_load(first, &photo(30, 30)).unwrap(),
            LoadOutcome::Superseded
        );
        assert_eq!(editor.image().map(SourceImage::dimensions), Some((10, 10)));
    }

    #[test]
    fn test_failed_decode_keeps_previous_image() {
        let mut editor = AvatarEditor::new(50, 50, EditorOptions::default()).unwrap();
        editor.load_image(&photo(10, 10)).unwrap();
        editor.apply_gesture(&wheel_in(5.0, 5.0));
        let state = *editor.transform();
        let frame = editor.canvas().clone();

        assert!(editor.load_image(b"not an image").is_err());

        assert_eq!(editor.image().map(SourceImage::dimensions), Some((10, 10)));
        assert_eq!(*editor.transform(), state);
        assert_eq!(*editor.canvas(), frame);
    }

    #[test]
    fn test_wheel_scenario_and_export_offset() {
        // Canvas 400, mask 200, image 100 placed at (150, 150)
        let mut editor = AvatarEditor::new(400, 400, masked_options()).unwrap();
        editor.load_mask(&square_mask()).unwrap();
        editor.load_image(&photo(100, 100)).unwrap();
        editor.apply_gesture(&GestureEvent::PointerDown {
            position: Point::new(0.0, 0.0),
        });
        editor.apply_gesture(&GestureEvent::PointerMove {
            position: Point::new(150.0, 150.0),
            time_ms: 1_000.0,
        });
        editor.apply_gesture(&GestureEvent::PointerUp);
        assert_eq!(*editor.transform(), TransformState::new(150.0, 150.0, 1.0));

        let response = editor.apply_gesture(&wheel_in(200.0, 200.0));
        assert!(response.transform_changed);

        let t = *editor.transform();
        assert!((t.scale - 1.1).abs() < 1e-9);
        assert!((t.x - 145.0).abs() < 1e-9);
        assert!((t.y - 145.0).abs() < 1e-9);

        let bytes = editor.export(ExportFormat::Png, 1.0).unwrap().unwrap();
        let crop = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert_eq!(crop.dimensions(), (200, 200));
        assert_eq!(crop.get_pixel(44, 44)[3], 0);
        assert_eq!(*crop.get_pixel(45, 45), Rgba([0, 0, 40, 255]));
    }

    #[test]
    fn test_export_without_image_is_none() {
        let editor = AvatarEditor::new(400, 400, masked_options()).unwrap();
        assert!(editor.export(ExportFormat::Jpeg, 0.9).unwrap().is_none());
    }

    #[test]
    fn test_mask_load_supersession() {
        let mut editor = AvatarEditor::new(100, 100, masked_options()).unwrap();
        let stale = editor.begin_mask_load();
        let current = editor.begin_mask_load();

        assert_eq!(
            editor.finish_mask_load(stale, &square_mask()).unwrap(),
            LoadOutcome::Superseded
        );
        assert!(!editor.mask().unwrap().is_ready());

        assert_eq!(
            editor.finish_mask_load(current, &square_mask()).unwrap(),
            LoadOutcome::Applied
        );
        assert!(editor.mask().unwrap().is_ready());
    }

    #[test]
    fn test_mask_load_renders_ring_over_placeholder() {
        let mut editor = AvatarEditor::new(400, 400, masked_options()).unwrap();
        editor.load_mask(&square_mask()).unwrap();

        // Ring of a 200px mask with a 1px stroke starts at column 99
        assert_eq!(editor.canvas().pixel(99, 200), Rgba([204, 204, 204, 255]));
        let RenderOutcome::Placeholder(layout) = editor.last_outcome() else {
            panic!("expected placeholder");
        };
        assert_eq!(layout.max_width, 160.0);
    }

    #[test]
    fn test_set_mask_style() {
        let mut editor = AvatarEditor::new(400, 400, masked_options()).unwrap();
        editor.load_mask(&square_mask()).unwrap();

        let style = MaskStyle {
            width: 100,
            height: 50,
            stroke_width: 2,
            stroke_color: Color::WHITE,
            overflow_color: Color::BLACK,
        };
        editor.set_mask_style(style).unwrap();

        assert_eq!(editor.mask().unwrap().dimensions(), (100, 50));
        assert_eq!(editor.options().mask_width, 100);
        assert_eq!(editor.canvas().pixel(148, 200), Rgba([255, 255, 255, 255]));

        let zero = MaskStyle { width: 0, ..style };
        assert!(editor.set_mask_style(zero).is_err());
    }

    #[test]
    fn test_oversized_mask_is_rejected_without_panicking() {
        let options = EditorOptions {
            mask_width: u32::MAX,
            mask_height: u32::MAX,
            ..masked_options()
        };
        assert!(matches!(
            AvatarEditor::new(400, 400, options),
            Err(ConfigError::SurfaceTooLarge { what: "mask", .. })
        ));

        let mut editor = AvatarEditor::new(400, 400, masked_options()).unwrap();
        editor.load_mask(&square_mask()).unwrap();
        let huge = MaskStyle {
            width: u32::MAX,
            height: u32::MAX,
            ..*editor.mask().unwrap().style()
        };
        assert!(editor.set_mask_style(huge).is_err());
        assert_eq!(editor.mask().unwrap().dimensions(), (200, 200));
        assert_eq!(editor.options().mask_width, 200);

        assert!(editor.resize_canvas(u32::MAX, 10).is_err());
        assert_eq!(editor.canvas().dimensions(), (400, 400));
    }

    #[test]
    fn test_failed_mask_decode_keeps_ring_and_frame() {
        let mut editor = AvatarEditor::new(400, 400, masked_options()).unwrap();
        editor.load_mask(&square_mask()).unwrap();
        editor.load_image(&photo(300, 300)).unwrap();
        let ring = editor.mask().unwrap().ring().cloned();
        let frame = editor.canvas().clone();
        assert!(ring.is_some());

        assert!(editor.load_mask(b"garbage").is_err());

        let mask = editor.mask().unwrap();
        assert!(mask.is_ready());
        assert_eq!(mask.ring().cloned(), ring);
        assert_eq!(*editor.canvas(), frame);
        assert_eq!(*editor.last_outcome(), RenderOutcome::Frame);
    }

    #[test]
    fn test_resize_canvas() {
        let mut editor = AvatarEditor::new(100, 100, EditorOptions::default()).unwrap();
        editor.resize_canvas(300, 200).unwrap();
        assert_eq!(editor.canvas().dimensions(), (300, 200));

        let RenderOutcome::Placeholder(layout) = editor.last_outcome() else {
            panic!("expected placeholder");
        };
        assert_eq!((layout.center_x, layout.center_y), (150.0, 100.0));

        assert!(editor.resize_canvas(0, 10).is_err());
        assert_eq!(editor.canvas().dimensions(), (300, 200));
    }

    #[test]
    fn test_gesture_without_change_does_not_render() {
        let mut editor = AvatarEditor::new(20, 20, EditorOptions::default()).unwrap();
        editor.load_image(&photo(4, 4)).unwrap();
        let response = editor.apply_gesture(&GestureEvent::PointerUp);
        assert!(!response.transform_changed);
    }

    #[test]
    fn test_load_ticket_generations_increase() {
        let mut editor = AvatarEditor::new(20, 20, EditorOptions::default()).unwrap();
        let a = editor.begin_image_load();
        let b = editor.begin_image_load();
        assert_eq!(b.generation(), a.generation() + 1);
        assert_eq!(LoadTicket::from_generation(b.generation()), b);
    }
}
