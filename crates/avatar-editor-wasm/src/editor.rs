//! Editor WASM bindings.
//!
//! [`JsAvatarEditor`] wraps the core editor for a page. The page owns the
//! `<canvas>`, the file input and text rendering; after each call that may
//! change the frame it copies [`JsAvatarEditor::frame_pixels`] into an
//! `ImageData` and, when `render()` reports a placeholder, draws the prompt.
//!
//! # Example
//!
//! ```typescript
//! import init, { JsAvatarEditor } from '@avatar-editor/wasm';
//!
//! await init();
//! const editor = new JsAvatarEditor(400, 400, { maskW: 200, mask: '/mask.png' });
//!
//! canvas.addEventListener('wheel', (e) => {
//!   const r = editor.apply_gesture('wheel', { x: e.offsetX, y: e.offsetY, deltaY: e.deltaY });
//!   if (r.preventDefault) e.preventDefault();
//!   if (r.transformChanged) paint();
//! });
//! ```

use avatar_editor_core::{AvatarEditor, EditorOptions, ExportFormat, GestureEvent};
use wasm_bindgen::prelude::*;

use crate::gesture::{to_gesture_event, GesturePayload};
use crate::types::{outcome_name, to_js, JsLoadTicket, JsMaskStyle};

/// Quality used by `export` when none is given.
const DEFAULT_EXPORT_QUALITY: f32 = 1.0;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Deserialize an optional JavaScript object, treating `undefined` and
/// `null` as "all defaults".
fn from_js_or_default<T>(value: JsValue) -> Result<T, JsValue>
where
    T: Default + serde::de::DeserializeOwned,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

/// Avatar editor bound to a host canvas of fixed pixel size.
#[wasm_bindgen]
pub struct JsAvatarEditor {
    inner: AvatarEditor,
}

#[wasm_bindgen]
impl JsAvatarEditor {
    /// Create an editor.
    ///
    /// # Arguments
    ///
    /// * `width`, `height` - Canvas size in pixels
    /// * `options` - Editor options object, or `undefined` for defaults
    ///
    /// # Errors
    ///
    /// Returns an error for a zero-sized canvas or invalid options.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, options: JsValue) -> Result<JsAvatarEditor, JsValue> {
        let options: EditorOptions = from_js_or_default(options)?;
        Self::with_options(width, height, options).map_err(js_error)
    }

    /// Feed one DOM event. Returns `{ transformChanged, openFilePicker,
    /// preventDefault }`.
    pub fn apply_gesture(&mut self, kind: &str, payload: JsValue) -> Result<JsValue, JsValue> {
        let payload: GesturePayload = from_js_or_default(payload)?;
        let event = to_gesture_event(kind, &payload, js_sys::Date::now()).map_err(js_error)?;
        let response = self.inner.apply_gesture(&event);
        to_js(&response)
    }

    /// Start reading a new image file.
    pub fn begin_image_load(&mut self) -> JsLoadTicket {
        self.inner.begin_image_load().into()
    }

    /// Finish an image load with the file's bytes. Resolves to `"applied"` or
    /// `"superseded"`.
    pub fn finish_image_load(
        &mut self,
        ticket: &JsLoadTicket,
        bytes: &[u8],
    ) -> Result<String, JsValue> {
        self.inner
            .finish_image_load(ticket.inner(), bytes)
            .map(|o| outcome_name(o).to_string())
            .map_err(js_error)
    }

    /// Load an image in one step.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<String, JsValue> {
        self.inner
            .load_image(bytes)
            .map(|o| outcome_name(o).to_string())
            .map_err(js_error)
    }

    /// Start fetching the mask asset.
    pub fn begin_mask_load(&mut self) -> JsLoadTicket {
        self.inner.begin_mask_load().into()
    }

    /// Finish a mask load with the asset's bytes.
    pub fn finish_mask_load(
        &mut self,
        ticket: &JsLoadTicket,
        bytes: &[u8],
    ) -> Result<String, JsValue> {
        self.inner
            .finish_mask_load(ticket.inner(), bytes)
            .map(|o| outcome_name(o).to_string())
            .map_err(js_error)
    }

    /// Load the mask asset in one step.
    pub fn load_mask(&mut self, bytes: &[u8]) -> Result<String, JsValue> {
        self.inner
            .load_mask(bytes)
            .map(|o| outcome_name(o).to_string())
            .map_err(js_error)
    }

    /// Change mask size or colors. Missing fields keep their current value.
    pub fn set_mask_style(&mut self, style: JsValue) -> Result<(), JsValue> {
        let patch: JsMaskStyle = from_js_or_default(style)?;
        let style = patch.apply_to(self.inner.options().mask_style());
        self.inner.set_mask_style(style).map_err(js_error)
    }

    /// Resize the canvas. The host must resize its `<canvas>` to match.
    pub fn resize_canvas(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner.resize_canvas(width, height).map_err(js_error)
    }

    /// Redraw and return `{ kind: "frame" }` or `{ kind: "placeholder",
    /// text, centerX, centerY, maxWidth }`.
    pub fn render(&mut self) -> Result<JsValue, JsValue> {
        let outcome = self.inner.render();
        to_js(&outcome)
    }

    /// Outcome of the last render, without redrawing.
    pub fn last_outcome(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.last_outcome())
    }

    /// RGBA bytes of the current frame (4 bytes per pixel, row-major order).
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn frame_pixels(&self) -> Vec<u8> {
        self.inner.canvas().to_rgba_image().into_raw()
    }

    /// Canvas width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.canvas().width()
    }

    /// Canvas height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.canvas().height()
    }

    /// Current `{ x, y, scale }`.
    pub fn transform(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.transform())
    }

    /// Export the crop.
    ///
    /// # Arguments
    ///
    /// * `format` - `"png"`, `"jpeg"`, `"bmp"`, `"webp"` or a MIME type
    /// * `quality` - `0.0..=1.0`, JPEG only; defaults to `1.0`
    ///
    /// # Returns
    ///
    /// Encoded bytes, or `undefined` when no image is loaded.
    pub fn export(&self, format: &str, quality: Option<f32>) -> Result<Option<Vec<u8>>, JsValue> {
        let format: ExportFormat = format.parse().map_err(js_error)?;
        self.inner
            .export(format, quality.unwrap_or(DEFAULT_EXPORT_QUALITY))
            .map_err(js_error)
    }

    /// Path the host should fetch the mask asset from, if masking is on.
    #[wasm_bindgen(getter)]
    pub fn mask_asset_path(&self) -> Option<String> {
        self.inner.options().mask_asset_path.clone()
    }

    /// Prompt text shown while no image is loaded.
    #[wasm_bindgen(getter)]
    pub fn placeholder_text(&self) -> String {
        self.inner.options().placeholder_text.clone()
    }
}

impl JsAvatarEditor {
    /// Rust-side constructor taking already-parsed options.
    pub fn with_options(
        width: u32,
        height: u32,
        options: EditorOptions,
    ) -> Result<JsAvatarEditor, avatar_editor_core::ConfigError> {
        AvatarEditor::new(width, height, options).map(|inner| JsAvatarEditor { inner })
    }

    /// Apply an already-converted event.
    pub fn apply_event(&mut self, event: &GestureEvent) -> avatar_editor_core::GestureResponse {
        self.inner.apply_gesture(event)
    }

    /// Borrow the wrapped editor.
    pub fn editor(&self) -> &AvatarEditor {
        &self.inner
    }
}
