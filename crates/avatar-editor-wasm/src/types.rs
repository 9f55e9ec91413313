//! WASM-compatible wrapper types.
//!
//! This module holds the JavaScript-facing shapes of core values and the
//! conversions between them.

use avatar_editor_core::{Color, LoadOutcome, LoadTicket, MaskStyle};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Handle for an image or mask load in flight.
///
/// Obtain one from `begin_image_load`/`begin_mask_load` before reading the
/// file, and hand it back with the bytes when reading finishes.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsLoadTicket {
    inner: LoadTicket,
}

#[wasm_bindgen]
impl JsLoadTicket {
    /// Generation number of this load
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> u32 {
        self.inner.generation()
    }
}

impl JsLoadTicket {
    pub(crate) fn inner(&self) -> LoadTicket {
        self.inner
    }
}

impl From<LoadTicket> for JsLoadTicket {
    fn from(inner: LoadTicket) -> Self {
        Self { inner }
    }
}

/// String form of a load outcome handed back to JavaScript.
pub(crate) fn outcome_name(outcome: LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Applied => "applied",
        LoadOutcome::Superseded => "superseded",
    }
}

/// Partial mask style from JavaScript; missing fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsMaskStyle {
    #[serde(alias = "maskW")]
    pub width: Option<u32>,
    #[serde(alias = "maskH")]
    pub height: Option<u32>,
    pub stroke_width: Option<u32>,
    pub stroke_color: Option<Color>,
    #[serde(alias = "overflow")]
    pub overflow_color: Option<Color>,
}

impl JsMaskStyle {
    /// Overlay the provided fields onto `base`.
    pub fn apply_to(&self, base: MaskStyle) -> MaskStyle {
        MaskStyle {
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            stroke_width: self.stroke_width.unwrap_or(base.stroke_width),
            stroke_color: self.stroke_color.unwrap_or(base.stroke_color),
            overflow_color: self.overflow_color.unwrap_or(base.overflow_color),
        }
    }
}

/// Serialize a value into a plain JavaScript object.
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}
