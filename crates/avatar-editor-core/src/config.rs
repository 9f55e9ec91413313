//! Editor configuration.
//!
//! Options arrive from the host page as a loosely-typed object. Every key is
//! optional, unknown keys are ignored, and the short names older pages used
//! (`maskW`, `maskH`, `maskOverflow`, `placeholder`, `mask`) are accepted as
//! aliases.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::gesture::GestureTiming;
use crate::mask::MaskStyle;

/// Largest canvas, mask or stroke ring side the editor will allocate.
pub const MAX_SURFACE_SIDE: u32 = 8192;

/// Errors for invalid editor configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The wheel zoom multiplier must be finite and greater than 1
    #[error("Invalid scale factor {0}: must be a finite number greater than 1")]
    InvalidScaleFactor(f64),

    /// Mask width or height is zero
    #[error("Invalid mask size {width}x{height}: both dimensions must be non-zero")]
    InvalidMaskSize { width: u32, height: u32 },

    /// Canvas width or height is zero
    #[error("Invalid canvas size {width}x{height}: both dimensions must be non-zero")]
    InvalidCanvasSize { width: u32, height: u32 },

    /// A canvas, mask or stroke ring would exceed [`MAX_SURFACE_SIDE`]
    #[error("{what} size {width}x{height} exceeds the {}px limit per side", MAX_SURFACE_SIDE)]
    SurfaceTooLarge {
        what: &'static str,
        width: u64,
        height: u64,
    },

    /// A timing window is negative, zero where it must not be, or not finite
    #[error("Invalid {name} {value}: {reason}")]
    InvalidTiming {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Options accepted by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorOptions {
    /// Zoom multiplier per wheel step.
    pub scale_factor: f64,

    #[serde(alias = "maskW")]
    pub mask_width: u32,

    #[serde(alias = "maskH")]
    pub mask_height: u32,

    pub mask_stroke_width: u32,

    pub mask_stroke_color: Color,

    #[serde(alias = "maskOverflow")]
    pub mask_overflow_color: Color,

    /// Prompt shown while no image is loaded.
    #[serde(alias = "placeholder")]
    pub placeholder_text: String,

    /// Where the host fetches the mask image from. Absence disables masking.
    #[serde(alias = "mask", skip_serializing_if = "Option::is_none")]
    pub mask_asset_path: Option<String>,

    pub double_tap_window_ms: f64,

    pub gesture_cooldown_ms: f64,
}

impl Default for EditorOptions {
    fn default() -> Self {
        let style = MaskStyle::default();
        let timing = GestureTiming::default();
        Self {
            scale_factor: 1.1,
            mask_width: style.width,
            mask_height: style.height,
            mask_stroke_width: style.stroke_width,
            mask_stroke_color: style.stroke_color,
            mask_overflow_color: style.overflow_color,
            placeholder_text: "Double-click to choose an image".to_string(),
            mask_asset_path: None,
            double_tap_window_ms: timing.double_tap_window_ms,
            gesture_cooldown_ms: timing.cooldown_ms,
        }
    }
}

impl EditorOptions {
    /// Check every value the editor depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale_factor.is_finite() && self.scale_factor > 1.0) {
            return Err(ConfigError::InvalidScaleFactor(self.scale_factor));
        }

        validate_mask_style(&self.mask_style())?;

        if !(self.double_tap_window_ms.is_finite() && self.double_tap_window_ms > 0.0) {
            return Err(ConfigError::InvalidTiming {
                name: "doubleTapWindowMs",
                value: self.double_tap_window_ms,
                reason: "must be a finite number greater than 0",
            });
        }

        if !(self.gesture_cooldown_ms.is_finite() && self.gesture_cooldown_ms >= 0.0) {
            return Err(ConfigError::InvalidTiming {
                name: "gestureCooldownMs",
                value: self.gesture_cooldown_ms,
                reason: "must be a finite number of at least 0",
            });
        }

        Ok(())
    }

    /// Whether a mask asset is configured at all.
    pub fn has_mask(&self) -> bool {
        self.mask_asset_path.is_some()
    }

    pub fn mask_style(&self) -> MaskStyle {
        MaskStyle {
            width: self.mask_width,
            height: self.mask_height,
            stroke_width: self.mask_stroke_width,
            stroke_color: self.mask_stroke_color,
            overflow_color: self.mask_overflow_color,
        }
    }

    pub fn gesture_timing(&self) -> GestureTiming {
        GestureTiming {
            double_tap_window_ms: self.double_tap_window_ms,
            cooldown_ms: self.gesture_cooldown_ms,
        }
    }
}

/// Reject zero-sized and oversized canvases.
pub fn validate_canvas_size(width: u32, height: u32) -> Result<(), ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::InvalidCanvasSize { width, height });
    }
    check_side_limit("canvas", u64::from(width), u64::from(height))
}

/// Reject empty masks, and masks whose stroke ring would be oversized.
pub fn validate_mask_style(style: &MaskStyle) -> Result<(), ConfigError> {
    if style.width == 0 || style.height == 0 {
        return Err(ConfigError::InvalidMaskSize {
            width: style.width,
            height: style.height,
        });
    }
    check_side_limit("mask", u64::from(style.width), u64::from(style.height))?;

    let pad = 2 * u64::from(style.stroke_width);
    check_side_limit(
        "mask stroke ring",
        u64::from(style.width) + pad,
        u64::from(style.height) + pad,
    )
}

fn check_side_limit(what: &'static str, width: u64, height: u64) -> Result<(), ConfigError> {
    let max = u64::from(MAX_SURFACE_SIDE);
    if width > max || height > max {
        return Err(ConfigError::SurfaceTooLarge {
            what,
            width,
            height,
        });
    }
    Ok(())
}
