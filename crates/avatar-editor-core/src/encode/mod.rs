//! Export pipeline.
//!
//! This module provides functionality for:
//! - Parsing export formats and normalizing quality values
//! - Encoding surfaces to PNG, JPEG, BMP and WebP
//! - Re-rendering the masked region at the mask's native size
//!
//! # Examples
//!
//! ```ignore
//! use avatar_editor_core::encode::{encode_rgba, ExportFormat};
//!
//! let pixels = vec![128u8; 100 * 100 * 4]; // Gray image
//! let png = encode_rgba(&pixels, 100, 100, ExportFormat::Png, 1.0).unwrap();
//! println!("Encoded {} bytes", png.len());
//! ```

mod encoder;
mod export;
mod format;

pub use encoder::{encode_rgba, encode_surface, EncodeError};
pub use export::{export_crop, render_crop};
pub use format::{jpeg_quality, normalize_quality, ExportFormat, DEFAULT_QUALITY};
