//! Image decoding for the editor.
//!
//! This module provides functionality for:
//! - Decoding the user's selected file into a [`SourceImage`]
//! - Honoring EXIF orientation so phone photos arrive upright
//! - Decoding mask assets (orientation left as stored)
//!
//! # Architecture
//!
//! Decoding is synchronous. The asynchronous part of a load (reading the
//! file in the browser) happens before the bytes reach this module; the
//! editor's load tickets decide whether the decoded result is still wanted.
//!
//! # Examples
//!
//! ```ignore
//! use avatar_editor_core::decode::decode_image;
//!
//! let bytes = std::fs::read("avatar.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```

mod raster;
mod types;

pub use raster::{decode_image, decode_image_no_orientation, get_orientation};
pub use types::{DecodeError, Orientation, SourceImage};
