//! Avatar Editor Core - crop and mask engine
//!
//! This crate provides the engine behind the avatar editor: pan/zoom
//! gestures, the masked preview compositor, and export of the masked region
//! at the mask's native resolution. It has no browser dependencies; the
//! `avatar-editor-wasm` crate binds it to a page.

pub mod color;
pub mod config;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod gesture;
pub mod mask;
pub mod render;
pub mod surface;
pub mod transform;

pub use color::{Color, ColorError};
pub use config::{ConfigError, EditorOptions, MAX_SURFACE_SIDE};
pub use decode::{DecodeError, SourceImage};
pub use editor::{AvatarEditor, LoadOutcome, LoadTicket};
pub use encode::{EncodeError, ExportFormat};
pub use gesture::{GestureEvent, GestureResponse, Point};
pub use mask::{MaskDescriptor, MaskStyle};
pub use render::{PlaceholderLayout, RenderOutcome};
pub use surface::Surface;
pub use transform::TransformState;

/// Crate version, as reported to the host page.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
