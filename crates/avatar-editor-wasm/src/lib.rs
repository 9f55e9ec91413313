//! Avatar Editor WASM - WebAssembly bindings for the avatar editor
//!
//! This crate exposes avatar-editor-core to a web page. The page owns the
//! `<canvas>` element, file selection and text drawing; the editor owns the
//! transform, the masked frame and exports.
//!
//! # Module Structure
//!
//! - `editor` - The [`JsAvatarEditor`] class
//! - `gesture` - DOM event payloads to core gesture events
//! - `logging` - `log` output to the browser console
//! - `types` - WASM-compatible wrapper types
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsAvatarEditor, init_logging } from '@avatar-editor/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//! init_logging('warn');
//!
//! const editor = new JsAvatarEditor(canvas.width, canvas.height, { mask: '/mask.png' });
//! if (editor.mask_asset_path) {
//!   const ticket = editor.begin_mask_load();
//!   const bytes = new Uint8Array(await (await fetch(editor.mask_asset_path)).arrayBuffer());
//!   editor.finish_mask_load(ticket, bytes);
//! }
//! ```

use wasm_bindgen::prelude::*;

mod editor;
mod gesture;
mod logging;
mod types;

// Re-export public types
pub use editor::JsAvatarEditor;
pub use gesture::{to_gesture_event, GesturePayload, TouchPoint};
pub use logging::init_logging;
pub use types::{JsLoadTicket, JsMaskStyle};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    avatar_editor_core::VERSION.to_string()
}
