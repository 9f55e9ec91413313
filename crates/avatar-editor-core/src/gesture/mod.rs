//! Pointer, wheel and touch gestures.
//!
//! The interpreter turns raw interaction events into [`TransformState`]
//! updates and never draws. Coordinates are canvas-relative pixels (the host
//! subtracts the canvas bounding rect); timestamps are milliseconds on the
//! host's event clock.
//!
//! ## Gestures
//!
//! - **Pan**: mouse drag or single-finger touch drag
//! - **Wheel zoom**: one `scale_factor` step per wheel event, about the cursor
//! - **Pinch zoom**: two fingers, incremental factor `d1 / d0` about the midpoint
//! - **Double tap / double click**: asks the host to open the file picker
//!
//! [`TransformState`]: crate::transform::TransformState

mod interpreter;
mod session;

pub use interpreter::{GestureInterpreter, GestureTiming};
pub use session::GestureSession;

use serde::{Deserialize, Serialize};

/// A touch or pointer position in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point halfway to another point.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// A raw interaction event.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    /// Mouse button pressed over the canvas.
    PointerDown { position: Point },
    /// Mouse moved over the canvas.
    PointerMove { position: Point, time_ms: f64 },
    /// Mouse button released anywhere.
    PointerUp,
    /// Mouse left the window or moved out of the canvas.
    PointerLeave,
    /// Wheel scrolled with the cursor at `position`.
    Wheel { position: Point, delta_y: f64 },
    /// Touches active after a finger went down.
    TouchStart { touches: Vec<Point>, time_ms: f64 },
    /// Touches active after a finger moved.
    TouchMove { touches: Vec<Point>, time_ms: f64 },
    /// Touches still active after a finger lifted.
    TouchEnd { touches: Vec<Point>, time_ms: f64 },
    /// Native double click.
    DoubleClick { time_ms: f64 },
}

/// What the host should do after an event was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureResponse {
    /// The transform changed and the frame must be redrawn.
    pub transform_changed: bool,
    /// A double tap/click asked for the file picker.
    pub open_file_picker: bool,
    /// The host should suppress native scrolling/zooming for this event.
    pub prevent_default: bool,
}

impl GestureResponse {
    pub(crate) fn changed(prevent_default: bool) -> Self {
        Self {
            transform_changed: true,
            prevent_default,
            ..Default::default()
        }
    }

    pub(crate) fn prevented() -> Self {
        Self {
            prevent_default: true,
            ..Default::default()
        }
    }
}
