//! Gesture payload conversion.
//!
//! The host forwards DOM events as a kind string plus a small plain object.
//! Coordinates must already be relative to the canvas. `timeMs` is optional;
//! when absent the current wall clock is used.
//!
//! | kind           | payload                                   |
//! |----------------|-------------------------------------------|
//! | `pointerdown`  | `{ x, y }`                                |
//! | `pointermove`  | `{ x, y, timeMs? }`                       |
//! | `pointerup`    | none                                      |
//! | `pointerleave` | none                                      |
//! | `wheel`        | `{ x, y, deltaY }`                        |
//! | `touchstart`   | `{ touches: [{ x, y }, ...], timeMs? }`   |
//! | `touchmove`    | `{ touches: [{ x, y }, ...], timeMs? }`   |
//! | `touchend`     | `{ touches: [remaining...], timeMs? }`    |
//! | `dblclick`     | `{ timeMs? }`                             |

use avatar_editor_core::{GestureEvent, Point};
use serde::Deserialize;

/// One touch point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl From<TouchPoint> for Point {
    fn from(t: TouchPoint) -> Self {
        Point::new(t.x, t.y)
    }
}

/// Union of every payload field; each kind reads the ones it needs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GesturePayload {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub delta_y: Option<f64>,
    pub touches: Vec<TouchPoint>,
    pub time_ms: Option<f64>,
}

impl GesturePayload {
    fn position(&self, kind: &str) -> Result<Point, String> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Ok(Point::new(x, y)),
            _ => Err(format!("'{}' payload needs numeric x and y", kind)),
        }
    }

    fn touches(&self) -> Vec<Point> {
        self.touches.iter().copied().map(Point::from).collect()
    }
}

/// Build a core event from a host event kind and payload.
///
/// `now_ms` is used when the payload carries no timestamp.
pub fn to_gesture_event(
    kind: &str,
    payload: &GesturePayload,
    now_ms: f64,
) -> Result<GestureEvent, String> {
    let time_ms = payload.time_ms.unwrap_or(now_ms);

    let event = match kind {
        "pointerdown" => GestureEvent::PointerDown {
            position: payload.position(kind)?,
        },
        "pointermove" => GestureEvent::PointerMove {
            position: payload.position(kind)?,
            time_ms,
        },
        "pointerup" => GestureEvent::PointerUp,
        "pointerleave" => GestureEvent::PointerLeave,
        "wheel" => GestureEvent::Wheel {
            position: payload.position(kind)?,
            delta_y: payload
                .delta_y
                .ok_or_else(|| "'wheel' payload needs deltaY".to_string())?,
        },
        "touchstart" => GestureEvent::TouchStart {
            touches: payload.touches(),
            time_ms,
        },
        "touchmove" => GestureEvent::TouchMove {
            touches: payload.touches(),
            time_ms,
        },
        "touchend" => GestureEvent::TouchEnd {
            touches: payload.touches(),
            time_ms,
        },
        "dblclick" => GestureEvent::DoubleClick { time_ms },
        other => return Err(format!("Unknown gesture kind '{}'", other)),
    };

    Ok(event)
}
