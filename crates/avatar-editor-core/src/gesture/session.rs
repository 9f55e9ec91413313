//! Ephemeral interaction bookkeeping.

use super::Point;

/// Transient state carried between gesture events.
///
/// None of this is part of the editor's persistent state; a fresh session is
/// equivalent to "no gesture in progress".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureSession {
    /// Mouse drag in progress.
    pub dragging: bool,
    /// Last mouse position seen while dragging.
    pub drag_anchor: Point,
    /// Last single-finger position.
    pub touch_anchor: Point,
    /// Two-finger pinch in progress.
    pub pinching: bool,
    /// Finger distance at the previous pinch step.
    pub pinch_distance: f64,
    /// When the last pan/pinch step happened.
    pub last_gesture_ms: f64,
    /// When the last touch ended, if it may still start a double tap.
    pub last_tap_ms: Option<f64>,
}

impl GestureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the last pan/pinch step.
    pub fn since_gesture(&self, now_ms: f64) -> f64 {
        now_ms - self.last_gesture_ms
    }
}
