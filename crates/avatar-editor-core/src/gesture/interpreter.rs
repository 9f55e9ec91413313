//! Event-to-transform interpretation.

use super::{GestureEvent, GestureResponse, GestureSession, Point};
use crate::transform::TransformState;

/// Timing windows for tap detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureTiming {
    /// Two taps closer than this form a double tap.
    pub double_tap_window_ms: f64,
    /// Quiet period after a pan/pinch before a double tap counts.
    pub cooldown_ms: f64,
}

impl Default for GestureTiming {
    fn default() -> Self {
        Self {
            double_tap_window_ms: 500.0,
            cooldown_ms: 300.0,
        }
    }
}

/// Converts interaction events into [`TransformState`] updates.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    scale_factor: f64,
    timing: GestureTiming,
    session: GestureSession,
}

impl GestureInterpreter {
    /// `scale_factor` is the per-step wheel zoom multiplier and must be > 1;
    /// the editor validates it before constructing an interpreter.
    pub fn new(scale_factor: f64, timing: GestureTiming) -> Self {
        Self {
            scale_factor,
            timing,
            session: GestureSession::new(),
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn timing(&self) -> GestureTiming {
        self.timing
    }

    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    /// Drop any gesture in progress.
    pub fn reset_session(&mut self) {
        self.session = GestureSession::new();
    }

    /// Interpret one event, mutating `state` as needed.
    pub fn apply(&mut self, event: &GestureEvent, state: &mut TransformState) -> GestureResponse {
        match event {
            GestureEvent::PointerDown { position } => {
                self.session.dragging = true;
                self.session.drag_anchor = *position;
                GestureResponse::default()
            }
            GestureEvent::PointerMove { position, time_ms } => {
                self.pointer_move(*position, *time_ms, state)
            }
            GestureEvent::PointerUp | GestureEvent::PointerLeave => {
                self.session.dragging = false;
                GestureResponse::default()
            }
            GestureEvent::Wheel { position, delta_y } => self.wheel(*position, *delta_y, state),
            GestureEvent::TouchStart { touches, .. } => {
                self.touch_start(touches);
                GestureResponse::default()
            }
            GestureEvent::TouchMove { touches, time_ms } => {
                self.touch_move(touches, *time_ms, state)
            }
            GestureEvent::TouchEnd { touches, time_ms } => self.touch_end(touches, *time_ms),
            GestureEvent::DoubleClick { time_ms } => {
                let quiet = self.session.since_gesture(*time_ms) > self.timing.cooldown_ms;
                GestureResponse {
                    open_file_picker: quiet,
                    ..Default::default()
                }
            }
        }
    }

    fn pointer_move(
        &mut self,
        position: Point,
        time_ms: f64,
        state: &mut TransformState,
    ) -> GestureResponse {
        if !self.session.dragging {
            return GestureResponse::default();
        }

        let dx = position.x - self.session.drag_anchor.x;
        let dy = position.y - self.session.drag_anchor.y;
        self.session.drag_anchor = position;

        if dx == 0.0 && dy == 0.0 {
            return GestureResponse::default();
        }

        state.pan_by(dx, dy);
        self.session.last_gesture_ms = time_ms;
        log::trace!("pan by ({dx}, {dy})");
        GestureResponse::changed(false)
    }

    fn wheel(&mut self, position: Point, delta_y: f64, state: &mut TransformState) -> GestureResponse {
        // Zoom in on negative delta (wheel up), out on positive
        let factor = if delta_y > 0.0 {
            1.0 / self.scale_factor
        } else if delta_y < 0.0 {
            self.scale_factor
        } else {
            return GestureResponse::prevented();
        };

        if state.zoom_about(factor, position.x, position.y) {
            log::trace!("wheel zoom x{factor} at ({}, {})", position.x, position.y);
            GestureResponse::changed(true)
        } else {
            GestureResponse::prevented()
        }
    }

    fn touch_start(&mut self, touches: &[Point]) {
        match touches {
            [only] => self.session.touch_anchor = *only,
            [first, second] => {
                self.session.pinching = true;
                self.session.pinch_distance = first.distance(*second);
            }
            _ => {}
        }
    }

    fn touch_move(
        &mut self,
        touches: &[Point],
        time_ms: f64,
        state: &mut TransformState,
    ) -> GestureResponse {
        match touches {
            [only] if !self.session.pinching => {
                let dx = only.x - self.session.touch_anchor.x;
                let dy = only.y - self.session.touch_anchor.y;
                self.session.touch_anchor = *only;
                self.session.last_gesture_ms = time_ms;

                state.pan_by(dx, dy);
                GestureResponse::changed(true)
            }
            [first, second] if self.session.pinching => {
                let previous = self.session.pinch_distance;
                let current = first.distance(*second);
                let anchor = first.midpoint(*second);

                // Incremental: each step is relative to the previous one
                self.session.pinch_distance = current;
                self.session.last_gesture_ms = time_ms;

                if previous > 0.0 && state.zoom_about(current / previous, anchor.x, anchor.y) {
                    log::trace!("pinch x{} at ({}, {})", current / previous, anchor.x, anchor.y);
                    GestureResponse::changed(true)
                } else {
                    GestureResponse::prevented()
                }
            }
            _ => GestureResponse::prevented(),
        }
    }

    fn touch_end(&mut self, remaining: &[Point], time_ms: f64) -> GestureResponse {
        let mut response = GestureResponse::default();

        let tap_gap = self.session.last_tap_ms.map(|last| time_ms - last);
        let is_double_tap =
            matches!(tap_gap, Some(gap) if gap > 0.0 && gap < self.timing.double_tap_window_ms);

        if is_double_tap {
            response.prevent_default = true;
            let quiet = self.session.since_gesture(time_ms) > self.timing.cooldown_ms;
            response.open_file_picker = !self.session.pinching && quiet;
        }

        self.session.pinching = false;
        self.session.last_tap_ms = if response.open_file_picker {
            None
        } else {
            Some(time_ms)
        };

        // The finger left on the glass continues panning from where it is
        if let [only] = remaining {
            self.session.touch_anchor = *only;
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn interpreter() -> GestureInterpreter {
        GestureInterpreter::new(1.1, GestureTiming::default())
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn touch_start(touches: &[Point], time_ms: f64) -> GestureEvent {
        GestureEvent::TouchStart {
            touches: touches.to_vec(),
            time_ms,
        }
    }

    fn touch_move(touches: &[Point], time_ms: f64) -> GestureEvent {
        GestureEvent::TouchMove {
            touches: touches.to_vec(),
            time_ms,
        }
    }

    fn touch_end(touches: &[Point], time_ms: f64) -> GestureEvent {
        GestureEvent::TouchEnd {
            touches: touches.to_vec(),
            time_ms,
        }
    }

    #[test]
    fn test_mouse_drag_pans() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        g.apply(&GestureEvent::PointerDown { position: p(10.0, 10.0) }, &mut t);
        let r = g.apply(
            &GestureEvent::PointerMove { position: p(15.0, 7.0), time_ms: 1.0 },
            &mut t,
        );
        assert!(r.transform_changed);
        g.apply(
            &GestureEvent::PointerMove { position: p(20.0, 10.0), time_ms: 2.0 },
            &mut t,
        );

        assert_eq!((t.x, t.y), (10.0, 0.0));
    }

    #[test]
    fn test_move_without_drag_does_nothing() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        let r = g.apply(
            &GestureEvent::PointerMove { position: p(50.0, 50.0), time_ms: 1.0 },
            &mut t,
        );
        assert!(!r.transform_changed);
        assert_eq!(t, TransformState::default());
    }

    #[test]
    fn test_pointer_up_and_leave_end_drag() {
        for end in [GestureEvent::PointerUp, GestureEvent::PointerLeave] {
            let mut g = interpreter();
            let mut t = TransformState::default();

            g.apply(&GestureEvent::PointerDown { position: p(0.0, 0.0) }, &mut t);
            g.apply(&end, &mut t);
            g.apply(
                &GestureEvent::PointerMove { position: p(30.0, 30.0), time_ms: 1.0 },
                &mut t,
            );

            assert_eq!(t, TransformState::default());
            assert!(!g.session().dragging);
        }
    }

    #[test]
    fn test_wheel_up_zooms_in_about_cursor() {
        let mut g = interpreter();
        let mut t = TransformState::new(150.0, 150.0, 1.0);

        let r = g.apply(
            &GestureEvent::Wheel { position: p(200.0, 200.0), delta_y: -100.0 },
            &mut t,
        );

        assert!(r.transform_changed);
        assert!(r.prevent_default);
        assert!(approx_eq(t.scale, 1.1));
        assert!(approx_eq(t.x, 145.0));
        assert!(approx_eq(t.y, 145.0));
    }

    #[test]
    fn test_wheel_down_zooms_out() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        g.apply(&GestureEvent::Wheel { position: p(0.0, 0.0), delta_y: 3.0 }, &mut t);
        assert!(approx_eq(t.scale, 1.0 / 1.1));
    }

    #[test]
    fn test_wheel_in_then_out_restores_state() {
        let mut g = interpreter();
        let start = TransformState::new(-37.0, 12.5, 0.8);
        let mut t = start;

        g.apply(&GestureEvent::Wheel { position: p(123.0, 77.0), delta_y: -1.0 }, &mut t);
        g.apply(&GestureEvent::Wheel { position: p(123.0, 77.0), delta_y: 1.0 }, &mut t);

        assert!(approx_eq(t.scale, start.scale));
        assert!(approx_eq(t.x, start.x));
        assert!(approx_eq(t.y, start.y));
    }

    #[test]
    fn test_horizontal_wheel_is_ignored_but_prevented() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        let r = g.apply(&GestureEvent::Wheel { position: p(5.0, 5.0), delta_y: 0.0 }, &mut t);
        assert!(!r.transform_changed);
        assert!(r.prevent_default);
        assert_eq!(t, TransformState::default());
    }

    #[test]
    fn test_single_finger_pan() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        g.apply(&touch_start(&[p(100.0, 100.0)], 0.0), &mut t);
        let r = g.apply(&touch_move(&[p(110.0, 95.0)], 16.0), &mut t);
        g.apply(&touch_move(&[p(120.0, 90.0)], 32.0), &mut t);

        assert!(r.transform_changed);
        assert!(r.prevent_default);
        assert_eq!((t.x, t.y), (20.0, -10.0));
        assert_eq!(g.session().last_gesture_ms, 32.0);
    }

    #[test]
    fn test_pinch_scenario() {
        // Fingers 100px apart spreading to 150px, midpoint fixed at (250, 250)
        let mut g = interpreter();
        let start = TransformState::new(150.0, 150.0, 1.0);
        let mut t = start;

        g.apply(&touch_start(&[p(200.0, 250.0), p(300.0, 250.0)], 0.0), &mut t);
        let r = g.apply(&touch_move(&[p(175.0, 250.0), p(325.0, 250.0)], 16.0), &mut t);

        assert!(r.transform_changed);
        assert!(approx_eq(t.scale, 1.5));
        assert!(approx_eq(t.x, 250.0 - (250.0 - 150.0) * 1.5));
        assert!(approx_eq(t.y, 250.0 - (250.0 - 150.0) * 1.5));
        assert!(approx_eq(g.session().pinch_distance, 150.0));
    }

    #[test]
    fn test_pinch_is_incremental() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        g.apply(&touch_start(&[p(0.0, 0.0), p(100.0, 0.0)], 0.0), &mut t);
        g.apply(&touch_move(&[p(0.0, 0.0), p(150.0, 0.0)], 16.0), &mut t);
        g.apply(&touch_move(&[p(0.0, 0.0), p(300.0, 0.0)], 32.0), &mut t);

        // 1.5 then 2.0, not 1.5 then 3.0
        assert!(approx_eq(t.scale, 3.0));
    }

    #[test]
    fn test_pinch_with_zero_baseline_keeps_scale_positive() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        g.apply(&touch_start(&[p(50.0, 50.0), p(50.0, 50.0)], 0.0), &mut t);
        let r = g.apply(&touch_move(&[p(40.0, 50.0), p(60.0, 50.0)], 16.0), &mut t);
        assert!(!r.transform_changed);
        assert_eq!(t.scale, 1.0);

        // Next step zooms relative to the re-established baseline
        g.apply(&touch_move(&[p(30.0, 50.0), p(70.0, 50.0)], 32.0), &mut t);
        assert!(approx_eq(t.scale, 2.0));
    }

    #[test]
    fn test_single_finger_does_not_pan_during_pinch() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        g.apply(&touch_start(&[p(0.0, 0.0), p(100.0, 0.0)], 0.0), &mut t);
        let r = g.apply(&touch_move(&[p(40.0, 40.0)], 16.0), &mut t);

        assert!(!r.transform_changed);
        assert_eq!(t, TransformState::default());
    }

    #[test]
    fn test_remaining_finger_reanchors_after_pinch() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        g.apply(&touch_start(&[p(100.0, 0.0)], 0.0), &mut t);
        g.apply(&touch_start(&[p(100.0, 0.0), p(200.0, 0.0)], 10.0), &mut t);
        g.apply(&touch_end(&[p(180.0, 0.0)], 20.0), &mut t);

        let before = t;
        g.apply(&touch_move(&[p(185.0, 0.0)], 30.0), &mut t);
        assert_eq!(t.x - before.x, 5.0);
    }

    #[test]
    fn test_double_tap_opens_file_picker() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        g.apply(&touch_start(&[p(10.0, 10.0)], 1000.0), &mut t);
        let first = g.apply(&touch_end(&[], 1050.0), &mut t);
        assert!(!first.open_file_picker);

        g.apply(&touch_start(&[p(10.0, 10.0)], 1200.0), &mut t);
        let second = g.apply(&touch_end(&[], 1250.0), &mut t);
        assert!(second.open_file_picker);
        assert!(second.prevent_default);

        // A third tap starts a new pair instead of firing again
        let third = g.apply(&touch_end(&[], 1400.0), &mut t);
        assert!(!third.open_file_picker);
    }

    #[test]
    fn test_slow_taps_are_not_a_double_tap() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        g.apply(&touch_end(&[], 1000.0), &mut t);
        let r = g.apply(&touch_end(&[], 1600.0), &mut t);
        assert!(!r.open_file_picker);
        assert!(!r.prevent_default);
    }

    #[test]
    fn test_pinch_release_is_not_a_double_tap() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        g.apply(&touch_start(&[p(0.0, 0.0), p(100.0, 0.0)], 1000.0), &mut t);
        g.apply(&touch_move(&[p(0.0, 0.0), p(120.0, 0.0)], 1100.0), &mut t);
        // Fingers lift one after the other
        g.apply(&touch_end(&[p(120.0, 0.0)], 1150.0), &mut t);
        let r = g.apply(&touch_end(&[], 1200.0), &mut t);

        assert!(!r.open_file_picker);
        assert!(r.prevent_default);
    }

    #[test]
    fn test_double_tap_right_after_pan_is_suppressed() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        g.apply(&touch_start(&[p(0.0, 0.0)], 1000.0), &mut t);
        g.apply(&touch_move(&[p(30.0, 0.0)], 1100.0), &mut t);
        g.apply(&touch_end(&[], 1150.0), &mut t);
        let r = g.apply(&touch_end(&[], 1300.0), &mut t);

        assert!(!r.open_file_picker);
    }

    #[test]
    fn test_double_click_respects_cooldown() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        let r = g.apply(&GestureEvent::DoubleClick { time_ms: 5000.0 }, &mut t);
        assert!(r.open_file_picker);

        g.apply(&GestureEvent::PointerDown { position: p(0.0, 0.0) }, &mut t);
        g.apply(
            &GestureEvent::PointerMove { position: p(5.0, 0.0), time_ms: 6000.0 },
            &mut t,
        );
        g.apply(&GestureEvent::PointerUp, &mut t);

        let r = g.apply(&GestureEvent::DoubleClick { time_ms: 6100.0 }, &mut t);
        assert!(!r.open_file_picker);
    }

    #[test]
    fn test_reset_session() {
        let mut g = interpreter();
        let mut t = TransformState::default();

        g.apply(&GestureEvent::PointerDown { position: p(1.0, 1.0) }, &mut t);
        g.reset_session();
        assert_eq!(g.session(), &GestureSession::new());
    }
}
