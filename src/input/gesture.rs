//! Touch gestures: one-shot swipes and tap/drag coordinate mapping

use glam::Vec2;

use super::Action;
use crate::consts::{SWIPE_MAX_TIME_MS, SWIPE_MIN_DISTANCE};

/// Recognizes a single directional swipe between touch start and end
#[derive(Debug, Clone, Default)]
pub struct SwipeDetector {
    start: Option<(Vec2, f64)>,
}

impl SwipeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record where and when (ms) a touch began
    pub fn touch_start(&mut self, pos: Vec2, time_ms: f64) {
        self.start = Some((pos, time_ms));
    }

    /// Finish the gesture. Fires at most once per touch: too short, too slow
    /// or unmatched ends produce nothing.
    pub fn touch_end(&mut self, pos: Vec2, time_ms: f64) -> Option<Action> {
        let (start_pos, start_time) = self.start.take()?;

        if time_ms - start_time > SWIPE_MAX_TIME_MS {
            return None;
        }

        let delta = pos - start_pos;
        let abs = delta.abs();
        if abs.max_element() < SWIPE_MIN_DISTANCE {
            return None;
        }

        // Dominant axis wins; ties resolve vertically
        if abs.x > abs.y {
            Some(if delta.x > 0.0 {
                Action::Right
            } else {
                Action::Left
            })
        } else {
            Some(if delta.y > 0.0 {
                Action::Down
            } else {
                Action::Up
            })
        }
    }

    /// Drop a touch that was cancelled by the browser
    pub fn cancel(&mut self) {
        self.start = None;
    }
}

/// On-screen bounds of the canvas element (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    /// Map client coordinates into logical canvas pixels, undoing the CSS
    /// scale between the element's rendered size and its backing store.
    pub fn client_to_logical(&self, backing: Vec2, client: Vec2) -> Vec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec2::ZERO;
        }
        let scale = backing / Vec2::new(self.width, self.height);
        (client - Vec2::new(self.left, self.top)) * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn swipe(dx: f32, dy: f32, elapsed: f64) -> Option<Action> {
        let mut swipe = SwipeDetector::new();
        swipe.touch_start(Vec2::new(100.0, 100.0), 1000.0);
        swipe.touch_end(Vec2::new(100.0 + dx, 100.0 + dy), 1000.0 + elapsed)
    }

    #[test]
    fn test_horizontal_swipe() {
        assert_eq!(swipe(40.0, 0.0, 100.0), Some(Action::Right));
        assert_eq!(swipe(-40.0, 0.0, 100.0), Some(Action::Left));
    }

    #[test]
    fn test_vertical_swipe_and_tie() {
        assert_eq!(swipe(0.0, 50.0, 50.0), Some(Action::Down));
        assert_eq!(swipe(10.0, -50.0, 50.0), Some(Action::Up));
        assert_eq!(swipe(40.0, 40.0, 50.0), Some(Action::Down));
    }

    #[test]
    fn test_too_short_or_too_slow() {
        assert_eq!(swipe(29.0, 0.0, 100.0), None);
        assert_eq!(swipe(40.0, 0.0, 301.0), None);
    }

    #[test]
    fn test_end_without_start_and_one_shot() {
        let mut swipe = SwipeDetector::new();
        assert_eq!(swipe.touch_end(Vec2::new(50.0, 0.0), 10.0), None);

        swipe.touch_start(Vec2::ZERO, 0.0);
        assert_eq!(swipe.touch_end(Vec2::new(50.0, 0.0), 10.0), Some(Action::Right));
        assert_eq!(swipe.touch_end(Vec2::new(90.0, 0.0), 20.0), None);
    }

    #[test]
    fn test_cancel_discards_touch() {
        let mut swipe = SwipeDetector::new();
        swipe.touch_start(Vec2::ZERO, 0.0);
        swipe.cancel();
        assert_eq!(swipe.touch_end(Vec2::new(50.0, 0.0), 10.0), None);
    }

    #[test]
    fn test_client_to_logical() {
        // 400x600 canvas drawn at half size, offset by (10, 20)
        let rect = CanvasRect {
            left: 10.0,
            top: 20.0,
            width: 200.0,
            height: 300.0,
        };
        let p = rect.client_to_logical(Vec2::new(400.0, 600.0), Vec2::new(110.0, 170.0));
        assert_eq!(p, Vec2::new(200.0, 300.0));
    }

    proptest! {
        #[test]
        fn prop_short_swipes_never_fire(dx in -29.9f32..29.9, dy in -29.9f32..29.9, t in 0.0f64..300.0) {
            prop_assert_eq!(swipe(dx, dy, t), None);
        }

        #[test]
        fn prop_slow_swipes_never_fire(dx in -500.0f32..500.0, dy in -500.0f32..500.0, t in 300.1f64..5000.0) {
            prop_assert_eq!(swipe(dx, dy, t), None);
        }

        #[test]
        fn prop_horizontal_swipe_matches_sign(dx in 30.0f32..400.0, neg in any::<bool>(), t in 0.0f64..300.0) {
            let dx = if neg { -dx } else { dx };
            let expected = if neg { Action::Left } else { Action::Right };
            prop_assert_eq!(swipe(dx, 0.0, t), Some(expected));
        }
    }
}
