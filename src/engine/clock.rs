//! Frame clock: host timestamps in, bounded simulation deltas out

use crate::consts::MAX_FRAME_DT;

/// Converts animation-frame timestamps (ms) into clamped deltas (seconds)
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp; the next tick yields 0
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Delta since the previous tick, in `[0, MAX_FRAME_DT]`
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(5000.0), 0.0);
        let dt = clock.tick(5016.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_tab_stall_is_clamped() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        assert_eq!(clock.tick(30_000.0), MAX_FRAME_DT);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::new();
        clock.tick(1000.0);
        assert_eq!(clock.tick(900.0), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        clock.reset();
        assert_eq!(clock.tick(10_000.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_gaps_over_100ms_clamp_exactly(start in 0.0f64..1e9, gap in 100.5f64..1e7) {
            let mut clock = FrameClock::new();
            clock.tick(start);
            prop_assert_eq!(clock.tick(start + gap), 0.1f32);
        }

        #[test]
        fn prop_dt_never_exceeds_cap(times in proptest::collection::vec(0.0f64..1e6, 1..50)) {
            let mut clock = FrameClock::new();
            for t in times {
                let dt = clock.tick(t);
                prop_assert!((0.0..=MAX_FRAME_DT).contains(&dt));
            }
        }
    }
}
