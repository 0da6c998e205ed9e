//! Delayed events owned by a session
//!
//! Timers run on simulation time and live inside the session that created
//! them. Restarting or stopping the session drops them, so a delayed effect
//! can never land on a different session.

/// Game-defined timer identifier
pub type TimerTag = u32;

#[derive(Debug, Clone, Copy)]
struct Timer {
    remaining: f32,
    tag: TimerTag,
}

/// Pending delayed events
#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `tag` after `delay` seconds of simulation time
    pub fn schedule(&mut self, delay: f32, tag: TimerTag) {
        self.pending.push(Timer {
            remaining: delay.max(0.0),
            tag,
        });
    }

    /// Advance by `dt` and return the tags that came due, most overdue first.
    /// Timers due at the same moment fire in scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerTag> {
        let mut due = Vec::new();
        self.pending.retain_mut(|t| {
            t.remaining -= dt;
            if t.remaining <= 0.0 {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
        due.into_iter().map(|t| t.tag).collect()
    }

    /// Drop every pending timer with this tag
    pub fn cancel(&mut self, tag: TimerTag) {
        self.pending.retain(|t| t.tag != tag);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_when_due() {
        let mut timers = Timers::new();
        timers.schedule(0.5, 7);
        assert!(timers.advance(0.3).is_empty());
        assert_eq!(timers.advance(0.3), vec![7]);
        assert!(timers.advance(1.0).is_empty());
    }

    #[test]
    fn test_order_most_overdue_first() {
        let mut timers = Timers::new();
        timers.schedule(0.09, 2);
        timers.schedule(0.01, 1);
        timers.schedule(0.05, 3);
        timers.schedule(0.05, 4);
        assert_eq!(timers.advance(0.1), vec![1, 3, 4, 2]);
    }

    #[test]
    fn test_cancel_and_clear() {
        let mut timers = Timers::new();
        timers.schedule(0.1, 1);
        timers.schedule(0.1, 2);
        timers.cancel(1);
        assert_eq!(timers.len(), 1);
        timers.clear();
        assert!(timers.is_empty());
        assert!(timers.advance(1.0).is_empty());
    }
}
