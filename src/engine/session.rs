//! One running game: engine state, the game itself and the frame loop body

use glam::Vec2;

use super::clock::FrameClock;
use super::state::{Engine, EngineConfig};
use super::game::Game;
use super::scale::DisplayScale;
use crate::error::EngineError;
use crate::input::{ActionSet, InputSignal};
use crate::render::Surface;

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stopped,
}

/// A game instance bound to its engine state
pub struct Session {
    engine: Engine,
    game: Box<dyn Game>,
    clock: FrameClock,
}

impl Session {
    pub fn new(config: EngineConfig, game: Box<dyn Game>) -> Result<Self, EngineError> {
        Ok(Self {
            engine: Engine::new(config)?,
            game,
            clock: FrameClock::new(),
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.engine.running
    }

    /// Reset transient state, initialize the game and begin running.
    /// Also used for retry after game over.
    pub fn start(&mut self) {
        self.engine.reset_for_start();
        self.clock.reset();
        self.game.init(&mut self.engine);
        self.engine.announce_score();
        log::info!("Started {}", self.engine.game_id());
    }

    /// Halt the loop; final state stays readable. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if !self.engine.running {
            return;
        }
        self.engine.running = false;
        self.engine.timers.clear();
        log::info!("Stopped {}", self.engine.game_id());
    }

    /// Stop and let the game release its resources
    pub fn teardown(&mut self) {
        self.stop();
        self.game.cleanup(&mut self.engine);
    }

    /// Suspend or resume simulation; rendering continues either way
    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.engine.toggle_pause();
        log::debug!("{} paused: {}", self.engine.game_id(), paused);
        paused
    }

    pub fn resize(&mut self, container_w: f32, container_h: f32) -> DisplayScale {
        self.engine.resize(container_w, container_h)
    }

    /// Run one frame at host time `now_ms`: due timers and `update` (unless
    /// paused or over), then `render`.
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn Surface) -> FrameStatus {
        if !self.engine.running {
            return FrameStatus::Stopped;
        }

        let dt = self.clock.tick(now_ms);

        if self.simulating() {
            for tag in self.engine.timers.advance(dt) {
                if !self.simulating() {
                    break;
                }
                self.game.on_timer(&mut self.engine, tag);
            }
            if self.simulating() {
                self.game.update(&mut self.engine, dt);
            }
        }

        self.game.render(&self.engine, surface);
        FrameStatus::Continue
    }

    /// Replace the held-action snapshot with the input service's view. Used
    /// when a run starts so edges missed while the game was over do not linger.
    pub fn sync_held(&mut self, held: ActionSet) {
        self.engine.held = held;
    }

    /// Route an input edge to the game. Held state is always tracked;
    /// presses are dropped while paused, everything is dropped once over.
    pub fn handle_input(&mut self, input: InputSignal) {
        match input {
            InputSignal::Press(action) => {
                self.engine.held.insert(action);
            }
            InputSignal::Release(action) => {
                self.engine.held.remove(action);
            }
            InputSignal::ReleaseAny => {}
        }

        if !self.engine.running || self.engine.is_game_over() {
            return;
        }
        if self.engine.is_paused() && matches!(input, InputSignal::Press(_)) {
            return;
        }
        self.game.on_input(&mut self.engine, input);
    }

    /// Route a tap/drag position (logical pixels) to the game
    pub fn handle_tap(&mut self, pos: Vec2) {
        if self.simulating() {
            self.game.on_tap(&mut self.engine, pos);
        }
    }

    fn simulating(&self) -> bool {
        self.engine.running && !self.engine.is_paused() && !self.engine.is_game_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_FRAME_DT;
    use crate::engine::timers::TimerTag;
    use crate::input::Action;
    use crate::render::RecordingSurface;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Trace {
        inits: u32,
        updates: Vec<f32>,
        renders: u32,
        inputs: Vec<InputSignal>,
        taps: Vec<Vec2>,
        timers: Vec<TimerTag>,
        cleanups: u32,
    }

    /// Game that records every hook call and ticks a counter in update
    struct Probe {
        trace: Rc<RefCell<Trace>>,
        ticks: u32,
        end_after: Option<u32>,
    }

    impl Probe {
        fn new() -> (Self, Rc<RefCell<Trace>>) {
            let trace = Rc::new(RefCell::new(Trace::default()));
            (
                Self {
                    trace: trace.clone(),
                    ticks: 0,
                    end_after: None,
                },
                trace,
            )
        }
    }

    impl Game for Probe {
        fn init(&mut self, engine: &mut Engine) {
            self.ticks = 0;
            self.trace.borrow_mut().inits += 1;
            engine.schedule(0.05, 1);
        }

        fn update(&mut self, engine: &mut Engine, dt: f32) {
            self.ticks += 1;
            self.trace.borrow_mut().updates.push(dt);
            if Some(self.ticks) == self.end_after {
                engine.trigger_game_over();
            }
        }

        fn render(&self, _engine: &Engine, surface: &mut dyn Surface) {
            self.trace.borrow_mut().renders += 1;
            surface.text(&self.ticks.to_string(), 0.0, 0.0, 8.0, "#fff");
        }

        fn on_input(&mut self, _engine: &mut Engine, input: InputSignal) {
            self.trace.borrow_mut().inputs.push(input);
        }

        fn on_tap(&mut self, _engine: &mut Engine, pos: Vec2) {
            self.trace.borrow_mut().taps.push(pos);
        }

        fn on_timer(&mut self, _engine: &mut Engine, tag: TimerTag) {
            self.trace.borrow_mut().timers.push(tag);
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.trace.borrow_mut().cleanups += 1;
        }
    }

    fn session(config: EngineConfig) -> (Session, Rc<RefCell<Trace>>) {
        let (probe, trace) = Probe::new();
        (Session::new(config, Box::new(probe)).unwrap(), trace)
    }

    #[test]
    fn test_frame_before_start_is_stopped() {
        let (mut s, trace) = session(EngineConfig::default());
        let mut surface = RecordingSurface::new();
        assert_eq!(s.frame(0.0, &mut surface), FrameStatus::Stopped);
        assert_eq!(trace.borrow().renders, 0);
    }

    #[test]
    fn test_start_score_game_over_round_trip() {
        let scores = Rc::new(RefCell::new(Vec::new()));
        let overs = Rc::new(RefCell::new(Vec::new()));
        let config = {
            let scores = scores.clone();
            let overs = overs.clone();
            EngineConfig::default()
                .with_size(400, 600)
                .on_score_change(move |s| scores.borrow_mut().push(s))
                .on_game_over(move |s| overs.borrow_mut().push(s))
        };
        let (mut s, _) = session(config);
        s.start();
        // start announces the reset score
        assert_eq!(*scores.borrow(), vec![0]);

        for _ in 0..3 {
            s.engine.add_score(10);
        }
        assert_eq!(*scores.borrow(), vec![0, 10, 20, 30]);

        s.engine.trigger_game_over();
        s.engine.trigger_game_over();
        assert_eq!(*overs.borrow(), vec![30]);
    }

    #[test]
    fn test_large_gap_clamps_dt() {
        let (mut s, trace) = session(EngineConfig::default());
        let mut surface = RecordingSurface::new();
        s.start();
        s.frame(1000.0, &mut surface);
        s.frame(1016.0, &mut surface);
        s.frame(61_016.0, &mut surface);

        let updates = &trace.borrow().updates;
        assert_eq!(updates[0], 0.0);
        assert!((updates[1] - 0.016).abs() < 1e-5);
        assert_eq!(updates[2], MAX_FRAME_DT);
    }

    #[test]
    fn test_pause_renders_without_updating() {
        let (mut s, trace) = session(EngineConfig::default());
        let mut surface = RecordingSurface::new();
        s.start();
        s.frame(0.0, &mut surface);
        assert!(s.toggle_pause());

        for i in 1..=5 {
            surface.next_frame();
            s.frame(i as f64 * 16.0, &mut surface);
            // last-known state keeps being drawn
            assert_eq!(surface.texts(), vec!["1"]);
        }
        assert_eq!(trace.borrow().updates.len(), 1);
        assert_eq!(trace.borrow().renders, 6);
        // timers do not run while paused either
        assert!(trace.borrow().timers.is_empty());

        assert!(!s.toggle_pause());
        s.frame(200.0, &mut surface);
        assert_eq!(trace.borrow().updates.len(), 2);
    }

    #[test]
    fn test_no_updates_after_game_over() {
        let (mut probe, trace) = Probe::new();
        probe.end_after = Some(2);
        let mut s = Session::new(EngineConfig::default(), Box::new(probe)).unwrap();
        let mut surface = RecordingSurface::new();
        s.start();
        for i in 0..10 {
            assert_eq!(s.frame(i as f64 * 16.0, &mut surface), FrameStatus::Continue);
        }
        assert_eq!(trace.borrow().updates.len(), 2);
        assert_eq!(trace.borrow().renders, 10);

        // retry resets the session
        s.start();
        assert!(!s.engine().is_game_over());
        s.frame(500.0, &mut surface);
        assert_eq!(trace.borrow().updates.len(), 3);
    }

    #[test]
    fn test_stop_is_idempotent_and_final() {
        let (mut s, trace) = session(EngineConfig::default());
        let mut surface = RecordingSurface::new();
        s.start();
        s.frame(0.0, &mut surface);
        s.engine.add_score(7);
        s.stop();
        s.stop();
        assert_eq!(s.frame(16.0, &mut surface), FrameStatus::Stopped);
        assert_eq!(trace.borrow().renders, 1);
        assert_eq!(s.engine().score(), 7);
    }

    #[test]
    fn test_timers_fire_before_update_and_die_with_restart() {
        let (mut s, trace) = session(EngineConfig::default());
        let mut surface = RecordingSurface::new();
        s.start();
        s.frame(0.0, &mut surface);
        s.frame(60.0, &mut surface);
        assert_eq!(trace.borrow().timers, vec![1]);

        // init schedules a fresh timer; restarting must discard it
        s.start();
        s.engine.schedule(0.01, 99);
        s.start();
        s.frame(1000.0, &mut surface);
        s.frame(1100.0, &mut surface);
        assert_eq!(trace.borrow().timers, vec![1, 1]);
    }

    #[test]
    fn test_input_routing_rules() {
        let (mut s, trace) = session(EngineConfig::default());
        s.start();

        s.handle_input(InputSignal::Press(Action::Left));
        assert!(s.engine().is_down(Action::Left));

        s.toggle_pause();
        s.handle_input(InputSignal::Press(Action::A));
        s.handle_input(InputSignal::Release(Action::Left));
        s.handle_tap(Vec2::new(1.0, 2.0));
        assert!(s.engine().is_down(Action::A));
        assert!(!s.engine().is_down(Action::Left));
        s.toggle_pause();

        s.handle_tap(Vec2::new(3.0, 4.0));
        s.engine.trigger_game_over();
        s.handle_input(InputSignal::Press(Action::B));

        let trace = trace.borrow();
        assert_eq!(
            trace.inputs,
            vec![
                InputSignal::Press(Action::Left),
                InputSignal::Release(Action::Left)
            ]
        );
        assert_eq!(trace.taps, vec![Vec2::new(3.0, 4.0)]);
    }

    #[test]
    fn test_teardown_runs_cleanup() {
        let (mut s, trace) = session(EngineConfig::default());
        s.start();
        s.teardown();
        assert!(!s.is_running());
        assert_eq!(trace.borrow().cleanups, 1);
        assert_eq!(trace.borrow().inits, 1);
    }

    #[test]
    fn test_resize_scaling() {
        let (mut s, _) = session(EngineConfig::default().with_size(400, 600));
        let display = s.resize(800.0, 600.0);
        assert_eq!(display.scale, 1.0);
        assert_eq!((display.backing_width, display.backing_height), (400, 600));
        assert_eq!(s.engine().display(), display);
    }
}
