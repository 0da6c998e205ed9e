//! Per-session engine state shared with the running game
//!
//! Games receive `&mut Engine` in every hook and use it for score, level,
//! game-over, sound, randomness, held-input queries and delayed events.

use std::fmt;
use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::scale::DisplayScale;
use super::timers::{TimerTag, Timers};
use crate::audio::{SoundEffect, SoundManager};
use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::EngineError;
use crate::highscores::HighScore;
use crate::input::{Action, ActionSet};
use crate::storage::{KeyValueStore, MemoryStore};

/// Callback receiving a score value
pub type ScoreCallback = Box<dyn FnMut(u64)>;

/// Options consumed when a session is created
pub struct EngineConfig {
    /// Logical pixel size
    pub width: u32,
    pub height: u32,
    /// Key for high-score persistence
    pub game_id: String,
    /// Invoked on every score mutation
    pub on_score_change: Option<ScoreCallback>,
    /// Invoked once per session when the game ends
    pub on_game_over: Option<ScoreCallback>,
    pub sound: Option<Rc<SoundManager>>,
    /// Falls back to an in-memory store
    pub store: Option<Rc<dyn KeyValueStore>>,
    /// RNG seed for the session
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            game_id: "unknown".to_string(),
            on_score_change: None,
            on_game_over: None,
            sound: None,
            store: None,
            seed: 0,
        }
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("game_id", &self.game_id)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl EngineConfig {
    pub fn new(game_id: &str) -> Self {
        Self {
            game_id: game_id.to_string(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_sound(mut self, sound: Rc<SoundManager>) -> Self {
        self.sound = Some(sound);
        self
    }

    pub fn with_store(mut self, store: Rc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn on_score_change(mut self, f: impl FnMut(u64) + 'static) -> Self {
        self.on_score_change = Some(Box::new(f));
        self
    }

    pub fn on_game_over(mut self, f: impl FnMut(u64) + 'static) -> Self {
        self.on_game_over = Some(Box::new(f));
        self
    }
}

/// Engine bookkeeping for one session
pub struct Engine {
    width: u32,
    height: u32,
    score: u64,
    high_score: HighScore,
    level: u32,
    pub(crate) running: bool,
    paused: bool,
    game_over: bool,
    on_score_change: Option<ScoreCallback>,
    on_game_over: Option<ScoreCallback>,
    sound: Option<Rc<SoundManager>>,
    store: Rc<dyn KeyValueStore>,
    rng: Pcg32,
    pub(crate) held: ActionSet,
    pub(crate) timers: Timers,
    display: DisplayScale,
}

impl Engine {
    /// Build engine state from a config. A zero-sized surface is fatal.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let EngineConfig {
            width,
            height,
            game_id,
            on_score_change,
            on_game_over,
            sound,
            store,
            seed,
        } = config;

        if width == 0 || height == 0 {
            return Err(EngineError::InvalidSize { width, height });
        }

        let store: Rc<dyn KeyValueStore> = store.unwrap_or_else(|| Rc::new(MemoryStore::new()));
        let high_score = HighScore::load(store.as_ref(), &game_id);

        Ok(Self {
            width,
            height,
            score: 0,
            high_score,
            level: 1,
            running: false,
            paused: false,
            game_over: false,
            on_score_change,
            on_game_over,
            sound,
            store,
            rng: Pcg32::seed_from_u64(seed),
            held: ActionSet::default(),
            timers: Timers::new(),
            display: DisplayScale::identity(width, height),
        })
    }

    // === Geometry ===

    /// Logical width in pixels
    pub fn width(&self) -> f32 {
        self.width as f32
    }

    /// Logical height in pixels
    pub fn height(&self) -> f32 {
        self.height as f32
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    pub fn display(&self) -> DisplayScale {
        self.display
    }

    /// Recompute the display transform for a container size
    pub fn resize(&mut self, container_w: f32, container_h: f32) -> DisplayScale {
        self.display = DisplayScale::fit(self.width, self.height, container_w, container_h);
        self.display
    }

    // === Flags ===

    pub fn game_id(&self) -> &str {
        &self.high_score.game_id
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Flip the pause flag, returning the new state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    // === Score ===

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.score
    }

    /// Set the score, notify the listener and write through a new high score
    pub fn set_score(&mut self, score: u64) {
        self.score = score;
        if let Some(cb) = self.on_score_change.as_mut() {
            cb(score);
        }
        if self.high_score.record(self.store.as_ref(), score) {
            log::debug!("New high score for {}: {}", self.high_score.game_id, score);
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.set_score(self.score.saturating_add(points));
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
    }

    /// End the session. Only the first call per session has any effect.
    /// Returns true if this call ended it.
    pub fn trigger_game_over(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.game_over = true;
        self.timers.clear();
        log::info!("{} over with score {}", self.high_score.game_id, self.score);
        if let Some(cb) = self.on_game_over.as_mut() {
            cb(self.score);
        }
        true
    }

    // === Services ===

    /// Play a sound effect if a sound manager was injected
    pub fn play(&self, effect: SoundEffect) {
        if let Some(sound) = &self.sound {
            sound.play(effect);
        }
    }

    /// Session RNG (seeded from the config)
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Level-triggered input: is the action held right now
    pub fn is_down(&self, action: Action) -> bool {
        self.held.contains(action)
    }

    /// Deliver `Game::on_timer(tag)` after `delay` seconds of play time
    pub fn schedule(&mut self, delay: f32, tag: TimerTag) {
        self.timers.schedule(delay, tag);
    }

    pub fn cancel_timer(&mut self, tag: TimerTag) {
        self.timers.cancel(tag);
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Reset transient state for a fresh run (score notification is left to
    /// the caller so it can follow `Game::init`)
    pub(crate) fn reset_for_start(&mut self) {
        self.running = true;
        self.game_over = false;
        self.paused = false;
        self.score = 0;
        self.level = 1;
        self.timers.clear();
    }

    /// Notify the score listener of the current score
    pub(crate) fn announce_score(&mut self) {
        if let Some(cb) = self.on_score_change.as_mut() {
            cb(self.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;
    use std::cell::RefCell;

    #[test]
    fn test_defaults() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        assert_eq!(engine.size(), Vec2::new(400.0, 600.0));
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.game_id(), "unknown");
        assert!(!engine.is_running());
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = Engine::new(EngineConfig::default().with_size(0, 600)).err();
        assert!(matches!(
            err,
            Some(EngineError::InvalidSize {
                width: 0,
                height: 600
            })
        ));
    }

    #[test]
    fn test_high_score_loaded_and_written_through() {
        let store = Rc::new(MemoryStore::new());
        store.set("retro_hs_snake", "25").unwrap();
        let mut engine = Engine::new(EngineConfig::new("snake").with_store(store.clone())).unwrap();
        assert_eq!(engine.high_score(), 25);

        engine.add_score(10);
        assert_eq!(store.get("retro_hs_snake").as_deref(), Some("25"));
        engine.add_score(20);
        assert_eq!(engine.high_score(), 30);
        assert_eq!(store.get("retro_hs_snake").as_deref(), Some("30"));
    }

    #[test]
    fn test_game_over_fires_once() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        let mut engine = Engine::new(
            EngineConfig::default().on_game_over(move |s| sink.borrow_mut().push(s)),
        )
        .unwrap();
        engine.add_score(5);

        assert!(engine.trigger_game_over());
        assert!(!engine.trigger_game_over());
        assert_eq!(*calls.borrow(), vec![5]);
        assert_eq!(engine.score(), 5);
        assert_eq!(engine.high_score(), 5);
    }

    #[test]
    fn test_game_over_drops_timers() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.schedule(1.0, 1);
        engine.trigger_game_over();
        assert_eq!(engine.pending_timers(), 0);
    }

    #[test]
    fn test_failed_high_score_write_keeps_playing() {
        use crate::storage::tests::ReadOnlyStore;
        let store = Rc::new(ReadOnlyStore::default());
        let mut engine = Engine::new(EngineConfig::new("pong").with_store(store)).unwrap();
        engine.add_score(3);
        assert_eq!(engine.score(), 3);
        assert_eq!(engine.high_score(), 3);
    }

    #[derive(Debug, Clone)]
    enum ScoreOp {
        Add(u64),
        Set(u64),
    }

    fn score_op() -> impl Strategy<Value = ScoreOp> {
        prop_oneof![
            (0u64..1000).prop_map(ScoreOp::Add),
            (0u64..5000).prop_map(ScoreOp::Set),
        ]
    }

    proptest! {
        #[test]
        fn prop_high_score_is_running_max(prior in 0u64..3000, ops in proptest::collection::vec(score_op(), 0..40)) {
            let store = Rc::new(MemoryStore::new());
            store.set("retro_hs_t", &prior.to_string()).unwrap();
            let mut engine = Engine::new(EngineConfig::new("t").with_store(store.clone())).unwrap();

            let mut max_seen = 0;
            for op in ops {
                match op {
                    ScoreOp::Add(d) => engine.add_score(d),
                    ScoreOp::Set(v) => engine.set_score(v),
                }
                max_seen = max_seen.max(engine.score());
                prop_assert!(engine.high_score() >= prior);
            }

            let persisted = HighScore::load(store.as_ref(), "t").score;
            prop_assert_eq!(persisted, prior.max(max_seen));
            prop_assert_eq!(engine.high_score(), prior.max(max_seen));
        }
    }
}
