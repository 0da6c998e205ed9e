//! The arcade shell: one current session, input routing and progression
//!
//! `Arcade` is what the browser entry point (and the native runner) talk to.
//! It guarantees a single live session: launching a game or returning to the
//! menu stops the previous session, runs its cleanup and detaches its input
//! subscription before anything else happens.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec2;

use crate::audio::{SoundEffect, SoundManager, ToneSink};
use crate::engine::{DisplayScale, EngineConfig, FrameStatus, Game, Session};
use crate::error::EngineError;
use crate::games::{self, ControlScheme, GameDescriptor};
use crate::highscores::{self, HighScore};
use crate::input::{Action, InputManager, InputSignal, Subscription, SwipeDetector};
use crate::progress::Progress;
use crate::render::{Surface, palette};
use crate::settings::Settings;
use crate::storage::KeyValueStore;

/// Edges captured by the input subscription, drained after each host event
type EdgeQueue = Rc<RefCell<VecDeque<(Action, bool)>>>;

/// One row of the game picker
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub index: usize,
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
    pub high_score: u64,
}

/// Header line of the game picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSummary {
    pub unlocked: usize,
    pub total_games: usize,
    pub total_score: u64,
}

struct ActiveGame {
    index: usize,
    session: Session,
    subscription: Subscription,
}

pub struct Arcade {
    input: InputManager,
    sound: Rc<SoundManager>,
    store: Rc<dyn KeyValueStore>,
    settings: Settings,
    progress: Progress,
    swipe: SwipeDetector,
    current: Option<ActiveGame>,
    edges: EdgeQueue,
    /// Latest score reported by the current session (HUD)
    score: Rc<Cell<u64>>,
    /// Final score reported by the game-over callback, not yet handled
    finished: Rc<Cell<Option<u64>>>,
    seed: u64,
    launches: u64,
}

impl Arcade {
    /// Build the shell around a store and an audio backend. Settings and
    /// progress are read from the store.
    pub fn new(store: Rc<dyn KeyValueStore>, sink: Box<dyn ToneSink>, seed: u64) -> Self {
        let settings = Settings::load(store.as_ref());
        let sound = SoundManager::from_settings(sink, &settings);
        let progress = Progress::load(store.as_ref());

        Self {
            input: InputManager::new(),
            sound: Rc::new(sound),
            store,
            settings,
            progress,
            swipe: SwipeDetector::new(),
            current: None,
            edges: Rc::new(RefCell::new(VecDeque::new())),
            score: Rc::new(Cell::new(0)),
            finished: Rc::new(Cell::new(None)),
            seed,
            launches: 0,
        }
    }

    // === Menu ===

    pub fn menu(&self) -> Vec<MenuEntry> {
        games::REGISTRY
            .iter()
            .enumerate()
            .map(|(index, g)| MenuEntry {
                index,
                id: g.id,
                name: g.name,
                icon: g.icon,
                unlocked: self.progress.is_unlocked(g.id, index),
                high_score: HighScore::load(self.store.as_ref(), g.id).score,
            })
            .collect()
    }

    pub fn summary(&self) -> MenuSummary {
        MenuSummary {
            unlocked: self.progress.unlocked_count(games::ids()),
            total_games: games::REGISTRY.len(),
            total_score: highscores::total(self.store.as_ref(), games::ids()),
        }
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        games::get(index).is_some_and(|g| self.progress.is_unlocked(g.id, index))
    }

    // === Session switching ===

    /// Start the game at `index`, replacing any current session
    pub fn launch(&mut self, index: usize) -> Result<&'static GameDescriptor, EngineError> {
        let desc = games::get(index).ok_or(EngineError::UnknownGame(index))?;
        if !self.progress.is_unlocked(desc.id, index) {
            return Err(EngineError::Locked(desc.id.to_string()));
        }
        self.begin(index, desc, (desc.build)())?;
        Ok(desc)
    }

    /// Replace the current session with `game` running under `desc`
    fn begin(
        &mut self,
        index: usize,
        desc: &GameDescriptor,
        game: Box<dyn Game>,
    ) -> Result<(), EngineError> {
        self.teardown();

        let score = self.score.clone();
        let finished = self.finished.clone();
        let config = EngineConfig::new(desc.id)
            .with_size(desc.width, desc.height)
            .with_seed(self.seed.wrapping_add(self.launches))
            .with_sound(self.sound.clone())
            .with_store(self.store.clone())
            .on_score_change(move |s| score.set(s))
            .on_game_over(move |s| finished.set(Some(s)));
        let mut session = Session::new(config, game)?;
        self.launches += 1;

        let edges = self.edges.clone();
        let subscription = self
            .input
            .on_input(move |action, pressed| edges.borrow_mut().push_back((action, pressed)));

        self.sound.play(SoundEffect::Select);
        self.sound.play(SoundEffect::Start);
        session.start();
        session.sync_held(self.input.held());
        self.current = Some(ActiveGame {
            index,
            session,
            subscription,
        });
        Ok(())
    }

    /// Leave the current game
    pub fn back_to_menu(&mut self) {
        if self.current.is_some() {
            self.sound.play(SoundEffect::Blip);
        }
        self.teardown();
    }

    /// Restart the current game from scratch
    pub fn retry(&mut self) {
        self.finished.set(None);
        if let Some(active) = self.current.as_mut() {
            self.sound.play(SoundEffect::Start);
            active.session.start();
            active.session.sync_held(self.input.held());
        }
    }

    fn teardown(&mut self) {
        if let Some(mut active) = self.current.take() {
            active.session.teardown();
            self.input.unsubscribe(active.subscription);
            log::info!("Left {}", active.session.engine().game_id());
        }
        self.edges.borrow_mut().clear();
        self.swipe.cancel();
        self.finished.set(None);
        self.score.set(0);
    }

    pub fn current(&self) -> Option<&'static GameDescriptor> {
        self.current.as_ref().and_then(|a| games::get(a.index))
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref().map(|a| &a.session)
    }

    /// Score of the current session for the HUD
    pub fn score(&self) -> u64 {
        self.score.get()
    }

    // === Frame loop ===

    /// Run one frame of the current session and draw the shell overlays
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn Surface) -> FrameStatus {
        let Some(active) = self.current.as_mut() else {
            return FrameStatus::Stopped;
        };
        let status = active.session.frame(now_ms, surface);
        if status == FrameStatus::Continue {
            draw_overlay(&active.session, surface);
        }
        self.settle();
        status
    }

    pub fn resize(&mut self, container_w: f32, container_h: f32) -> Option<DisplayScale> {
        self.current
            .as_mut()
            .map(|a| a.session.resize(container_w, container_h))
    }

    // === Input ===

    /// Returns true if the key is bound (the host should prevent default)
    pub fn key_down(&mut self, code: &str) -> bool {
        let bound = self.input.key_down(code);
        self.route_edges();
        bound
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        let bound = self.input.key_up(code);
        self.route_edges();
        bound
    }

    pub fn button_press(&mut self, action: Action) {
        self.input.button_press(action);
        self.route_edges();
    }

    pub fn button_release(&mut self, action: Action) {
        self.input.button_release(action);
        self.route_edges();
    }

    pub fn is_down(&self, action: Action) -> bool {
        self.input.is_down(action)
    }

    pub fn touch_start(&mut self, pos: Vec2, time_ms: f64) {
        self.swipe.touch_start(pos, time_ms);
    }

    /// Finish a touch; swipe games receive the direction as a press/release pair
    pub fn touch_end(&mut self, pos: Vec2, time_ms: f64) {
        let Some(action) = self.swipe.touch_end(pos, time_ms) else {
            return;
        };
        let Some(active) = self.current.as_mut() else {
            return;
        };
        if games::get(active.index).map(|g| g.controls) != Some(ControlScheme::Swipe) {
            return;
        }
        active.session.handle_input(InputSignal::Press(action));
        active.session.handle_input(InputSignal::Release(action));
        active.session.handle_input(InputSignal::ReleaseAny);
        self.settle();
    }

    pub fn touch_cancel(&mut self) {
        self.swipe.cancel();
    }

    /// Tap or drag at a logical canvas position
    pub fn tap(&mut self, pos: Vec2) {
        if let Some(active) = self.current.as_mut() {
            active.session.handle_tap(pos);
            self.settle();
        }
    }

    /// Pause a running game (tab hidden, window lost focus). Already paused
    /// or finished games are left alone.
    pub fn pause(&mut self) {
        let Some(active) = self.current.as_mut() else {
            return;
        };
        let engine = active.session.engine();
        if engine.is_running() && !engine.is_paused() && !engine.is_game_over() {
            active.session.toggle_pause();
        }
    }

    /// Deliver queued edges to the current session. Start toggles pause; once
    /// the game is over, A retries and B returns to the menu.
    fn route_edges(&mut self) {
        loop {
            let Some((action, pressed)) = self.edges.borrow_mut().pop_front() else {
                break;
            };
            let Some(active) = self.current.as_mut() else {
                self.edges.borrow_mut().clear();
                break;
            };

            if active.session.engine().is_game_over() {
                if !pressed {
                    // Keeps held state current; the game itself sees nothing
                    active.session.handle_input(InputSignal::Release(action));
                    continue;
                }
                match action {
                    Action::A => self.retry(),
                    Action::B => self.back_to_menu(),
                    _ => {}
                }
                continue;
            }

            match (action, pressed) {
                (Action::Start, true) => {
                    active.session.toggle_pause();
                }
                (_, true) => active.session.handle_input(InputSignal::Press(action)),
                (_, false) => {
                    active.session.handle_input(InputSignal::Release(action));
                    active.session.handle_input(InputSignal::ReleaseAny);
                }
            }
            self.settle();
        }
    }

    /// Handle a game over reported during the last session call
    fn settle(&mut self) {
        let Some(score) = self.finished.take() else {
            return;
        };
        self.sound.play(SoundEffect::GameOver);

        let Some(index) = self.current.as_ref().map(|a| a.index) else {
            return;
        };
        if score == 0 {
            return;
        }
        if let Some(next) = games::get(index + 1) {
            if self.progress.unlock(next.id) {
                self.progress.save(self.store.as_ref());
            }
        }
    }

    // === Settings ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Flip mute and persist it. Returns the new state.
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.sound.toggle_mute();
        self.settings.muted = muted;
        self.settings.save(self.store.as_ref());
        muted
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.settings.set_volume(volume);
        self.sound.set_volume(self.settings.volume);
        self.settings.save(self.store.as_ref());
    }

    /// Unlock audio output; call from the first user gesture
    pub fn warm_up_audio(&self) {
        self.sound.warm_up();
    }
}

/// Pause and game-over panels drawn over the game
fn draw_overlay(session: &Session, surface: &mut dyn Surface) {
    let engine = session.engine();
    let (w, h) = (engine.width(), engine.height());
    let cx = w / 2.0;

    if engine.is_game_over() {
        surface.fill_rect(0.0, h * 0.6, w, 110.0, palette::PANEL);
        surface.text(&format!("SCORE {}", engine.score()), cx, h * 0.6 + 25.0, 12.0, palette::WHITE);
        let best = engine.high_score();
        let (label, color) = if engine.score() > 0 && engine.score() >= best {
            ("NEW HIGH SCORE!".to_string(), palette::YELLOW)
        } else {
            (format!("HI {}", best), palette::LIGHT_GRAY)
        };
        surface.text(&label, cx, h * 0.6 + 50.0, 10.0, color);
        surface.text("A: RETRY   B: MENU", cx, h * 0.6 + 80.0, 8.0, palette::CYAN);
    } else if engine.is_paused() {
        surface.fill_rect(0.0, h / 2.0 - 40.0, w, 80.0, palette::PANEL);
        surface.text("PAUSED", cx, h / 2.0 - 10.0, 20.0, palette::YELLOW);
        surface.text("START TO RESUME", cx, h / 2.0 + 20.0, 8.0, palette::LIGHT_GRAY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tests::recording_sink;
    use crate::audio::{Tone, Waveform};
    use crate::engine::Engine;
    use crate::render::RecordingSurface;
    use crate::storage::MemoryStore;

    type Played = Rc<RefCell<Vec<(Tone, f32)>>>;

    fn arcade() -> (Arcade, Rc<MemoryStore>, Played) {
        let store = Rc::new(MemoryStore::new());
        let (sink, played) = recording_sink();
        (Arcade::new(store.clone(), sink, 1), store, played)
    }

    /// How many times the first voice of `effect` was played
    fn times_played(played: &Played, effect: SoundEffect) -> usize {
        let first = effect.tones()[0];
        played.borrow().iter().filter(|(t, _)| *t == first).count()
    }

    type Signals = Rc<RefCell<Vec<InputSignal>>>;

    /// Records the signals it receives; B ends the run
    struct SignalLog(Signals);

    impl Game for SignalLog {
        fn init(&mut self, _engine: &mut Engine) {}

        fn update(&mut self, _engine: &mut Engine, _dt: f32) {}

        fn render(&self, _engine: &Engine, _surface: &mut dyn Surface) {}

        fn on_input(&mut self, engine: &mut Engine, input: InputSignal) {
            self.0.borrow_mut().push(input);
            if input == InputSignal::Press(Action::B) {
                engine.trigger_game_over();
            }
        }
    }

    /// Run a `SignalLog` under the descriptor at `index`
    fn begin_logged(arcade: &mut Arcade, index: usize) -> Signals {
        let signals = Signals::default();
        let desc = games::get(index).unwrap();
        arcade
            .begin(index, desc, Box::new(SignalLog(signals.clone())))
            .unwrap();
        signals
    }

    fn played_game_over(played: &Played) -> bool {
        played
            .borrow()
            .iter()
            .any(|(t, _)| t.waveform == Waveform::Sawtooth && t.freq == 400.0)
    }

    #[test]
    fn test_menu_locks() {
        let (arcade, _, _) = arcade();
        let menu = arcade.menu();
        assert_eq!(menu.len(), games::REGISTRY.len());
        assert!(menu[..5].iter().all(|e| e.unlocked));
        assert!(menu[5..].iter().all(|e| !e.unlocked));
        assert_eq!(
            arcade.summary(),
            MenuSummary {
                unlocked: 5,
                total_games: games::REGISTRY.len(),
                total_score: 0
            }
        );
    }

    #[test]
    fn test_launch_rejects_locked_and_unknown() {
        let (mut arcade, _, _) = arcade();
        assert!(matches!(arcade.launch(5), Err(EngineError::Locked(id)) if id == "minesweeper"));
        assert!(matches!(arcade.launch(99), Err(EngineError::UnknownGame(99))));
        assert!(arcade.current().is_none());
    }

    #[test]
    fn test_switching_keeps_one_subscription() {
        let (mut arcade, _, _) = arcade();
        arcade.launch(0).unwrap();
        arcade.launch(1).unwrap();
        arcade.launch(2).unwrap();
        assert_eq!(arcade.input.listener_count(), 1);
        assert_eq!(arcade.current().map(|g| g.id), Some("breakout"));

        arcade.back_to_menu();
        assert_eq!(arcade.input.listener_count(), 0);
        assert!(arcade.current().is_none());
        let mut surface = RecordingSurface::new();
        assert_eq!(arcade.frame(0.0, &mut surface), FrameStatus::Stopped);
    }

    #[test]
    fn test_keys_reach_session_and_start_pauses() {
        let (mut arcade, _, _) = arcade();
        arcade.launch(2).unwrap();
        assert!(arcade.key_down("ArrowLeft"));
        assert!(arcade.session().unwrap().engine().is_down(Action::Left));
        assert!(arcade.key_up("ArrowLeft"));
        assert!(!arcade.session().unwrap().engine().is_down(Action::Left));
        assert!(!arcade.key_down("KeyQ"));

        arcade.key_down("KeyP");
        assert!(arcade.session().unwrap().engine().is_paused());
        arcade.key_up("KeyP");
        arcade.key_down("KeyP");
        assert!(!arcade.session().unwrap().engine().is_paused());
    }

    #[test]
    fn test_pause_overlay_drawn() {
        let (mut arcade, _, _) = arcade();
        arcade.launch(1).unwrap();
        arcade.button_press(Action::Start);
        let mut surface = RecordingSurface::new();
        arcade.frame(0.0, &mut surface);
        assert!(surface.has_text("PAUSED"));
    }

    #[test]
    fn test_pause_is_idempotent() {
        let (mut arcade, _, _) = arcade();
        arcade.pause();
        arcade.launch(3).unwrap();
        arcade.pause();
        arcade.pause();
        assert!(arcade.session().unwrap().engine().is_paused());
    }

    #[test]
    fn test_key_release_then_release_any() {
        let (mut arcade, _, _) = arcade();
        let signals = begin_logged(&mut arcade, 2);
        arcade.key_down("ArrowLeft");
        arcade.key_up("ArrowLeft");
        assert_eq!(
            *signals.borrow(),
            vec![
                InputSignal::Press(Action::Left),
                InputSignal::Release(Action::Left),
                InputSignal::ReleaseAny,
            ]
        );
    }

    #[test]
    fn test_swipe_release_then_release_any() {
        let (mut arcade, _, _) = arcade();
        let signals = begin_logged(&mut arcade, 0);
        arcade.touch_start(Vec2::new(100.0, 100.0), 0.0);
        arcade.touch_end(Vec2::new(100.0, 20.0), 100.0);
        assert_eq!(
            *signals.borrow(),
            vec![
                InputSignal::Press(Action::Up),
                InputSignal::Release(Action::Up),
                InputSignal::ReleaseAny,
            ]
        );
    }

    #[test]
    fn test_key_released_during_game_over_not_held_after_retry() {
        let (mut arcade, _, _) = arcade();
        let signals = begin_logged(&mut arcade, 2);
        arcade.key_down("ArrowLeft");
        arcade.key_down("KeyX");
        assert!(arcade.session().unwrap().engine().is_game_over());

        arcade.key_up("ArrowLeft");
        arcade.key_up("KeyX");
        assert!(!arcade.session().unwrap().engine().is_down(Action::Left));

        arcade.key_down("Space");
        let engine = arcade.session().unwrap().engine();
        assert!(!engine.is_game_over());
        assert!(!engine.is_down(Action::Left));
        assert!(engine.is_down(Action::A));
        // Nothing after the game-over press reached the game
        assert_eq!(
            *signals.borrow(),
            vec![InputSignal::Press(Action::Left), InputSignal::Press(Action::B)]
        );
    }

    #[test]
    fn test_launch_picks_up_held_keys() {
        let (mut arcade, _, _) = arcade();
        arcade.key_down("ArrowLeft");
        arcade.launch(2).unwrap();
        assert!(arcade.session().unwrap().engine().is_down(Action::Left));
    }

    #[test]
    fn test_start_sound_on_launch_and_retry() {
        let (mut arcade, _, played) = arcade();
        begin_logged(&mut arcade, 2);
        assert_eq!(times_played(&played, SoundEffect::Start), 1);
        arcade.key_down("KeyX");
        arcade.key_down("Space");
        assert_eq!(times_played(&played, SoundEffect::Start), 2);
    }

    #[test]
    fn test_swipe_leaves_nothing_held() {
        let (mut arcade, _, _) = arcade();
        arcade.launch(0).unwrap();
        arcade.touch_start(Vec2::new(100.0, 100.0), 0.0);
        arcade.touch_end(Vec2::new(100.0, 20.0), 100.0);
        // Delivered as a press/release pair, so nothing stays held
        assert!(!arcade.session().unwrap().engine().is_down(Action::Up));
    }

    #[test]
    fn test_snake_game_over_flow() {
        let (mut arcade, _, played) = arcade();
        arcade.launch(0).unwrap();
        let mut surface = RecordingSurface::new();
        let mut t = 0.0;
        while !arcade.session().unwrap().engine().is_game_over() {
            surface.next_frame();
            arcade.frame(t, &mut surface);
            t += 100.0;
            assert!(t < 1e6, "snake never hit the wall");
        }
        assert!(played_game_over(&played));
        surface.next_frame();
        arcade.frame(t, &mut surface);
        assert!(surface.has_text("A: RETRY   B: MENU"));

        // Direction keys are ignored now; A retries
        arcade.key_down("ArrowUp");
        arcade.key_down("Space");
        let engine = arcade.session().unwrap().engine();
        assert!(!engine.is_game_over());
        assert_eq!(engine.score(), 0);
        assert_eq!(arcade.score(), 0);
    }

    #[test]
    fn test_b_after_game_over_returns_to_menu() {
        let (mut arcade, _, _) = arcade();
        arcade.launch(4).unwrap();
        let mut surface = RecordingSurface::new();
        let mut t = 0.0;
        arcade.tap(Vec2::new(200.0, 300.0));
        while !arcade.session().unwrap().engine().is_game_over() {
            arcade.frame(t, &mut surface);
            t += 100.0;
        }
        arcade.key_down("KeyX");
        assert!(arcade.current().is_none());
    }

    #[test]
    fn test_positive_score_unlocks_next() {
        let (mut arcade, store, played) = arcade();
        arcade.launch(4).unwrap();
        arcade.finished.set(Some(10));
        arcade.settle();
        assert!(played_game_over(&played));
        assert!(arcade.is_unlocked(5));
        assert_eq!(
            store.get("retro_progress").as_deref(),
            Some(r#"{"minesweeper":{"unlocked":true}}"#)
        );

        // Unlocks survive a reload
        let (sink, _) = recording_sink();
        let reloaded = Arcade::new(store.clone(), sink, 2);
        assert!(reloaded.is_unlocked(5));
        assert_eq!(reloaded.summary().unlocked, 6);
    }

    #[test]
    fn test_zero_score_unlocks_nothing() {
        let (mut arcade, store, _) = arcade();
        arcade.launch(4).unwrap();
        arcade.finished.set(Some(0));
        arcade.settle();
        assert!(!arcade.is_unlocked(5));
        assert!(store.get("retro_progress").is_none());
    }

    #[test]
    fn test_mute_persists() {
        let (mut arcade, store, played) = arcade();
        assert!(arcade.toggle_mute());
        assert_eq!(store.get("retro_muted").as_deref(), Some("true"));
        arcade.launch(0).unwrap();
        assert!(played.borrow().is_empty());

        let (sink, _) = recording_sink();
        let reloaded = Arcade::new(store.clone(), sink, 2);
        assert!(reloaded.settings().muted);
    }
}
