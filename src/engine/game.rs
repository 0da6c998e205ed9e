//! The contract every game implements

use glam::Vec2;

use super::state::Engine;
use super::timers::TimerTag;
use crate::input::InputSignal;
use crate::render::Surface;

/// A game rule-set plugged into the engine.
///
/// `init` must set up all game-specific state; the engine makes no
/// assumptions about it and calls it again on every restart.
pub trait Game {
    /// Reset game state for a new run
    fn init(&mut self, engine: &mut Engine);

    /// Advance the simulation by `dt` seconds (never more than `MAX_FRAME_DT`)
    fn update(&mut self, engine: &mut Engine, dt: f32);

    /// Draw the current state. Called every frame, paused or not.
    fn render(&self, engine: &Engine, surface: &mut dyn Surface);

    /// Edge-triggered input
    fn on_input(&mut self, _engine: &mut Engine, _input: InputSignal) {}

    /// Tap or drag position in logical pixels
    fn on_tap(&mut self, _engine: &mut Engine, _pos: Vec2) {}

    /// A timer scheduled through `Engine::schedule` came due
    fn on_timer(&mut self, _engine: &mut Engine, _tag: TimerTag) {}

    /// Release per-session resources when the session is torn down
    fn cleanup(&mut self, _engine: &mut Engine) {}
}
