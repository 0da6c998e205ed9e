//! Retro Arcade - a collection of canvas mini-games on one shared engine
//!
//! Core modules:
//! - `engine`: Game lifecycle contract, frame clock and session bookkeeping
//! - `input`: Keyboard/button/swipe/tap normalization into abstract actions
//! - `audio`: Procedural sound effects (Web Audio on the browser build)
//! - `render`: Drawing surface abstraction shared by every game
//! - `storage`, `highscores`, `settings`, `progress`: LocalStorage-backed state
//! - `games`: The game registry and the individual rule-sets
//! - `arcade`: Session switching and input routing for the shell

pub mod arcade;
pub mod audio;
pub mod engine;
pub mod error;
pub mod games;
pub mod highscores;
pub mod input;
pub mod progress;
pub mod render;
pub mod settings;
pub mod storage;

pub use arcade::Arcade;
pub use audio::{SoundEffect, SoundManager};
pub use engine::{Engine, EngineConfig, Game, Session};
pub use error::{AudioError, EngineError, StorageError};
pub use input::{Action, InputManager, InputSignal};
pub use settings::Settings;

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Default logical canvas size
    pub const DEFAULT_WIDTH: u32 = 400;
    pub const DEFAULT_HEIGHT: u32 = 600;

    /// Upper bound on a single frame's delta (seconds). Keeps a stalled tab
    /// from advancing physics by seconds in one step.
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Swipe recognition thresholds
    pub const SWIPE_MIN_DISTANCE: f32 = 30.0;
    pub const SWIPE_MAX_TIME_MS: f64 = 300.0;

    /// Registry entries playable without unlocking
    pub const ALWAYS_UNLOCKED: usize = 5;
}

/// Axis-aligned rectangle overlap test (x, y, w, h)
#[inline]
pub fn rects_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x + a_size.x >= b_pos.x
        && a_pos.x <= b_pos.x + b_size.x
        && a_pos.y + a_size.y >= b_pos.y
        && a_pos.y <= b_pos.y + b_size.y
}

/// Point-in-rectangle test, edges inclusive
#[inline]
pub fn point_in_rect(p: Vec2, pos: Vec2, size: Vec2) -> bool {
    p.x >= pos.x && p.x <= pos.x + size.x && p.y >= pos.y && p.y <= pos.y + size.y
}
