//! Game lifecycle engine
//!
//! Every game plugs into the same contract:
//! - `Game`: the hooks a rule-set implements
//! - `Engine`: score, level, flags and services handed to those hooks
//! - `Session`: one engine + one game, driven one frame at a time by the host
//!
//! The host owns scheduling (requestAnimationFrame on the web, a plain loop
//! natively) and calls `Session::frame` until it reports `Stopped`.

pub mod clock;
pub mod game;
pub mod scale;
pub mod session;
pub mod state;
pub mod timers;

pub use clock::FrameClock;
pub use game::Game;
pub use scale::DisplayScale;
pub use session::{FrameStatus, Session};
pub use state::{Engine, EngineConfig, ScoreCallback};
pub use timers::{TimerTag, Timers};
