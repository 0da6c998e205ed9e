//! Input normalization
//!
//! Keyboard keys, on-screen buttons and touch gestures all reduce to the same
//! small action vocabulary. DOM listeners live in the browser entry point and
//! feed the types here.

pub mod action;
pub mod gesture;
pub mod keymap;
pub mod manager;

pub use action::{Action, ActionSet, InputSignal};
pub use gesture::{CanvasRect, SwipeDetector};
pub use manager::{InputCallback, InputManager, Subscription};
