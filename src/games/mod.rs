//! Game registry
//!
//! Each title is a `Game` implementation plus a descriptor the shell uses to
//! size the canvas, pick on-screen controls and build fresh instances.

pub mod breakout;
pub mod flappy_bird;
pub mod game_2048;
pub mod minesweeper;
pub mod pong;
pub mod simon;
pub mod snake;
pub mod tetris;
pub mod whack_a_mole;

use crate::engine::Game;

/// Which on-screen controls a game wants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlScheme {
    /// D-pad plus A/B buttons
    Dpad,
    /// Swipes on the canvas map to directions
    Swipe,
    /// Taps on the canvas only
    Tap,
}

/// Static description of a registered game
#[derive(Debug, Clone, Copy)]
pub struct GameDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub controls: ControlScheme,
    pub width: u32,
    pub height: u32,
    pub build: fn() -> Box<dyn Game>,
}

/// Registry order drives unlocking: finishing entry N unlocks entry N + 1
pub const REGISTRY: &[GameDescriptor] = &[
    GameDescriptor {
        id: "snake",
        name: "Snake",
        icon: "🐍",
        controls: ControlScheme::Swipe,
        width: 400,
        height: 400,
        build: || Box::new(snake::Snake::new()),
    },
    GameDescriptor {
        id: "tetris",
        name: "Tetris",
        icon: "🟦",
        controls: ControlScheme::Dpad,
        width: 400,
        height: 600,
        build: || Box::new(tetris::Tetris::new()),
    },
    GameDescriptor {
        id: "breakout",
        name: "Breakout",
        icon: "🧱",
        controls: ControlScheme::Dpad,
        width: 400,
        height: 600,
        build: || Box::new(breakout::Breakout::new()),
    },
    GameDescriptor {
        id: "pong",
        name: "Pong",
        icon: "🏓",
        controls: ControlScheme::Dpad,
        width: 400,
        height: 600,
        build: || Box::new(pong::Pong::new()),
    },
    GameDescriptor {
        id: "flappy-bird",
        name: "Flappy Bird",
        icon: "🐦",
        controls: ControlScheme::Tap,
        width: 400,
        height: 600,
        build: || Box::new(flappy_bird::FlappyBird::new()),
    },
    GameDescriptor {
        id: "minesweeper",
        name: "Minesweeper",
        icon: "💣",
        controls: ControlScheme::Tap,
        width: 400,
        height: 600,
        build: || Box::new(minesweeper::Minesweeper::new()),
    },
    GameDescriptor {
        id: "2048",
        name: "2048",
        icon: "🔢",
        controls: ControlScheme::Swipe,
        width: 400,
        height: 600,
        build: || Box::new(game_2048::Game2048::new()),
    },
    GameDescriptor {
        id: "simon",
        name: "Simon Says",
        icon: "🎵",
        controls: ControlScheme::Tap,
        width: 400,
        height: 600,
        build: || Box::new(simon::Simon::new()),
    },
    GameDescriptor {
        id: "whack-a-mole",
        name: "Whack-a-Mole",
        icon: "🔨",
        controls: ControlScheme::Tap,
        width: 400,
        height: 600,
        build: || Box::new(whack_a_mole::WhackAMole::new()),
    },
];

/// Look up a descriptor by registry index
pub fn get(index: usize) -> Option<&'static GameDescriptor> {
    REGISTRY.get(index)
}

/// All registered ids in registry order
pub fn ids() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|g| g.id)
}
