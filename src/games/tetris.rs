//! Tetris: falling tetrominoes on a 10x20 well

use glam::Vec2;
use rand::Rng;

use crate::audio::SoundEffect;
use crate::engine::{Engine, Game};
use crate::input::{Action, InputSignal};
use crate::render::{Surface, palette};

const COLS: usize = 10;
const ROWS: usize = 20;
const START_FALL: f32 = 0.5;
const MIN_FALL: f32 = 0.1;
const FALL_SPEEDUP: f32 = 0.02;
/// Time a grounded piece may still slide before it locks
const LOCK_DELAY: f32 = 0.3;
/// Points for clearing 0..=4 lines at once
const LINE_POINTS: [u64; 5] = [0, 100, 300, 500, 800];

type Shape = Vec<Vec<bool>>;
type Row = [Option<&'static str>; COLS];

/// I, O, T, L, J, S, Z
const PIECES: [&[&[u8]]; 7] = [
    &[&[1, 1, 1, 1]],
    &[&[1, 1], &[1, 1]],
    &[&[0, 1, 0], &[1, 1, 1]],
    &[&[1, 0, 0], &[1, 1, 1]],
    &[&[0, 0, 1], &[1, 1, 1]],
    &[&[0, 1, 1], &[1, 1, 0]],
    &[&[1, 1, 0], &[0, 1, 1]],
];

const COLORS: [&str; 7] = [
    palette::CYAN,
    palette::YELLOW,
    palette::MAGENTA,
    palette::ORANGE,
    palette::BLUE,
    palette::GREEN,
    palette::RED,
];

fn shape(index: usize) -> Shape {
    PIECES[index]
        .iter()
        .map(|row| row.iter().map(|&c| c != 0).collect())
        .collect()
}

/// Rotate clockwise
pub(crate) fn rotate(piece: &Shape) -> Shape {
    let rows = piece.len();
    let cols = piece.first().map_or(0, Vec::len);
    (0..cols)
        .map(|c| (0..rows).rev().map(|r| piece[r][c]).collect())
        .collect()
}

pub struct Tetris {
    pub(crate) grid: Vec<Row>,
    pub(crate) piece: Shape,
    piece_color: &'static str,
    pub(crate) piece_x: i32,
    pub(crate) piece_y: i32,
    fall_timer: f32,
    pub(crate) fall_interval: f32,
    lock_timer: f32,
}

impl Tetris {
    pub fn new() -> Self {
        Self {
            grid: vec![[None; COLS]; ROWS],
            piece: shape(0),
            piece_color: COLORS[0],
            piece_x: 0,
            piece_y: 0,
            fall_timer: 0.0,
            fall_interval: START_FALL,
            lock_timer: 0.0,
        }
    }

    fn layout(engine: &Engine) -> (f32, Vec2) {
        let cell = (engine.width() / COLS as f32).min(engine.height() / ROWS as f32);
        let offset = Vec2::new(
            (engine.width() - COLS as f32 * cell) / 2.0,
            (engine.height() - ROWS as f32 * cell) / 2.0,
        );
        (cell, offset)
    }

    fn spawn_piece(&mut self, engine: &mut Engine) {
        let index = engine.rng().random_range(0..PIECES.len());
        self.piece = shape(index);
        self.piece_color = COLORS[index];
        self.piece_x = (COLS / 2) as i32 - (self.piece[0].len() / 2) as i32;
        self.piece_y = 0;
        self.lock_timer = 0.0;

        if self.collides(&self.piece, self.piece_x, self.piece_y) {
            engine.trigger_game_over();
        }
    }

    pub(crate) fn collides(&self, piece: &Shape, x: i32, y: i32) -> bool {
        piece.iter().enumerate().any(|(r, row)| {
            row.iter().enumerate().any(|(c, &filled)| {
                if !filled {
                    return false;
                }
                let gx = x + c as i32;
                let gy = y + r as i32;
                if gx < 0 || gx >= COLS as i32 || gy >= ROWS as i32 {
                    return true;
                }
                gy >= 0 && self.grid[gy as usize][gx as usize].is_some()
            })
        })
    }

    fn grounded(&self) -> bool {
        self.collides(&self.piece, self.piece_x, self.piece_y + 1)
    }

    fn lock_piece(&mut self, engine: &mut Engine) {
        for (r, row) in self.piece.iter().enumerate() {
            for (c, &filled) in row.iter().enumerate() {
                let gy = self.piece_y + r as i32;
                let gx = self.piece_x + c as i32;
                if filled && gy >= 0 {
                    self.grid[gy as usize][gx as usize] = Some(self.piece_color);
                }
            }
        }
        engine.play(SoundEffect::Drop);
        self.clear_lines(engine);
        self.spawn_piece(engine);
    }

    /// Remove full rows, shifting everything above down
    pub(crate) fn clear_lines(&mut self, engine: &mut Engine) -> usize {
        self.grid.retain(|row| row.iter().any(Option::is_none));
        let cleared = ROWS - self.grid.len();
        if cleared == 0 {
            return 0;
        }
        let mut grid = vec![[None; COLS]; cleared];
        grid.append(&mut self.grid);
        self.grid = grid;

        engine.add_score(LINE_POINTS[cleared.min(4)]);
        engine.play(SoundEffect::Clear);
        if self.fall_interval > MIN_FALL {
            self.fall_interval -= FALL_SPEEDUP;
        }
        cleared
    }

    fn shift(&mut self, engine: &mut Engine, dx: i32) {
        if !self.collides(&self.piece, self.piece_x + dx, self.piece_y) {
            self.piece_x += dx;
            engine.play(SoundEffect::Move);
        }
    }
}

impl Default for Tetris {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Tetris {
    fn init(&mut self, engine: &mut Engine) {
        *self = Self::new();
        self.spawn_piece(engine);
    }

    fn update(&mut self, engine: &mut Engine, dt: f32) {
        if self.grounded() {
            self.lock_timer += dt;
            if self.lock_timer > LOCK_DELAY {
                self.fall_timer = 0.0;
                self.lock_piece(engine);
            }
            return;
        }

        self.lock_timer = 0.0;
        self.fall_timer += dt;
        if self.fall_timer >= self.fall_interval {
            self.fall_timer = 0.0;
            self.piece_y += 1;
        }
    }

    fn on_input(&mut self, engine: &mut Engine, input: InputSignal) {
        let InputSignal::Press(action) = input else {
            return;
        };
        match action {
            Action::Left => self.shift(engine, -1),
            Action::Right => self.shift(engine, 1),
            // Soft drop: fall on the next update
            Action::Down => self.fall_timer = self.fall_interval,
            Action::Up | Action::A => {
                let rotated = rotate(&self.piece);
                if !self.collides(&rotated, self.piece_x, self.piece_y) {
                    self.piece = rotated;
                    engine.play(SoundEffect::Blip);
                }
            }
            _ => {}
        }
    }

    fn render(&self, engine: &Engine, surface: &mut dyn Surface) {
        let (cell, offset) = Self::layout(engine);
        let (well_w, well_h) = (COLS as f32 * cell, ROWS as f32 * cell);
        surface.clear(engine.width(), engine.height(), palette::BACKGROUND);
        surface.fill_rect(offset.x, offset.y, well_w, well_h, palette::PANEL);

        for i in 0..=COLS {
            let x = offset.x + i as f32 * cell;
            surface.line(Vec2::new(x, offset.y), Vec2::new(x, offset.y + well_h), palette::GRID, 1.0);
        }
        for i in 0..=ROWS {
            let y = offset.y + i as f32 * cell;
            surface.line(Vec2::new(offset.x, y), Vec2::new(offset.x + well_w, y), palette::GRID, 1.0);
        }

        let mut block = |col: i32, row: i32, color: &str| {
            surface.pixel_rect(
                offset.x + col as f32 * cell + 1.0,
                offset.y + row as f32 * cell + 1.0,
                cell - 2.0,
                cell - 2.0,
                color,
                Some(palette::WHITE),
            );
        };

        for (r, row) in self.grid.iter().enumerate() {
            for (c, color) in row.iter().enumerate() {
                if let Some(color) = color {
                    block(c as i32, r as i32, color);
                }
            }
        }
        for (r, row) in self.piece.iter().enumerate() {
            for (c, &filled) in row.iter().enumerate() {
                if filled {
                    block(self.piece_x + c as i32, self.piece_y + r as i32, self.piece_color);
                }
            }
        }

        if engine.is_game_over() {
            surface.text(
                "GAME OVER",
                engine.width() / 2.0,
                engine.height() / 2.0,
                16.0,
                palette::RED,
            );
        }
    }
}
