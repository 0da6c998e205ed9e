//! Minesweeper on a 10x12 board with 15 mines

use glam::{IVec2, Vec2};
use rand::Rng;

use crate::audio::SoundEffect;
use crate::engine::{Engine, Game};
use crate::input::{Action, InputSignal};
use crate::render::{Surface, TextAlign, TextStyle, palette};

const COLS: i32 = 10;
const ROWS: i32 = 12;
const MINES: usize = 15;
const REVEAL_POINTS: u64 = 10;
const CLEAR_BONUS: u64 = 500;

const NUMBER_COLORS: [&str; 6] = [
    palette::WHITE,
    palette::CYAN,
    palette::GREEN,
    palette::YELLOW,
    palette::ORANGE,
    palette::RED,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) mine: bool,
    pub(crate) revealed: bool,
    pub(crate) flagged: bool,
    pub(crate) neighbors: u8,
}

pub struct Minesweeper {
    /// Row-major
    pub(crate) cells: Vec<Cell>,
    /// Taps place flags instead of revealing
    pub(crate) flag_mode: bool,
}

impl Minesweeper {
    pub fn new() -> Self {
        Self {
            cells: vec![Cell::default(); (COLS * ROWS) as usize],
            flag_mode: false,
        }
    }

    fn index(pos: IVec2) -> Option<usize> {
        let inside = (0..COLS).contains(&pos.x) && (0..ROWS).contains(&pos.y);
        inside.then(|| (pos.y * COLS + pos.x) as usize)
    }

    fn position(index: usize) -> IVec2 {
        IVec2::new(index as i32 % COLS, index as i32 / COLS)
    }

    fn neighbors(pos: IVec2) -> impl Iterator<Item = usize> {
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| IVec2::new(dx, dy)))
            .filter(|d| *d != IVec2::ZERO)
            .filter_map(move |d| Self::index(pos + d))
    }

    fn cell_size(engine: &Engine) -> f32 {
        engine.width() / COLS as f32
    }

    /// Place mines and recount neighbors
    pub(crate) fn place_mines(&mut self, mines: &[usize]) {
        self.cells = vec![Cell::default(); (COLS * ROWS) as usize];
        for &i in mines {
            self.cells[i].mine = true;
        }
        for i in 0..self.cells.len() {
            let count = Self::neighbors(Self::position(i))
                .filter(|&n| self.cells[n].mine)
                .count();
            self.cells[i].neighbors = count as u8;
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.cells.iter().filter(|c| !c.revealed && !c.mine).count()
    }

    /// Reveal a safe cell, flooding outward through cells with no
    /// neighboring mines
    fn reveal(&mut self, engine: &mut Engine, start: usize) {
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            let cell = &mut self.cells[i];
            if cell.revealed || cell.mine {
                continue;
            }
            cell.revealed = true;
            cell.flagged = false;
            engine.add_score(REVEAL_POINTS);
            if cell.neighbors == 0 {
                stack.extend(Self::neighbors(Self::position(i)));
            }
        }
    }

    pub(crate) fn open(&mut self, engine: &mut Engine, pos: IVec2) {
        let Some(i) = Self::index(pos) else {
            return;
        };
        let cell = self.cells[i];
        if cell.revealed {
            return;
        }

        if self.flag_mode {
            self.cells[i].flagged = !cell.flagged;
            engine.play(SoundEffect::Click);
            return;
        }
        if cell.flagged {
            return;
        }

        if cell.mine {
            self.cells[i].revealed = true;
            engine.play(SoundEffect::Die);
            engine.trigger_game_over();
            return;
        }

        self.reveal(engine, i);
        engine.play(SoundEffect::Blip);

        if self.remaining() == 0 {
            engine.add_score(CLEAR_BONUS);
            engine.play(SoundEffect::Win);
            engine.trigger_game_over();
        }
    }
}

impl Default for Minesweeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Minesweeper {
    fn init(&mut self, engine: &mut Engine) {
        let total = (COLS * ROWS) as usize;
        let mut mines = Vec::with_capacity(MINES);
        while mines.len() < MINES {
            let i = engine.rng().random_range(0..total);
            if !mines.contains(&i) {
                mines.push(i);
            }
        }
        self.place_mines(&mines);
        self.flag_mode = false;
    }

    fn update(&mut self, _engine: &mut Engine, _dt: f32) {}

    fn on_input(&mut self, engine: &mut Engine, input: InputSignal) {
        if input == InputSignal::Press(Action::B) {
            self.flag_mode = !self.flag_mode;
            engine.play(SoundEffect::Select);
        }
    }

    fn on_tap(&mut self, engine: &mut Engine, pos: Vec2) {
        let cell = Self::cell_size(engine);
        let grid = (pos / cell).floor().as_ivec2();
        self.open(engine, grid);
    }

    fn render(&self, engine: &Engine, surface: &mut dyn Surface) {
        let (w, h) = (engine.width(), engine.height());
        let size = Self::cell_size(engine);
        surface.clear(w, h, palette::BACKGROUND);

        let over = engine.is_game_over();
        for (i, cell) in self.cells.iter().enumerate() {
            let p = Self::position(i).as_vec2() * size;
            let (x, y, inner) = (p.x + 1.0, p.y + 1.0, size - 2.0);

            if cell.mine && (cell.revealed || over) {
                surface.pixel_rect(x, y, inner, inner, palette::RED, Some(palette::MAGENTA));
            } else if cell.revealed {
                surface.fill_rect(x, y, inner, inner, palette::GRID);
                if cell.neighbors > 0 {
                    let color = NUMBER_COLORS
                        .get(cell.neighbors as usize)
                        .copied()
                        .unwrap_or(palette::WHITE);
                    surface.text(&cell.neighbors.to_string(), p.x + size / 2.0, p.y + size / 2.0, 10.0, color);
                }
            } else {
                surface.pixel_rect(x, y, inner, inner, palette::BLUE, Some(palette::CYAN));
                if cell.flagged {
                    surface.text("F", p.x + size / 2.0, p.y + size / 2.0, 10.0, palette::YELLOW);
                }
            }
            surface.stroke_rect(p.x, p.y, size, size, palette::BACKGROUND, 1.0);
        }

        let status_y = ROWS as f32 * size + 20.0;
        let mode = if self.flag_mode { "B: FLAG MODE" } else { "B: DIG MODE" };
        surface.fill_text(
            mode,
            10.0,
            status_y,
            &TextStyle::retro(8.0, palette::LIGHT_GRAY).aligned(TextAlign::Left),
        );

        if over {
            let msg = if self.remaining() == 0 { "YOU WIN!" } else { "GAME OVER" };
            surface.text(msg, w / 2.0, h / 2.0 - 40.0, 16.0, palette::RED);
        }
    }
}
