//! 2048: slide and merge tiles on a 4x4 board

use rand::Rng;

use crate::audio::SoundEffect;
use crate::engine::{Engine, Game};
use crate::input::InputSignal;
use crate::render::{Surface, palette};

const SIZE: usize = 4;
const MARGIN: f32 = 40.0;
const PADDING: f32 = 10.0;
/// Chance a spawned tile is a 2 rather than a 4
const TWO_CHANCE: f64 = 0.9;

pub(crate) type Board = [[u32; SIZE]; SIZE];

fn tile_color(value: u32) -> &'static str {
    match value {
        0 => palette::GRID,
        2 => "#eee4da",
        4 => "#ede0c8",
        8 => "#f2b179",
        16 => "#f59563",
        32 => "#f67c5f",
        64 => "#f65e3b",
        128 => "#edcf72",
        256 => "#edcc61",
        512 => "#edc850",
        1024 => "#edc53f",
        2048 => "#edc22e",
        _ => "#3c3a32",
    }
}

/// Slide one line toward index 0, merging each tile at most once.
/// Returns the new line and the points from merges.
pub(crate) fn slide_line(line: [u32; SIZE]) -> ([u32; SIZE], u64) {
    let mut out = [0; SIZE];
    let mut points = 0;
    let mut len = 0;
    let mut mergeable = false;
    for value in line.into_iter().filter(|&v| v != 0) {
        if mergeable && out[len - 1] == value {
            out[len - 1] *= 2;
            points += u64::from(out[len - 1]);
            mergeable = false;
        } else {
            out[len] = value;
            len += 1;
            mergeable = true;
        }
    }
    (out, points)
}

/// Apply a move in direction (dx, dy). Returns whether anything moved and
/// the merge points.
pub(crate) fn slide(board: &mut Board, (dx, dy): (i32, i32)) -> (bool, u64) {
    let mut moved = false;
    let mut points = 0;
    for lane in 0..SIZE {
        // Cells of this lane ordered from the edge tiles slide toward
        let cells: [(usize, usize); SIZE] = std::array::from_fn(|k| {
            let far = SIZE - 1 - k;
            match (dx, dy) {
                (1, _) => (far, lane),
                (-1, _) => (k, lane),
                (_, 1) => (lane, far),
                _ => (lane, k),
            }
        });
        let line = cells.map(|(x, y)| board[y][x]);
        let (slid, gained) = slide_line(line);
        if slid != line {
            moved = true;
        }
        points += gained;
        for (&(x, y), value) in cells.iter().zip(slid) {
            board[y][x] = value;
        }
    }
    (moved, points)
}

/// No empty cell and no equal neighbors
pub(crate) fn is_stuck(board: &Board) -> bool {
    (0..SIZE).all(|y| {
        (0..SIZE).all(|x| {
            let v = board[y][x];
            v != 0
                && (x + 1 >= SIZE || board[y][x + 1] != v)
                && (y + 1 >= SIZE || board[y + 1][x] != v)
        })
    })
}

pub struct Game2048 {
    pub(crate) board: Board,
}

impl Game2048 {
    pub fn new() -> Self {
        Self {
            board: [[0; SIZE]; SIZE],
        }
    }

    fn spawn_tile(&mut self, engine: &mut Engine) -> bool {
        let empty: Vec<(usize, usize)> = (0..SIZE)
            .flat_map(|y| (0..SIZE).map(move |x| (x, y)))
            .filter(|&(x, y)| self.board[y][x] == 0)
            .collect();
        if empty.is_empty() {
            return false;
        }
        let rng = engine.rng();
        let (x, y) = empty[rng.random_range(0..empty.len())];
        self.board[y][x] = if rng.random_bool(TWO_CHANCE) { 2 } else { 4 };
        true
    }

    fn cell_size(engine: &Engine) -> f32 {
        (engine.width() - MARGIN) / SIZE as f32
    }
}

impl Default for Game2048 {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Game2048 {
    fn init(&mut self, engine: &mut Engine) {
        self.board = [[0; SIZE]; SIZE];
        self.spawn_tile(engine);
        self.spawn_tile(engine);
    }

    fn update(&mut self, _engine: &mut Engine, _dt: f32) {}

    fn on_input(&mut self, engine: &mut Engine, input: InputSignal) {
        let InputSignal::Press(action) = input else {
            return;
        };
        let Some(dir) = action.direction() else {
            return;
        };

        let (moved, points) = slide(&mut self.board, dir);
        if !moved {
            return;
        }
        if points > 0 {
            engine.add_score(points);
            engine.play(SoundEffect::Score);
        }
        engine.play(SoundEffect::Move);
        self.spawn_tile(engine);
        if is_stuck(&self.board) {
            engine.trigger_game_over();
        }
    }

    fn render(&self, engine: &Engine, surface: &mut dyn Surface) {
        let (w, h) = (engine.width(), engine.height());
        let cell = Self::cell_size(engine);
        let span = SIZE as f32 * cell + (SIZE + 1) as f32 * PADDING;
        let (ox, oy) = ((w - span) / 2.0, (h - span) / 2.0);
        surface.clear(w, h, palette::BACKGROUND);

        for (y, row) in self.board.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                let px = ox + PADDING + x as f32 * (cell + PADDING);
                let py = oy + PADDING + y as f32 * (cell + PADDING);
                surface.pixel_rect(px, py, cell, cell, tile_color(value), Some(palette::LIGHT_GRAY));

                if value > 0 {
                    let color = if value <= 4 { "#776e65" } else { "#f9f6f2" };
                    let size = match value {
                        1000.. => 10.0,
                        100.. => 12.0,
                        _ => 16.0,
                    };
                    surface.text(&value.to_string(), px + cell / 2.0, py + cell / 2.0, size, color);
                }
            }
        }

        if engine.is_game_over() {
            surface.text("GAME OVER", w / 2.0, h / 2.0 - 60.0, 20.0, palette::RED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::input::Action;

    #[test]
    fn test_slide_line_merges_once() {
        assert_eq!(slide_line([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(slide_line([2, 2, 4, 0]), ([4, 4, 0, 0], 4));
        assert_eq!(slide_line([0, 4, 0, 4]), ([8, 0, 0, 0], 8));
        assert_eq!(slide_line([2, 4, 8, 16]), ([2, 4, 8, 16], 0));
        assert_eq!(slide_line([4, 4, 8, 0]), ([8, 8, 0, 0], 8));
    }

    #[test]
    fn test_slide_right_and_down() {
        let mut board = [[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 4]];
        let (moved, points) = slide(&mut board, (1, 0));
        assert!(moved);
        assert_eq!(points, 4);
        assert_eq!(board[0], [0, 0, 0, 4]);

        let (moved, points) = slide(&mut board, (0, 1));
        assert!(moved);
        assert_eq!(points, 8);
        assert_eq!(board[3], [0, 0, 0, 8]);
        assert_eq!(board[0], [0, 0, 0, 0]);
    }

    #[test]
    fn test_blocked_move_reports_no_motion() {
        let mut board = [[2, 0, 0, 0], [4, 0, 0, 0], [0; 4], [0; 4]];
        assert_eq!(slide(&mut board, (-1, 0)), (false, 0));
        assert_eq!(slide(&mut board, (0, -1)), (false, 0));
    }

    #[test]
    fn test_is_stuck() {
        let stuck = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];
        assert!(is_stuck(&stuck));
        let mut open = stuck;
        open[3][3] = 4;
        assert!(!is_stuck(&open));
    }

    #[test]
    fn test_move_spawns_and_scores() {
        let mut engine = Engine::new(EngineConfig::new("2048").with_seed(5)).unwrap();
        let mut game = Game2048::new();
        game.init(&mut engine);
        assert_eq!(game.board.iter().flatten().filter(|&&v| v != 0).count(), 2);

        game.board = [[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]];
        game.on_input(&mut engine, InputSignal::Press(Action::Left));
        assert_eq!(engine.score(), 4);
        assert_eq!(game.board[0][0], 4);
        assert_eq!(game.board.iter().flatten().filter(|&&v| v != 0).count(), 2);
    }

    #[test]
    fn test_filling_last_gap_without_merges_ends_game() {
        let mut engine = Engine::new(EngineConfig::new("2048")).unwrap();
        let mut game = Game2048::new();
        game.init(&mut engine);
        // Sliding right leaves only (0, 0) open; a 2 or a 4 there has no merge
        game.board = [[16, 32, 64, 0], [8, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];
        game.on_input(&mut engine, InputSignal::Press(Action::Right));
        assert!(engine.is_game_over());
    }
}
