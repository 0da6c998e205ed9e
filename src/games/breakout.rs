//! Breakout: paddle, ball and a wall of bricks

use glam::Vec2;

use crate::audio::SoundEffect;
use crate::engine::{Engine, Game};
use crate::input::{Action, InputSignal};
use crate::render::{Surface, palette};
use crate::rects_overlap;

const PADDLE_SIZE: Vec2 = Vec2::new(80.0, 12.0);
const PADDLE_SPEED: f32 = 350.0;
const BALL_SIZE: f32 = 8.0;
const BALL_START_VEL: Vec2 = Vec2::new(200.0, -200.0);
/// Horizontal speed added per unit of off-center paddle hit
const PADDLE_ENGLISH: f32 = 200.0;
const BRICK_ROWS: usize = 5;
const BRICK_COLS: usize = 8;
const BRICK_HEIGHT: f32 = 20.0;
const BRICK_GAP: f32 = 4.0;
const BRICK_TOP: f32 = 40.0;
const BRICK_POINTS: u64 = 10;
const CLEAR_BONUS: u64 = 500;

const ROW_COLORS: [&str; 5] = [
    palette::RED,
    palette::ORANGE,
    palette::YELLOW,
    palette::GREEN,
    palette::CYAN,
];

#[derive(Debug, Clone, Copy)]
pub(crate) struct Brick {
    pub(crate) pos: Vec2,
    pub(crate) size: Vec2,
    color: &'static str,
    pub(crate) alive: bool,
}

pub struct Breakout {
    pub(crate) paddle: Vec2,
    pub(crate) ball: Vec2,
    pub(crate) ball_vel: Vec2,
    pub(crate) launched: bool,
    pub(crate) bricks: Vec<Brick>,
}

impl Breakout {
    pub fn new() -> Self {
        Self {
            paddle: Vec2::ZERO,
            ball: Vec2::ZERO,
            ball_vel: BALL_START_VEL,
            launched: false,
            bricks: Vec::new(),
        }
    }

    fn cleared(&self) -> bool {
        self.bricks.iter().all(|b| !b.alive)
    }

    fn move_paddle(&mut self, engine: &Engine, dt: f32) {
        if engine.is_down(Action::Left) {
            self.paddle.x -= PADDLE_SPEED * dt;
        }
        if engine.is_down(Action::Right) {
            self.paddle.x += PADDLE_SPEED * dt;
        }
        self.paddle.x = self.paddle.x.clamp(0.0, engine.width() - PADDLE_SIZE.x);
    }

    fn bounce_walls(&mut self, engine: &Engine) {
        let max_x = engine.width() - BALL_SIZE;
        if self.ball.x <= 0.0 || self.ball.x >= max_x {
            self.ball_vel.x = -self.ball_vel.x;
            self.ball.x = self.ball.x.clamp(0.0, max_x);
            engine.play(SoundEffect::Blip);
        }
        if self.ball.y <= 0.0 {
            self.ball_vel.y = -self.ball_vel.y;
            self.ball.y = 0.0;
            engine.play(SoundEffect::Blip);
        }
    }

    fn hit_paddle(&mut self, engine: &Engine) {
        if rects_overlap(self.ball, Vec2::splat(BALL_SIZE), self.paddle, PADDLE_SIZE) {
            self.ball_vel.y = -self.ball_vel.y.abs();
            let hit = (self.ball.x - self.paddle.x) / PADDLE_SIZE.x - 0.5;
            self.ball_vel.x += hit * PADDLE_ENGLISH;
            engine.play(SoundEffect::Hit);
        }
    }

    /// At most one brick breaks per frame
    fn hit_bricks(&mut self, engine: &mut Engine) {
        let ball = self.ball;
        let hit = self
            .bricks
            .iter_mut()
            .find(|b| b.alive && rects_overlap(ball, Vec2::splat(BALL_SIZE), b.pos, b.size));
        if let Some(brick) = hit {
            brick.alive = false;
            self.ball_vel.y = -self.ball_vel.y;
            engine.add_score(BRICK_POINTS);
            engine.play(SoundEffect::Score);
        }
    }
}

impl Default for Breakout {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Breakout {
    fn init(&mut self, engine: &mut Engine) {
        let (w, h) = (engine.width(), engine.height());
        self.paddle = Vec2::new((w - PADDLE_SIZE.x) / 2.0, h - 40.0);
        self.ball = Vec2::new(w / 2.0, self.paddle.y - 20.0);
        self.ball_vel = BALL_START_VEL;
        self.launched = false;

        let brick_w = w / BRICK_COLS as f32 - BRICK_GAP;
        self.bricks = (0..BRICK_ROWS)
            .flat_map(|row| (0..BRICK_COLS).map(move |col| (row, col)))
            .map(|(row, col)| Brick {
                pos: Vec2::new(
                    col as f32 * (brick_w + BRICK_GAP) + BRICK_GAP / 2.0,
                    row as f32 * (BRICK_HEIGHT + BRICK_GAP) + BRICK_TOP,
                ),
                size: Vec2::new(brick_w, BRICK_HEIGHT),
                color: ROW_COLORS[row % ROW_COLORS.len()],
                alive: true,
            })
            .collect();
    }

    fn update(&mut self, engine: &mut Engine, dt: f32) {
        self.move_paddle(engine, dt);

        if !self.launched {
            self.ball.x = self.paddle.x + PADDLE_SIZE.x / 2.0;
            return;
        }

        self.ball += self.ball_vel * dt;
        self.bounce_walls(engine);
        self.hit_paddle(engine);
        self.hit_bricks(engine);

        if self.cleared() {
            engine.add_score(CLEAR_BONUS);
            engine.play(SoundEffect::Win);
            engine.trigger_game_over();
        } else if self.ball.y > engine.height() {
            engine.trigger_game_over();
        }
    }

    fn on_input(&mut self, engine: &mut Engine, input: InputSignal) {
        if input == InputSignal::Press(Action::A) && !self.launched {
            self.launched = true;
            engine.play(SoundEffect::Blip);
        }
    }

    fn render(&self, engine: &Engine, surface: &mut dyn Surface) {
        let (w, h) = (engine.width(), engine.height());
        surface.clear(w, h, palette::BACKGROUND);

        for brick in self.bricks.iter().filter(|b| b.alive) {
            surface.pixel_rect(
                brick.pos.x,
                brick.pos.y,
                brick.size.x,
                brick.size.y,
                brick.color,
                Some(palette::WHITE),
            );
        }

        surface.pixel_rect(
            self.paddle.x,
            self.paddle.y,
            PADDLE_SIZE.x,
            PADDLE_SIZE.y,
            palette::CYAN,
            Some(palette::WHITE),
        );
        surface.fill_rect(self.ball.x, self.ball.y, BALL_SIZE, BALL_SIZE, palette::MAGENTA);

        if !self.launched {
            surface.text("PRESS A TO LAUNCH", w / 2.0, h - 80.0, 8.0, palette::YELLOW);
        }
        if engine.is_game_over() {
            let msg = if self.cleared() { "YOU WIN!" } else { "GAME OVER" };
            surface.text(msg, w / 2.0, h / 2.0, 20.0, palette::GREEN);
        }
    }
}
