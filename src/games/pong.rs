//! Pong: player paddle at the bottom against a deliberately beatable AI

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use crate::audio::SoundEffect;
use crate::engine::{Engine, Game};
use crate::input::{Action, InputSignal};
use crate::render::{Surface, TextAlign, TextStyle, palette};

const PADDLE_SIZE: Vec2 = Vec2::new(60.0, 10.0);
const PADDLE_SPEED: f32 = 300.0;
/// Drag-follow moves faster than the buttons
const DRAG_FACTOR: f32 = 1.5;
const DRAG_DEAD_ZONE: f32 = 5.0;
const BALL_SIZE: f32 = 8.0;
const BALL_BASE_SPEED: f32 = 180.0;
const BALL_LEVEL_SPEED: f32 = 15.0;
const BALL_MAX_SPEED: f32 = 500.0;
const RALLY_SPEEDUP: f32 = 1.02;
const MAX_LIVES: u32 = 3;
const POINTS_PER_LEVEL: u64 = 5;

// AI tuning
const AI_Y: f32 = 25.0;
const AI_BASE_SPEED: f32 = 100.0;
const AI_LEVEL_SPEED: f32 = 8.0;
const AI_RETARGET_INTERVAL: f32 = 0.4;
const AI_ERROR_MARGIN: f32 = 30.0;
const AI_IDLE_DRIFT: f32 = 60.0;
const AI_DEAD_ZONE: f32 = 25.0;
const AI_MOVE_CHANCE: f64 = 0.7;

pub struct Pong {
    pub(crate) player_x: f32,
    pub(crate) ai_x: f32,
    ai_target_x: f32,
    ai_timer: f32,
    pub(crate) ball: Vec2,
    pub(crate) ball_vel: Vec2,
    pub(crate) lives: u32,
    /// -1, 0 or 1 from the direction buttons
    move_dir: f32,
    /// Drag target from taps
    pub(crate) target_x: Option<f32>,
}

impl Pong {
    pub fn new() -> Self {
        Self {
            player_x: 0.0,
            ai_x: 0.0,
            ai_target_x: 0.0,
            ai_timer: 0.0,
            ball: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            lives: MAX_LIVES,
            move_dir: 0.0,
            target_x: None,
        }
    }

    fn player_y(engine: &Engine) -> f32 {
        engine.height() - 40.0
    }

    /// Serve from the center within ±30° of straight up
    fn reset_ball(&mut self, engine: &mut Engine) {
        self.ball = engine.size() / 2.0;
        let angle = engine.rng().random_range(-PI / 6.0..PI / 6.0);
        let speed = BALL_BASE_SPEED + (engine.level() - 1) as f32 * BALL_LEVEL_SPEED;
        self.ball_vel = Vec2::new(angle.sin(), -angle.cos()) * speed;
        self.ai_target_x = engine.width() / 2.0;
        self.ai_timer = 0.0;
    }

    fn move_player(&mut self, engine: &Engine, dt: f32) {
        if let Some(target) = self.target_x {
            let diff = target - (self.player_x + PADDLE_SIZE.x / 2.0);
            if diff.abs() > DRAG_DEAD_ZONE {
                self.player_x += diff.signum() * PADDLE_SPEED * dt * DRAG_FACTOR;
            }
        } else {
            self.player_x += self.move_dir * PADDLE_SPEED * dt;
        }
        self.player_x = self.player_x.clamp(0.0, engine.width() - PADDLE_SIZE.x);
    }

    /// The AI re-aims periodically with noise and sometimes hesitates
    fn move_ai(&mut self, engine: &mut Engine, dt: f32) {
        self.ai_timer += dt;
        if self.ai_timer >= AI_RETARGET_INTERVAL {
            self.ai_timer = 0.0;
            let noise = engine.rng().random::<f32>() - 0.5;
            self.ai_target_x = if self.ball_vel.y < 0.0 {
                self.ball.x + noise * AI_ERROR_MARGIN * 2.0
            } else {
                engine.width() / 2.0 + noise * AI_IDLE_DRIFT
            };
        }

        let diff = self.ai_target_x - (self.ai_x + PADDLE_SIZE.x / 2.0);
        let speed = AI_BASE_SPEED + (engine.level() - 1) as f32 * AI_LEVEL_SPEED;
        if diff.abs() > AI_DEAD_ZONE && engine.rng().random_bool(AI_MOVE_CHANCE) {
            self.ai_x += diff.signum() * speed * dt;
        }
        self.ai_x = self.ai_x.clamp(0.0, engine.width() - PADDLE_SIZE.x);
    }

    /// Deflection angle from where the ball met the paddle, ±30°
    fn deflect(&self, paddle_x: f32, speed: f32) -> Vec2 {
        let hit = (self.ball.x + BALL_SIZE / 2.0 - paddle_x) / PADDLE_SIZE.x;
        let angle = (hit - 0.5) * PI / 3.0;
        Vec2::new(angle.sin(), angle.cos()) * speed
    }

    fn collide_paddles(&mut self, engine: &Engine) {
        let player_y = Self::player_y(engine);
        let spans = |x: f32, b: Vec2| b.x + BALL_SIZE >= x && b.x <= x + PADDLE_SIZE.x;

        if self.ball_vel.y > 0.0
            && self.ball.y + BALL_SIZE >= player_y
            && self.ball.y + BALL_SIZE <= player_y + PADDLE_SIZE.y + 5.0
            && spans(self.player_x, self.ball)
        {
            let speed = (self.ball_vel.length() * RALLY_SPEEDUP).min(BALL_MAX_SPEED);
            let v = self.deflect(self.player_x, speed);
            self.ball_vel = Vec2::new(v.x, -v.y);
            self.ball.y = player_y - BALL_SIZE;
            engine.play(SoundEffect::Hit);
        }

        if self.ball_vel.y < 0.0
            && self.ball.y <= AI_Y + PADDLE_SIZE.y
            && self.ball.y >= AI_Y - 5.0
            && spans(self.ai_x, self.ball)
        {
            self.ball_vel = self.deflect(self.ai_x, self.ball_vel.length());
            self.ball.y = AI_Y + PADDLE_SIZE.y;
        }
    }
}

impl Default for Pong {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Pong {
    fn init(&mut self, engine: &mut Engine) {
        *self = Self::new();
        self.player_x = (engine.width() - PADDLE_SIZE.x) / 2.0;
        self.ai_x = self.player_x;
        self.reset_ball(engine);
    }

    fn update(&mut self, engine: &mut Engine, dt: f32) {
        self.move_player(engine, dt);
        self.move_ai(engine, dt);

        self.ball += self.ball_vel * dt;

        let max_x = engine.width() - BALL_SIZE;
        if self.ball.x <= 0.0 || self.ball.x >= max_x {
            engine.play(SoundEffect::Blip);
            self.ball_vel.x = -self.ball_vel.x;
            self.ball.x = self.ball.x.clamp(0.0, max_x);
        }

        self.collide_paddles(engine);

        if self.ball.y > engine.height() {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                engine.trigger_game_over();
                return;
            }
            engine.play(SoundEffect::Die);
            self.reset_ball(engine);
        } else if self.ball.y < 0.0 {
            engine.play(SoundEffect::Score);
            engine.add_score(1);
            if engine.score() % POINTS_PER_LEVEL == 0 {
                engine.set_level(engine.level() + 1);
            }
            self.reset_ball(engine);
        }
    }

    fn on_input(&mut self, _engine: &mut Engine, input: InputSignal) {
        match input {
            InputSignal::Press(Action::Left) => self.move_dir = -1.0,
            InputSignal::Press(Action::Right) => self.move_dir = 1.0,
            InputSignal::ReleaseAny => {
                self.move_dir = 0.0;
                self.target_x = None;
            }
            _ => {}
        }
    }

    fn on_tap(&mut self, _engine: &mut Engine, pos: Vec2) {
        self.target_x = Some(pos.x);
    }

    fn render(&self, engine: &Engine, surface: &mut dyn Surface) {
        let (w, h) = (engine.width(), engine.height());
        surface.clear(w, h, palette::BACKGROUND);
        surface.dashed_line(
            Vec2::new(0.0, h / 2.0),
            Vec2::new(w, h / 2.0),
            palette::GRAY,
            2.0,
            8.0,
        );

        surface.pixel_rect(
            self.ai_x,
            AI_Y,
            PADDLE_SIZE.x,
            PADDLE_SIZE.y,
            palette::RED,
            Some(palette::RED),
        );
        surface.pixel_rect(
            self.player_x,
            Self::player_y(engine),
            PADDLE_SIZE.x,
            PADDLE_SIZE.y,
            palette::GREEN,
            Some(palette::GREEN),
        );
        surface.pixel_rect(
            self.ball.x,
            self.ball.y,
            BALL_SIZE,
            BALL_SIZE,
            palette::YELLOW,
            Some(palette::YELLOW),
        );

        for i in 0..self.lives {
            surface.pixel_rect(10.0 + i as f32 * 15.0, h - 15.0, 8.0, 8.0, palette::GREEN, None);
        }

        surface.fill_text(
            &format!("LVL {}", engine.level()),
            w - 10.0,
            h - 10.0,
            &TextStyle::retro(12.0, palette::CYAN).aligned(TextAlign::Right),
        );
    }
}
