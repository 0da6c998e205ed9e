//! Flappy Bird: tap to flap through scrolling pipe gaps

use glam::Vec2;
use rand::Rng;

use crate::audio::SoundEffect;
use crate::engine::{Engine, Game};
use crate::input::{Action, InputSignal};
use crate::render::{Surface, palette};

const BIRD_X: f32 = 100.0;
const BIRD_SIZE: f32 = 20.0;
const GRAVITY: f32 = 800.0;
const FLAP_VELOCITY: f32 = -300.0;
const PIPE_WIDTH: f32 = 60.0;
const PIPE_GAP: f32 = 150.0;
const PIPE_SPEED: f32 = 150.0;
/// Gaps never open closer than this to the top or bottom edge
const PIPE_MARGIN: f32 = 100.0;
const START_PIPE_INTERVAL: f32 = 2.0;
const MIN_PIPE_INTERVAL: f32 = 1.2;
const PIPE_SPEEDUP: f32 = 0.1;
const SPEEDUP_EVERY: u64 = 50;
const PIPE_POINTS: u64 = 10;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pipe {
    pub(crate) x: f32,
    /// Top of the opening
    pub(crate) gap_y: f32,
    scored: bool,
}

pub struct FlappyBird {
    pub(crate) bird_y: f32,
    pub(crate) bird_vy: f32,
    pub(crate) pipes: Vec<Pipe>,
    pipe_timer: f32,
    pub(crate) pipe_interval: f32,
    /// Score at which the spawn rate last increased
    last_speedup: u64,
    pub(crate) started: bool,
}

impl FlappyBird {
    pub fn new() -> Self {
        Self {
            bird_y: 0.0,
            bird_vy: 0.0,
            pipes: Vec::new(),
            pipe_timer: 0.0,
            pipe_interval: START_PIPE_INTERVAL,
            last_speedup: 0,
            started: false,
        }
    }

    fn flap(&mut self, engine: &mut Engine) {
        if !self.started {
            self.started = true;
            engine.play(SoundEffect::Start);
        }
        self.bird_vy = FLAP_VELOCITY;
        engine.play(SoundEffect::Blip);
    }

    fn spawn_pipe(&mut self, engine: &mut Engine) {
        let span = (engine.height() - 2.0 * PIPE_MARGIN - PIPE_GAP).max(0.0);
        let gap_y = PIPE_MARGIN + engine.rng().random::<f32>() * span;
        self.pipes.push(Pipe {
            x: engine.width(),
            gap_y,
            scored: false,
        });
    }

    fn hits(&self, pipe: &Pipe) -> bool {
        let overlaps_x = BIRD_X + BIRD_SIZE > pipe.x && BIRD_X < pipe.x + PIPE_WIDTH;
        overlaps_x && (self.bird_y < pipe.gap_y || self.bird_y + BIRD_SIZE > pipe.gap_y + PIPE_GAP)
    }
}

impl Default for FlappyBird {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for FlappyBird {
    fn init(&mut self, engine: &mut Engine) {
        *self = Self::new();
        self.bird_y = engine.height() / 2.0;
    }

    fn update(&mut self, engine: &mut Engine, dt: f32) {
        if !self.started {
            return;
        }

        self.bird_vy += GRAVITY * dt;
        self.bird_y += self.bird_vy * dt;
        if self.bird_y < 0.0 || self.bird_y + BIRD_SIZE > engine.height() {
            engine.trigger_game_over();
            return;
        }

        self.pipe_timer += dt;
        if self.pipe_timer >= self.pipe_interval {
            self.pipe_timer = 0.0;
            self.spawn_pipe(engine);
        }

        let mut passed = 0;
        let mut crashed = false;
        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SPEED * dt;
            if !pipe.scored && pipe.x + PIPE_WIDTH < BIRD_X {
                pipe.scored = true;
                passed += 1;
            }
        }
        for pipe in &self.pipes {
            crashed |= self.hits(pipe);
        }
        self.pipes.retain(|p| p.x > -PIPE_WIDTH);

        for _ in 0..passed {
            engine.add_score(PIPE_POINTS);
            engine.play(SoundEffect::Score);
        }
        if crashed {
            engine.play(SoundEffect::Hit);
            engine.trigger_game_over();
            return;
        }

        // Pipes come faster every SPEEDUP_EVERY points
        let score = engine.score();
        if self.pipe_interval > MIN_PIPE_INTERVAL
            && score > 0
            && score % SPEEDUP_EVERY == 0
            && score != self.last_speedup
        {
            self.last_speedup = score;
            self.pipe_interval -= PIPE_SPEEDUP;
        }
    }

    fn on_input(&mut self, engine: &mut Engine, input: InputSignal) {
        if matches!(input, InputSignal::Press(Action::A | Action::Up)) {
            self.flap(engine);
        }
    }

    fn on_tap(&mut self, engine: &mut Engine, _pos: Vec2) {
        self.flap(engine);
    }

    fn render(&self, engine: &Engine, surface: &mut dyn Surface) {
        let (w, h) = (engine.width(), engine.height());
        surface.clear(w, h, palette::BACKGROUND);

        for pipe in &self.pipes {
            surface.pixel_rect(pipe.x, 0.0, PIPE_WIDTH, pipe.gap_y, palette::GREEN, Some(palette::CYAN));
            let bottom = pipe.gap_y + PIPE_GAP;
            surface.pixel_rect(
                pipe.x,
                bottom,
                PIPE_WIDTH,
                h - bottom,
                palette::GREEN,
                Some(palette::CYAN),
            );
        }

        // Bird tilts with its vertical speed
        surface.save();
        surface.translate(BIRD_X + BIRD_SIZE / 2.0, self.bird_y + BIRD_SIZE / 2.0);
        surface.rotate((self.bird_vy / 500.0).clamp(-0.5, 0.5));
        surface.fill_rect(-BIRD_SIZE / 2.0, -BIRD_SIZE / 2.0, BIRD_SIZE, BIRD_SIZE, palette::YELLOW);
        surface.restore();

        if !self.started {
            surface.text("TAP TO START", w / 2.0, h / 2.0, 12.0, palette::CYAN);
        }
        if engine.is_game_over() {
            surface.text("GAME OVER", w / 2.0, h / 2.0, 20.0, palette::RED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use proptest::prelude::*;

    fn setup() -> (FlappyBird, Engine) {
        let mut engine = Engine::new(EngineConfig::new("flappy-bird").with_seed(1)).unwrap();
        let mut game = FlappyBird::new();
        game.init(&mut engine);
        (game, engine)
    }

    #[test]
    fn test_idle_until_first_flap() {
        let (mut game, mut engine) = setup();
        game.update(&mut engine, 0.1);
        assert_eq!(game.bird_y, 300.0);

        game.on_tap(&mut engine, Vec2::ZERO);
        assert!(game.started);
        assert_eq!(game.bird_vy, FLAP_VELOCITY);
        game.update(&mut engine, 0.05);
        assert!(game.bird_y < 300.0);
    }

    #[test]
    fn test_falling_to_floor_ends_game() {
        let (mut game, mut engine) = setup();
        game.on_input(&mut engine, InputSignal::Press(Action::A));
        for _ in 0..40 {
            game.update(&mut engine, 0.05);
        }
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_passing_pipe_scores_once() {
        let (mut game, mut engine) = setup();
        game.started = true;
        game.bird_vy = 0.0;
        game.pipes.push(Pipe {
            x: BIRD_X - PIPE_WIDTH - 1.0,
            gap_y: 0.0,
            scored: false,
        });
        game.update(&mut engine, 0.01);
        game.bird_vy = 0.0;
        game.update(&mut engine, 0.01);
        assert_eq!(engine.score(), PIPE_POINTS);
    }

    #[test]
    fn test_pipe_collision() {
        let (mut game, mut engine) = setup();
        game.started = true;
        game.pipes.push(Pipe {
            x: BIRD_X,
            gap_y: 400.0,
            scored: false,
        });
        game.update(&mut engine, 0.01);
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_speedup_applies_once_per_threshold() {
        let (mut game, mut engine) = setup();
        game.started = true;
        engine.set_score(SPEEDUP_EVERY);
        game.update(&mut engine, 0.001);
        game.bird_vy = 0.0;
        game.update(&mut engine, 0.001);
        assert!((game.pipe_interval - (START_PIPE_INTERVAL - PIPE_SPEEDUP)).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_gaps_stay_inside_margins(seed in any::<u64>()) {
            let mut engine = Engine::new(EngineConfig::new("flappy-bird").with_seed(seed)).unwrap();
            let mut game = FlappyBird::new();
            game.init(&mut engine);
            game.spawn_pipe(&mut engine);
            let gap = game.pipes[0].gap_y;
            prop_assert!(gap >= PIPE_MARGIN);
            prop_assert!(gap + PIPE_GAP <= engine.height() - PIPE_MARGIN + 1e-3);
        }
    }
}
