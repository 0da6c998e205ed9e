//! Snake: grid movement, wrap-free walls, grows on food

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use rand::Rng;

use crate::audio::SoundEffect;
use crate::engine::{Engine, Game};
use crate::input::InputSignal;
use crate::render::{Surface, palette};

const GRID: i32 = 20;
const START_INTERVAL: f32 = 0.15;
const MIN_INTERVAL: f32 = 0.08;
const SPEEDUP: f32 = 0.005;
const FOOD_POINTS: u64 = 10;

pub struct Snake {
    /// Head first
    pub(crate) body: VecDeque<IVec2>,
    pub(crate) direction: IVec2,
    next_direction: IVec2,
    pub(crate) food: IVec2,
    move_timer: f32,
    pub(crate) move_interval: f32,
    /// Extra segments still to add
    growth: u32,
}

impl Snake {
    pub fn new() -> Self {
        Self {
            body: VecDeque::from([IVec2::new(10, 10)]),
            direction: IVec2::X,
            next_direction: IVec2::X,
            food: IVec2::ZERO,
            move_timer: 0.0,
            move_interval: START_INTERVAL,
            growth: 0,
        }
    }

    fn cell_size(engine: &Engine) -> f32 {
        engine.width() / GRID as f32
    }

    fn spawn_food(&self, engine: &mut Engine) -> IVec2 {
        loop {
            let rng = engine.rng();
            let food = IVec2::new(rng.random_range(0..GRID), rng.random_range(0..GRID));
            if !self.body.contains(&food) {
                return food;
            }
        }
    }

    /// Advance one grid step
    fn step(&mut self, engine: &mut Engine) {
        self.direction = self.next_direction;
        let head = self.body[0] + self.direction;

        let out_of_bounds = head.x < 0 || head.x >= GRID || head.y < 0 || head.y >= GRID;
        if out_of_bounds || self.body.contains(&head) {
            engine.play(SoundEffect::Die);
            engine.trigger_game_over();
            return;
        }

        self.body.push_front(head);

        if head == self.food {
            engine.add_score(FOOD_POINTS);
            engine.play(SoundEffect::Score);
            self.food = self.spawn_food(engine);
            // Eating leaves the tail in place this step and the next
            self.growth += 1;
            if self.move_interval > MIN_INTERVAL {
                self.move_interval -= SPEEDUP;
            }
        } else if self.growth > 0 {
            self.growth -= 1;
        } else {
            self.body.pop_back();
        }
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Snake {
    fn init(&mut self, engine: &mut Engine) {
        *self = Self::new();
        self.food = self.spawn_food(engine);
    }

    fn update(&mut self, engine: &mut Engine, dt: f32) {
        self.move_timer += dt;
        if self.move_timer >= self.move_interval {
            self.move_timer = 0.0;
            self.step(engine);
        }
    }

    fn on_input(&mut self, _engine: &mut Engine, input: InputSignal) {
        let InputSignal::Press(action) = input else {
            return;
        };
        // Reversing into the neck is ignored
        if let Some((x, y)) = action.direction() {
            let dir = IVec2::new(x, y);
            if dir != -self.direction {
                self.next_direction = dir;
            }
        }
    }

    fn render(&self, engine: &Engine, surface: &mut dyn Surface) {
        let (w, h) = (engine.width(), engine.height());
        let cell = Self::cell_size(engine);
        surface.clear(w, h, palette::BACKGROUND);

        for i in 0..=GRID {
            let p = i as f32 * cell;
            surface.line(Vec2::new(p, 0.0), Vec2::new(p, h), palette::GRID, 1.0);
            surface.line(Vec2::new(0.0, p), Vec2::new(w, p), palette::GRID, 1.0);
        }

        for (i, seg) in self.body.iter().enumerate() {
            let color = if i == 0 { palette::GREEN } else { palette::DARK_GREEN };
            surface.pixel_rect(
                seg.x as f32 * cell + 1.0,
                seg.y as f32 * cell + 1.0,
                cell - 2.0,
                cell - 2.0,
                color,
                Some(palette::GREEN),
            );
        }

        surface.pixel_rect(
            self.food.x as f32 * cell + 2.0,
            self.food.y as f32 * cell + 2.0,
            cell - 4.0,
            cell - 4.0,
            palette::RED,
            Some(palette::MAGENTA),
        );

        if engine.is_game_over() {
            surface.text("GAME OVER", w / 2.0, h / 2.0, 20.0, palette::RED);
        }
    }
}
