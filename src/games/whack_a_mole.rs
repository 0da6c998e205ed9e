//! Whack-a-Mole: 30 second round on a 3x3 field of holes

use glam::Vec2;
use rand::Rng;

use crate::audio::SoundEffect;
use crate::engine::{Engine, Game};
use crate::point_in_rect;
use crate::render::{Surface, palette};

const GRID: usize = 3;
const HOLE_SIZE: f32 = 60.0;
const HOLE_SPACING: f32 = 20.0;
const ROUND_TIME: f32 = 30.0;
const START_SPAWN_INTERVAL: f32 = 1.0;
const MIN_SPAWN_INTERVAL: f32 = 0.4;
/// Spawn interval shrinks by this much per second played
const SPAWN_RAMP: f32 = 0.02;
const MOLE_LIFETIME: f32 = 1.5;
const WHACK_POINTS: u64 = 10;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Hole {
    pub(crate) pos: Vec2,
    /// Seconds the mole stays up, if one is out
    pub(crate) mole: Option<f32>,
}

pub struct WhackAMole {
    pub(crate) holes: Vec<Hole>,
    spawn_timer: f32,
    pub(crate) spawn_interval: f32,
    pub(crate) time_left: f32,
}

impl WhackAMole {
    pub fn new() -> Self {
        Self {
            holes: Vec::new(),
            spawn_timer: 0.0,
            spawn_interval: START_SPAWN_INTERVAL,
            time_left: ROUND_TIME,
        }
    }

    fn spawn_mole(&mut self, engine: &mut Engine) {
        let empty: Vec<usize> = (0..self.holes.len())
            .filter(|&i| self.holes[i].mole.is_none())
            .collect();
        if empty.is_empty() {
            return;
        }
        let pick = empty[engine.rng().random_range(0..empty.len())];
        self.holes[pick].mole = Some(MOLE_LIFETIME);
    }
}

impl Default for WhackAMole {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for WhackAMole {
    fn init(&mut self, engine: &mut Engine) {
        *self = Self::new();
        let block = GRID as f32 * HOLE_SIZE + (GRID - 1) as f32 * HOLE_SPACING;
        let start = (engine.size() - Vec2::splat(block)) / 2.0;
        self.holes = (0..GRID * GRID)
            .map(|i| Hole {
                pos: start
                    + Vec2::new((i % GRID) as f32, (i / GRID) as f32) * (HOLE_SIZE + HOLE_SPACING),
                mole: None,
            })
            .collect();
    }

    fn update(&mut self, engine: &mut Engine, dt: f32) {
        self.time_left -= dt;
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            engine.trigger_game_over();
            return;
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= self.spawn_interval {
            self.spawn_timer = 0.0;
            self.spawn_mole(engine);
        }

        for hole in &mut self.holes {
            if let Some(t) = hole.mole.as_mut() {
                *t -= dt;
                if *t <= 0.0 {
                    hole.mole = None;
                }
            }
        }

        if self.spawn_interval > MIN_SPAWN_INTERVAL {
            self.spawn_interval -= dt * SPAWN_RAMP;
        }
    }

    fn on_tap(&mut self, engine: &mut Engine, pos: Vec2) {
        let hit = self
            .holes
            .iter_mut()
            .find(|h| h.mole.is_some() && point_in_rect(pos, h.pos, Vec2::splat(HOLE_SIZE)));
        if let Some(hole) = hit {
            hole.mole = None;
            engine.add_score(WHACK_POINTS);
            engine.play(SoundEffect::Hit);
        }
    }

    fn render(&self, engine: &Engine, surface: &mut dyn Surface) {
        let (w, h) = (engine.width(), engine.height());
        surface.clear(w, h, palette::BACKGROUND);
        surface.text(
            &format!("TIME: {}", self.time_left.ceil() as u32),
            w / 2.0,
            40.0,
            12.0,
            palette::YELLOW,
        );

        for hole in &self.holes {
            surface.pixel_rect(
                hole.pos.x,
                hole.pos.y,
                HOLE_SIZE,
                HOLE_SIZE,
                palette::GRAY,
                Some(palette::LIGHT_GRAY),
            );
            if hole.mole.is_some() {
                let center = hole.pos + Vec2::splat(HOLE_SIZE / 2.0);
                surface.fill_circle(center, HOLE_SIZE / 3.0, palette::RED);
            }
        }

        if engine.is_game_over() {
            surface.text("TIME UP!", w / 2.0, h / 2.0, 20.0, palette::RED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;

    fn setup() -> (WhackAMole, Engine) {
        let mut engine = Engine::new(EngineConfig::new("whack-a-mole").with_seed(2)).unwrap();
        let mut game = WhackAMole::new();
        game.init(&mut engine);
        (game, engine)
    }

    #[test]
    fn test_holes_centered() {
        let (game, _) = setup();
        assert_eq!(game.holes.len(), 9);
        assert_eq!(game.holes[0].pos, Vec2::new(90.0, 190.0));
        assert_eq!(game.holes[8].pos, Vec2::new(250.0, 350.0));
    }

    #[test]
    fn test_mole_spawns_and_hides() {
        let (mut game, mut engine) = setup();
        game.update(&mut engine, 1.0);
        assert_eq!(game.holes.iter().filter(|h| h.mole.is_some()).count(), 1);
        // 0.5s of mole time left, and the next spawn is not yet due
        game.update(&mut engine, 0.6);
        assert!(game.holes.iter().all(|h| h.mole.is_none()));
    }

    #[test]
    fn test_whack_scores_only_on_mole() {
        let (mut game, mut engine) = setup();
        let center = game.holes[4].pos + Vec2::splat(HOLE_SIZE / 2.0);
        game.on_tap(&mut engine, center);
        assert_eq!(engine.score(), 0);

        game.holes[4].mole = Some(1.0);
        game.on_tap(&mut engine, center);
        assert_eq!(engine.score(), WHACK_POINTS);
        assert!(game.holes[4].mole.is_none());
    }

    #[test]
    fn test_round_ends_at_time_up() {
        let (mut game, mut engine) = setup();
        for _ in 0..299 {
            game.update(&mut engine, 0.1);
        }
        assert!(!engine.is_game_over());
        for _ in 0..2 {
            game.update(&mut engine, 0.1);
        }
        assert!(engine.is_game_over());
        assert!(game.spawn_interval < START_SPAWN_INTERVAL);
    }
}
