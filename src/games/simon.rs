//! Simon Says: repeat a growing color sequence
//!
//! Sequence playback and the pauses between rounds run on session timers,
//! so a restart drops any playback still in flight.

use glam::Vec2;
use rand::Rng;

use crate::audio::SoundEffect;
use crate::engine::{Engine, Game, TimerTag};
use crate::point_in_rect;
use crate::render::{Surface, palette};

const PAD_SIZE: f32 = 70.0;
const PAD_COLORS: [&str; 4] = [palette::RED, palette::GREEN, palette::YELLOW, palette::CYAN];
const SHOW_LIT: f32 = 0.5;
const SHOW_GAP: f32 = 0.3;
const TAP_LIT: f32 = 0.2;
const ROUND_DELAY: f32 = 1.0;
const POINTS_PER_STEP: u64 = 10;

// Timer tags
const UNLIGHT_STEP: TimerTag = 1;
const SHOW_NEXT: TimerTag = 2;
const NEXT_ROUND: TimerTag = 3;
/// Plus the pad index
const UNLIGHT_PAD: TimerTag = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Playing the sequence back
    Showing,
    /// Waiting for the player to repeat it
    Input,
    /// Round complete, next one pending
    Between,
}

pub struct Simon {
    pub(crate) sequence: Vec<usize>,
    pub(crate) entered: usize,
    pub(crate) step: usize,
    pub(crate) phase: Phase,
    pub(crate) lit: [bool; 4],
}

impl Simon {
    pub fn new() -> Self {
        Self {
            sequence: Vec::new(),
            entered: 0,
            step: 0,
            phase: Phase::Showing,
            lit: [false; 4],
        }
    }

    /// Top-left corners of the four pads in a 2x2 block around the center
    fn pad_origin(engine: &Engine, pad: usize) -> Vec2 {
        let center = engine.size() / 2.0;
        let col = if pad % 2 == 0 { -80.0 } else { 10.0 };
        let row = if pad < 2 { -80.0 } else { 10.0 };
        center + Vec2::new(col, row)
    }

    fn next_round(&mut self, engine: &mut Engine) {
        let pad = engine.rng().random_range(0..PAD_COLORS.len());
        self.sequence.push(pad);
        self.entered = 0;
        self.step = 0;
        self.phase = Phase::Showing;
        self.show_step(engine);
    }

    fn show_step(&mut self, engine: &mut Engine) {
        let Some(&pad) = self.sequence.get(self.step) else {
            self.phase = Phase::Input;
            return;
        };
        self.lit[pad] = true;
        engine.play(SoundEffect::Blip);
        engine.schedule(SHOW_LIT, UNLIGHT_STEP);
    }

    pub(crate) fn press(&mut self, engine: &mut Engine, pad: usize) {
        if self.phase != Phase::Input {
            return;
        }
        if self.sequence[self.entered] != pad {
            // Game over drops pending timers, so nothing is left lit
            self.lit = [false; 4];
            engine.trigger_game_over();
            return;
        }

        let unlight = UNLIGHT_PAD + pad as TimerTag;
        self.lit[pad] = true;
        engine.play(SoundEffect::Blip);
        engine.cancel_timer(unlight);
        engine.schedule(TAP_LIT, unlight);
        self.entered += 1;

        if self.entered == self.sequence.len() {
            engine.add_score(self.sequence.len() as u64 * POINTS_PER_STEP);
            engine.play(SoundEffect::Powerup);
            self.phase = Phase::Between;
            engine.schedule(ROUND_DELAY, NEXT_ROUND);
        }
    }
}

impl Default for Simon {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Simon {
    fn init(&mut self, engine: &mut Engine) {
        *self = Self::new();
        self.next_round(engine);
    }

    fn update(&mut self, _engine: &mut Engine, _dt: f32) {}

    fn on_timer(&mut self, engine: &mut Engine, tag: TimerTag) {
        match tag {
            UNLIGHT_STEP => {
                if let Some(&pad) = self.sequence.get(self.step) {
                    self.lit[pad] = false;
                }
                self.step += 1;
                engine.schedule(SHOW_GAP, SHOW_NEXT);
            }
            SHOW_NEXT => self.show_step(engine),
            NEXT_ROUND => self.next_round(engine),
            t if t >= UNLIGHT_PAD => {
                if let Some(lit) = self.lit.get_mut((t - UNLIGHT_PAD) as usize) {
                    *lit = false;
                }
            }
            _ => {}
        }
    }

    fn on_tap(&mut self, engine: &mut Engine, pos: Vec2) {
        let hit = (0..PAD_COLORS.len())
            .find(|&pad| point_in_rect(pos, Self::pad_origin(engine, pad), Vec2::splat(PAD_SIZE)));
        if let Some(pad) = hit {
            self.press(engine, pad);
        }
    }

    fn render(&self, engine: &Engine, surface: &mut dyn Surface) {
        let (w, h) = (engine.width(), engine.height());
        surface.clear(w, h, palette::BACKGROUND);
        surface.text("SIMON SAYS", w / 2.0, 40.0, 14.0, palette::CYAN);
        surface.text(
            &format!("ROUND {}", self.sequence.len()),
            w / 2.0,
            70.0,
            10.0,
            palette::YELLOW,
        );

        for (pad, &color) in PAD_COLORS.iter().enumerate() {
            let origin = Self::pad_origin(engine, pad);
            let fill = if self.lit[pad] {
                color.to_string()
            } else {
                palette::darken(color, 0.3)
            };
            surface.pixel_rect(origin.x, origin.y, PAD_SIZE, PAD_SIZE, &fill, Some(color));
        }

        let (status, color) = match self.phase {
            Phase::Showing => ("WATCH...", palette::MAGENTA),
            Phase::Input => ("YOUR TURN", palette::GREEN),
            Phase::Between => ("WELL DONE", palette::GREEN),
        };
        surface.text(status, w / 2.0, h - 40.0, 10.0, color);

        if engine.is_game_over() {
            surface.text("GAME OVER", w / 2.0, h / 2.0 - 100.0, 20.0, palette::RED);
        }
    }
}
