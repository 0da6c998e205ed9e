//! Drawing surface abstraction
//!
//! Games draw through `Surface` in logical pixels. The browser build backs it
//! with a 2D canvas context; tests and the native runner record commands.

pub mod palette;
pub mod recording;
#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use recording::{DrawCommand, RecordingSurface};

use glam::Vec2;

/// Font used by every text draw
pub const FONT_FAMILY: &str = "'Press Start 2P', monospace";

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Text appearance (baseline is always middle)
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle<'a> {
    pub size: f32,
    pub color: &'a str,
    pub align: TextAlign,
    /// Shadow blur radius in the text color
    pub glow: f32,
}

impl<'a> TextStyle<'a> {
    /// Retro glowing text: blur is half the font size
    pub fn retro(size: f32, color: &'a str) -> Self {
        Self {
            size,
            color,
            align: TextAlign::Center,
            glow: size / 2.0,
        }
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// A 2D drawing target in logical pixels
pub trait Surface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str, line_width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);
    fn line(&mut self, from: Vec2, to: Vec2, color: &str, width: f32);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);

    /// Push/pop the transform state
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);

    // === Shared drawing helpers ===

    /// Fill the whole logical area
    fn clear(&mut self, width: f32, height: f32, color: &str) {
        self.fill_rect(0.0, 0.0, width, height, color);
    }

    /// Filled block with an optional 1px inset border
    fn pixel_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str, border: Option<&str>) {
        self.fill_rect(x, y, w, h, color);
        if let Some(border) = border {
            self.stroke_rect(x + 0.5, y + 0.5, w - 1.0, h - 1.0, border, 1.0);
        }
    }

    /// Centered glowing retro text
    fn text(&mut self, text: &str, x: f32, y: f32, size: f32, color: &str) {
        self.fill_text(text, x, y, &TextStyle::retro(size, color));
    }

    /// Line broken into `dash`-long segments with equal gaps
    fn dashed_line(&mut self, from: Vec2, to: Vec2, color: &str, width: f32, dash: f32) {
        let length = from.distance(to);
        if length <= 0.0 || dash <= 0.0 {
            return;
        }
        let dir = (to - from) / length;
        let mut t = 0.0;
        while t < length {
            let end = (t + dash).min(length);
            self.line(from + dir * t, from + dir * end, color, width);
            t += dash * 2.0;
        }
    }
}
