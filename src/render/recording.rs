//! Headless surface that records draw commands

use glam::Vec2;

use super::{Surface, TextAlign, TextStyle};

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { x: f32, y: f32, w: f32, h: f32, color: String },
    StrokeRect { x: f32, y: f32, w: f32, h: f32, color: String, line_width: f32 },
    FillCircle { center: Vec2, radius: f32, color: String },
    Line { from: Vec2, to: Vec2, color: String, width: f32 },
    Text { text: String, x: f32, y: f32, size: f32, color: String, align: TextAlign },
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Rotate { radians: f32 },
}

/// Surface used by tests and the native runner
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    frames: u32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget the recorded commands, counting the frame
    pub fn next_frame(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Every string drawn since the last `next_frame`
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether any drawn text contains `needle`
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            w,
            h,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            x,
            y,
            w,
            h,
            color: color.to_string(),
            line_width,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color: color.to_string(),
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: &str, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color: color.to_string(),
            width,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            size: style.size,
            color: style.color.to_string(),
            align: style.align,
        });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate { radians });
    }
}
