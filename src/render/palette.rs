//! Neon color palette shared by the games

pub const BACKGROUND: &str = "#0a0a0a";
pub const GRID: &str = "#1a1a1a";
pub const PANEL: &str = "#0f0f0f";

pub const GREEN: &str = "#00ff41";
pub const DARK_GREEN: &str = "#00aa2b";
pub const CYAN: &str = "#00fff2";
pub const MAGENTA: &str = "#ff00ff";
pub const RED: &str = "#ff0040";
pub const YELLOW: &str = "#ffe600";
pub const ORANGE: &str = "#ff8800";
pub const BLUE: &str = "#0044ff";
pub const WHITE: &str = "#ffffff";
pub const GRAY: &str = "#333333";
pub const LIGHT_GRAY: &str = "#666666";

/// Scale a `#rrggbb` color's channels by `factor` (0.0 - 1.0)
pub fn darken(color: &str, factor: f32) -> String {
    let hex = color.trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .map(|c| (c as f32 * factor.clamp(0.0, 1.0)).floor() as u8)
            .unwrap_or(0)
    };
    format!("#{:02x}{:02x}{:02x}", channel(0), channel(2), channel(4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_darken() {
        assert_eq!(darken("#ff0040", 0.3), "#4c0013");
        assert_eq!(darken("#ffffff", 1.0), "#ffffff");
        assert_eq!(darken("bogus", 0.5), "#000000");
    }
}
