//! Logical-to-display scaling

/// How a fixed logical resolution is shown inside its container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale {
    /// CSS pixels per logical pixel
    pub scale: f32,
    /// Rendered element size (CSS pixels)
    pub css_width: f32,
    pub css_height: f32,
    /// Canvas backing store, always the logical size
    pub backing_width: u32,
    pub backing_height: u32,
}

impl DisplayScale {
    /// 1:1 display of the logical size
    pub fn identity(width: u32, height: u32) -> Self {
        Self {
            scale: 1.0,
            css_width: width as f32,
            css_height: height as f32,
            backing_width: width,
            backing_height: height,
        }
    }

    /// Largest uniform scale that fits the logical size in the container.
    /// A container that has not been laid out yet keeps 1:1.
    pub fn fit(width: u32, height: u32, container_w: f32, container_h: f32) -> Self {
        if container_w <= 0.0 || container_h <= 0.0 || width == 0 || height == 0 {
            return Self::identity(width, height);
        }
        let scale = (container_w / width as f32).min(container_h / height as f32);
        Self {
            scale,
            css_width: width as f32 * scale,
            css_height: height as f32 * scale,
            backing_width: width,
            backing_height: height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_container_limited_by_height() {
        let s = DisplayScale::fit(400, 600, 800.0, 600.0);
        assert_eq!(s.scale, 1.0);
        assert_eq!((s.backing_width, s.backing_height), (400, 600));
        assert_eq!((s.css_width, s.css_height), (400.0, 600.0));
    }

    #[test]
    fn test_small_container_shrinks() {
        let s = DisplayScale::fit(400, 600, 200.0, 900.0);
        assert_eq!(s.scale, 0.5);
        assert_eq!(s.css_height, 300.0);
        assert_eq!(s.backing_height, 600);
    }

    #[test]
    fn test_unlaid_container_is_identity() {
        assert_eq!(
            DisplayScale::fit(400, 400, 0.0, 0.0),
            DisplayScale::identity(400, 400)
        );
    }
}
