//! Layout geometry shared by the measurement and sizing code.

use serde::{Deserialize, Serialize};

/// A size in layout units (width and height).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Component-wise maximum of two sizes.
    #[inline]
    pub fn max(self, other: Size) -> Size {
        Size {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Scale both components by `factor`.
    #[inline]
    pub fn scale(self, factor: f32) -> Size {
        Size {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }
}

/// The visible area of the host window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Inner width of the host window.
    pub width: f32,
    /// Inner height of the host window.
    pub height: f32,
}

impl Viewport {
    /// Create a new viewport.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The largest size a dialog may take, as a fraction of the viewport.
    #[inline]
    pub fn bounds(&self, fraction: f32) -> Size {
        Size::new(self.width, self.height).scale(fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_max() {
        let a = Size::new(100.0, 20.0);
        let b = Size::new(50.0, 80.0);
        assert_eq!(a.max(b), Size::new(100.0, 80.0));
    }

    #[test]
    fn test_size_is_empty() {
        assert!(Size::ZERO.is_empty());
        assert!(Size::new(10.0, 0.0).is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn test_viewport_bounds() {
        let viewport = Viewport::new(1000.0, 800.0);
        assert_eq!(viewport.bounds(0.9), Size::new(900.0, 720.0));
    }
}
