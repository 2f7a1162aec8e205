#![forbid(unsafe_code)]

//! Geometric primitives.

/// A point in canvas space (origin at top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this point by `dx`/`dy`.
    #[inline]
    pub const fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Move a fraction `t` of the way toward `target`.
    ///
    /// `t` is clamped to `[0.0, 1.0]`.
    #[inline]
    pub fn lerp(self, target: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.x + (target.x - self.x) * t,
            self.y + (target.y - self.y) * t,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_moves_fractionally() {
        let p = Point::new(0.0, 0.0).lerp(Point::new(10.0, -20.0), 0.1);
        assert_eq!(p, Point::new(1.0, -2.0));
    }

    #[test]
    fn lerp_clamps_factor() {
        let target = Point::new(5.0, 5.0);
        assert_eq!(Point::default().lerp(target, 3.0), target);
        assert_eq!(Point::default().lerp(target, -1.0), Point::default());
    }
}
