//! Point and quadrilateral value types

use serde::{Deserialize, Serialize};

/// A 2D point, either normalized to `[0, 1]` (crop space) or in raw pixels
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale a normalized point into a `width × height` pixel space
    pub fn scale(self, width: f64, height: f64) -> Self {
        Self {
            x: self.x * width,
            y: self.y * height,
        }
    }
}

/// The four corners of a crop region, stored in drawing order
/// (top-left, top-right, bottom-right, bottom-left).
///
/// Grid operations only run against a complete `Quad`; a crop with fewer
/// points never converts into one, which turns those operations into no-ops.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub p00: Point,
    pub p10: Point,
    pub p11: Point,
    pub p01: Point,
}

impl Quad {
    pub const fn new(p00: Point, p10: Point, p11: Point, p01: Point) -> Self {
        Self { p00, p10, p11, p01 }
    }

    /// Axis-aligned unit square, the identity crop
    pub const fn unit() -> Self {
        Self::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        )
    }

    /// Build a quad from crop points in drawing order. Returns `None` unless
    /// exactly four points are given.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        match points {
            [p00, p10, p11, p01] => Some(Self::new(*p00, *p10, *p11, *p01)),
            _ => None,
        }
    }

    /// Corners in drawing order
    pub fn points(&self) -> [Point; 4] {
        [self.p00, self.p10, self.p11, self.p01]
    }

    /// Same quad with every corner scaled into pixel space
    pub fn scale(&self, width: f64, height: f64) -> Self {
        Self::new(
            self.p00.scale(width, height),
            self.p10.scale(width, height),
            self.p11.scale(width, height),
            self.p01.scale(width, height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_requires_four() {
        let pts = Quad::unit().points();
        assert!(Quad::from_points(&pts[..3]).is_none());
        assert!(Quad::from_points(&[]).is_none());
        assert_eq!(Quad::from_points(&pts), Some(Quad::unit()));
    }

    #[test]
    fn test_points_keep_drawing_order() {
        let q = Quad::from_points(&[
            Point::new(0.1, 0.2),
            Point::new(0.9, 0.1),
            Point::new(0.8, 0.9),
            Point::new(0.2, 0.8),
        ])
        .unwrap();
        assert_eq!(q.p11, Point::new(0.8, 0.9));
        assert_eq!(q.p01, Point::new(0.2, 0.8));
        assert_eq!(q.points()[2], q.p11);
    }
}
