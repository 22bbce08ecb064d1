//! Geometry mapper
//!
//! Maps normalized grid positions into an arbitrary (possibly skewed) crop
//! quadrilateral. The mapping is bilinear, not projective: it is exact at the
//! corners and along the edges, and an approximation of true perspective in
//! the interior.

use crate::models::{GridSpec, Point, Quad};
use crate::models::constants::DRAG_THRESHOLD;

/// Linear interpolation `a + t·(b − a)`; `t` outside `[0, 1]` extrapolates.
///
/// Evaluated as `(1 − t)·a + t·b`, which returns `a` and `b` bit-exactly at
/// `t = 0` and `t = 1`.
pub fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point {
        x: (1.0 - t) * a.x + t * b.x,
        y: (1.0 - t) * a.y + t * b.y,
    }
}

/// Bilinear interpolation of `(u, v)` inside the quad `p00, p10, p01, p11`
///
/// Interpolates the top edge `p00 → p10` and the bottom edge `p01 → p11` at
/// `u`, then interpolates between those two points at `v`.
pub fn blend(u: f64, v: f64, p00: Point, p10: Point, p01: Point, p11: Point) -> Point {
    let top = lerp(p00, p10, u);
    let bottom = lerp(p01, p11, u);
    lerp(top, bottom, v)
}

/// [`blend`] against a [`Quad`]
pub fn blend_quad(u: f64, v: f64, quad: &Quad) -> Point {
    blend(u, v, quad.p00, quad.p10, quad.p01, quad.p11)
}

/// Euclidean distance. Used for handle hit testing, never for pattern logic.
pub fn distance(p1: Point, p2: Point) -> f64 {
    (p1.x - p2.x).hypot(p1.y - p2.y)
}

/// Normalized `(u, v)` of the center of cell `(row, col)`
pub fn cell_center_uv(row: usize, col: usize, grid: GridSpec) -> Option<(f64, f64)> {
    if row >= grid.rows || col >= grid.cols {
        return None;
    }
    Some((
        (col as f64 + 0.5) / grid.cols as f64,
        (row as f64 + 0.5) / grid.rows as f64,
    ))
}

/// Center of cell `(row, col)` in quad space
pub fn cell_center(quad: &Quad, grid: GridSpec, row: usize, col: usize) -> Option<Point> {
    cell_center_uv(row, col, grid).map(|(u, v)| blend_quad(u, v, quad))
}

/// Corners of cell `(row, col)` in quad space, in drawing order
pub fn cell_corners(quad: &Quad, grid: GridSpec, row: usize, col: usize) -> Option<[Point; 4]> {
    if row >= grid.rows || col >= grid.cols {
        return None;
    }

    let u0 = col as f64 / grid.cols as f64;
    let u1 = (col + 1) as f64 / grid.cols as f64;
    let v0 = row as f64 / grid.rows as f64;
    let v1 = (row + 1) as f64 / grid.rows as f64;

    Some([
        blend_quad(u0, v0, quad),
        blend_quad(u1, v0, quad),
        blend_quad(u1, v1, quad),
        blend_quad(u0, v1, quad),
    ])
}

/// Corners of a whole grid row, in drawing order
pub fn row_corners(quad: &Quad, grid: GridSpec, row: usize) -> Option<[Point; 4]> {
    if row >= grid.rows || grid.cols == 0 {
        return None;
    }

    let v0 = row as f64 / grid.rows as f64;
    let v1 = (row + 1) as f64 / grid.rows as f64;

    Some([
        lerp(quad.p00, quad.p01, v0),
        lerp(quad.p10, quad.p11, v0),
        lerp(quad.p10, quad.p11, v1),
        lerp(quad.p00, quad.p01, v1),
    ])
}

/// A straight segment between two points
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Interior grid lines in quad space: `rows − 1` horizontal lines followed
/// by `cols − 1` vertical lines. Outer edges belong to the quad outline.
pub fn grid_lines(quad: &Quad, grid: GridSpec) -> Vec<Segment> {
    if grid.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::with_capacity(grid.rows + grid.cols - 2);

    for i in 1..grid.rows {
        let t = i as f64 / grid.rows as f64;
        lines.push(Segment {
            from: lerp(quad.p00, quad.p01, t),
            to: lerp(quad.p10, quad.p11, t),
        });
    }

    for j in 1..grid.cols {
        let t = j as f64 / grid.cols as f64;
        lines.push(Segment {
            from: lerp(quad.p00, quad.p10, t),
            to: lerp(quad.p01, quad.p11, t),
        });
    }

    lines
}

/// Index of the crop handle under `pointer`, if any
///
/// `points` are normalized crop points, `pointer` is in canvas pixels. The
/// closest handle within `radius` pixels wins; ties go to the earlier point.
pub fn hit_handle(
    points: &[Point],
    pointer: Point,
    width: f64,
    height: f64,
    radius: f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, p) in points.iter().enumerate() {
        let d = distance(p.scale(width, height), pointer);
        if d > radius {
            continue;
        }
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((i, d)),
        }
    }

    best.map(|(i, _)| i)
}

/// Whether pointer travel from `start` is large enough to count as a drag
pub fn is_drag(start: Point, current: Point) -> bool {
    distance(start, current) >= DRAG_THRESHOLD
}
