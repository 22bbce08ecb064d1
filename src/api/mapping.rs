//! Geometry mapper exports
//!
//! Points cross the boundary as `{x, y}` objects.

use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, serialize};
use crate::geometry;
use crate::models::constants::HANDLE_RADIUS;
use crate::models::{GridSpec, Point, Quad};

fn point(value: JsValue, name: &str) -> Result<Point, JsValue> {
    deserialize(value, &format!("Invalid point {}", name))
}

/// Linear interpolation between two points
#[wasm_bindgen(js_name = lerp)]
pub fn lerp(a: JsValue, b: JsValue, t: f64) -> Result<JsValue, JsValue> {
    let p = geometry::lerp(point(a, "a")?, point(b, "b")?, t);
    serialize(&p, "Point serialization error")
}

/// Bilinear interpolation inside a quadrilateral
#[wasm_bindgen(js_name = blend)]
pub fn blend(
    u: f64,
    v: f64,
    p00: JsValue,
    p10: JsValue,
    p01: JsValue,
    p11: JsValue,
) -> Result<JsValue, JsValue> {
    let p = geometry::blend(
        u,
        v,
        point(p00, "p00")?,
        point(p10, "p10")?,
        point(p01, "p01")?,
        point(p11, "p11")?,
    );
    serialize(&p, "Point serialization error")
}

#[wasm_bindgen(js_name = distance)]
pub fn distance(p1: JsValue, p2: JsValue) -> Result<f64, JsValue> {
    Ok(geometry::distance(point(p1, "p1")?, point(p2, "p2")?))
}

/// Interior grid line segments for crop points, in normalized space
///
/// Returns an empty array unless exactly four crop points are given.
#[wasm_bindgen(js_name = getGridLines)]
pub fn get_grid_lines(points_js: JsValue, rows: usize, cols: usize) -> Result<JsValue, JsValue> {
    let points: Vec<Point> = deserialize(points_js, "Invalid crop points")?;
    let lines = Quad::from_points(&points)
        .map(|quad| geometry::grid_lines(&quad, GridSpec::capped(rows, cols)))
        .unwrap_or_default();
    serialize(&lines, "Grid line serialization error")
}

/// Index of the crop handle under a canvas-pixel pointer, or `undefined`
#[wasm_bindgen(js_name = hitHandle)]
pub fn hit_handle(
    points_js: JsValue,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Result<Option<usize>, JsValue> {
    let points: Vec<Point> = deserialize(points_js, "Invalid crop points")?;
    Ok(geometry::hit_handle(&points, Point::new(x, y), width, height, HANDLE_RADIUS))
}

#[wasm_bindgen(js_name = isDrag)]
pub fn is_drag(start_x: f64, start_y: f64, x: f64, y: f64) -> bool {
    geometry::is_drag(Point::new(start_x, start_y), Point::new(x, y))
}
