//! Pattern encoder and cell sampler exports

use std::collections::BTreeMap;

use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, parse_direction, parse_stitch, serialize, validation_error};
use crate::models::{ColorEntry, GridSpec, Point, Quad};
use crate::pattern;
use crate::sampling::{extract_cell_colors_default, RgbaImage};
use crate::undo::CorrectionOverlay;
use crate::{wasm_log, wasm_warn};

/// Read a `{ "12": "A" }` correction object. Keys that are not cell indices
/// are dropped.
fn overlay_from_js(value: JsValue) -> Result<Option<CorrectionOverlay>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }

    let raw: BTreeMap<String, String> = deserialize(value, "Invalid corrections")?;
    let overlay = raw
        .into_iter()
        .filter_map(|(key, letter)| match key.parse::<usize>() {
            Ok(idx) => Some((idx, letter)),
            Err(_) => {
                wasm_warn!("Ignoring correction with non-numeric cell key '{}'", key);
                None
            }
        })
        .collect();
    Ok(Some(overlay))
}

/// Run-length text for one grid row, e.g. `"2A 3B"`
///
/// # Parameters
/// - `cell_colors_js`: row-major hex colors; `null` entries are unknown cells
/// - `palette_js`: array of `{hex, char}` entries
/// - `direction`: `"LTR"` or `"RTL"`
/// - `corrections_js`: optional `{cellIndex: char}` overrides
#[wasm_bindgen(js_name = encodeRow)]
pub fn encode_row(
    cell_colors_js: JsValue,
    grid_row: usize,
    cols: usize,
    palette_js: JsValue,
    direction: &str,
    corrections_js: JsValue,
) -> Result<String, JsValue> {
    let cell_colors: Vec<Option<String>> = deserialize(cell_colors_js, "Invalid cell colors")?;
    let palette: Vec<ColorEntry> = deserialize(palette_js, "Invalid palette")?;
    let direction = parse_direction(direction)?;
    let corrections = overlay_from_js(corrections_js)?;

    Ok(pattern::encode_row(
        &cell_colors,
        grid_row,
        cols,
        &palette,
        direction,
        corrections.as_ref(),
    ))
}

#[wasm_bindgen(js_name = getStitchType)]
pub fn get_stitch_type(working_row: usize, start_stitch: &str) -> Result<String, JsValue> {
    let start = parse_stitch(start_stitch)?;
    Ok(pattern::stitch_type(working_row, start).as_str().to_string())
}

#[wasm_bindgen(js_name = getRowDirection)]
pub fn get_row_direction(
    stitch: &str,
    knit_direction: &str,
    perl_direction: &str,
) -> Result<String, JsValue> {
    let direction = pattern::row_direction(
        parse_stitch(stitch)?,
        parse_direction(knit_direction)?,
        parse_direction(perl_direction)?,
    );
    Ok(direction.as_str().to_string())
}

#[wasm_bindgen(js_name = getGridRowFromWorking)]
pub fn get_grid_row_from_working(working_row: usize, start_from_bottom: bool, total_rows: usize) -> usize {
    pattern::grid_row_from_working(working_row, start_from_bottom, total_rows)
}

#[wasm_bindgen(js_name = getWorkingRowFromGrid)]
pub fn get_working_row_from_grid(grid_row: usize, start_from_bottom: bool, total_rows: usize) -> usize {
    pattern::working_row_from_grid(grid_row, start_from_bottom, total_rows)
}

#[wasm_bindgen(js_name = getDisplayRowNumber)]
pub fn get_display_row_number(working_row: usize) -> usize {
    pattern::display_row_number(working_row)
}

/// Sample every cell color from canvas `ImageData` bytes
///
/// Returns an array of hex strings (or `null` for unsampled cells); empty
/// unless exactly four crop points are given.
#[wasm_bindgen(js_name = extractCellColors)]
pub fn extract_cell_colors(
    data: &js_sys::Uint8ClampedArray,
    width: usize,
    height: usize,
    points_js: JsValue,
    rows: usize,
    cols: usize,
) -> Result<JsValue, JsValue> {
    let image = RgbaImage::from_rgba(width, height, data.to_vec()).ok_or_else(|| {
        validation_error(format!(
            "Pixel buffer of {} bytes does not match {}x{} RGBA image",
            data.length(),
            width,
            height
        ))
    })?;
    let points: Vec<Point> = deserialize(points_js, "Invalid crop points")?;

    let colors = match Quad::from_points(&points) {
        Some(quad) => extract_cell_colors_default(&image, &quad, GridSpec::capped(rows, cols)),
        None => Vec::new(),
    };
    wasm_log!("extractCellColors: {} cells from {}x{} image", colors.len(), width, height);
    serialize(&colors, "Cell color serialization error")
}
