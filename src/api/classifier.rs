//! Color classifier exports

use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, serialize};
use crate::color;
use crate::models::constants::DEFAULT_DEDUPLICATION_THRESHOLD;
use crate::models::ColorEntry;

#[wasm_bindgen(js_name = rgbToHex)]
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    color::rgb_to_hex(
        color::channel_from_f64(r),
        color::channel_from_f64(g),
        color::channel_from_f64(b),
    )
}

/// `{r, g, b}` for a 6-digit hex color, `null` when it does not parse
#[wasm_bindgen(js_name = hexToRgb)]
pub fn hex_to_rgb(hex: &str) -> Result<JsValue, JsValue> {
    match color::hex_to_rgb(hex) {
        Some(rgb) => serialize(&rgb, "RGB serialization error"),
        None => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen(js_name = colorDistance)]
pub fn color_distance(hex_a: &str, hex_b: &str) -> f64 {
    color::color_distance(hex_a, hex_b)
}

#[wasm_bindgen(js_name = getLuminance)]
pub fn get_luminance(hex: &str) -> f64 {
    color::luminance(hex)
}

#[wasm_bindgen(js_name = getContrastTextColor)]
pub fn get_contrast_text_color(hex: &str) -> String {
    color::contrast_text_color(hex).to_string()
}

/// Nearest palette entry for a color, `null` for an empty palette
#[wasm_bindgen(js_name = findClosestPaletteEntry)]
pub fn find_closest_palette_entry(hex: &str, palette_js: JsValue) -> Result<JsValue, JsValue> {
    let palette: Vec<ColorEntry> = deserialize(palette_js, "Invalid palette")?;
    match color::find_closest_palette_entry(hex, &palette) {
        Some(entry) => serialize(entry, "ColorEntry serialization error"),
        None => Ok(JsValue::NULL),
    }
}

/// Palette suggestion from sampled colors
///
/// `threshold` defaults to the standard deduplication distance when omitted.
#[wasm_bindgen(js_name = suggestPalette)]
pub fn suggest_palette(colors_js: JsValue, threshold: Option<f64>) -> Result<JsValue, JsValue> {
    let colors: Vec<Option<String>> = deserialize(colors_js, "Invalid color list")?;
    let colors: Vec<String> = colors.into_iter().flatten().collect();
    let palette = color::suggest_palette(
        &colors,
        threshold.unwrap_or(DEFAULT_DEDUPLICATION_THRESHOLD),
    );
    serialize(&palette, "Palette serialization error")
}
