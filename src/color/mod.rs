//! Color classifier
//!
//! Hex/RGB conversion, RGB distance, WCAG luminance for label contrast, and
//! nearest-palette classification. Malformed colors never panic: parsing
//! yields `None`, distance yields `f64::INFINITY`, luminance yields `0.0`.

use crate::models::constants::*;
use crate::models::{ColorEntry, Rgb};

/// Lowercase `#rrggbb` for an 8-bit RGB triple
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

impl Rgb {
    pub fn to_hex(self) -> String {
        rgb_to_hex(self.r, self.g, self.b)
    }
}

/// Clamp and round a floating-point channel value into `0..=255`
pub fn channel_from_f64(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Parse `#rrggbb` or `rrggbb` (any case). Shorthand and every other shape
/// is rejected.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let v = u32::from_str_radix(digits, 16).ok()?;
    Some(Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8))
}

/// Lowercase hex digits without `#`, for exact comparisons
pub fn normalize_hex(hex: &str) -> String {
    hex.trim_start_matches('#').to_ascii_lowercase()
}

/// Euclidean distance in RGB space, `0.0 ..= ~441.67`
pub fn rgb_distance(a: Rgb, b: Rgb) -> f64 {
    let dr = a.r as f64 - b.r as f64;
    let dg = a.g as f64 - b.g as f64;
    let db = a.b as f64 - b.b as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Distance between two hex colors; `f64::INFINITY` if either is malformed
pub fn color_distance(hex_a: &str, hex_b: &str) -> f64 {
    match (hex_to_rgb(hex_a), hex_to_rgb(hex_b)) {
        (Some(a), Some(b)) => rgb_distance(a, b),
        _ => f64::INFINITY,
    }
}

fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= WCAG_LINEAR_THRESHOLD {
        c / WCAG_DARK_SCALE
    } else {
        ((c + WCAG_LIGHT_BASE) / WCAG_LIGHT_SCALE).powf(WCAG_LIGHT_EXPONENT)
    }
}

/// WCAG 2.0 relative luminance, `0.0` for malformed input
pub fn luminance(hex: &str) -> f64 {
    let Some(rgb) = hex_to_rgb(hex) else {
        return 0.0;
    };

    WCAG_RED_WEIGHT * linearize(rgb.r)
        + WCAG_GREEN_WEIGHT * linearize(rgb.g)
        + WCAG_BLUE_WEIGHT * linearize(rgb.b)
}

/// Black label text on light backgrounds, white on dark ones
pub fn contrast_text_color(background: &str) -> &'static str {
    if luminance(background) > TEXT_COLOR_THRESHOLD {
        BLACK_HEX
    } else {
        WHITE_HEX
    }
}

/// Nearest palette entry to `hex`
///
/// An entry with the same normalized hex wins outright; otherwise the first
/// entry with the smallest distance is returned. Ties therefore resolve by
/// palette order. That order dependence is arbitrary but kept stable, since
/// saved charts rely on it. When every distance is infinite the first entry
/// is returned. `None` only for an empty palette.
pub fn find_closest_palette_entry<'a>(hex: &str, palette: &'a [ColorEntry]) -> Option<&'a ColorEntry> {
    let first = palette.first()?;

    let target = normalize_hex(hex);
    if let Some(exact) = palette.iter().find(|e| normalize_hex(&e.hex) == target) {
        return Some(exact);
    }

    let mut closest = first;
    let mut min_dist = color_distance(hex, &first.hex);
    for entry in &palette[1..] {
        let dist = color_distance(hex, &entry.hex);
        if dist < min_dist {
            min_dist = dist;
            closest = entry;
        }
    }

    Some(closest)
}

/// Fill every entry's `text_color` from its background luminance
pub fn assign_text_colors(palette: &mut [ColorEntry]) {
    for entry in palette.iter_mut() {
        entry.text_color = Some(contrast_text_color(&entry.hex).to_string());
    }
}

/// Distinct colors in first-seen order
///
/// A color is kept only if it is farther than `threshold` from every color
/// already kept. Malformed colors are skipped. `threshold` is clamped to
/// `0 ..= MAX_DEDUPLICATION_THRESHOLD`.
pub fn dedupe_colors<S: AsRef<str>>(colors: &[S], threshold: f64) -> Vec<String> {
    let threshold = threshold.clamp(0.0, MAX_DEDUPLICATION_THRESHOLD);
    let mut kept: Vec<Rgb> = Vec::new();

    for hex in colors {
        let Some(rgb) = hex_to_rgb(hex.as_ref()) else {
            continue;
        };
        if kept.iter().all(|k| rgb_distance(*k, rgb) > threshold) {
            kept.push(rgb);
        }
    }

    kept.into_iter().map(Rgb::to_hex).collect()
}

const LABEL_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Palette suggestion from sampled cell colors: deduplicated colors labelled
/// `A`, `B`, `C`, … with contrast text colors, capped at the palette limit.
pub fn suggest_palette<S: AsRef<str>>(colors: &[S], threshold: f64) -> Vec<ColorEntry> {
    let mut palette: Vec<ColorEntry> = dedupe_colors(colors, threshold)
        .into_iter()
        .zip(LABEL_ALPHABET.chars())
        .take(MAX_PALETTE_COLORS)
        .map(|(hex, c)| ColorEntry::new(hex, c.to_string()))
        .collect();

    assign_text_colors(&mut palette);
    palette
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Vec<ColorEntry> {
        vec![
            ColorEntry::new("#ff0000", "A"),
            ColorEntry::new("#00ff00", "B"),
            ColorEntry::new("#0000ff", "C"),
        ]
    }

    #[test]
    fn test_rgb_to_hex_pads_lowercase() {
        assert_eq!(rgb_to_hex(255, 0, 255), "#ff00ff");
        assert_eq!(rgb_to_hex(0, 128, 255), "#0080ff");
        assert_eq!(rgb_to_hex(1, 2, 3), "#010203");
    }

    #[test]
    fn test_channel_clamping() {
        assert_eq!(channel_from_f64(-4.0), 0);
        assert_eq!(channel_from_f64(300.0), 255);
        assert_eq!(channel_from_f64(127.5), 128);
        assert_eq!(channel_from_f64(f64::NAN), 0);
    }

    #[test]
    fn test_hex_to_rgb_accepts_six_digits() {
        assert_eq!(hex_to_rgb("#ff00ff"), Some(Rgb::new(255, 0, 255)));
        assert_eq!(hex_to_rgb("0080ff"), Some(Rgb::new(0, 128, 255)));
        assert_eq!(hex_to_rgb("#AbCdEf"), Some(Rgb::new(0xab, 0xcd, 0xef)));
    }

    #[test]
    fn test_hex_to_rgb_rejects_other_shapes() {
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("invalid"), None);
        assert_eq!(hex_to_rgb("#ff00ff00"), None);
        assert_eq!(hex_to_rgb("#gg0000"), None);
        assert_eq!(hex_to_rgb("##ff0000"), None);
        assert_eq!(hex_to_rgb("+12345"), None);
        assert_eq!(hex_to_rgb(""), None);
    }

    #[test]
    fn test_color_distance() {
        assert_eq!(color_distance("#ff0000", "#ff0000"), 0.0);
        assert!((color_distance("#000000", "#ffffff") - 441.67).abs() < 0.1);
        assert_eq!(
            color_distance("#123456", "#abcdef"),
            color_distance("#abcdef", "#123456")
        );
        assert!(color_distance("#ff0000", "nope").is_infinite());
    }

    #[test]
    fn test_luminance_extremes() {
        assert!((luminance("#ffffff") - 1.0).abs() < 1e-9);
        assert_eq!(luminance("#000000"), 0.0);
        assert_eq!(luminance("bad"), 0.0);
        let gray = luminance("#808080");
        assert!(gray > 0.2 && gray < 0.23);
    }

    #[test]
    fn test_contrast_text_color() {
        assert_eq!(contrast_text_color("#000000"), "#ffffff");
        assert_eq!(contrast_text_color("#ffffff"), "#000000");
        assert_eq!(contrast_text_color("#ff6600"), "#000000");
        assert_eq!(contrast_text_color("garbage"), "#ffffff");
    }

    #[test]
    fn test_closest_entry_exact_and_nearest() {
        let p = palette();
        assert_eq!(find_closest_palette_entry("#FF0000", &p).unwrap().char, "A");
        assert_eq!(find_closest_palette_entry("#10e010", &p).unwrap().char, "B");
        assert_eq!(find_closest_palette_entry("#0000aa", &p).unwrap().char, "C");
    }

    #[test]
    fn test_closest_entry_ties_go_to_first() {
        let p = vec![
            ColorEntry::new("#000000", "X"),
            ColorEntry::new("#000000", "Y"),
            ColorEntry::new("#020202", "Z"),
        ];
        assert_eq!(find_closest_palette_entry("#010101", &p).unwrap().char, "X");
    }

    #[test]
    fn test_closest_entry_skips_invalid_entries() {
        let p = vec![ColorEntry::new("oops", "?"), ColorEntry::new("#ffffff", "W")];
        assert_eq!(find_closest_palette_entry("#eeeeee", &p).unwrap().char, "W");
    }

    #[test]
    fn test_closest_entry_all_invalid_returns_first() {
        let p = vec![ColorEntry::new("oops", "Q"), ColorEntry::new("nah", "R")];
        assert_eq!(find_closest_palette_entry("#eeeeee", &p).unwrap().char, "Q");
    }

    #[test]
    fn test_closest_entry_empty_palette() {
        assert!(find_closest_palette_entry("#ffffff", &[]).is_none());
    }

    #[test]
    fn test_dedupe_keeps_first_seen() {
        let colors = ["#000000", "#0a0a0a", "#ffffff", "#f0f0f0", "bad", "#ff0000"];
        let kept = dedupe_colors(&colors, 75.0);
        assert_eq!(kept, vec!["#000000", "#ffffff", "#ff0000"]);

        let all = dedupe_colors(&colors, 0.0);
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_suggest_palette_labels_and_text_colors() {
        let palette = suggest_palette(&["#000000", "#ffffff"], 75.0);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0].char, "A");
        assert_eq!(palette[0].text_color.as_deref(), Some("#ffffff"));
        assert_eq!(palette[1].char, "B");
        assert_eq!(palette[1].text_color.as_deref(), Some("#000000"));
    }
}
