//! Palette and RGB color types

use serde::{Deserialize, Serialize};

/// 8-bit RGB triple
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A palette entry: one representative color and the character used for it
/// in the chart. Characters need not be unique.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColorEntry {
    pub hex: String,
    pub char: String,
    /// Precomputed label color (black or white) for drawing on `hex`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl ColorEntry {
    pub fn new(hex: impl Into<String>, char: impl Into<String>) -> Self {
        Self {
            hex: hex.into(),
            char: char.into(),
            text_color: None,
        }
    }
}
