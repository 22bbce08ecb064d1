//! Working-mode state: which row the knitter is on and how rows are read

use serde::{Deserialize, Serialize};

use super::constants::DEFAULT_HIGHLIGHT_COLOR;

/// Stitch type of a working row
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum StitchType {
    #[default]
    #[serde(rename = "K")]
    Knit,
    #[serde(rename = "P")]
    Purl,
}

impl StitchType {
    /// The other stitch type
    pub fn flip(self) -> Self {
        match self {
            StitchType::Knit => StitchType::Purl,
            StitchType::Purl => StitchType::Knit,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StitchType::Knit => "K",
            StitchType::Purl => "P",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "K" | "k" => Some(StitchType::Knit),
            "P" | "p" => Some(StitchType::Purl),
            _ => None,
        }
    }
}

/// Reading direction of a row
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "LTR")]
    LeftToRight,
    #[serde(rename = "RTL")]
    RightToLeft,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::LeftToRight => "LTR",
            Direction::RightToLeft => "RTL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LTR" => Some(Direction::LeftToRight),
            "RTL" => Some(Direction::RightToLeft),
            _ => None,
        }
    }
}

/// Active working position and the stitch/direction convention of a project
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkingState {
    pub is_active: bool,

    /// Working row (0 = first row worked), not a grid row
    pub current_row: usize,

    pub current_col: usize,

    pub start_from_bottom: bool,

    /// Stitch type of working row 0
    pub start_stitch: StitchType,

    pub knit_direction: Direction,

    pub perl_direction: Direction,

    /// CSS color used for the row/cell highlight overlay
    pub highlight_color: String,

    pub start_col: usize,
}

impl Default for WorkingState {
    fn default() -> Self {
        Self {
            is_active: false,
            current_row: 0,
            current_col: 0,
            start_from_bottom: true,
            start_stitch: StitchType::Knit,
            knit_direction: Direction::RightToLeft,
            perl_direction: Direction::LeftToRight,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
            start_col: 0,
        }
    }
}
