//! Display list for the chart canvas
//!
//! Everything the browser needs to paint the chart overlay, precomputed in
//! canvas pixels. JavaScript only replays these marks onto a 2D context and
//! performs no geometry of its own.

use serde::{Deserialize, Serialize};

use crate::geometry::Segment;
use crate::models::Point;

/// Top-level display list for one frame
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartDisplayList {
    /// Canvas size the marks were computed for
    pub width: f64,
    pub height: f64,

    pub outline: Option<QuadOutline>,
    pub handles: Vec<HandleMark>,
    pub grid: Option<GridOverlay>,
    pub labels: Vec<LabelMark>,

    /// Active working row, only while working mode is on
    pub row_highlight: Option<HighlightPolygon>,
    pub cell_highlight: Option<HighlightPolygon>,
}

/// Stroke style shared by outlines and grid lines
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    pub alpha: f64,
}

/// Interior grid lines, horizontal first
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GridOverlay {
    pub stroke: Stroke,
    pub segments: Vec<Segment>,
}

/// Crop polygon as drawn so far. Closed only once all four corners exist.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QuadOutline {
    pub points: Vec<Point>,
    pub closed: bool,
    pub stroke: Stroke,
}

/// Draggable crop corner
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HandleMark {
    pub index: usize,
    pub center: Point,
    pub radius: f64,
    pub fill: String,
    pub border_color: String,
    pub border_width: f64,
}

/// Filled circle with the cell's chart character on top
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabelMark {
    /// Row-major cell index
    pub cell: usize,
    pub center: Point,
    pub radius: f64,
    /// Circle fill, the palette color
    pub fill: String,
    pub text: String,
    pub text_color: String,
    /// CSS font shorthand, e.g. `bold 12px Arial`
    pub font: String,
}

/// Translucent polygon over a row or a single cell
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HighlightPolygon {
    pub points: [Point; 4],
    pub fill: String,
}
