//! Rendering adapter for the chart canvas
//!
//! This module turns project geometry and classified cell colors into a
//! display list of canvas-pixel marks (grid lines, labels, crop outline,
//! handles, working highlights) for the JavaScript canvas to draw.

pub mod display_list;
pub mod overlay;

// Re-export commonly used types
pub use display_list::{
    ChartDisplayList,
    GridOverlay,
    HandleMark,
    HighlightPolygon,
    LabelMark,
    QuadOutline,
    Stroke,
};
pub use overlay::{
    build_display_list,
    cell_highlight,
    cell_labels,
    color_labels,
    grid_overlay,
    handles,
    label_metrics,
    quad_outline,
    row_highlight,
};
