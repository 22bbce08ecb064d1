//! Limits and defaults shared across the chart engine
//!
//! Every tunable number lives here so that defaults are applied in one
//! place (project construction, serde defaults) instead of at each call site.

// ============================================================================
// Grid
// ============================================================================

pub const MIN_GRID_ROWS: usize = 1;
pub const MAX_GRID_ROWS: usize = 500;
pub const MIN_GRID_COLS: usize = 1;
pub const MAX_GRID_COLS: usize = 500;
pub const DEFAULT_GRID_ROWS: usize = 10;
pub const DEFAULT_GRID_COLS: usize = 10;

/// Default grid line color (green)
pub const DEFAULT_GRID_COLOR: &str = "#22c55e";

/// Default grid line thickness in canvas pixels
pub const DEFAULT_GRID_THICKNESS: f64 = 2.0;

/// Opacity used when stroking grid lines
pub const GRID_LINE_ALPHA: f64 = 0.6;

/// Thinnest grid line drawn, whatever the configured thickness
pub const MIN_GRID_LINE_WIDTH: f64 = 0.5;

// ============================================================================
// Color
// ============================================================================

/// Maximum number of entries in a project palette
pub const MAX_PALETTE_COLORS: usize = 100;

/// Largest meaningful RGB distance, black to white is ~441.67
pub const MAX_DEDUPLICATION_THRESHOLD: f64 = 441.0;

pub const DEFAULT_DEDUPLICATION_THRESHOLD: f64 = 75.0;

/// Side of the square pixel window averaged for each cell
pub const DEFAULT_SAMPLE_SIZE: usize = 3;

/// Character used when a cell cannot be classified
pub const UNKNOWN_CELL_CHAR: &str = "?";

// WCAG 2.0 relative luminance
pub const WCAG_LINEAR_THRESHOLD: f64 = 0.03928;
pub const WCAG_DARK_SCALE: f64 = 12.92;
pub const WCAG_LIGHT_BASE: f64 = 0.055;
pub const WCAG_LIGHT_SCALE: f64 = 1.055;
pub const WCAG_LIGHT_EXPONENT: f64 = 2.4;
pub const WCAG_RED_WEIGHT: f64 = 0.2126;
pub const WCAG_GREEN_WEIGHT: f64 = 0.7152;
pub const WCAG_BLUE_WEIGHT: f64 = 0.0722;

/// Luminance above which labels are drawn in black
pub const TEXT_COLOR_THRESHOLD: f64 = 0.179;

pub const BLACK_HEX: &str = "#000000";
pub const WHITE_HEX: &str = "#ffffff";

// ============================================================================
// Corrections
// ============================================================================

pub const MAX_UNDO_STEPS: usize = 100;
pub const BRUSH_SIZE_MIN: usize = 1;
pub const BRUSH_SIZE_MAX: usize = 5;
pub const DEFAULT_BRUSH_SIZE: usize = 1;

// ============================================================================
// Working mode
// ============================================================================

pub const DEFAULT_HIGHLIGHT_COLOR: &str = "rgba(34, 197, 94, 0.4)";

// ============================================================================
// Viewport & interaction
// ============================================================================

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 4.0;

/// Pointer travel (pixels) below which a press is not a drag
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Radius of the crop corner handles in canvas pixels
pub const HANDLE_RADIUS: f64 = 6.0;
pub const HANDLE_FILL: &str = "#3b82f6";
pub const HANDLE_BORDER_COLOR: &str = "#ffffff";
pub const HANDLE_BORDER_WIDTH: f64 = 2.0;

// ============================================================================
// Label rendering
// ============================================================================

pub const LABEL_RADIUS_MIN: f64 = 4.0;
pub const LABEL_RADIUS_MAX: f64 = 12.0;
pub const LABEL_RADIUS_SCALE: f64 = 0.24;
pub const LABEL_FONT_MIN: f64 = 8.0;
pub const LABEL_FONT_MAX: f64 = 14.0;
pub const LABEL_FONT_SCALE: f64 = 0.28;
pub const LABEL_FONT_FAMILY: &str = "Arial";

// ============================================================================
// Projects & storage
// ============================================================================

pub const PROJECT_NAME_MAX_LENGTH: usize = 100;
