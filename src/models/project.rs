//! Project record: everything the editor persists for one chart
//!
//! Defaults are applied once, in [`ProjectState::new`] and through serde
//! `default` attributes when older, sparser records are decoded.

use serde::{Deserialize, Serialize};

use super::color::ColorEntry;
use super::constants::*;
use super::geometry::{Point, Quad};
use super::grid::GridSpec;
use super::working::WorkingState;
use crate::undo::CorrectionHistory;

/// Canvas zoom and pan
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewportState {
    /// 1.0 = 100%
    pub zoom_level: f64,
    /// Normalized pan offsets
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom_level: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

/// Partial viewport update; absent fields keep their current value
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewportUpdate {
    pub zoom_level: Option<f64>,
    pub pan_x: Option<f64>,
    pub pan_y: Option<f64>,
}

impl ViewportState {
    pub fn apply(&mut self, update: ViewportUpdate) {
        if let Some(zoom) = update.zoom_level {
            self.zoom_level = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
        if let Some(x) = update.pan_x {
            self.pan_x = x;
        }
        if let Some(y) = update.pan_y {
            self.pan_y = y;
        }
    }
}

fn default_rows() -> usize {
    DEFAULT_GRID_ROWS
}

fn default_cols() -> usize {
    DEFAULT_GRID_COLS
}

fn default_grid_color() -> String {
    DEFAULT_GRID_COLOR.to_string()
}

fn default_grid_thickness() -> f64 {
    DEFAULT_GRID_THICKNESS
}

fn default_brush_size() -> usize {
    DEFAULT_BRUSH_SIZE
}

/// Complete persisted state of one project
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    pub uuid: String,

    #[serde(default)]
    pub name: String,

    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub created_at: i64,

    /// Source photo, as a data URL. Opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Crop corners in drawing order, normalized to `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_points: Option<Vec<Point>>,

    #[serde(default = "default_rows")]
    pub rows: usize,

    #[serde(default = "default_cols")]
    pub cols: usize,

    #[serde(default = "default_grid_color")]
    pub grid_color: String,

    #[serde(default = "default_grid_thickness")]
    pub grid_thickness: f64,

    #[serde(default)]
    pub colors: Vec<ColorEntry>,

    #[serde(default)]
    pub working_state: WorkingState,

    #[serde(default)]
    pub corrections: CorrectionHistory,

    #[serde(default)]
    pub correction_mode_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_letter: Option<String>,

    #[serde(default = "default_brush_size")]
    pub brush_size: usize,

    #[serde(default)]
    pub viewport_state: ViewportState,
}

impl ProjectState {
    /// Fresh project with every default applied
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            created_at: 0,
            image: None,
            crop_points: None,
            rows: DEFAULT_GRID_ROWS,
            cols: DEFAULT_GRID_COLS,
            grid_color: default_grid_color(),
            grid_thickness: DEFAULT_GRID_THICKNESS,
            colors: Vec::new(),
            working_state: WorkingState::default(),
            corrections: CorrectionHistory::default(),
            correction_mode_active: false,
            selected_letter: None,
            brush_size: DEFAULT_BRUSH_SIZE,
            viewport_state: ViewportState::default(),
        }
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn grid(&self) -> GridSpec {
        GridSpec::new(self.rows, self.cols)
    }

    pub fn set_grid(&mut self, grid: GridSpec) {
        self.rows = grid.rows;
        self.cols = grid.cols;
    }

    /// Bring a decoded record back inside the editor limits: grid size,
    /// brush size, working position and undo depth. Records written by the
    /// editor are unchanged.
    pub fn normalize(&mut self) {
        let grid = GridSpec::clamped(self.rows, self.cols);
        self.set_grid(grid);
        self.brush_size = self.brush_size.clamp(BRUSH_SIZE_MIN, BRUSH_SIZE_MAX);

        let last_row = grid.rows - 1;
        let last_col = grid.cols - 1;
        let ws = &mut self.working_state;
        ws.current_row = ws.current_row.min(last_row);
        ws.current_col = ws.current_col.min(last_col);
        ws.start_col = ws.start_col.min(last_col);

        self.corrections.enforce_depth();
    }

    /// The crop quadrilateral, or `None` while the project is not cropped
    pub fn quad(&self) -> Option<Quad> {
        self.crop_points.as_deref().and_then(Quad::from_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_defaults() {
        let p = ProjectState::new("abc", "demo");
        assert_eq!(p.grid(), GridSpec::new(10, 10));
        assert_eq!(p.grid_color, "#22c55e");
        assert_eq!(p.grid_thickness, 2.0);
        assert_eq!(p.brush_size, 1);
        assert!(p.colors.is_empty());
        assert!(p.corrections.is_empty());
        assert!(p.quad().is_none());
    }

    #[test]
    fn test_sparse_record_decodes_with_defaults() {
        let p: ProjectState =
            serde_json::from_str(r#"{"uuid":"p1","name":"old","rows":3,"cols":4}"#).unwrap();
        assert_eq!(p.grid(), GridSpec::new(3, 4));
        assert_eq!(p.grid_color, DEFAULT_GRID_COLOR);
        assert_eq!(p.brush_size, DEFAULT_BRUSH_SIZE);
        assert_eq!(p.corrections.max_depth(), MAX_UNDO_STEPS);
        assert_eq!(p.viewport_state, ViewportState::default());
    }

    #[test]
    fn test_normalize_clamps_oversized_record() {
        let mut p: ProjectState = serde_json::from_str(
            r#"{"uuid":"big","rows":9223372036854775807,"cols":0,"brushSize":40,
                "workingState":{"currentRow":900,"currentCol":7}}"#,
        )
        .unwrap();
        p.normalize();

        assert_eq!(p.grid(), GridSpec::new(MAX_GRID_ROWS, MIN_GRID_COLS));
        assert_eq!(p.brush_size, BRUSH_SIZE_MAX);
        assert_eq!(p.working_state.current_row, MAX_GRID_ROWS - 1);
        assert_eq!(p.working_state.current_col, 0);
    }

    #[test]
    fn test_normalize_keeps_valid_record() {
        let mut p = ProjectState::new("ok", "fine");
        p.set_grid(GridSpec::new(12, 30));
        p.brush_size = 3;
        let before = p.clone();
        p.normalize();
        assert_eq!(p, before);
    }

    #[test]
    fn test_round_trip_keeps_corrections() {
        let mut p = ProjectState::new("p2", "chart");
        p.crop_points = Some(Quad::unit().points().to_vec());
        p.colors.push(ColorEntry::new("#111111", "A"));
        p.corrections.paint_cell(42, "A");
        p.corrections.paint_cell(7, "B");

        let json = serde_json::to_string(&p).unwrap();
        let back: ProjectState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.corrections.get(42), Some("A"));
    }

    #[test]
    fn test_three_crop_points_are_not_a_quad() {
        let mut p = ProjectState::new("p3", "partial");
        p.crop_points = Some(vec![Point::new(0.0, 0.0); 3]);
        assert!(p.quad().is_none());
    }

    #[test]
    fn test_viewport_zoom_is_clamped() {
        let mut v = ViewportState::default();
        v.apply(ViewportUpdate {
            zoom_level: Some(9.0),
            pan_x: Some(0.25),
            pan_y: None,
        });
        assert_eq!(v.zoom_level, MAX_ZOOM);
        assert_eq!(v.pan_x, 0.25);
        assert_eq!(v.pan_y, 0.0);
    }
}
