//! Editing session
//!
//! One [`EditingSession`] owns the state of one open project. Every committed
//! mutation is written back through the [`ProjectRepository`] explicitly, so
//! computation never depends on when or how persistence happens.

use crate::color::assign_text_colors;
use crate::models::constants::{
    BRUSH_SIZE_MAX, BRUSH_SIZE_MIN, MAX_PALETTE_COLORS, PROJECT_NAME_MAX_LENGTH,
};
use crate::models::{
    CellIndex, ColorEntry, GridSpec, Point, ProjectState, ViewportUpdate, WorkingState,
};
use crate::pattern::{encode_chart, encode_row, encode_working_row, ChartRow};
use crate::pattern::{grid_row_from_working, row_direction, stitch_type};
use crate::sampling::{extract_cell_colors_default, PixelSource};
use crate::storage::{ProjectRepository, StorageError};

pub struct EditingSession<R: ProjectRepository> {
    repo: R,
    project: ProjectState,
    /// Sampled colors in row-major order, recomputed on demand and never persisted
    cell_colors: Vec<Option<String>>,
}

impl<R: ProjectRepository> EditingSession<R> {
    /// Create and persist a new project
    pub fn create(repo: R, name: &str) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        let project = ProjectState::new(id, clean_name(name).unwrap_or_default())
            .with_created_at(chrono::Utc::now().timestamp_millis());

        let mut session = Self::with_project(repo, project);
        session.commit();
        session
    }

    /// Open a stored project
    ///
    /// Returns `None` for an unknown id. A stored record that cannot be read
    /// is logged and replaced by a fresh project under the same id.
    pub fn open(repo: R, id: &str) -> Option<Self> {
        let project = match repo.load(id) {
            Ok(project) => project,
            Err(StorageError::NotFound(_)) => {
                log::warn!("No project with id {}", id);
                return None;
            }
            Err(e) => {
                log::error!("Project {} could not be loaded, starting empty: {}", id, e);
                ProjectState::new(id, "")
            }
        };
        Some(Self::with_project(repo, project))
    }

    /// Wrap an in-memory project without touching storage
    pub fn with_project(repo: R, project: ProjectState) -> Self {
        Self {
            repo,
            project,
            cell_colors: Vec::new(),
        }
    }

    pub fn project(&self) -> &ProjectState {
        &self.project
    }

    pub fn id(&self) -> &str {
        &self.project.uuid
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    pub fn cell_colors(&self) -> &[Option<String>] {
        &self.cell_colors
    }

    /// Write the whole project back. Failures are logged, never raised.
    pub fn commit(&mut self) -> bool {
        match self.repo.save(&self.project.uuid, &self.project) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save project {}: {}", self.project.uuid, e);
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Project fields
    // ------------------------------------------------------------------

    /// Blank names are ignored; long names are truncated
    pub fn rename(&mut self, name: &str) -> bool {
        let Some(name) = clean_name(name) else {
            log::debug!("Ignoring blank project name");
            return false;
        };
        self.project.name = name;
        self.commit()
    }

    pub fn set_image(&mut self, image: Option<String>) -> bool {
        self.project.image = image;
        self.cell_colors.clear();
        self.commit()
    }

    /// Replace the crop corners. Anything but four points leaves the project
    /// uncropped for mapping purposes.
    pub fn set_crop(&mut self, points: Option<Vec<Point>>) -> bool {
        self.project.crop_points = points;
        self.cell_colors.clear();
        self.commit()
    }

    /// Resize the grid; color and thickness keep their value when absent
    pub fn set_grid(
        &mut self,
        rows: usize,
        cols: usize,
        color: Option<String>,
        thickness: Option<f64>,
    ) -> bool {
        let grid = GridSpec::clamped(rows, cols);
        if grid != self.project.grid() {
            self.cell_colors.clear();
        }
        self.project.set_grid(grid);

        if let Some(color) = color {
            self.project.grid_color = color;
        }
        if let Some(thickness) = thickness.filter(|t| t.is_finite() && *t >= 0.0) {
            self.project.grid_thickness = thickness;
        }
        self.clamp_position();
        self.commit()
    }

    pub fn set_palette(&mut self, palette: &[ColorEntry]) -> bool {
        if palette.len() > MAX_PALETTE_COLORS {
            log::warn!(
                "Palette of {} colors truncated to {}",
                palette.len(),
                MAX_PALETTE_COLORS
            );
        }
        let mut colors: Vec<ColorEntry> =
            palette.iter().take(MAX_PALETTE_COLORS).cloned().collect();
        assign_text_colors(&mut colors);
        self.project.colors = colors;
        self.commit()
    }

    pub fn set_working_state(&mut self, working: WorkingState) -> bool {
        self.project.working_state = working;
        self.clamp_position();
        self.commit()
    }

    pub fn update_viewport(&mut self, update: ViewportUpdate) -> bool {
        self.project.viewport_state.apply(update);
        self.commit()
    }

    // ------------------------------------------------------------------
    // Working position
    // ------------------------------------------------------------------

    pub fn set_working_active(&mut self, active: bool) -> bool {
        self.project.working_state.is_active = active;
        self.commit()
    }

    /// Move to a working row and column, clamped to the grid
    pub fn set_position(&mut self, working_row: usize, col: usize) -> bool {
        self.project.working_state.current_row = working_row;
        self.project.working_state.current_col = col;
        self.clamp_position();
        self.commit()
    }

    pub fn next_row(&mut self) -> bool {
        let (row, col) = self.position();
        self.set_position(row.saturating_add(1), col)
    }

    pub fn prev_row(&mut self) -> bool {
        let (row, col) = self.position();
        self.set_position(row.saturating_sub(1), col)
    }

    pub fn next_col(&mut self) -> bool {
        let (row, col) = self.position();
        self.set_position(row, col.saturating_add(1))
    }

    pub fn prev_col(&mut self) -> bool {
        let (row, col) = self.position();
        self.set_position(row, col.saturating_sub(1))
    }

    /// Working row and column
    pub fn position(&self) -> (usize, usize) {
        let ws = &self.project.working_state;
        (ws.current_row, ws.current_col)
    }

    fn clamp_position(&mut self) {
        let grid = self.project.grid();
        let ws = &mut self.project.working_state;
        ws.current_row = ws.current_row.min(grid.rows.saturating_sub(1));
        ws.current_col = ws.current_col.min(grid.cols.saturating_sub(1));
        ws.start_col = ws.start_col.min(grid.cols.saturating_sub(1));
    }

    /// Grid cell under the working position
    pub fn current_cell(&self) -> Option<CellIndex> {
        let grid = self.project.grid();
        let ws = &self.project.working_state;
        let grid_row = grid_row_from_working(ws.current_row, ws.start_from_bottom, grid.rows);
        grid.index(grid_row, ws.current_col)
    }

    // ------------------------------------------------------------------
    // Corrections
    // ------------------------------------------------------------------

    /// Correct one cell. Indices outside the grid are ignored.
    pub fn paint_cell(&mut self, index: CellIndex, letter: &str) -> bool {
        if self.project.grid().position(index).is_none() {
            log::debug!("Ignoring paint outside grid at {}", index);
            return false;
        }
        self.project.corrections.paint_cell(index, letter);
        self.commit()
    }

    /// Paint with the selected letter and brush size as one undoable edit
    pub fn paint_at(&mut self, index: CellIndex) -> bool {
        let Some(letter) = self.project.selected_letter.clone() else {
            log::debug!("No correction letter selected");
            return false;
        };
        let grid = self.project.grid();
        let brush = self.project.brush_size;
        if !self.project.corrections.paint_brush(index, &letter, brush, grid) {
            return false;
        }
        self.commit()
    }

    pub fn undo(&mut self) -> bool {
        self.project.corrections.undo() && self.commit()
    }

    pub fn redo(&mut self) -> bool {
        self.project.corrections.redo() && self.commit()
    }

    pub fn clear_corrections(&mut self) -> bool {
        self.project.corrections.clear();
        self.commit()
    }

    pub fn toggle_correction_mode(&mut self) -> bool {
        self.project.correction_mode_active = !self.project.correction_mode_active;
        self.commit()
    }

    pub fn set_correction_letter(&mut self, letter: Option<String>) -> bool {
        self.project.selected_letter = letter;
        self.commit()
    }

    pub fn set_brush_size(&mut self, size: usize) -> bool {
        self.project.brush_size = size.clamp(BRUSH_SIZE_MIN, BRUSH_SIZE_MAX);
        self.commit()
    }

    // ------------------------------------------------------------------
    // Sampling and encoding
    // ------------------------------------------------------------------

    /// Recompute every cell color from `source`. An uncropped project has no
    /// cell colors.
    pub fn resample<P: PixelSource + ?Sized>(&mut self, source: &P) -> usize {
        self.cell_colors = match self.project.quad() {
            Some(quad) => extract_cell_colors_default(source, &quad, self.project.grid()),
            None => Vec::new(),
        };
        self.cell_colors.len()
    }

    /// Use colors computed elsewhere, e.g. by the browser canvas
    pub fn set_cell_colors(&mut self, colors: Vec<Option<String>>) {
        self.cell_colors = colors;
    }

    /// RLE of a working row, read in its stitch direction
    pub fn row_rle(&self, working_row: usize) -> String {
        let grid = self.project.grid();
        encode_working_row(
            &self.cell_colors,
            working_row,
            grid.rows,
            grid.cols,
            &self.project.colors,
            &self.project.working_state,
            Some(self.project.corrections.overlay()),
        )
        .map(|row| row.rle)
        .unwrap_or_default()
    }

    pub fn current_row_rle(&self) -> String {
        self.row_rle(self.project.working_state.current_row)
    }

    /// RLE of a grid row, in the direction its working row is worked
    pub fn grid_row_rle(&self, grid_row: usize) -> String {
        let grid = self.project.grid();
        let ws = &self.project.working_state;
        if grid_row >= grid.rows {
            return String::new();
        }
        let working_row = grid_row_from_working(grid_row, ws.start_from_bottom, grid.rows);
        let stitch = stitch_type(working_row, ws.start_stitch);
        let direction = row_direction(stitch, ws.knit_direction, ws.perl_direction);
        encode_row(
            &self.cell_colors,
            grid_row,
            grid.cols,
            &self.project.colors,
            direction,
            Some(self.project.corrections.overlay()),
        )
    }

    pub fn chart(&self) -> Vec<ChartRow> {
        let grid = self.project.grid();
        encode_chart(
            &self.cell_colors,
            grid.rows,
            grid.cols,
            &self.project.colors,
            &self.project.working_state,
            Some(self.project.corrections.overlay()),
        )
    }

    /// Remove the project from storage, returning the repository
    pub fn delete(mut self) -> (R, bool) {
        let removed = match self.repo.delete(&self.project.uuid) {
            Ok(removed) => removed,
            Err(e) => {
                log::error!("Failed to delete project {}: {}", self.project.uuid, e);
                false
            }
        };
        (self.repo, removed)
    }
}

fn clean_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(PROJECT_NAME_MAX_LENGTH).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Quad, Rgb};
    use crate::sampling::RgbaImage;
    use crate::storage::{KeyValueStore, MemoryRepository};

    fn session() -> EditingSession<MemoryRepository> {
        EditingSession::create(MemoryRepository::in_memory(), "scarf")
    }

    fn reload(s: &EditingSession<MemoryRepository>) -> ProjectState {
        s.repository().load(s.id()).unwrap()
    }

    #[test]
    fn test_create_persists_defaults() {
        let s = session();
        let stored = reload(&s);
        assert_eq!(stored.name, "scarf");
        assert_eq!(stored.grid(), GridSpec::new(10, 10));
        assert!(stored.created_at > 0);
        assert_eq!(s.id().len(), 36);
    }

    #[test]
    fn test_open_unknown_is_none() {
        assert!(EditingSession::open(MemoryRepository::in_memory(), "missing").is_none());
    }

    #[test]
    fn test_open_corrupt_starts_empty() {
        let mut repo = MemoryRepository::in_memory();
        repo.store_mut().set("project-broken", "{\"uuid\": 5").unwrap();

        let s = EditingSession::open(repo, "broken").unwrap();
        assert_eq!(s.id(), "broken");
        assert!(s.project().corrections.is_empty());
        assert_eq!(s.project().grid(), GridSpec::new(10, 10));
    }

    #[test]
    fn test_open_oversized_grid_is_clamped() {
        let mut repo = MemoryRepository::in_memory();
        repo.store_mut()
            .set("project-big", r#"{"uuid":"big","rows":9223372036854775807,"cols":4}"#)
            .unwrap();

        let mut s = EditingSession::open(repo, "big").unwrap();
        assert_eq!(s.project().grid(), GridSpec::new(500, 4));
        assert!(s.paint_cell(0, "A"));
        assert!(!s.paint_cell(2000, "A"));
        assert_eq!(s.project().corrections.get(0), Some("A"));
    }

    #[test]
    fn test_every_mutation_is_saved() {
        let mut s = session();
        s.set_grid(4, 6, Some("#ff0000".into()), None);
        s.paint_cell(5, "A");

        let stored = reload(&s);
        assert_eq!(stored.grid(), GridSpec::new(4, 6));
        assert_eq!(stored.grid_color, "#ff0000");
        assert_eq!(stored.grid_thickness, 2.0);
        assert_eq!(stored.corrections.get(5), Some("A"));
    }

    #[test]
    fn test_rename_trims_and_rejects_blank() {
        let mut s = session();
        assert!(!s.rename("   "));
        assert_eq!(s.project().name, "scarf");

        s.rename(&"x".repeat(150));
        assert_eq!(s.project().name.len(), PROJECT_NAME_MAX_LENGTH);
    }

    #[test]
    fn test_grid_is_clamped() {
        let mut s = session();
        s.set_grid(0, 9999, None, None);
        assert_eq!(s.project().grid(), GridSpec::new(1, 500));
    }

    #[test]
    fn test_paint_outside_grid_is_ignored() {
        let mut s = session();
        assert!(!s.paint_cell(100, "A"));
        assert!(s.project().corrections.is_empty());
    }

    #[test]
    fn test_brush_needs_selected_letter() {
        let mut s = session();
        assert!(!s.paint_at(55));

        s.set_correction_letter(Some("B".into()));
        s.set_brush_size(3);
        assert!(s.paint_at(55));
        assert_eq!(s.project().corrections.overlay().len(), 9);

        // A single undo removes the whole stroke
        s.undo();
        assert!(s.project().corrections.is_empty());
    }

    #[test]
    fn test_brush_size_clamped() {
        let mut s = session();
        s.set_brush_size(0);
        assert_eq!(s.project().brush_size, BRUSH_SIZE_MIN);
        s.set_brush_size(12);
        assert_eq!(s.project().brush_size, BRUSH_SIZE_MAX);
    }

    #[test]
    fn test_undo_redo_are_persisted() {
        let mut s = session();
        s.paint_cell(1, "X");
        assert!(s.undo());
        assert!(reload(&s).corrections.is_empty());
        assert!(s.redo());
        assert_eq!(reload(&s).corrections.get(1), Some("X"));
        assert!(!s.redo());
    }

    #[test]
    fn test_navigation_clamps() {
        let mut s = session();
        s.set_grid(3, 2, None, None);
        s.prev_row();
        assert_eq!(s.project().working_state.current_row, 0);

        for _ in 0..5 {
            s.next_row();
            s.next_col();
        }
        assert_eq!(s.project().working_state.current_row, 2);
        assert_eq!(s.project().working_state.current_col, 1);

        // Working row 2 from the bottom is grid row 0
        assert_eq!(s.current_cell(), Some(1));

        s.set_grid(2, 2, None, None);
        assert_eq!(s.project().working_state.current_row, 1);
    }

    #[test]
    fn test_resample_and_encode() {
        let mut s = session();
        s.set_grid(1, 4, None, None);
        s.set_palette(&[ColorEntry::new("#ff0000", "R"), ColorEntry::new("#0000ff", "B")]);

        // Uncropped: nothing sampled
        let img = RgbaImage::filled(16, 2, Rgb::new(255, 0, 0));
        assert_eq!(s.resample(&img), 0);
        assert_eq!(s.current_row_rle(), "");

        s.set_crop(Some(Quad::unit().points().to_vec()));
        let mut img = img;
        for x in 8..16 {
            img.set_pixel(x, 0, Rgb::new(0, 0, 255));
            img.set_pixel(x, 1, Rgb::new(0, 0, 255));
        }
        assert_eq!(s.resample(&img), 4);

        // Row 0 is knit, worked right to left by default
        assert_eq!(s.current_row_rle(), "2B 2R");
        assert_eq!(s.grid_row_rle(0), "2B 2R");

        let mut ws = s.project().working_state.clone();
        ws.knit_direction = Direction::LeftToRight;
        s.set_working_state(ws);
        assert_eq!(s.current_row_rle(), "2R 2B");

        s.paint_cell(0, "B");
        assert_eq!(s.current_row_rle(), "1B 1R 2B");
        assert_eq!(s.chart().len(), 1);
    }

    #[test]
    fn test_set_palette_caps_and_colors_labels() {
        let mut s = session();
        let palette: Vec<ColorEntry> = (0..120)
            .map(|i| ColorEntry::new("#000000", format!("{}", i)))
            .collect();
        s.set_palette(&palette);
        assert_eq!(s.project().colors.len(), MAX_PALETTE_COLORS);
        assert_eq!(s.project().colors[0].text_color.as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_delete_removes_project() {
        let s = session();
        let id = s.id().to_string();
        let (repo, removed) = s.delete();
        assert!(removed);
        assert!(EditingSession::open(repo, &id).is_none());
    }
}
