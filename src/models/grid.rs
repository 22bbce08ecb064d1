//! Logical cell grid laid over the crop quadrilateral

use serde::{Deserialize, Serialize};

use super::constants::{
    DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS, MAX_GRID_COLS, MAX_GRID_ROWS, MIN_GRID_COLS,
    MIN_GRID_ROWS,
};

/// Row-major cell address: `row * cols + col`
pub type CellIndex = usize;

/// Grid dimensions. Values decoded from storage may be zero; every consumer
/// treats a zero dimension as an empty grid.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_ROWS,
            cols: DEFAULT_GRID_COLS,
        }
    }
}

impl GridSpec {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Build a grid with both dimensions clamped to the editor limits
    pub fn clamped(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.clamp(MIN_GRID_ROWS, MAX_GRID_ROWS),
            cols: cols.clamp(MIN_GRID_COLS, MAX_GRID_COLS),
        }
    }

    /// Cap both dimensions at the editor maximums, keeping zero as zero
    pub fn capped(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.min(MAX_GRID_ROWS),
            cols: cols.min(MAX_GRID_COLS),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Saturates instead of overflowing for grids that never went through
    /// [`GridSpec::clamped`]
    pub fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    pub fn index(&self, row: usize, col: usize) -> Option<CellIndex> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        row.checked_mul(self.cols)?.checked_add(col)
    }

    /// Inverse of [`GridSpec::index`]
    pub fn position(&self, index: CellIndex) -> Option<(usize, usize)> {
        (index < self.cell_count()).then(|| (index / self.cols, index % self.cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_row_major() {
        let grid = GridSpec::new(3, 4);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(1, 0), Some(4));
        assert_eq!(grid.index(2, 3), Some(11));
        assert_eq!(grid.index(3, 0), None);
        assert_eq!(grid.index(0, 4), None);
    }

    #[test]
    fn test_position_inverts_index() {
        let grid = GridSpec::new(5, 7);
        for idx in 0..grid.cell_count() {
            let (row, col) = grid.position(idx).unwrap();
            assert_eq!(grid.index(row, col), Some(idx));
        }
        assert_eq!(grid.position(35), None);
    }

    #[test]
    fn test_clamped_limits() {
        assert_eq!(GridSpec::clamped(0, 900), GridSpec::new(1, 500));
    }

    #[test]
    fn test_capped_keeps_empty_grid_empty() {
        assert_eq!(GridSpec::capped(0, 9000), GridSpec::new(0, 500));
        assert_eq!(GridSpec::capped(usize::MAX, 7), GridSpec::new(500, 7));
    }

    #[test]
    fn test_huge_grid_does_not_overflow() {
        let grid = GridSpec::new(usize::MAX, 4);
        assert_eq!(grid.cell_count(), usize::MAX);
        assert_eq!(grid.index(usize::MAX - 1, 3), None);
        assert_eq!(grid.position(5), Some((1, 1)));
    }

    #[test]
    fn test_zero_grid_is_empty() {
        assert!(GridSpec::new(0, 5).is_empty());
        assert_eq!(GridSpec::new(0, 5).position(0), None);
    }
}
