//! Correction overlay and its undo/redo history
//!
//! Snapshot based: each edit stores the whole previous overlay. Overlays are
//! sparse, so a snapshot is only as large as the number of corrected cells.

use crate::models::{CellIndex, GridSpec};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::models::constants::MAX_UNDO_STEPS;

/// Manually chosen characters keyed by cell index. Always wins over the
/// sampled classification of a cell.
pub type CorrectionOverlay = BTreeMap<CellIndex, String>;

fn default_max_depth() -> usize {
    MAX_UNDO_STEPS
}

/// Correction overlay with linear, bounded undo/redo history
///
/// Every mutating edit snapshots the whole overlay onto the undo stack before
/// applying itself and discards the redo stack. Undo and redo swap the current
/// overlay with the top of the opposite stack. When a stack is full the oldest
/// snapshot is evicted from the bottom; edits are never refused.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionHistory {
    /// Current overlay
    #[serde(default, rename = "correctedLetters")]
    overlay: CorrectionOverlay,
    #[serde(default)]
    undo_stack: VecDeque<CorrectionOverlay>,
    #[serde(default)]
    redo_stack: VecDeque<CorrectionOverlay>,
    /// Maximum number of snapshots kept on each stack
    #[serde(default = "default_max_depth")]
    max_depth: usize,
}

impl Default for CorrectionHistory {
    fn default() -> Self {
        Self::new(MAX_UNDO_STEPS)
    }
}

impl CorrectionHistory {
    /// Create an empty history with the given stack depth
    pub fn new(max_depth: usize) -> Self {
        Self {
            overlay: CorrectionOverlay::new(),
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth,
        }
    }

    pub fn overlay(&self) -> &CorrectionOverlay {
        &self.overlay
    }

    /// Corrected character for a cell, if any
    pub fn get(&self, index: CellIndex) -> Option<&str> {
        self.overlay.get(&index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.overlay.is_empty()
    }

    /// Set one cell, recording the previous overlay for undo
    pub fn paint_cell(&mut self, index: CellIndex, letter: impl Into<String>) {
        self.record_edit();
        self.overlay.insert(index, letter.into());
    }

    /// Set several cells as a single undoable edit. Returns `false` (and
    /// records nothing) when `indices` is empty.
    pub fn paint_cells<I>(&mut self, indices: I, letter: &str) -> bool
    where
        I: IntoIterator<Item = CellIndex>,
    {
        let indices: Vec<CellIndex> = indices.into_iter().collect();
        if indices.is_empty() {
            return false;
        }

        self.record_edit();
        for index in indices {
            self.overlay.insert(index, letter.to_string());
        }
        true
    }

    /// Paint a `brush_size × brush_size` square around `center`, clipped to
    /// the grid, as one edit. Returns `false` if no cell was inside the grid.
    pub fn paint_brush(
        &mut self,
        center: CellIndex,
        letter: &str,
        brush_size: usize,
        grid: GridSpec,
    ) -> bool {
        self.paint_cells(brush_cells(center, brush_size, grid), letter)
    }

    /// Step back one edit. Returns `false` when there is no undo history.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };

        let current = std::mem::replace(&mut self.overlay, previous);
        push_bounded(&mut self.redo_stack, current, self.max_depth);
        true
    }

    /// Re-apply the last undone edit. Returns `false` when there is no redo history.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop_back() else {
            return false;
        };

        let current = std::mem::replace(&mut self.overlay, next);
        push_bounded(&mut self.undo_stack, current, self.max_depth);
        true
    }

    /// Drop the overlay and both stacks. Not itself undoable.
    pub fn clear(&mut self) {
        self.overlay.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Drop the oldest snapshots of any stack longer than `max_depth`.
    /// Applied to histories decoded from storage.
    pub fn enforce_depth(&mut self) {
        for stack in [&mut self.undo_stack, &mut self.redo_stack] {
            let excess = stack.len().saturating_sub(self.max_depth);
            stack.drain(..excess);
        }
    }

    // Snapshot happens before the mutation, redo is dropped after it is pushed.
    fn record_edit(&mut self) {
        push_bounded(&mut self.undo_stack, self.overlay.clone(), self.max_depth);
        self.redo_stack.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<CorrectionOverlay>, snapshot: CorrectionOverlay, max: usize) {
    stack.push_back(snapshot);
    while stack.len() > max {
        stack.pop_front();
    }
}

/// Cells covered by a square brush of side `brush_size` around `center`
pub fn brush_cells(center: CellIndex, brush_size: usize, grid: GridSpec) -> Vec<CellIndex> {
    let Some((row, col)) = grid.position(center) else {
        return Vec::new();
    };

    let size = brush_size.max(1);
    let before = (size - 1) / 2;
    let row_start = row.saturating_sub(before);
    let col_start = col.saturating_sub(before);
    let row_end = (row + size - before).min(grid.rows);
    let col_end = (col + size - before).min(grid.cols);

    let mut cells = Vec::with_capacity(size * size);
    for r in row_start..row_end {
        for c in col_start..col_end {
            cells.push(r * grid.cols + c);
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_records_undo() {
        let mut history = CorrectionHistory::default();
        history.paint_cell(3, "A");

        assert_eq!(history.get(3), Some("A"));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = CorrectionHistory::default();
        history.paint_cell(1, "B");
        history.paint_cell(7, "X");
        let after_paint = history.overlay().clone();

        assert!(history.undo());
        assert_eq!(history.get(7), None);
        assert_eq!(history.get(1), Some("B"));

        assert!(history.redo());
        assert_eq!(history.overlay(), &after_paint);
    }

    #[test]
    fn test_new_edit_discards_redo_branch() {
        let mut history = CorrectionHistory::default();
        history.paint_cell(5, "A");
        history.undo();
        history.paint_cell(10, "C");

        let before = history.overlay().clone();
        assert!(!history.redo());
        assert_eq!(history.overlay(), &before);
        assert_eq!(history.get(5), None);
        assert_eq!(history.get(10), Some("C"));
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = CorrectionHistory::default();
        assert!(!history.undo());
        assert!(!history.redo());
        assert!(history.is_empty());
    }

    #[test]
    fn test_decoded_stacks_are_cut_to_depth() {
        let json = r#"{
            "correctedLetters": {"9": "C"},
            "undoStack": [{"1": "A"}, {"2": "A"}, {"3": "A"}],
            "redoStack": [{}, {}, {}, {}],
            "maxDepth": 2
        }"#;
        let mut history: CorrectionHistory = serde_json::from_str(json).unwrap();
        history.enforce_depth();

        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.redo_depth(), 2);
        // The newest snapshots survive
        assert!(history.undo());
        assert_eq!(history.get(3), Some("A"));
        assert!(history.undo());
        assert_eq!(history.get(2), Some("A"));
        assert!(!history.undo());
    }

    #[test]
    fn test_overwrite_same_cell_is_undoable() {
        let mut history = CorrectionHistory::default();
        history.paint_cell(2, "A");
        history.paint_cell(2, "B");
        history.undo();
        assert_eq!(history.get(2), Some("A"));
    }

    #[test]
    fn test_stack_depth_is_capped() {
        let mut history = CorrectionHistory::new(3);
        for i in 0..10 {
            history.paint_cell(i, "A");
        }
        assert_eq!(history.undo_depth(), 3);

        // Oldest snapshots were evicted, so only three steps come back
        while history.undo() {}
        assert_eq!(history.redo_depth(), 3);
        assert_eq!(history.overlay().len(), 7);
    }

    #[test]
    fn test_clear_drops_history() {
        let mut history = CorrectionHistory::default();
        history.paint_cell(0, "A");
        history.paint_cell(1, "B");
        history.undo();
        history.clear();

        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_brush_is_single_edit() {
        let grid = GridSpec::new(5, 5);
        let mut history = CorrectionHistory::default();
        assert!(history.paint_brush(12, "K", 3, grid));
        assert_eq!(history.overlay().len(), 9);
        assert_eq!(history.undo_depth(), 1);

        history.undo();
        assert!(history.is_empty());
    }

    #[test]
    fn test_brush_clips_to_grid() {
        let grid = GridSpec::new(4, 4);
        assert_eq!(brush_cells(0, 3, grid), vec![0, 1, 4, 5]);
        assert_eq!(brush_cells(15, 3, grid), vec![10, 11, 14, 15]);
        assert_eq!(brush_cells(5, 1, grid), vec![5]);
        assert_eq!(brush_cells(5, 2, grid), vec![5, 6, 9, 10]);
        assert!(brush_cells(16, 3, grid).is_empty());
    }

    #[test]
    fn test_brush_outside_grid_records_nothing() {
        let mut history = CorrectionHistory::default();
        assert!(!history.paint_brush(99, "A", 2, GridSpec::new(2, 2)));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_serialized_overlay_keeps_sparse_indices() {
        let mut history = CorrectionHistory::default();
        history.paint_cell(3, "A");
        history.paint_cell(250, "B");

        let json = serde_json::to_string(&history).unwrap();
        assert!(json.contains("\"correctedLetters\":{\"3\":\"A\",\"250\":\"B\"}"));

        let restored: CorrectionHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, history);
    }
}
