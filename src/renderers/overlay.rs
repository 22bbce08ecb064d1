//! Chart overlay layout
//!
//! Computes canvas-pixel marks from the mapper, classifier and sampler
//! outputs. Inputs are normalized crop coordinates plus the canvas size.

use crate::color::{contrast_text_color, find_closest_palette_entry};
use crate::geometry::{cell_center, cell_corners, grid_lines, row_corners};
use crate::models::constants::*;
use crate::models::{ColorEntry, GridSpec, Point, ProjectState, Quad, WorkingState};
use crate::pattern::grid_row_from_working;
use crate::undo::CorrectionOverlay;

use super::display_list::*;

/// Interior grid lines in canvas pixels
pub fn grid_overlay(
    quad: &Quad,
    grid: GridSpec,
    color: &str,
    thickness: f64,
    width: f64,
    height: f64,
) -> Option<GridOverlay> {
    if grid.is_empty() {
        return None;
    }

    Some(GridOverlay {
        stroke: Stroke {
            color: color.to_string(),
            width: thickness.max(MIN_GRID_LINE_WIDTH),
            alpha: GRID_LINE_ALPHA,
        },
        segments: grid_lines(&quad.scale(width, height), grid),
    })
}

/// Palette entry shown on each sampled cell
///
/// A corrected cell shows its correction letter, colored like the first
/// palette entry using that letter (or its own sample when none does).
/// Other cells show their nearest palette entry. Cells with no color and no
/// correction get no label.
pub fn cell_labels(
    cell_colors: &[Option<String>],
    palette: &[ColorEntry],
    corrections: Option<&CorrectionOverlay>,
) -> Vec<Option<ColorEntry>> {
    cell_colors
        .iter()
        .enumerate()
        .map(|(idx, color)| {
            if let Some(letter) = corrections.and_then(|c| c.get(&idx)) {
                let entry = palette
                    .iter()
                    .find(|e| &e.char == letter)
                    .cloned()
                    .unwrap_or_else(|| {
                        let fill = color.clone().unwrap_or_else(|| WHITE_HEX.to_string());
                        ColorEntry::new(fill, letter.clone())
                    });
                return Some(entry);
            }

            color
                .as_deref()
                .and_then(|hex| find_closest_palette_entry(hex, palette))
                .cloned()
        })
        .collect()
}

/// Circle radius and font size for labels on a `width × height` canvas
///
/// Both scale with the smaller average cell dimension and are clamped so
/// labels stay legible on dense grids and small on sparse ones.
pub fn label_metrics(grid: GridSpec, width: f64, height: f64) -> (f64, f64) {
    let cell = (width / grid.cols.max(1) as f64).min(height / grid.rows.max(1) as f64);
    let radius = (cell * LABEL_RADIUS_SCALE).clamp(LABEL_RADIUS_MIN, LABEL_RADIUS_MAX);
    let font_size = (cell * LABEL_FONT_SCALE).clamp(LABEL_FONT_MIN, LABEL_FONT_MAX);
    (radius, font_size)
}

/// One label mark per labelled cell, centered by the bilinear mapping
pub fn color_labels(
    quad: &Quad,
    grid: GridSpec,
    labels: &[Option<ColorEntry>],
    width: f64,
    height: f64,
) -> Vec<LabelMark> {
    if grid.is_empty() || labels.is_empty() {
        return Vec::new();
    }

    let (radius, font_size) = label_metrics(grid, width, height);
    let font = format!("bold {}px {}", font_size, LABEL_FONT_FAMILY);
    let pixel_quad = quad.scale(width, height);

    labels
        .iter()
        .take(grid.cell_count())
        .enumerate()
        .filter_map(|(idx, label)| {
            let label = label.as_ref()?;
            let (row, col) = grid.position(idx)?;
            let center = cell_center(&pixel_quad, grid, row, col)?;
            let text_color = label
                .text_color
                .clone()
                .unwrap_or_else(|| contrast_text_color(&label.hex).to_string());

            Some(LabelMark {
                cell: idx,
                center,
                radius,
                fill: label.hex.clone(),
                text: label.char.clone(),
                text_color,
                font: font.clone(),
            })
        })
        .collect()
}

/// Crop polygon through the points placed so far
pub fn quad_outline(
    points: &[Point],
    color: &str,
    thickness: f64,
    width: f64,
    height: f64,
) -> Option<QuadOutline> {
    if points.is_empty() {
        return None;
    }

    Some(QuadOutline {
        points: points.iter().map(|p| p.scale(width, height)).collect(),
        closed: points.len() == 4,
        stroke: Stroke {
            color: color.to_string(),
            width: thickness,
            alpha: 1.0,
        },
    })
}

pub fn handles(points: &[Point], width: f64, height: f64) -> Vec<HandleMark> {
    points
        .iter()
        .enumerate()
        .map(|(index, p)| HandleMark {
            index,
            center: p.scale(width, height),
            radius: HANDLE_RADIUS,
            fill: HANDLE_FILL.to_string(),
            border_color: HANDLE_BORDER_COLOR.to_string(),
            border_width: HANDLE_BORDER_WIDTH,
        })
        .collect()
}

fn active_grid_row(working: &WorkingState, grid: GridSpec) -> Option<usize> {
    if !working.is_active || grid.is_empty() || working.current_row >= grid.rows {
        return None;
    }
    Some(grid_row_from_working(working.current_row, working.start_from_bottom, grid.rows))
}

/// Polygon over the grid row of the active working row
pub fn row_highlight(
    quad: &Quad,
    grid: GridSpec,
    working: &WorkingState,
    width: f64,
    height: f64,
) -> Option<HighlightPolygon> {
    let row = active_grid_row(working, grid)?;
    let points = row_corners(&quad.scale(width, height), grid, row)?;
    Some(HighlightPolygon {
        points,
        fill: working.highlight_color.clone(),
    })
}

/// Polygon over the active working cell
pub fn cell_highlight(
    quad: &Quad,
    grid: GridSpec,
    working: &WorkingState,
    width: f64,
    height: f64,
) -> Option<HighlightPolygon> {
    let row = active_grid_row(working, grid)?;
    let points = cell_corners(&quad.scale(width, height), grid, row, working.current_col)?;
    Some(HighlightPolygon {
        points,
        fill: working.highlight_color.clone(),
    })
}

/// Every mark for `project` on a `width × height` canvas
///
/// Grid, labels and highlights need a complete crop; outline and handles are
/// drawn for however many corners have been placed.
pub fn build_display_list(
    project: &ProjectState,
    cell_colors: &[Option<String>],
    width: f64,
    height: f64,
) -> ChartDisplayList {
    let points = project.crop_points.as_deref().unwrap_or(&[]);
    let mut list = ChartDisplayList {
        width,
        height,
        outline: quad_outline(points, &project.grid_color, project.grid_thickness, width, height),
        handles: handles(points, width, height),
        ..Default::default()
    };

    let Some(quad) = project.quad() else {
        return list;
    };
    let grid = project.grid();

    list.grid = grid_overlay(&quad, grid, &project.grid_color, project.grid_thickness, width, height);

    let labels = cell_labels(cell_colors, &project.colors, Some(project.corrections.overlay()));
    list.labels = color_labels(&quad, grid, &labels, width, height);

    list.row_highlight = row_highlight(&quad, grid, &project.working_state, width, height);
    list.cell_highlight = cell_highlight(&quad, grid, &project.working_state, width, height);
    list
}
