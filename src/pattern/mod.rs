//! Pattern encoder
//!
//! Turns a row of sampled cell colors into a run-length stitch description
//! such as `"4W 4B"`, read in the direction the row is worked. Working rows
//! alternate between knit and purl; each stitch type has its own direction.

use serde::{Deserialize, Serialize};

use crate::color::find_closest_palette_entry;
use crate::models::constants::UNKNOWN_CELL_CHAR;
use crate::models::{ColorEntry, Direction, StitchType, WorkingState};
use crate::undo::CorrectionOverlay;

/// A sampled cell color as seen by the encoder. `None` means the cell could
/// not be sampled.
pub trait CellColor {
    fn hex(&self) -> Option<&str>;
}

impl CellColor for String {
    fn hex(&self) -> Option<&str> {
        Some(self)
    }
}

impl CellColor for &str {
    fn hex(&self) -> Option<&str> {
        Some(self)
    }
}

impl CellColor for Option<String> {
    fn hex(&self) -> Option<&str> {
        self.as_deref()
    }
}

/// Stitch type of `working_row`: row 0 uses `start`, then rows alternate
pub fn stitch_type(working_row: usize, start: StitchType) -> StitchType {
    if working_row % 2 == 0 {
        start
    } else {
        start.flip()
    }
}

/// Direction configured for a stitch type
pub fn row_direction(stitch: StitchType, knit_direction: Direction, perl_direction: Direction) -> Direction {
    match stitch {
        StitchType::Knit => knit_direction,
        StitchType::Purl => perl_direction,
    }
}

/// Grid row of a working row. With `start_from_bottom`, working row 0 is
/// the last grid row.
pub fn grid_row_from_working(working_row: usize, start_from_bottom: bool, total_rows: usize) -> usize {
    if start_from_bottom {
        total_rows.saturating_sub(1).saturating_sub(working_row)
    } else {
        working_row
    }
}

/// Working row of a grid row; the same involution as [`grid_row_from_working`]
pub fn working_row_from_grid(grid_row: usize, start_from_bottom: bool, total_rows: usize) -> usize {
    grid_row_from_working(grid_row, start_from_bottom, total_rows)
}

/// 1-indexed row number shown to the knitter
pub fn display_row_number(working_row: usize) -> usize {
    working_row.saturating_add(1)
}

/// Character for one cell: a correction wins verbatim, otherwise the nearest
/// palette entry, otherwise `?`
fn resolve_char<'a, C: CellColor>(
    index: usize,
    color: &C,
    palette: &'a [ColorEntry],
    corrections: Option<&'a CorrectionOverlay>,
) -> &'a str {
    if let Some(letter) = corrections.and_then(|c| c.get(&index)) {
        return letter;
    }

    color
        .hex()
        .and_then(|hex| find_closest_palette_entry(hex, palette))
        .map(|entry| entry.char.as_str())
        .unwrap_or(UNKNOWN_CELL_CHAR)
}

/// One `{count}{char}` token
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub count: usize,
    pub char: String,
}

/// Collapse consecutive equal characters into runs, in order
pub fn run_length<'a, I>(chars: I) -> Vec<Run>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut runs: Vec<Run> = Vec::new();
    for c in chars {
        match runs.last_mut() {
            Some(run) if run.char == c => run.count += 1,
            _ => runs.push(Run {
                count: 1,
                char: c.to_string(),
            }),
        }
    }
    runs
}

/// Runs joined as `"2A 3B"`
pub fn format_runs(runs: &[Run]) -> String {
    runs.iter()
        .map(|run| format!("{}{}", run.count, run.char))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs for grid row `grid_row`, read in `direction`
///
/// The row slice is clamped to the available data; a row starting past the
/// data, `cols == 0` or an empty palette all give no runs.
pub fn encode_row_runs<C: CellColor>(
    cell_colors: &[C],
    grid_row: usize,
    cols: usize,
    palette: &[ColorEntry],
    direction: Direction,
    corrections: Option<&CorrectionOverlay>,
) -> Vec<Run> {
    if cols == 0 || palette.is_empty() {
        return Vec::new();
    }

    let Some(row_start) = grid_row.checked_mul(cols) else {
        return Vec::new();
    };
    if row_start >= cell_colors.len() {
        return Vec::new();
    }
    let row_end = row_start.saturating_add(cols).min(cell_colors.len());

    let resolve = |idx: usize| resolve_char(idx, &cell_colors[idx], palette, corrections);
    match direction {
        Direction::LeftToRight => run_length((row_start..row_end).map(resolve)),
        Direction::RightToLeft => run_length((row_start..row_end).rev().map(resolve)),
    }
}

/// Run-length text for grid row `grid_row`, e.g. `"2A 3B"`
pub fn encode_row<C: CellColor>(
    cell_colors: &[C],
    grid_row: usize,
    cols: usize,
    palette: &[ColorEntry],
    direction: Direction,
    corrections: Option<&CorrectionOverlay>,
) -> String {
    format_runs(&encode_row_runs(cell_colors, grid_row, cols, palette, direction, corrections))
}

/// One row of an exported chart, in working order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartRow {
    pub working_row: usize,
    pub display_row: usize,
    pub grid_row: usize,
    pub stitch: StitchType,
    pub direction: Direction,
    pub rle: String,
}

/// Encode a working row with the stitch/direction rules of `working`
pub fn encode_working_row<C: CellColor>(
    cell_colors: &[C],
    working_row: usize,
    rows: usize,
    cols: usize,
    palette: &[ColorEntry],
    working: &WorkingState,
    corrections: Option<&CorrectionOverlay>,
) -> Option<ChartRow> {
    if working_row >= rows {
        return None;
    }

    let grid_row = grid_row_from_working(working_row, working.start_from_bottom, rows);
    let stitch = stitch_type(working_row, working.start_stitch);
    let direction = row_direction(stitch, working.knit_direction, working.perl_direction);

    Some(ChartRow {
        working_row,
        display_row: display_row_number(working_row),
        grid_row,
        stitch,
        direction,
        rle: encode_row(cell_colors, grid_row, cols, palette, direction, corrections),
    })
}

/// Every working row of the chart, first worked row first
pub fn encode_chart<C: CellColor>(
    cell_colors: &[C],
    rows: usize,
    cols: usize,
    palette: &[ColorEntry],
    working: &WorkingState,
    corrections: Option<&CorrectionOverlay>,
) -> Vec<ChartRow> {
    (0..rows)
        .filter_map(|wr| encode_working_row(cell_colors, wr, rows, cols, palette, working, corrections))
        .collect()
}

/// Plain-text chart, one `Row N (K, RTL): 2A 3B` line per working row
pub fn format_chart(rows: &[ChartRow]) -> String {
    rows.iter()
        .map(|r| {
            format!(
                "Row {} ({}, {}): {}",
                r.display_row,
                r.stitch.as_str(),
                r.direction.as_str(),
                r.rle
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
