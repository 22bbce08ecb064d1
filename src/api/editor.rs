//! Editing session exports
//!
//! WASM owns the open project: JavaScript opens or creates one, sends edits,
//! and reads back snapshots, RLE text and display lists. Every committed
//! edit is persisted by the session before the call returns.
//!
//! Calls that need an open project are no-ops (returning `false`, empty
//! text or `null`) while none is open.

use std::sync::Mutex;

use lazy_static::lazy_static;
use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, serialize, validation_error};
use crate::models::{ColorEntry, Point, ViewportUpdate, WorkingState};
use crate::pattern::format_chart;
use crate::renderers::build_display_list;
use crate::sampling::RgbaImage;
use crate::session::EditingSession;
use crate::storage::ProjectRepository;
use crate::storage::StorageError;
use crate::{wasm_error, wasm_info, wasm_warn};

#[cfg(target_arch = "wasm32")]
type AppRepository = crate::storage::KvRepository<crate::storage::BrowserStorage>;

// Off the browser there is no localStorage; projects live in process memory
#[cfg(not(target_arch = "wasm32"))]
type AppRepository = crate::storage::KvRepository<crate::storage::ProcessStore>;

lazy_static! {
    static ref EDITOR: Mutex<Option<EditingSession<AppRepository>>> = Mutex::new(None);
}

#[cfg(target_arch = "wasm32")]
fn app_repository() -> Result<AppRepository, JsValue> {
    crate::storage::BrowserStorage::open()
        .map(crate::storage::KvRepository::new)
        .map_err(|e| storage_error("Browser storage unavailable", e))
}

#[cfg(not(target_arch = "wasm32"))]
fn app_repository() -> Result<AppRepository, JsValue> {
    Ok(crate::storage::KvRepository::new(crate::storage::ProcessStore))
}

fn storage_error(context: &str, e: StorageError) -> JsValue {
    wasm_error!("{}: {}", context, e);
    JsValue::from_str(&format!("{}: {}", context, e))
}

fn lock_editor() -> Result<std::sync::MutexGuard<'static, Option<EditingSession<AppRepository>>>, JsValue> {
    EDITOR
        .lock()
        .map_err(|_| validation_error("Editor state is poisoned"))
}

/// Run `f` against the open session, or return `default` when none is open
fn with_session<T>(
    op: &str,
    default: T,
    f: impl FnOnce(&mut EditingSession<AppRepository>) -> T,
) -> Result<T, JsValue> {
    let mut guard = lock_editor()?;
    match guard.as_mut() {
        Some(session) => Ok(f(session)),
        None => {
            wasm_warn!("{}: no project open", op);
            Ok(default)
        }
    }
}

// ============================================================================
// Project lifecycle
// ============================================================================

/// Create a project, make it the open one, and return its snapshot
#[wasm_bindgen(js_name = createProject)]
pub fn create_project(name: &str) -> Result<JsValue, JsValue> {
    wasm_info!("createProject called: name='{}'", name);

    let session = EditingSession::create(app_repository()?, name);
    let snapshot = serialize(session.project(), "Project serialization error")?;
    *lock_editor()? = Some(session);
    Ok(snapshot)
}

/// Open a stored project. Returns `false` for an unknown id, leaving the
/// currently open project (if any) in place.
#[wasm_bindgen(js_name = openProject)]
pub fn open_project(id: &str) -> Result<bool, JsValue> {
    wasm_info!("openProject called: id={}", id);

    match EditingSession::open(app_repository()?, id) {
        Some(session) => {
            *lock_editor()? = Some(session);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[wasm_bindgen(js_name = closeProject)]
pub fn close_project() -> Result<(), JsValue> {
    *lock_editor()? = None;
    Ok(())
}

/// Stored projects as `{uuid, name, createdAt}`, oldest first
#[wasm_bindgen(js_name = listProjects)]
pub fn list_projects() -> Result<JsValue, JsValue> {
    let summaries = app_repository()?
        .list()
        .map_err(|e| storage_error("Failed to list projects", e))?;
    serialize(&summaries, "Project list serialization error")
}

/// Delete a stored project, closing it first if it is open
#[wasm_bindgen(js_name = deleteProject)]
pub fn delete_project(id: &str) -> Result<bool, JsValue> {
    wasm_info!("deleteProject called: id={}", id);

    let mut guard = lock_editor()?;
    if guard.as_ref().map_or(false, |s| s.id() == id) {
        *guard = None;
    }
    drop(guard);

    app_repository()?
        .delete(id)
        .map_err(|e| storage_error(&format!("Failed to delete project {}", id), e))
}

/// Snapshot of the open project, `null` when none is open
#[wasm_bindgen(js_name = getProjectSnapshot)]
pub fn get_project_snapshot() -> Result<JsValue, JsValue> {
    let guard = lock_editor()?;
    match guard.as_ref() {
        Some(session) => serialize(session.project(), "Project serialization error"),
        None => Ok(JsValue::NULL),
    }
}

// ============================================================================
// Project fields
// ============================================================================

#[wasm_bindgen(js_name = renameProject)]
pub fn rename_project(name: &str) -> Result<bool, JsValue> {
    with_session("renameProject", false, |s| s.rename(name))
}

#[wasm_bindgen(js_name = setImage)]
pub fn set_image(data_url: Option<String>) -> Result<bool, JsValue> {
    with_session("setImage", false, |s| s.set_image(data_url))
}

/// Replace the crop points; `null` removes the crop
#[wasm_bindgen(js_name = setCropPoints)]
pub fn set_crop_points(points_js: JsValue) -> Result<bool, JsValue> {
    let points: Option<Vec<Point>> = deserialize(points_js, "Invalid crop points")?;
    with_session("setCropPoints", false, |s| s.set_crop(points))
}

#[wasm_bindgen(js_name = setGrid)]
pub fn set_grid(
    rows: usize,
    cols: usize,
    color: Option<String>,
    thickness: Option<f64>,
) -> Result<bool, JsValue> {
    with_session("setGrid", false, |s| s.set_grid(rows, cols, color, thickness))
}

#[wasm_bindgen(js_name = setPalette)]
pub fn set_palette(palette_js: JsValue) -> Result<bool, JsValue> {
    let palette: Vec<ColorEntry> = deserialize(palette_js, "Invalid palette")?;
    with_session("setPalette", false, |s| s.set_palette(&palette))
}

#[wasm_bindgen(js_name = setWorkingState)]
pub fn set_working_state(working_js: JsValue) -> Result<bool, JsValue> {
    let working: WorkingState = deserialize(working_js, "Invalid working state")?;
    with_session("setWorkingState", false, |s| s.set_working_state(working))
}

/// Apply `{zoomLevel?, panX?, panY?}`; absent fields are kept
#[wasm_bindgen(js_name = updateViewport)]
pub fn update_viewport(update_js: JsValue) -> Result<bool, JsValue> {
    let update: ViewportUpdate = deserialize(update_js, "Invalid viewport update")?;
    with_session("updateViewport", false, |s| s.update_viewport(update))
}

// ============================================================================
// Working position
// ============================================================================

#[wasm_bindgen(js_name = setWorkingActive)]
pub fn set_working_active(active: bool) -> Result<bool, JsValue> {
    with_session("setWorkingActive", false, |s| s.set_working_active(active))
}

#[wasm_bindgen(js_name = setWorkingPosition)]
pub fn set_working_position(working_row: usize, col: usize) -> Result<bool, JsValue> {
    with_session("setWorkingPosition", false, |s| s.set_position(working_row, col))
}

#[wasm_bindgen(js_name = nextRow)]
pub fn next_row() -> Result<bool, JsValue> {
    with_session("nextRow", false, |s| s.next_row())
}

#[wasm_bindgen(js_name = prevRow)]
pub fn prev_row() -> Result<bool, JsValue> {
    with_session("prevRow", false, |s| s.prev_row())
}

#[wasm_bindgen(js_name = nextCol)]
pub fn next_col() -> Result<bool, JsValue> {
    with_session("nextCol", false, |s| s.next_col())
}

#[wasm_bindgen(js_name = prevCol)]
pub fn prev_col() -> Result<bool, JsValue> {
    with_session("prevCol", false, |s| s.prev_col())
}

// ============================================================================
// Corrections
// ============================================================================

#[wasm_bindgen(js_name = paintCell)]
pub fn paint_cell(index: usize, letter: &str) -> Result<bool, JsValue> {
    with_session("paintCell", false, |s| s.paint_cell(index, letter))
}

/// Paint with the selected letter and brush size
#[wasm_bindgen(js_name = paintAt)]
pub fn paint_at(index: usize) -> Result<bool, JsValue> {
    with_session("paintAt", false, |s| s.paint_at(index))
}

#[wasm_bindgen(js_name = undo)]
pub fn undo() -> Result<bool, JsValue> {
    with_session("undo", false, |s| s.undo())
}

#[wasm_bindgen(js_name = redo)]
pub fn redo() -> Result<bool, JsValue> {
    with_session("redo", false, |s| s.redo())
}

#[wasm_bindgen(js_name = canUndo)]
pub fn can_undo() -> Result<bool, JsValue> {
    with_session("canUndo", false, |s| s.project().corrections.can_undo())
}

#[wasm_bindgen(js_name = canRedo)]
pub fn can_redo() -> Result<bool, JsValue> {
    with_session("canRedo", false, |s| s.project().corrections.can_redo())
}

#[wasm_bindgen(js_name = clearCorrections)]
pub fn clear_corrections() -> Result<bool, JsValue> {
    with_session("clearCorrections", false, |s| s.clear_corrections())
}

#[wasm_bindgen(js_name = toggleCorrectionMode)]
pub fn toggle_correction_mode() -> Result<bool, JsValue> {
    with_session("toggleCorrectionMode", false, |s| s.toggle_correction_mode())
}

#[wasm_bindgen(js_name = setCorrectionLetter)]
pub fn set_correction_letter(letter: Option<String>) -> Result<bool, JsValue> {
    with_session("setCorrectionLetter", false, |s| s.set_correction_letter(letter))
}

#[wasm_bindgen(js_name = setBrushSize)]
pub fn set_brush_size(size: usize) -> Result<bool, JsValue> {
    with_session("setBrushSize", false, |s| s.set_brush_size(size))
}

// ============================================================================
// Sampling, encoding and rendering
// ============================================================================

/// Resample the open project's cells from canvas `ImageData` bytes.
/// Returns the number of cells sampled.
#[wasm_bindgen(js_name = sampleImage)]
pub fn sample_image(data: &js_sys::Uint8ClampedArray, width: usize, height: usize) -> Result<usize, JsValue> {
    let image = RgbaImage::from_rgba(width, height, data.to_vec()).ok_or_else(|| {
        validation_error(format!(
            "Pixel buffer of {} bytes does not match {}x{} RGBA image",
            data.length(),
            width,
            height
        ))
    })?;
    with_session("sampleImage", 0, |s| s.resample(&image))
}

#[wasm_bindgen(js_name = setCellColors)]
pub fn set_cell_colors(colors_js: JsValue) -> Result<bool, JsValue> {
    let colors: Vec<Option<String>> = deserialize(colors_js, "Invalid cell colors")?;
    with_session("setCellColors", false, |s| {
        s.set_cell_colors(colors);
        true
    })
}

#[wasm_bindgen(js_name = getCellColors)]
pub fn get_cell_colors() -> Result<JsValue, JsValue> {
    let colors = with_session("getCellColors", Vec::new(), |s| s.cell_colors().to_vec())?;
    serialize(&colors, "Cell color serialization error")
}

#[wasm_bindgen(js_name = getRowRle)]
pub fn get_row_rle(working_row: usize) -> Result<String, JsValue> {
    with_session("getRowRle", String::new(), |s| s.row_rle(working_row))
}

#[wasm_bindgen(js_name = getCurrentRowRle)]
pub fn get_current_row_rle() -> Result<String, JsValue> {
    with_session("getCurrentRowRle", String::new(), |s| s.current_row_rle())
}

/// Every working row as `{workingRow, displayRow, gridRow, stitch, direction, rle}`
#[wasm_bindgen(js_name = getChart)]
pub fn get_chart() -> Result<JsValue, JsValue> {
    let chart = with_session("getChart", Vec::new(), |s| s.chart())?;
    serialize(&chart, "Chart serialization error")
}

/// Chart as plain text, one `Row N (K, RTL): 2A 3B` line per row
#[wasm_bindgen(js_name = exportChartText)]
pub fn export_chart_text() -> Result<String, JsValue> {
    with_session("exportChartText", String::new(), |s| format_chart(&s.chart()))
}

/// Display list for a `width × height` canvas, `null` when no project is open
#[wasm_bindgen(js_name = getDisplayList)]
pub fn get_display_list(width: f64, height: f64) -> Result<JsValue, JsValue> {
    let list = with_session("getDisplayList", None, |s| {
        Some(build_display_list(s.project(), s.cell_colors(), width, height))
    })?;
    match list {
        Some(list) => serialize(&list, "Display list serialization error"),
        None => Ok(JsValue::NULL),
    }
}
