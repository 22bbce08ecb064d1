//! Knitting Chart WASM Module
//!
//! Turns a cropped photo of a knitting chart into a stitch grid: maps cells
//! into the crop quadrilateral, samples and classifies their colors against a
//! palette, applies manual corrections with undo, and encodes rows as
//! run-length stitch instructions.

pub mod models;
pub mod geometry;
pub mod color;
pub mod sampling;
pub mod pattern;
pub mod undo;
pub mod storage;
pub mod session;
pub mod renderers;
pub mod api;

// Re-export commonly used types
pub use models::{
    CellIndex, ColorEntry, Direction, GridSpec, Point, ProjectState, Quad, Rgb, StitchType,
    ViewportState, ViewportUpdate, WorkingState,
};
pub use session::EditingSession;
pub use undo::{CorrectionHistory, CorrectionOverlay};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        api::helpers::log_warn("logger already initialized");
    }

    log::info!("Knitting chart WASM module initialized");
}
