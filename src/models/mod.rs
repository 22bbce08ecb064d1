//! Models module for the knitting chart engine
//!
//! This module contains the plain data types shared by the geometry,
//! color, sampling, pattern and correction modules, plus the persisted
//! project record.

pub mod color;
pub mod constants;
pub mod geometry;
pub mod grid;
pub mod project;
pub mod working;

// Re-export commonly used types
pub use color::{ColorEntry, Rgb};
pub use geometry::{Point, Quad};
pub use grid::{CellIndex, GridSpec};
pub use project::{ProjectState, ViewportState, ViewportUpdate};
pub use working::{Direction, StitchType, WorkingState};
