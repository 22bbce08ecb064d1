//! Knitting chart WASM API
//!
//! The JavaScript-facing surface of the chart engine.
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros, serde conversion, argument validation
//! - `mapping`: geometry mapper (lerp, blend, grid lines, handle hit testing)
//! - `classifier`: color conversion, distance, contrast and palette matching
//! - `encoder`: row encoding, stitch/direction rules and cell sampling
//! - `editor`: the open project's editing session

pub mod helpers;
pub mod mapping;
pub mod classifier;
pub mod encoder;
pub mod editor;

// Re-export all public functions from modules to maintain a flat API
pub use mapping::*;
pub use classifier::*;
pub use encoder::*;
pub use editor::*;
