//! # Core Module
//!
//! The UI-agnostic matching engine.
//!
//! ## Modules
//! - `raster` - Decodes and resizes images as RGB grids
//! - `comparator` - Single-resolution and progressive similarity checks
//! - `scanner` - Enumerates candidate files and filters them
//! - `pipeline` - Fans sources out over a worker pool and aggregates matches
//! - `reporter` - Console, JSON and CSV rendering

pub mod comparator;
pub mod pipeline;
pub mod raster;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use comparator::{LevelResult, MatchRecord, ProgressiveResult, ResolutionLadder};
pub use pipeline::{MatchPipeline, MatchReport};
pub use raster::RasterImage;
