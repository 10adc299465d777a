//! Trait definitions for single-resolution comparators.

use super::LevelResult;
use crate::core::raster::RasterImage;
use crate::error::RasterError;

/// Compares two images at one square resolution.
///
/// The progressive matcher only talks to this trait, so the ladder logic
/// can be driven by any comparator.
pub trait LevelComparator {
    /// Compare `source` and `test` after forcing both to `resolution × resolution`
    fn compare_at(
        &mut self,
        resolution: u32,
        source: &RasterImage,
        test: &RasterImage,
    ) -> Result<LevelResult, RasterError>;

    /// Human-readable description of the comparator
    fn description(&self) -> String;
}
