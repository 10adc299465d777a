//! Escalating-resolution matching.
//!
//! Cheap low-resolution levels reject clearly different pairs before any
//! high-resolution work happens. A pair only counts as a match when every
//! level of the ladder agrees.

use super::{LevelComparator, PixelComparator, ProgressiveResult, ResolutionLadder};
use crate::core::raster::RasterImage;
use crate::error::RasterError;

/// Walk the ladder left to right, stopping after the first failed level.
pub fn progressive_compare_with<C: LevelComparator + ?Sized>(
    comparator: &mut C,
    source: &RasterImage,
    test: &RasterImage,
    ladder: &ResolutionLadder,
) -> Result<ProgressiveResult, RasterError> {
    let mut levels = Vec::with_capacity(ladder.len());

    for &resolution in ladder.levels() {
        let level = comparator.compare_at(resolution, source, test)?;
        let matched = level.matched;
        levels.push(level);

        if !matched {
            break;
        }
    }

    Ok(ProgressiveResult::new(levels, ladder.len()))
}

/// Convenience wrapper around [`PixelComparator`].
pub fn progressive_compare(
    source: &RasterImage,
    test: &RasterImage,
    tolerance: u8,
    threshold: f64,
    ladder: &ResolutionLadder,
) -> Result<ProgressiveResult, RasterError> {
    let mut comparator = PixelComparator::new(tolerance, threshold);
    progressive_compare_with(&mut comparator, source, test, ladder)
}
