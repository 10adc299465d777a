//! Per-channel RGB tolerance comparison at a fixed resolution.

use super::{LevelComparator, LevelResult};
use crate::core::raster::{FastResizer, RasterImage};
use crate::error::RasterError;

/// Raw RGB comparator.
///
/// A channel matches when `|source - test| <= tolerance`; the score is the
/// mean of the R, G and B match fractions.
///
/// Resized copies of the most recent source are kept per resolution, so a
/// source compared against many candidates is resized once per level.
pub struct PixelComparator {
    tolerance: u8,
    threshold: f64,
    resizer: FastResizer,
    cached_source: Option<u64>,
    source_levels: Vec<(u32, RasterImage)>,
}

impl PixelComparator {
    pub fn new(tolerance: u8, threshold: f64) -> Self {
        Self {
            tolerance,
            threshold,
            resizer: FastResizer::new(),
            cached_source: None,
            source_levels: Vec::new(),
        }
    }

    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl LevelComparator for PixelComparator {
    fn compare_at(
        &mut self,
        resolution: u32,
        source: &RasterImage,
        test: &RasterImage,
    ) -> Result<LevelResult, RasterError> {
        if self.cached_source != Some(source.id()) {
            self.source_levels.clear();
            self.cached_source = Some(source.id());
        }

        let cached = self
            .source_levels
            .iter()
            .position(|(side, _)| *side == resolution);
        let index = match cached {
            Some(index) => index,
            None => {
                let resized = self.resizer.resize_square(source, resolution)?;
                self.source_levels.push((resolution, resized));
                self.source_levels.len() - 1
            }
        };

        let test_resized = self.resizer.resize_square(test, resolution)?;
        let source_resized = &self.source_levels[index].1;

        let score = channel_score(source_resized, &test_resized, self.tolerance);

        Ok(LevelResult {
            resolution,
            matched: score >= self.threshold,
            score,
        })
    }

    fn description(&self) -> String {
        format!(
            "RGB tolerance comparator: channels within {} count as equal, \
             {:.0}% of channels must agree",
            self.tolerance,
            self.threshold * 100.0
        )
    }
}

/// Fraction of matching channels over the pixel coordinates both images share.
///
/// Returns 0.0 when there is no overlap.
pub fn channel_score(source: &RasterImage, test: &RasterImage, tolerance: u8) -> f64 {
    let width = source.width().min(test.width()) as usize;
    let height = source.height().min(test.height()) as usize;
    let total = width * height;

    if total == 0 {
        return 0.0;
    }

    let source_stride = source.width() as usize * 3;
    let test_stride = test.width() as usize * 3;
    let source_raw = source.as_raw();
    let test_raw = test.as_raw();

    let mut matches = [0u64; 3];

    for y in 0..height {
        let source_row = &source_raw[y * source_stride..y * source_stride + width * 3];
        let test_row = &test_raw[y * test_stride..y * test_stride + width * 3];

        for (source_px, test_px) in source_row.chunks_exact(3).zip(test_row.chunks_exact(3)) {
            for channel in 0..3 {
                if source_px[channel].abs_diff(test_px[channel]) <= tolerance {
                    matches[channel] += 1;
                }
            }
        }
    }

    let total = total as f64;
    matches.iter().map(|&count| count as f64 / total).sum::<f64>() / 3.0
}

/// One-shot comparison at a single resolution.
pub fn compare_at(
    resolution: u32,
    source: &RasterImage,
    test: &RasterImage,
    tolerance: u8,
    threshold: f64,
) -> Result<LevelResult, RasterError> {
    PixelComparator::new(tolerance, threshold).compare_at(resolution, source, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage};

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RasterImage {
        RasterImage::from_rgb(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    fn noise(width: u32, height: u32, seed: u32) -> RasterImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(73) ^ y.wrapping_mul(151) ^ seed).wrapping_mul(2654435761);
            Rgb([(v >> 8) as u8, (v >> 16) as u8, (v >> 24) as u8])
        });
        RasterImage::from_rgb(img)
    }

    #[test]
    fn identical_images_score_one_at_every_resolution() {
        let image = noise(40, 30, 7);
        let mut comparator = PixelComparator::new(0, 1.0);

        for resolution in [16, 128, 512] {
            let result = comparator.compare_at(resolution, &image, &image).unwrap();
            assert_eq!(result.score, 1.0);
            assert!(result.matched);
            assert_eq!(result.resolution, resolution);
        }
    }

    #[test]
    fn black_and_white_score_zero() {
        let black = solid(8, 8, [0, 0, 0]);
        let white = solid(8, 8, [255, 255, 255]);
        let result = compare_at(16, &black, &white, 2, 0.75).unwrap();
        assert_eq!(result.score, 0.0);
        assert!(!result.matched);
    }

    #[test]
    fn tolerance_is_inclusive() {
        let a = solid(4, 4, [100, 100, 100]);
        let b = solid(4, 4, [102, 98, 100]);

        assert_eq!(channel_score(&a, &b, 2), 1.0);
        // only blue agrees exactly
        assert!((channel_score(&a, &b, 1) - 1.0 / 3.0).abs() < 1e-12);
        assert!((channel_score(&a, &b, 0) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn channels_are_averaged_independently() {
        let a = solid(2, 2, [10, 10, 10]);
        let b = solid(2, 2, [10, 200, 200]);

        let score = channel_score(&a, &b, 2);
        assert!((score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn threshold_is_inclusive() {
        let a = solid(2, 2, [10, 10, 10]);
        let b = solid(2, 2, [10, 10, 200]);

        let mut comparator = PixelComparator::new(0, 2.0 / 3.0);
        let result = comparator.compare_at(2, &a, &b).unwrap();
        assert!((result.score - 2.0 / 3.0).abs() < 1e-12);
        assert!(result.matched);
    }

    #[test]
    fn score_stays_in_unit_interval() {
        let mut comparator = PixelComparator::new(16, 0.5);
        for seed in 0..6 {
            let a = noise(33, 21, seed);
            let b = noise(17, 45, seed + 100);
            let result = comparator.compare_at(16, &a, &b).unwrap();
            assert!((0.0..=1.0).contains(&result.score));
        }
    }

    #[test]
    fn differing_aspect_ratios_are_forced_square() {
        let wide = solid(200, 10, [50, 60, 70]);
        let tall = solid(10, 200, [50, 60, 70]);

        let result = compare_at(64, &wide, &tall, 2, 0.75).unwrap();
        assert!(result.matched);
        assert!(result.score > 0.99);
    }

    #[test]
    fn score_uses_shared_coordinates_only() {
        let a = solid(4, 4, [1, 1, 1]);
        let b = solid(2, 2, [1, 1, 1]);
        assert_eq!(channel_score(&a, &b, 0), 1.0);
    }

    #[test]
    fn description_includes_tolerance() {
        assert!(PixelComparator::new(7, 0.75).description().contains('7'));
    }

    #[test]
    fn source_resizes_are_reused_across_candidates() {
        let source = noise(50, 40, 3);
        let mut comparator = PixelComparator::new(2, 0.75);

        for seed in 0..3 {
            comparator.compare_at(16, &source, &noise(20, 20, seed)).unwrap();
            comparator.compare_at(32, &source, &noise(20, 20, seed)).unwrap();
        }

        assert_eq!(comparator.source_levels.len(), 2);
    }

    #[test]
    fn new_source_replaces_cached_levels() {
        let first = solid(8, 8, [0, 0, 0]);
        let second = solid(8, 8, [255, 255, 255]);
        let mut comparator = PixelComparator::new(2, 0.75);

        let against_first = comparator.compare_at(16, &first, &second).unwrap();
        let against_second = comparator.compare_at(16, &second, &second).unwrap();

        assert_eq!(against_first.score, 0.0);
        assert_eq!(against_second.score, 1.0);
        assert_eq!(comparator.source_levels.len(), 1);
    }
}
