//! # Comparator Module
//!
//! Decides whether two images are near-duplicates.
//!
//! ## How It Works
//! 1. Force both images to `N × N` with the same resampling filter
//! 2. Count R, G and B channels whose difference is within the tolerance
//! 3. Average the three channel fractions into a score in `[0, 1]`
//! 4. Repeat for each ladder resolution, stopping at the first level whose
//!    score is below the threshold
//!
//! ## Default Ladder
//! | Level | Resolution | Purpose |
//! |-------|------------|---------|
//! | 0     | 16         | Rejects most unrelated pairs almost for free |
//! | 1     | 128        | Coarse structure |
//! | 2     | 512        | Fine structure |
//! | 3     | 1024       | Final confirmation |

mod engine;
mod progressive;
mod traits;

pub use engine::{channel_score, compare_at, PixelComparator};
pub use progressive::{progressive_compare, progressive_compare_with};
pub use traits::LevelComparator;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of comparing two images at one resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    /// Square side the images were resized to
    pub resolution: u32,
    /// `score >= threshold`
    pub matched: bool,
    /// Mean per-channel match fraction, in `[0, 1]`
    pub score: f64,
}

/// Strictly ascending list of square resolutions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionLadder {
    levels: Vec<u32>,
}

impl ResolutionLadder {
    /// Resolutions used when nothing else is configured
    pub const DEFAULT_LEVELS: [u32; 4] = [16, 128, 512, 1024];

    /// Validate and build a ladder
    pub fn new(levels: Vec<u32>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::EmptyLadder);
        }
        if levels.contains(&0) {
            return Err(ConfigError::ZeroResolution);
        }
        if levels.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::LadderNotAscending { ladder: levels });
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for ResolutionLadder {
    fn default() -> Self {
        Self {
            levels: Self::DEFAULT_LEVELS.to_vec(),
        }
    }
}

/// Levels that actually ran, in ladder order.
///
/// Levels after the first failure are never computed, so the sequence is
/// shorter than the ladder whenever a level fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveResult {
    levels: Vec<LevelResult>,
    ladder_len: usize,
}

impl ProgressiveResult {
    pub(crate) fn new(levels: Vec<LevelResult>, ladder_len: usize) -> Self {
        Self { levels, ladder_len }
    }

    pub fn levels(&self) -> &[LevelResult] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Deepest level that ran
    pub fn last(&self) -> Option<&LevelResult> {
        self.levels.last()
    }

    /// Every ladder level ran and matched
    pub fn is_full_match(&self) -> bool {
        self.levels.len() == self.ladder_len && self.levels.iter().all(|level| level.matched)
    }

    /// Score of the deepest level that ran, whether or not it matched
    pub fn reported_score(&self) -> f64 {
        self.last().map(|level| level.score).unwrap_or(0.0)
    }

    /// [`Self::reported_score`] as a percentage
    pub fn reported_percent(&self) -> f64 {
        self.reported_score() * 100.0
    }
}

/// A candidate that matched a source at every ladder level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Canonical path of the reference image
    pub source: PathBuf,
    /// Canonical path of the matching candidate
    pub candidate: PathBuf,
    /// Final-level similarity, 0-100
    pub score_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(resolution: u32, matched: bool, score: f64) -> LevelResult {
        LevelResult {
            resolution,
            matched,
            score,
        }
    }

    #[test]
    fn default_ladder() {
        assert_eq!(ResolutionLadder::default().levels(), &[16, 128, 512, 1024]);
    }

    #[test]
    fn ladder_rejects_empty() {
        assert_eq!(ResolutionLadder::new(vec![]), Err(ConfigError::EmptyLadder));
    }

    #[test]
    fn ladder_rejects_zero() {
        assert_eq!(ResolutionLadder::new(vec![0, 16]), Err(ConfigError::ZeroResolution));
    }

    #[test]
    fn ladder_rejects_non_ascending() {
        assert!(matches!(
            ResolutionLadder::new(vec![16, 16, 32]),
            Err(ConfigError::LadderNotAscending { .. })
        ));
        assert!(matches!(
            ResolutionLadder::new(vec![128, 16]),
            Err(ConfigError::LadderNotAscending { .. })
        ));
    }

    #[test]
    fn partial_result_is_not_full_match() {
        let result = ProgressiveResult::new(vec![level(16, true, 0.9), level(128, true, 0.8)], 4);
        assert!(!result.is_full_match());
        assert_eq!(result.reported_score(), 0.8);
    }

    #[test]
    fn empty_result_reports_zero() {
        let result = ProgressiveResult::new(Vec::new(), 4);
        assert!(result.is_empty());
        assert!(!result.is_full_match());
        assert_eq!(result.reported_percent(), 0.0);
    }

    #[test]
    fn full_result_is_full_match() {
        let result = ProgressiveResult::new(vec![level(16, true, 1.0), level(32, true, 0.99)], 2);
        assert!(result.is_full_match());
        assert!((result.reported_percent() - 99.0).abs() < 1e-9);
    }
}
