//! Event type definitions for progress and diagnostic reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the matching pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Candidate enumeration events
    Scan(ScanEvent),
    /// Per-source and per-candidate matching events
    Match(MatchEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events while enumerating candidate files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { paths: Vec<PathBuf> },
    /// Progress update during scanning
    Progress(ScanProgress),
    /// An error occurred but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_files: usize },
}

/// Progress information during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of directories scanned so far
    pub directories_scanned: usize,
    /// Number of files found so far
    pub files_found: usize,
    /// Current directory being scanned
    pub current_path: PathBuf,
}

/// Events from the per-source units of work.
///
/// Events from different sources interleave arbitrarily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatchEvent {
    /// A unit of work started for this source
    SourceStarted { source: PathBuf },
    /// A source was skipped (missing file, decode failure, worker panic)
    SourceSkipped { source: PathBuf, message: String },
    /// A candidate was compared; `score_percent` is the deepest level run
    CandidateScored {
        source: PathBuf,
        candidate: PathBuf,
        score_percent: f64,
        levels_run: usize,
        full_match: bool,
    },
    /// A candidate could not be loaded and was skipped
    CandidateFailed {
        source: PathBuf,
        candidate: PathBuf,
        message: String,
    },
    /// A candidate matched the source at every ladder level
    MatchFound {
        source: PathBuf,
        candidate: PathBuf,
        score_percent: f64,
    },
    /// A unit of work finished
    SourceCompleted {
        source: PathBuf,
        candidates_compared: usize,
        matches: usize,
    },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started { sources: usize, candidates: usize },
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed
    Completed { summary: PipelineSummary },
    /// Pipeline was cancelled before every unit finished
    Cancelled,
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Matching,
    Reporting,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Sources that ran a unit of work
    pub sources_processed: usize,
    /// Total candidate comparisons performed
    pub comparisons: usize,
    /// Confirmed matches
    pub matches: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Matching => write!(f, "Matching"),
            PipelinePhase::Reporting => write!(f, "Reporting"),
        }
    }
}
