//! Match collection shared by every unit of work.
//!
//! Units never touch a shared vector. Each one holds a [`MatchSink`] that
//! pushes records down a crossbeam channel; the single receiver is drained
//! once, after the fan-out barrier, so records come back in append order.

use crate::core::comparator::{MatchRecord, ProgressiveResult};
use crate::events::{Event, EventSender, MatchEvent};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Owns the receiving end of the match channel
pub struct MatchAggregator {
    sender: Sender<MatchRecord>,
    receiver: Receiver<MatchRecord>,
    events: EventSender,
}

impl MatchAggregator {
    pub fn new(events: EventSender) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            events,
        }
    }

    /// A write handle for one unit of work
    pub fn sink(&self) -> MatchSink {
        MatchSink {
            records: self.sender.clone(),
            events: self.events.clone(),
        }
    }

    /// Drain every record sent so far, in append order.
    ///
    /// Call only after all units have finished.
    pub fn finish(self) -> Vec<MatchRecord> {
        drop(self.sender);
        self.receiver.try_iter().collect()
    }
}

/// Cloneable, thread-safe write handle
#[derive(Clone)]
pub struct MatchSink {
    records: Sender<MatchRecord>,
    events: EventSender,
}

impl MatchSink {
    /// Append a confirmed match
    pub fn record(&self, record: MatchRecord) {
        self.events.send(Event::Match(MatchEvent::MatchFound {
            source: record.source.clone(),
            candidate: record.candidate.clone(),
            score_percent: record.score_percent,
        }));
        // receiver lives until finish(), which runs after every unit returns
        let _ = self.records.send(record);
    }

    /// Best-effort per-candidate score, not ordered across units
    pub fn stream_score(&self, source: &Path, candidate: &Path, result: &ProgressiveResult) {
        self.events.send(Event::Match(MatchEvent::CandidateScored {
            source: source.to_path_buf(),
            candidate: candidate.to_path_buf(),
            score_percent: result.reported_percent(),
            levels_run: result.len(),
            full_match: result.is_full_match(),
        }));
    }
}

/// A source that never got a unit of work, or whose unit was abandoned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// Confirmed matches in append order
    pub records: Vec<MatchRecord>,
    /// Sources whose unit ran to completion (or until cancelled)
    pub sources_processed: usize,
    /// Sources that were skipped, with the reason
    pub skipped_sources: Vec<SkippedSource>,
    /// Candidate comparisons performed across all units
    pub comparisons: usize,
    /// Candidates that failed to load
    pub candidate_failures: usize,
    /// True if the run stopped early
    pub cancelled: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// One source and the candidates that matched it
#[derive(Debug)]
pub struct SourceMatches<'a> {
    pub source: &'a Path,
    pub matches: Vec<&'a MatchRecord>,
}

impl MatchReport {
    /// Group records by source.
    ///
    /// Sources appear in the order of their first match; each source's
    /// candidates keep append order.
    pub fn by_source(&self) -> Vec<SourceMatches<'_>> {
        let mut groups: Vec<SourceMatches<'_>> = Vec::new();

        for record in &self.records {
            match groups.iter_mut().find(|g| g.source == record.source.as_path()) {
                Some(group) => group.matches.push(record),
                None => groups.push(SourceMatches {
                    source: &record.source,
                    matches: vec![record],
                }),
            }
        }

        groups
    }

    pub fn match_count(&self) -> usize {
        self.records.len()
    }
}
