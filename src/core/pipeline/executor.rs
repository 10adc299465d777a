//! Fan-out execution: one unit of work per source image.

use super::aggregator::{MatchAggregator, MatchReport, MatchSink, SkippedSource};
use crate::core::comparator::{
    progressive_compare_with, LevelComparator, MatchRecord, PixelComparator, ResolutionLadder,
};
use crate::core::raster::RasterImage;
use crate::core::scanner::{
    Admission, ImageFilter, DEFAULT_EXTENSIONS, DEFAULT_MAX_CANDIDATE_BYTES,
};
use crate::error::{ConfigError, MatchFinderError, SourceError};
use crate::events::{
    null_sender, Event, EventSender, MatchEvent, PipelineEvent, PipelinePhase, PipelineSummary,
};
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Cooperative stop signal shared by every unit.
///
/// Checked before a unit starts and between candidates.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// How many units may run at once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerLimit {
    /// One thread per source, all running at once
    PerSource,
    /// At most this many units in flight; the rest queue
    Fixed(usize),
}

impl Default for WorkerLimit {
    fn default() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        WorkerLimit::Fixed(cpus)
    }
}

/// Tunables for a matching run
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Max per-channel difference still counted as equal
    pub tolerance: u8,
    /// Minimum score for a level to match, 0-1
    pub threshold: f64,
    /// Resolutions to escalate through
    pub ladder: ResolutionLadder,
    /// Candidates above this size are skipped undecoded
    pub max_candidate_bytes: u64,
    /// Candidate extensions to consider
    pub extensions: Vec<String>,
    /// Concurrency bound
    pub workers: WorkerLimit,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            tolerance: 2,
            threshold: 0.75,
            ladder: ResolutionLadder::default(),
            max_candidate_bytes: DEFAULT_MAX_CANDIDATE_BYTES,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            workers: WorkerLimit::default(),
        }
    }
}

/// Builds the comparator each unit of work uses
pub type ComparatorFactory =
    Arc<dyn Fn(&MatchConfig) -> Box<dyn LevelComparator> + Send + Sync>;

fn pixel_comparator(config: &MatchConfig) -> Box<dyn LevelComparator> {
    Box::new(PixelComparator::new(config.tolerance, config.threshold))
}

/// Builder for [`MatchPipeline`]
#[derive(Default)]
pub struct MatchPipelineBuilder {
    config: MatchConfig,
    cancellation: Option<CancellationToken>,
    comparator: Option<ComparatorFactory>,
}

impl MatchPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tolerance(mut self, tolerance: u8) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn ladder(mut self, ladder: ResolutionLadder) -> Self {
        self.config.ladder = ladder;
        self
    }

    pub fn max_candidate_bytes(mut self, max_bytes: u64) -> Self {
        self.config.max_candidate_bytes = max_bytes;
        self
    }

    pub fn extensions(mut self, extensions: Vec<String>) -> Self {
        self.config.extensions = extensions;
        self
    }

    pub fn workers(mut self, workers: WorkerLimit) -> Self {
        self.config.workers = workers;
        self
    }

    /// Share an existing token, e.g. one wired to a timeout
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Swap the per-level comparator; defaults to [`PixelComparator`]
    pub fn comparator<F>(mut self, factory: F) -> Self
    where
        F: Fn(&MatchConfig) -> Box<dyn LevelComparator> + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(factory));
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<MatchPipeline, ConfigError> {
        let threshold = self.config.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold { value: threshold });
        }
        if self.config.workers == WorkerLimit::Fixed(0) {
            return Err(ConfigError::InvalidWorkers);
        }

        let filter = ImageFilter::new()
            .with_extensions(self.config.extensions.clone())
            .with_max_bytes(self.config.max_candidate_bytes);

        Ok(MatchPipeline {
            config: self.config,
            filter,
            cancellation: self.cancellation.unwrap_or_default(),
            comparator: self
                .comparator
                .unwrap_or_else(|| Arc::new(pixel_comparator) as ComparatorFactory),
        })
    }
}

/// Per-run counters updated from every unit
#[derive(Default)]
struct RunStats {
    sources_processed: AtomicUsize,
    comparisons: AtomicUsize,
    candidate_failures: AtomicUsize,
    skipped_sources: Mutex<Vec<SkippedSource>>,
}

impl RunStats {
    fn skip_source(&self, path: &Path, reason: String) {
        if let Ok(mut skipped) = self.skipped_sources.lock() {
            skipped.push(SkippedSource {
                path: path.to_path_buf(),
                reason,
            });
        }
    }
}

/// The source-against-candidates matcher
pub struct MatchPipeline {
    config: MatchConfig,
    filter: ImageFilter,
    cancellation: CancellationToken,
    comparator: ComparatorFactory,
}

impl MatchPipeline {
    pub fn builder() -> MatchPipelineBuilder {
        MatchPipelineBuilder::new()
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Handle for stopping this pipeline from another thread
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Run without events
    pub fn run(
        &self,
        sources: &[PathBuf],
        candidates: &[PathBuf],
    ) -> Result<MatchReport, MatchFinderError> {
        self.run_with_events(sources, candidates, &null_sender())
    }

    /// Compare every source against every candidate.
    ///
    /// Returns after every unit of work has finished. Only a run that cannot
    /// start at all is an error.
    pub fn run_with_events(
        &self,
        sources: &[PathBuf],
        candidates: &[PathBuf],
        events: &EventSender,
    ) -> Result<MatchReport, MatchFinderError> {
        let start_time = Instant::now();
        let stats = RunStats::default();

        let resolved = self.resolve_sources(sources, events, &stats);
        if resolved.is_empty() {
            return Err(MatchFinderError::NoSources);
        }

        // frozen for the whole run; units only read it
        let candidates: Vec<PathBuf> = candidates
            .iter()
            .map(|path| fs::canonicalize(path).unwrap_or_else(|_| path.clone()))
            .collect();

        events.send(Event::Pipeline(PipelineEvent::Started {
            sources: resolved.len(),
            candidates: candidates.len(),
        }));
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Matching,
        }));

        let threads = match self.config.workers {
            WorkerLimit::PerSource => resolved.len(),
            WorkerLimit::Fixed(n) => n.min(resolved.len()),
        }
        .max(1);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("match-worker-{i}"))
            .build()
            .map_err(|e| MatchFinderError::WorkerPool(e.to_string()))?;

        tracing::info!(
            sources = resolved.len(),
            candidates = candidates.len(),
            workers = threads,
            "starting match run"
        );

        let aggregator = MatchAggregator::new(events.clone());

        pool.scope(|scope| {
            for source in &resolved {
                let sink = aggregator.sink();
                let candidates = &candidates;
                let stats = &stats;
                scope.spawn(move |_| {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                        self.run_unit(source, candidates, &sink, events, stats)
                    }));

                    if let Err(payload) = outcome {
                        let reason = panic_message(payload.as_ref());
                        tracing::error!(source = %source.display(), "worker panicked: {}", reason);
                        events.send(Event::Match(MatchEvent::SourceSkipped {
                            source: source.clone(),
                            message: format!("worker panicked: {}", reason),
                        }));
                        stats.skip_source(source, reason);
                    }
                });
            }
        });

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Reporting,
        }));

        let records = aggregator.finish();
        let cancelled = self.cancellation.is_cancelled();
        let duration_ms = start_time.elapsed().as_millis() as u64;

        let report = MatchReport {
            sources_processed: stats.sources_processed.load(Ordering::SeqCst),
            comparisons: stats.comparisons.load(Ordering::SeqCst),
            candidate_failures: stats.candidate_failures.load(Ordering::SeqCst),
            skipped_sources: stats.skipped_sources.into_inner().unwrap_or_default(),
            records,
            cancelled,
            duration_ms,
        };

        if cancelled {
            tracing::warn!("match run cancelled");
            events.send(Event::Pipeline(PipelineEvent::Cancelled));
        }

        tracing::info!(
            matches = report.match_count(),
            comparisons = report.comparisons,
            duration_ms,
            "match run finished"
        );

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                sources_processed: report.sources_processed,
                comparisons: report.comparisons,
                matches: report.match_count(),
                duration_ms,
            },
        }));

        Ok(report)
    }

    /// Canonicalize sources, reporting and dropping the ones that aren't files
    fn resolve_sources(
        &self,
        sources: &[PathBuf],
        events: &EventSender,
        stats: &RunStats,
    ) -> Vec<PathBuf> {
        sources
            .iter()
            .filter_map(|path| match fs::canonicalize(path) {
                Ok(canonical) if canonical.is_file() => Some(canonical),
                _ => {
                    let error = SourceError::InvalidPath { path: path.clone() };
                    tracing::warn!("{}", error);
                    events.send(Event::Match(MatchEvent::SourceSkipped {
                        source: path.clone(),
                        message: error.to_string(),
                    }));
                    stats.skip_source(path, error.to_string());
                    None
                }
            })
            .collect()
    }

    /// One source against the whole candidate list
    fn run_unit(
        &self,
        source: &Path,
        candidates: &[PathBuf],
        sink: &MatchSink,
        events: &EventSender,
        stats: &RunStats,
    ) {
        if self.cancellation.is_cancelled() {
            return;
        }

        events.send(Event::Match(MatchEvent::SourceStarted {
            source: source.to_path_buf(),
        }));

        let source_image = match RasterImage::open(source) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(source = %source.display(), "skipping source: {}", e);
                events.send(Event::Match(MatchEvent::SourceSkipped {
                    source: source.to_path_buf(),
                    message: e.to_string(),
                }));
                stats.skip_source(source, e.to_string());
                return;
            }
        };

        stats.sources_processed.fetch_add(1, Ordering::SeqCst);

        let mut comparator = (self.comparator)(&self.config);
        let mut compared = 0;
        let mut matches = 0;

        for candidate in candidates {
            if self.cancellation.is_cancelled() {
                break;
            }

            match self.filter.admit(candidate) {
                Ok(Admission::Accept) => {}
                Ok(Admission::UnsupportedExtension) => {
                    tracing::trace!(candidate = %candidate.display(), "unsupported extension");
                    continue;
                }
                Ok(admission @ Admission::TooLarge { .. }) => {
                    if let Some(error) = admission.rejection(candidate) {
                        tracing::debug!("skipping candidate: {}", error);
                    }
                    continue;
                }
                Err(e) => {
                    self.candidate_failed(source, candidate, &e.to_string(), events, stats);
                    continue;
                }
            }

            let ladder = &self.config.ladder;
            let result = RasterImage::open(candidate).and_then(|test_image| {
                progressive_compare_with(comparator.as_mut(), &source_image, &test_image, ladder)
            });

            let result = match result {
                Ok(result) => result,
                Err(e) => {
                    self.candidate_failed(source, candidate, &e.to_string(), events, stats);
                    continue;
                }
            };

            compared += 1;
            stats.comparisons.fetch_add(1, Ordering::SeqCst);
            sink.stream_score(source, candidate, &result);

            if result.is_full_match() && candidate.as_path() != source {
                matches += 1;
                sink.record(MatchRecord {
                    source: source.to_path_buf(),
                    candidate: candidate.clone(),
                    score_percent: result.reported_percent(),
                });
            }
        }

        events.send(Event::Match(MatchEvent::SourceCompleted {
            source: source.to_path_buf(),
            candidates_compared: compared,
            matches,
        }));
    }

    fn candidate_failed(
        &self,
        source: &Path,
        candidate: &Path,
        message: &str,
        events: &EventSender,
        stats: &RunStats,
    ) {
        tracing::warn!(candidate = %candidate.display(), "skipping candidate: {}", message);
        stats.candidate_failures.fetch_add(1, Ordering::SeqCst);
        events.send(Event::Match(MatchEvent::CandidateFailed {
            source: source.to_path_buf(),
            candidate: candidate.to_path_buf(),
            message: message.to_string(),
        }));
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comparator::LevelResult;
    use crate::error::RasterError;
    use crate::events::EventChannel;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn save_solid(dir: &TempDir, name: &str, rgb: [u8; 3]) -> PathBuf {
        let path = dir.path().join(name);
        RgbImage::from_pixel(32, 32, Rgb(rgb)).save(&path).unwrap();
        path
    }

    fn small_ladder() -> ResolutionLadder {
        ResolutionLadder::new(vec![8, 32]).unwrap()
    }

    /// Panics whenever the source is pure red.
    struct PanicsOnRedSource(PixelComparator);

    impl LevelComparator for PanicsOnRedSource {
        fn compare_at(
            &mut self,
            resolution: u32,
            source: &RasterImage,
            test: &RasterImage,
        ) -> Result<LevelResult, RasterError> {
            if source.rgb(0, 0) == [255, 0, 0] {
                panic!("red source");
            }
            self.0.compare_at(resolution, source, test)
        }

        fn description(&self) -> String {
            "panics on red sources".to_string()
        }
    }

    /// Cancels the run as soon as it has been asked for one level.
    struct CancelsAfterFirstLevel {
        inner: PixelComparator,
        token: CancellationToken,
    }

    impl LevelComparator for CancelsAfterFirstLevel {
        fn compare_at(
            &mut self,
            resolution: u32,
            source: &RasterImage,
            test: &RasterImage,
        ) -> Result<LevelResult, RasterError> {
            let result = self.inner.compare_at(resolution, source, test);
            self.token.cancel();
            result
        }

        fn description(&self) -> String {
            "cancels after the first level".to_string()
        }
    }

    #[test]
    fn builder_defaults_match_documented_tunables() {
        let pipeline = MatchPipeline::builder().build().unwrap();
        let config = pipeline.config();

        assert_eq!(config.tolerance, 2);
        assert_eq!(config.threshold, 0.75);
        assert_eq!(config.ladder.levels(), &[16, 128, 512, 1024]);
        assert_eq!(config.max_candidate_bytes, 300_000_000);
        assert_eq!(config.extensions, vec!["png", "jpg", "jpeg", "bmp"]);
    }

    #[test]
    fn builder_rejects_bad_threshold() {
        assert!(matches!(
            MatchPipeline::builder().threshold(1.5).build(),
            Err(ConfigError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            MatchPipeline::builder().threshold(f64::NAN).build(),
            Err(ConfigError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn builder_rejects_zero_workers() {
        assert!(matches!(
            MatchPipeline::builder().workers(WorkerLimit::Fixed(0)).build(),
            Err(ConfigError::InvalidWorkers)
        ));
    }

    #[test]
    fn empty_sources_cannot_start() {
        let pipeline = MatchPipeline::builder().build().unwrap();
        assert!(matches!(pipeline.run(&[], &[]), Err(MatchFinderError::NoSources)));
    }

    #[test]
    fn all_sources_missing_cannot_start() {
        let pipeline = MatchPipeline::builder().build().unwrap();
        let result = pipeline.run(&[PathBuf::from("/nonexistent/source.png")], &[]);
        assert!(matches!(result, Err(MatchFinderError::NoSources)));
    }

    #[test]
    fn missing_source_is_skipped_and_run_continues() {
        let dir = TempDir::new().unwrap();
        let source = save_solid(&dir, "source.png", [10, 20, 30]);
        let copy = save_solid(&dir, "copy.png", [10, 20, 30]);

        let pipeline = MatchPipeline::builder().ladder(small_ladder()).build().unwrap();
        let report = pipeline
            .run(&[PathBuf::from("/nonexistent/source.png"), source], &[copy])
            .unwrap();

        assert_eq!(report.skipped_sources.len(), 1);
        assert_eq!(report.sources_processed, 1);
        assert_eq!(report.match_count(), 1);
    }

    #[test]
    fn self_match_is_excluded() {
        let dir = TempDir::new().unwrap();
        let source = save_solid(&dir, "source.png", [200, 100, 50]);

        let pipeline = MatchPipeline::builder().ladder(small_ladder()).build().unwrap();
        let report = pipeline.run(&[source.clone()], &[source]).unwrap();

        assert_eq!(report.comparisons, 1);
        assert_eq!(report.match_count(), 0);
    }

    #[test]
    fn self_match_is_excluded_through_relative_paths() {
        let dir = TempDir::new().unwrap();
        let source = save_solid(&dir, "source.png", [200, 100, 50]);
        let dotted = dir.path().join(".").join("source.png");

        let pipeline = MatchPipeline::builder().ladder(small_ladder()).build().unwrap();
        let report = pipeline.run(&[source], &[dotted]).unwrap();

        assert_eq!(report.match_count(), 0);
    }

    #[test]
    fn corrupt_candidate_is_recovered_locally() {
        let dir = TempDir::new().unwrap();
        let source = save_solid(&dir, "source.png", [1, 2, 3]);
        let copy = save_solid(&dir, "copy.png", [1, 2, 3]);
        let corrupt = dir.path().join("corrupt.jpg");
        fs::write(&corrupt, b"not an image").unwrap();

        let pipeline = MatchPipeline::builder().ladder(small_ladder()).build().unwrap();
        let report = pipeline.run(&[source], &[corrupt, copy]).unwrap();

        assert_eq!(report.candidate_failures, 1);
        assert_eq!(report.match_count(), 1);
    }

    #[test]
    fn undecodable_source_is_skipped() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.png");
        fs::write(&broken, b"garbage").unwrap();
        let good = save_solid(&dir, "good.png", [9, 9, 9]);
        let copy = save_solid(&dir, "copy.png", [9, 9, 9]);

        let pipeline = MatchPipeline::builder().ladder(small_ladder()).build().unwrap();
        let report = pipeline.run(&[broken, good], &[copy]).unwrap();

        assert_eq!(report.skipped_sources.len(), 1);
        assert_eq!(report.match_count(), 1);
    }

    #[test]
    fn cancelled_run_returns_without_comparing() {
        let dir = TempDir::new().unwrap();
        let source = save_solid(&dir, "source.png", [1, 1, 1]);
        let copy = save_solid(&dir, "copy.png", [1, 1, 1]);

        let token = CancellationToken::new();
        token.cancel();

        let pipeline = MatchPipeline::builder().cancellation(token).build().unwrap();
        let report = pipeline.run(&[source], &[copy]).unwrap();

        assert!(report.cancelled);
        assert_eq!(report.comparisons, 0);
        assert_eq!(report.match_count(), 0);
    }

    #[test]
    fn bounded_pool_processes_every_source() {
        let dir = TempDir::new().unwrap();
        let sources: Vec<_> = (0..5)
            .map(|i| save_solid(&dir, &format!("s{i}.png"), [i * 40, 0, 0]))
            .collect();
        let candidates: Vec<_> = (0..5)
            .map(|i| save_solid(&dir, &format!("c{i}.png"), [i * 40, 0, 0]))
            .collect();

        let pipeline = MatchPipeline::builder()
            .ladder(small_ladder())
            .workers(WorkerLimit::Fixed(2))
            .build()
            .unwrap();
        let report = pipeline.run(&sources, &candidates).unwrap();

        assert_eq!(report.sources_processed, 5);
        assert_eq!(report.comparisons, 25);
        assert_eq!(report.match_count(), 5);
    }

    #[test]
    fn panic_message_reads_str_and_string() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
    }

    #[test]
    fn panicking_unit_does_not_affect_other_sources() {
        let dir = TempDir::new().unwrap();
        let red = save_solid(&dir, "red.png", [255, 0, 0]);
        let gray = save_solid(&dir, "gray.png", [90, 90, 90]);
        let red_copy = save_solid(&dir, "red_copy.png", [255, 0, 0]);
        let gray_copy = save_solid(&dir, "gray_copy.png", [90, 90, 90]);

        let pipeline = MatchPipeline::builder()
            .ladder(small_ladder())
            .workers(WorkerLimit::PerSource)
            .comparator(|config: &MatchConfig| -> Box<dyn LevelComparator> {
                let inner = PixelComparator::new(config.tolerance, config.threshold);
                Box::new(PanicsOnRedSource(inner))
            })
            .build()
            .unwrap();
        let report = pipeline
            .run(&[red.clone(), gray], &[red_copy, gray_copy])
            .unwrap();

        assert_eq!(report.match_count(), 1);
        assert!(report.records[0].source.ends_with("gray.png"));
        assert!(report.records[0].candidate.ends_with("gray_copy.png"));

        assert_eq!(report.skipped_sources.len(), 1);
        let skipped = &report.skipped_sources[0];
        assert_eq!(skipped.path, fs::canonicalize(&red).unwrap());
        assert!(skipped.reason.contains("red source"));
    }

    #[test]
    fn cancellation_between_candidates_keeps_collected_matches() {
        let dir = TempDir::new().unwrap();
        let source = save_solid(&dir, "source.png", [40, 80, 120]);
        let candidates: Vec<_> = (0..4)
            .map(|i| save_solid(&dir, &format!("copy{i}.png"), [40, 80, 120]))
            .collect();

        let token = CancellationToken::new();
        let trigger = token.clone();
        let pipeline = MatchPipeline::builder()
            .ladder(small_ladder())
            .cancellation(token)
            .comparator(move |config: &MatchConfig| -> Box<dyn LevelComparator> {
                Box::new(CancelsAfterFirstLevel {
                    inner: PixelComparator::new(config.tolerance, config.threshold),
                    token: trigger.clone(),
                })
            })
            .build()
            .unwrap();

        let (sender, receiver) = EventChannel::new();
        let report = pipeline.run_with_events(&[source], &candidates, &sender).unwrap();
        drop(sender);
        let events: Vec<_> = receiver.iter().collect();

        // the in-flight candidate finishes its ladder, the rest are never started
        assert!(report.cancelled);
        assert_eq!(report.comparisons, 1);
        assert_eq!(report.match_count(), 1);
        assert!(report.comparisons < candidates.len());
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::Pipeline(PipelineEvent::Cancelled))));
    }

    #[test]
    fn run_announces_matching_then_reporting() {
        let dir = TempDir::new().unwrap();
        let source = save_solid(&dir, "source.png", [5, 5, 5]);

        let pipeline = MatchPipeline::builder().ladder(small_ladder()).build().unwrap();
        let (sender, receiver) = EventChannel::new();
        pipeline.run_with_events(&[source], &[], &sender).unwrap();
        drop(sender);

        let phases: Vec<_> = receiver
            .iter()
            .filter_map(|event| match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => Some(phase),
                _ => None,
            })
            .collect();
        assert_eq!(phases, vec![PipelinePhase::Matching, PipelinePhase::Reporting]);
    }

    #[test]
    fn oversized_candidate_is_skipped_without_failure() {
        let dir = TempDir::new().unwrap();
        let source = save_solid(&dir, "source.png", [7, 7, 7]);
        let copy = save_solid(&dir, "copy.png", [7, 7, 7]);

        let pipeline = MatchPipeline::builder()
            .ladder(small_ladder())
            .max_candidate_bytes(1)
            .build()
            .unwrap();
        let report = pipeline.run(&[source], &[copy]).unwrap();

        assert_eq!(report.comparisons, 0);
        assert_eq!(report.candidate_failures, 0);
        assert_eq!(report.match_count(), 0);
    }
}
