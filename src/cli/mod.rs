//! # CLI Module
//!
//! Command-line interface for the progressive image matcher.
//!
//! ## Usage
//! ```bash
//! # Search the current directory for copies of one image
//! img-match find --source ~/refs/logo.png
//!
//! # Several pools, sources listed in a file, stricter threshold
//! img-match find ~/Pictures ~/Downloads --sources-file refs.txt --threshold 0.9
//!
//! # Two workers, custom ladder, JSON output
//! img-match find ~/Pictures -s a.png --workers 2 --ladder 16,64,256 --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use progressive_image_match::core::comparator::ResolutionLadder;
use progressive_image_match::core::pipeline::{
    CancellationToken, MatchPipeline, MatchReport, WorkerLimit,
};
use progressive_image_match::core::reporter::{export_csv, export_json, ReportWriter};
use progressive_image_match::core::scanner::{
    load_source_list, FileScanner, ScanConfig, WalkDirScanner, DEFAULT_MAX_CANDIDATE_BYTES,
};
use progressive_image_match::error::Result;
use progressive_image_match::events::{
    Event, EventChannel, EventReceiver, MatchEvent, PipelineEvent, ScanEvent,
};
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Progressive Image Match - find near-duplicates of reference images
#[derive(Parser, Debug)]
#[command(name = "img-match")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search directories for images similar to the given sources
    Find {
        /// Directories to search (defaults to the current directory)
        paths: Vec<PathBuf>,

        /// Reference image to search for (repeatable)
        #[arg(short, long = "source", value_name = "PATH")]
        sources: Vec<PathBuf>,

        /// File listing reference images, one path per line
        #[arg(long, value_name = "FILE")]
        sources_file: Option<PathBuf>,

        /// Max per-channel difference still counted as equal (0-255)
        #[arg(short, long, default_value = "2")]
        tolerance: u8,

        /// Fraction of matching channels required at each level (0-1)
        #[arg(long, default_value = "0.75")]
        threshold: f64,

        /// Ascending square resolutions to compare at
        #[arg(long, value_delimiter = ',', default_value = "16,128,512,1024")]
        ladder: Vec<u32>,

        /// Skip candidates larger than this many bytes
        #[arg(long, default_value_t = DEFAULT_MAX_CANDIDATE_BYTES)]
        max_size: u64,

        /// Concurrent sources; 0 runs every source at once (default: CPU count)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Stop the run after this many seconds and report what was found
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Include hidden files and directories
        #[arg(long)]
        include_hidden: bool,

        /// Follow symbolic links while scanning
        #[arg(long)]
        follow_symlinks: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Don't print a line for every compared candidate
        #[arg(short, long)]
        quiet: bool,

        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON report for scripting
    Json,
    /// CSV, one row per match
    Csv,
}

/// Options for a `find` run after argument parsing
struct FindOptions {
    paths: Vec<PathBuf>,
    sources: Vec<PathBuf>,
    sources_file: Option<PathBuf>,
    tolerance: u8,
    threshold: f64,
    ladder: Vec<u32>,
    max_size: u64,
    workers: Option<usize>,
    timeout: Option<u64>,
    scan_config: ScanConfig,
    output: OutputFormat,
    quiet: bool,
    verbose: bool,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Find {
            paths,
            sources,
            sources_file,
            tolerance,
            threshold,
            ladder,
            max_size,
            workers,
            timeout,
            include_hidden,
            follow_symlinks,
            output,
            quiet,
            verbose,
        } => {
            progressive_image_match::init_tracing(if verbose { "debug" } else { "error" });

            run_find(FindOptions {
                paths,
                sources,
                sources_file,
                tolerance,
                threshold,
                ladder,
                max_size,
                workers,
                timeout,
                scan_config: ScanConfig {
                    include_hidden,
                    follow_symlinks,
                    ..Default::default()
                },
                output,
                quiet,
                verbose,
            })
        }
    }
}

fn run_find(options: FindOptions) -> Result<()> {
    let mut sources = options.sources;
    if let Some(list) = &options.sources_file {
        sources.extend(load_source_list(list)?);
    }

    let roots = if options.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        options.paths
    };

    let workers = match options.workers {
        None => WorkerLimit::default(),
        Some(0) => WorkerLimit::PerSource,
        Some(n) => WorkerLimit::Fixed(n),
    };

    let token = CancellationToken::new();
    let pipeline = MatchPipeline::builder()
        .tolerance(options.tolerance)
        .threshold(options.threshold)
        .ladder(ResolutionLadder::new(options.ladder)?)
        .max_candidate_bytes(options.max_size)
        .workers(workers)
        .cancellation(token.clone())
        .build()?;

    if let Some(secs) = options.timeout {
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            token.cancel();
        });
    }

    let pretty = options.output == OutputFormat::Pretty;
    let stream_scores = pretty && !options.quiet;

    let (sender, receiver) = EventChannel::new();
    let verbose = options.verbose;
    let event_thread =
        thread::spawn(move || handle_events(receiver, pretty, stream_scores, verbose));

    let scanner = WalkDirScanner::new(options.scan_config);
    let candidates = scanner.scan_with_events(&roots, &sender).files;

    let result = pipeline.run_with_events(&sources, &candidates, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let report = result?;
    write_report(&report, options.output)?;
    Ok(())
}

/// The warning line for a skipped item.
///
/// Verbose runs already log the same failure through tracing, so the
/// event side stays quiet there.
fn diagnostic_line(message: &str, verbose: bool) -> Option<String> {
    if verbose {
        return None;
    }
    Some(format!("{} {}", style("warning:").yellow().bold(), message))
}

/// Prints streaming score lines and one diagnostic line per skipped item
fn handle_events(receiver: EventReceiver, pretty: bool, stream_scores: bool, verbose: bool) {
    let diagnostics = Term::stderr();
    let colors = Term::stdout().features().colors_supported();
    let mut scores = ReportWriter::new(Term::stdout()).styled(colors);

    let progress = if pretty {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} sources {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let diagnostic = |message: String| {
        let Some(line) = diagnostic_line(&message, verbose) else {
            return;
        };
        match &progress {
            Some(pb) => pb.suspend(|| diagnostics.write_line(&line).ok()),
            None => diagnostics.write_line(&line).ok(),
        };
    };

    for event in receiver.iter() {
        match event {
            Event::Scan(ScanEvent::Error { message, .. }) => diagnostic(message),
            Event::Pipeline(PipelineEvent::Started { sources, .. }) => {
                // sources skipped while resolving were already counted
                if let Some(pb) = &progress {
                    pb.set_length(sources as u64 + pb.position());
                }
            }
            Event::Match(MatchEvent::SourceSkipped { message, .. }) => {
                diagnostic(message);
                if let Some(pb) = &progress {
                    pb.inc(1);
                }
            }
            Event::Match(MatchEvent::CandidateFailed { candidate, message, .. }) => {
                diagnostic(format!("skipping {}: {}", candidate.display(), message));
            }
            Event::Match(MatchEvent::CandidateScored {
                candidate,
                score_percent,
                ..
            }) if stream_scores => {
                let mut write = || scores.write_score_line(&candidate, score_percent).ok();
                match &progress {
                    Some(pb) => pb.suspend(write),
                    None => write(),
                };
            }
            Event::Match(MatchEvent::SourceCompleted { source, .. }) => {
                if let Some(pb) = &progress {
                    pb.inc(1);
                    pb.set_message(
                        source
                            .file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                            .into_owned(),
                    );
                }
            }
            Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                if let Some(pb) = &progress {
                    pb.set_message(phase.to_string());
                }
            }
            Event::Pipeline(PipelineEvent::Cancelled) => {
                diagnostic("run cancelled before every source finished".to_string())
            }
            Event::Pipeline(PipelineEvent::Completed { .. }) => {
                if let Some(pb) = &progress {
                    pb.finish_and_clear();
                }
            }
            _ => {}
        }
    }
}

fn write_report(report: &MatchReport, output: OutputFormat) -> io::Result<()> {
    match output {
        OutputFormat::Pretty => {
            let term = Term::stdout();
            let colors = term.features().colors_supported();
            ReportWriter::new(term).styled(colors).write_matches(report)
        }
        OutputFormat::Json => export_json(report, io::stdout().lock()),
        OutputFormat::Csv => export_csv(report, io::stdout().lock()),
    }
}
