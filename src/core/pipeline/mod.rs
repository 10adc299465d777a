//! # Pipeline Module
//!
//! Runs every source image against the candidate pool.
//!
//! ## Stages
//! 1. **Resolve** - Canonicalize sources, skipping the ones that don't exist
//! 2. **Fan out** - One unit of work per source on a bounded rayon pool
//! 3. **Match** - Each unit filters, decodes and progressively compares
//!    every candidate
//! 4. **Aggregate** - Confirmed matches flow through a channel and are read
//!    once every unit has finished
//!
//! ## Failure Isolation
//! Decode failures, missing files and even panics stay inside the unit
//! that hit them; the rest of the run carries on.

mod aggregator;
mod executor;

pub use aggregator::{MatchAggregator, MatchReport, MatchSink, SkippedSource, SourceMatches};
pub use executor::{
    CancellationToken, ComparatorFactory, MatchConfig, MatchPipeline, MatchPipelineBuilder,
    WorkerLimit,
};
