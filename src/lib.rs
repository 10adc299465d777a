//! # Progressive Image Match
//!
//! Finds near-duplicates of a set of reference images inside a larger pool.
//!
//! ## How Matching Works
//! Each source/candidate pair is compared at an ascending ladder of square
//! resolutions (16, 128, 512, 1024 by default). A pair that fails a cheap
//! low-resolution level never pays for the expensive ones, and only a pair
//! that agrees at every level is reported.
//!
//! ## Architecture
//! - `core` - The matching engine (UI-agnostic)
//! - `events` - Channel-based progress and diagnostic reporting
//! - `error` - Error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{MatchFinderError, Result};

/// Initialize tracing for the library
///
/// Called by the application entry point. `default_level` applies when
/// `RUST_LOG` is unset. Logs go to stderr so they never mix with the
/// report on stdout.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // a second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
