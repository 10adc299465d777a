//! # Error Module
//!
//! Error types for the progressive image matcher.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Local recovery** - per-source and per-candidate errors are reported
//!   and skipped; only a run that cannot start is fatal

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum MatchFinderError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Image error: {0}")]
    Raster(#[from] RasterError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No usable source images; nothing to compare")]
    NoSources,

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("Failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

/// Errors that occur while enumerating candidate files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while loading or resizing an image
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    Empty { path: PathBuf },

    #[error("File {path} is {size} bytes, above the {limit} byte limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Resize to {resolution}x{resolution} failed: {reason}")]
    Resize { resolution: u32, reason: String },

    #[error("Failed to open image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors tied to the reference images
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source image does not exist: {path}")]
    InvalidPath { path: PathBuf },

    #[error("Failed to read source list {path}: {source}")]
    SourcesFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid tunables, rejected before any work starts
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid threshold: {value} (must be between 0 and 1)")]
    InvalidThreshold { value: f64 },

    #[error("Resolution ladder must contain at least one level")]
    EmptyLadder,

    #[error("Resolution ladder must be strictly ascending, got {ladder:?}")]
    LadderNotAscending { ladder: Vec<u32> },

    #[error("Resolution ladder entries must be positive")]
    ZeroResolution,

    #[error("Worker count must be at least 1")]
    InvalidWorkers,
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, MatchFinderError>;
