//! # Scanner Module
//!
//! Builds the candidate pool by walking directory trees and decides which
//! candidates are worth decoding. Source lists can also be read from text
//! files.
//!
//! ## Admission Rules
//! - Extension must be one of png, jpg, jpeg, bmp (any case)
//! - File size must not exceed 300,000,000 bytes
//!
//! ## Example
//! ```rust,ignore
//! use progressive_image_match::core::scanner::{FileScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let candidates = scanner.scan(&["/Users/photos".into()]).files;
//! ```

mod filter;
mod sources;
mod walker;

pub use filter::{Admission, ImageFilter, DEFAULT_EXTENSIONS, DEFAULT_MAX_CANDIDATE_BYTES};
pub use sources::load_source_list;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use std::path::PathBuf;

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Every regular file found under the roots
    pub files: Vec<PathBuf>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for candidate enumerators
///
/// Implement this trait to feed the matcher from somewhere other than the
/// local filesystem.
pub trait FileScanner: Send + Sync {
    /// List all files below `roots`
    fn scan(&self, roots: &[PathBuf]) -> ScanResult;

    /// Scan with progress reporting via events
    fn scan_with_events(&self, roots: &[PathBuf], events: &EventSender) -> ScanResult;
}
