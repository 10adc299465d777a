//! Candidate admission: extension allow-list and file size ceiling.

use crate::error::RasterError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Extensions accepted by default (compared case-insensitively)
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Candidates above this many bytes are never decoded
pub const DEFAULT_MAX_CANDIDATE_BYTES: u64 = 300_000_000;

/// Why a candidate was or wasn't let through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Eligible for decoding
    Accept,
    /// Extension not on the allow-list
    UnsupportedExtension,
    /// File is above the size ceiling
    TooLarge { size: u64, limit: u64 },
}

impl Admission {
    /// The diagnostic for a rejected candidate.
    ///
    /// Only an oversized file carries one; unsupported extensions are
    /// filtered silently.
    pub fn rejection(self, path: &Path) -> Option<RasterError> {
        match self {
            Admission::TooLarge { size, limit } => Some(RasterError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit,
            }),
            Admission::Accept | Admission::UnsupportedExtension => None,
        }
    }
}

/// Decides which candidate files are worth decoding
#[derive(Debug, Clone)]
pub struct ImageFilter {
    /// Lowercase extensions to include
    extensions: HashSet<String>,
    /// Inclusive size ceiling in bytes
    max_bytes: u64,
}

impl ImageFilter {
    /// Create a filter with the default extensions and size ceiling
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_bytes: DEFAULT_MAX_CANDIDATE_BYTES,
        }
    }

    /// Override the list of extensions to accept
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions.into_iter().map(|e| e.to_lowercase()).collect();
        self
    }

    /// Override the size ceiling
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Check the extension only; no filesystem access
    pub fn has_allowed_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }

    /// Extension first, then file size from metadata.
    ///
    /// The size check never opens the file for decoding.
    pub fn admit(&self, path: &Path) -> Result<Admission, RasterError> {
        if !self.has_allowed_extension(path) {
            return Ok(Admission::UnsupportedExtension);
        }

        let size = fs::metadata(path)
            .map_err(|e| RasterError::Io {
                path: path.to_path_buf(),
                source: e,
            })?
            .len();

        if size > self.max_bytes {
            return Ok(Admission::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        Ok(Admission::Accept)
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}
