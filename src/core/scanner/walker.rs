//! Directory walking implementation using walkdir.

use super::{FileScanner, ScanResult};
use crate::error::ScanError;
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, PipelinePhase, ScanEvent, ScanProgress,
};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

/// Scanner implementation using the walkdir crate.
///
/// Lists every regular file; deciding which ones are images is left to
/// the matcher.
pub struct WalkDirScanner {
    config: ScanConfig,
}

impl WalkDirScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    fn is_hidden(entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry
                .file_name()
                .to_str()
                .map(|name| name.starts_with('.'))
                .unwrap_or(false)
    }

    fn scan_directory(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<(Vec<PathBuf>, Vec<ScanError>), ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        let mut errors = Vec::new();
        let mut directories_scanned = 0;

        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.config.include_hidden;
        let entries = walker
            .into_iter()
            .filter_entry(|entry| include_hidden || !Self::is_hidden(entry));

        for entry_result in entries {
            match entry_result {
                Ok(entry) => {
                    if entry.file_type().is_dir() {
                        directories_scanned += 1;
                        events.send(Event::Scan(ScanEvent::Progress(ScanProgress {
                            directories_scanned,
                            files_found: files.len(),
                            current_path: entry.path().to_path_buf(),
                        })));
                        continue;
                    }

                    if entry.file_type().is_file() {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|io| io.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));

                    errors.push(error);
                }
            }
        }

        Ok((files, errors))
    }
}

impl FileScanner for WalkDirScanner {
    fn scan(&self, roots: &[PathBuf]) -> ScanResult {
        self.scan_with_events(roots, &null_sender())
    }

    fn scan_with_events(&self, roots: &[PathBuf], events: &EventSender) -> ScanResult {
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));
        events.send(Event::Scan(ScanEvent::Started {
            paths: roots.to_vec(),
        }));

        let mut all_files = Vec::new();
        let mut all_errors = Vec::new();

        for root in roots {
            match self.scan_directory(root, events) {
                Ok((files, errors)) => {
                    all_files.extend(files);
                    all_errors.extend(errors);
                }
                Err(e) => {
                    tracing::warn!(path = %root.display(), "{}", e);
                    events.send(Event::Scan(ScanEvent::Error {
                        path: root.clone(),
                        message: e.to_string(),
                    }));
                    all_errors.push(e);
                }
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_files: all_files.len(),
        }));

        ScanResult {
            files: all_files,
            errors: all_errors,
        }
    }
}
