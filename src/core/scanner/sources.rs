//! Reading source image lists from text files.

use crate::error::SourceError;
use std::fs;
use std::path::{Path, PathBuf};

/// One path per line; blank lines and `#` comments are ignored.
///
/// Relative entries are resolved against the list file's directory.
pub fn load_source_list(list_path: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let contents = fs::read_to_string(list_path).map_err(|e| SourceError::SourcesFile {
        path: list_path.to_path_buf(),
        source: e,
    })?;

    let base = list_path.parent().unwrap_or_else(|| Path::new(""));

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let path = PathBuf::from(line);
            if path.is_absolute() {
                path
            } else {
                base.join(path)
            }
        })
        .collect())
}
