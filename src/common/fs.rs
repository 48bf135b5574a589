//! Common file system operations with unified error handling

use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use super::paths::to_forward_slashes;

/// Exclusion list applied while walking a data tree
///
/// An entry is skipped when its file name equals one of the patterns, or
/// when its forward-slash path relative to the walk root matches one of
/// them as a glob. Skipped directories are not descended into.
#[derive(Debug, Default, Clone)]
pub struct CopyFilter {
    patterns: Vec<String>,
}

impl CopyFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn excludes(&self, relative: &Path) -> bool {
        let name = relative.file_name().and_then(|n| n.to_str());
        let normalized = to_forward_slashes(relative);

        self.patterns.iter().any(|pattern| {
            name == Some(pattern.as_str()) || matches_glob(pattern, &normalized)
        })
    }
}

/// Check if a glob pattern matches a forward-slash relative path
///
/// An invalid pattern only matches the identical path.
pub fn matches_glob(pattern: &str, normalized_path: &str) -> bool {
    let candidate = CandidatePath::from(normalized_path);
    match Glob::new(pattern) {
        Ok(glob) => glob.matched(&candidate).is_some(),
        Err(_) => pattern == normalized_path,
    }
}

/// A regular file found while walking a source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    pub source: PathBuf,
    /// Path relative to the walk root
    pub relative: PathBuf,
}

/// List every regular file under `root` that `filter` does not exclude
///
/// Files are returned in file-name order so repeated runs produce the same
/// sequence of writes.
pub fn walk_files(root: &Path, filter: &CopyFilter) -> walkdir::Result<Vec<TreeFile>> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .map(|relative| !filter.excludes(relative))
                .unwrap_or(true)
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
        files.push(TreeFile {
            source: entry.path().to_path_buf(),
            relative,
        });
    }

    Ok(files)
}
