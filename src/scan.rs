//! Document discovery.
//!
//! Walks a mount directory and returns the flat, ordered list of documents
//! the hierarchy builder folds into a navigation tree.
//!
//! ## Directory Structure
//!
//! ```text
//! docs/                            # Mount root
//! ├── config.toml                  # Site configuration (optional, not a document)
//! ├── 00-preface.md                # Top-level document → "00-preface"
//! ├── 01-intro/
//! │   ├── README.md                # Group index → "01-intro/README"
//! │   └── 01-overview.md           # → "01-intro/01-overview"
//! ├── 02-syntax/
//! │   └── 01-types.md              # → "02-syntax/01-types"
//! ├── node_modules/                # Ignored directory, never descended into
//! └── .vitepress/                  # Hidden, never descended into
//! ```
//!
//! ## Output
//!
//! Paths are relative to the mount root, `/`-separated on every platform,
//! without the document extension, sorted lexicographically. An empty
//! directory is a valid (empty) result.
//!
//! ## Filtering
//!
//! - Hidden entries (leading `.`) are skipped.
//! - A directory is pruned when its derived label equals the derived label of
//!   an `ignore_dirs` entry, so `03-drafts` is caught by `drafts`.
//! - A document is dropped when its group key (first segment, or file name
//!   in flat mode) matches an `ignore_dirs` entry the same way, so a
//!   top-level `03-drafts.md` goes too.
//! - A document is dropped when its path ends with an `ignore_files` entry.

use crate::naming::{derive_label, group_key};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Root directory not found: {0}")]
    NotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What to collect and what to leave out.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Document extension without the dot, matched case-insensitively.
    pub extension: String,
    /// Directory names to skip entirely (compared by derived label).
    pub ignore_dirs: Vec<String>,
    /// Path suffixes (extension stripped) of documents to skip.
    pub ignore_files: Vec<String>,
    /// Group by top-level directory; decides which segment is the group key.
    pub hierarchy: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: "md".to_string(),
            ignore_dirs: vec!["node_modules".to_string()],
            ignore_files: Vec::new(),
            hierarchy: true,
        }
    }
}

/// A discovered document: its catalogue path and the file it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: String,
    pub file: PathBuf,
}

/// Collect every document path under `root`.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<Vec<String>, ScanError> {
    Ok(scan_documents(root, options)?
        .into_iter()
        .map(|doc| doc.path)
        .collect())
}

/// Collect every document under `root`, keeping the on-disk file of each.
pub fn scan_documents(root: &Path, options: &ScanOptions) -> Result<Vec<Document>, ScanError> {
    if !root.exists() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let ignored = ignored_labels(&options.ignore_dirs);
    let mut docs = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || keep_entry(e, &ignored));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), &options.extension) {
            continue;
        }
        let Some(rel) = relative_path(entry.path(), root) else {
            warn!(path = %entry.path().display(), "skipping document with a non UTF-8 name");
            continue;
        };
        if is_ignored_file(&rel, &options.ignore_files) {
            debug!(path = %rel, "ignored by ignore_files");
            continue;
        }
        if ignored.contains(&group_key(&rel, options.hierarchy)) {
            debug!(path = %rel, "group key ignored by ignore_dirs");
            continue;
        }
        docs.push(Document {
            path: rel,
            file: entry.into_path(),
        });
    }

    docs.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(root = %root.display(), count = docs.len(), "scan complete");
    Ok(docs)
}

/// Derived labels of the configured ignore directories.
pub fn ignored_labels(ignore_dirs: &[String]) -> Vec<String> {
    ignore_dirs.iter().map(|d| derive_label(d)).collect()
}

/// Whether `path` (extension stripped) ends with one of `ignore_files`.
pub fn is_ignored_file(path: &str, ignore_files: &[String]) -> bool {
    ignore_files
        .iter()
        .any(|suffix| !suffix.is_empty() && path.ends_with(suffix.as_str()))
}

fn keep_entry(entry: &DirEntry, ignored: &[String]) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return false;
    }
    if entry.file_type().is_dir() {
        let label = derive_label(&name);
        if ignored.contains(&label) {
            debug!(dir = %entry.path().display(), "ignored by ignore_dirs");
            return false;
        }
    }
    true
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// `root`-relative, `/`-joined path with the extension removed.
fn relative_path(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?.with_extension("");
    let segments = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join("/"))
}
