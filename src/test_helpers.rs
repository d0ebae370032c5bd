//! Shared test utilities for the docnav test suite.
//!
//! Provides throwaway doc trees on disk plus lookup helpers and shape
//! assertions for navigation trees.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = write_docs(&["01-intro/README.md", "01-intro/01-overview.md"]);
//! let paths = scan(tmp.path(), &ScanOptions::default()).unwrap();
//! let tree = build(&paths, &options);
//!
//! assert_tree_shape(&tree, &[("intro", &["overview"])]);
//! let intro = find_group(&tree, "intro");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{NavEntry, NavGroup, NavTree};

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp directory holding one document per relative path.
///
/// Each file gets a `# <file stem>` heading as content. Parent directories
/// are created as needed.
pub fn write_docs(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for rel in paths {
        write_doc(tmp.path(), rel, &format!("# {}\n", stem(rel)));
    }
    tmp
}

/// Write a single document with explicit content under `root`.
pub fn write_doc(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn stem(rel: &str) -> &str {
    let name = rel.rsplit('/').next().unwrap_or(rel);
    name.split_once('.').map(|(s, _)| s).unwrap_or(name)
}

// =========================================================================
// Tree lookups (panic with a clear message on miss)
// =========================================================================

/// Top-level entry labels in order.
pub fn entry_labels(tree: &NavTree) -> Vec<&str> {
    tree.entries.iter().map(NavEntry::label).collect()
}

/// Find a top-level group by label. Panics if not found.
pub fn find_group<'a>(tree: &'a NavTree, label: &str) -> &'a NavGroup {
    tree.entries
        .iter()
        .find_map(|e| match e {
            NavEntry::Group(g) if g.label == label => Some(g),
            _ => None,
        })
        .unwrap_or_else(|| {
            let labels = entry_labels(tree);
            panic!("group '{label}' not found. Available: {labels:?}")
        })
}

/// Item labels of a group in order.
pub fn item_labels(group: &NavGroup) -> Vec<&str> {
    group.items.iter().map(|i| i.label.as_str()).collect()
}

/// Assert that the navigation tree matches an expected shape.
///
/// Each entry is `(label, items)`. Use `&[]` for bare groups and top-level
/// items.
///
/// ```rust
/// assert_tree_shape(&tree, &[
///     ("preface", &[]),
///     ("intro", &["overview"]),
///     ("syntax", &["types", "traits"]),
/// ]);
/// ```
pub fn assert_tree_shape(tree: &NavTree, expected: &[(&str, &[&str])]) {
    let expected_labels: Vec<&str> = expected.iter().map(|(l, _)| *l).collect();
    assert_eq!(entry_labels(tree), expected_labels, "top-level labels mismatch");

    for (entry, (label, items)) in tree.entries.iter().zip(expected) {
        let actual: Vec<&str> = match entry {
            NavEntry::Group(g) => item_labels(g),
            NavEntry::Item(_) => Vec::new(),
        };
        assert_eq!(actual, items.to_vec(), "items of '{label}' mismatch");
    }
}
