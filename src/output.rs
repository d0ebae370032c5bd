//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! The primary display for every entity (group, document, page) is its
//! derived label and positional index. Source files and links are secondary
//! context: indented `Source:` lines, or a `→ link` tail.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Mount /
//!     001 README
//!         Source: 01-intro/README.md
//!     002 overview
//!         Source: 01-intro/01-overview.md
//! ```
//!
//! ## Check (navigation trees)
//!
//! ```text
//! Mount /
//!     001 intro → /01-intro/README.html
//!         001 overview → /01-intro/01-overview.html
//!     002 syntax → /02-syntax/01-types.html
//!         001 types → /02-syntax/01-types.html
//!
//! 1 mount, 3 documents, 4 catalogue entries
//! ```
//!
//! ## Build
//!
//! ```text
//! Mount /
//!     001 Overview → /01-intro/01-overview.html
//!     002 Introduction → /01-intro/README.html
//!
//! Generated 2 pages (2 catalogue entries) in dist
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::generate::{BuildReport, MountTree};
use crate::link;
use crate::naming::{base_name, derive_label};
use crate::types::{CatalogEntry, NavEntry, NavTree};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `001 label → link`
fn linked_line(depth: usize, index: usize, label: &str, link: &str) -> String {
    format!(
        "{}{} {} \u{2192} {}",
        indent(depth),
        format_index(index),
        label,
        link
    )
}

fn count(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

// ============================================================================
// Scan
// ============================================================================

/// Format the documents discovered under each mount, in scan order.
pub fn format_scan_output(trees: &[MountTree]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, mount) in trees.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("Mount {}", mount.mount));
        if mount.documents.is_empty() {
            lines.push("    (no documents)".to_string());
        }
        for (j, doc) in mount.documents.iter().enumerate() {
            let label = derive_label(base_name(&doc.path));
            lines.push(format!("    {} {}", format_index(j + 1), label));
            let extension = doc
                .file
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            lines.push(format!(
                "        Source: {}.{}",
                link::join(&mount.sidebar.dir, &doc.path),
                extension
            ));
        }
    }
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(trees: &[MountTree]) {
    for line in format_scan_output(trees) {
        println!("{}", line);
    }
}

// ============================================================================
// Navigation trees
// ============================================================================

/// Format one navigation tree, groups with their items indented below.
pub fn format_nav_tree(tree: &NavTree, depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if tree.is_empty() {
        lines.push(format!("{}(empty)", indent(depth)));
    }
    for (i, entry) in tree.entries.iter().enumerate() {
        lines.push(linked_line(depth, i + 1, entry.label(), entry.link()));
        if let NavEntry::Group(group) = entry {
            for (j, item) in group.items.iter().enumerate() {
                lines.push(linked_line(depth + 1, j + 1, &item.label, &item.link));
            }
        }
    }
    lines
}

/// Format the `check` summary: every mount's tree plus totals.
pub fn format_check_output(trees: &[MountTree], catalogue_entries: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for mount in trees {
        lines.push(format!("Mount {}", mount.mount));
        lines.extend(format_nav_tree(&mount.tree, 1));
        lines.push(String::new());
    }
    let documents: usize = trees.iter().map(|t| t.documents.len()).sum();
    lines.push(format!(
        "{}, {}, {}",
        count(trees.len(), "mount", "mounts"),
        count(documents, "document", "documents"),
        count(catalogue_entries, "catalogue entry", "catalogue entries")
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(trees: &[MountTree], catalogue_entries: usize) {
    for line in format_check_output(trees, catalogue_entries) {
        println!("{}", line);
    }
}

// ============================================================================
// Catalogue
// ============================================================================

/// Format the flat catalogue the cross-reference linker scans against.
pub fn format_catalogue(entries: &[CatalogEntry]) -> Vec<String> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| linked_line(0, i + 1, &e.text, &e.link))
        .collect()
}

/// Print the catalogue to stdout.
pub fn print_catalogue(entries: &[CatalogEntry]) {
    for line in format_catalogue(entries) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format build output: generated pages per mount, then a summary line.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_mount: Option<&str> = None;
    let mut position = 0;

    for page in &report.pages {
        if current_mount != Some(page.mount.as_str()) {
            if current_mount.is_some() {
                lines.push(String::new());
            }
            lines.push(format!("Mount {}", page.mount));
            current_mount = Some(page.mount.as_str());
            position = 0;
        }
        position += 1;
        lines.push(linked_line(1, position, &page.title, &page.link));
    }

    if !report.pages.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Generated {} ({}) in {}",
        count(report.pages.len(), "page", "pages"),
        count(report.catalogue_entries, "catalogue entry", "catalogue entries"),
        report.output.display()
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SidebarConfig;
    use crate::generate::GeneratedPage;
    use crate::scan::Document;
    use crate::types::{NavGroup, NavItem};
    use std::path::PathBuf;

    fn item(label: &str, link: &str) -> NavItem {
        NavItem {
            label: label.to_string(),
            link: link.to_string(),
        }
    }

    fn sample_tree() -> NavTree {
        NavTree {
            entries: vec![
                NavEntry::Item(item("preface", "/00-preface.html")),
                NavEntry::Group(NavGroup {
                    label: "intro".to_string(),
                    link: "/01-intro/README.html".to_string(),
                    items: vec![item("overview", "/01-intro/01-overview.html")],
                    collapsible: None,
                    collapsed: None,
                }),
            ],
        }
    }

    fn sample_mount() -> MountTree {
        MountTree {
            mount: "/".to_string(),
            sidebar: SidebarConfig::default(),
            documents: vec![
                Document {
                    path: "00-preface".to_string(),
                    file: PathBuf::from("docs/00-preface.md"),
                },
                Document {
                    path: "01-intro/01-overview".to_string(),
                    file: PathBuf::from("docs/01-intro/01-overview.md"),
                },
            ],
            tree: sample_tree(),
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn count_picks_singular_or_plural() {
        assert_eq!(count(1, "entry", "entries"), "1 entry");
        assert_eq!(count(0, "entry", "entries"), "0 entries");
    }

    // =========================================================================
    // Command output tests
    // =========================================================================

    #[test]
    fn scan_output_lists_labels_with_sources() {
        let lines = format_scan_output(&[sample_mount()]);
        assert_eq!(
            lines,
            vec![
                "Mount /",
                "    001 preface",
                "        Source: 00-preface.md",
                "    002 overview",
                "        Source: 01-intro/01-overview.md",
            ]
        );
    }

    #[test]
    fn scan_output_prefixes_mount_dir() {
        let mut mount = sample_mount();
        mount.sidebar.dir = "guide".to_string();
        let lines = format_scan_output(&[mount]);
        assert_eq!(lines[2], "        Source: guide/00-preface.md");
    }

    #[test]
    fn nav_tree_indents_group_items() {
        let lines = format_nav_tree(&sample_tree(), 0);
        assert_eq!(
            lines,
            vec![
                "001 preface \u{2192} /00-preface.html",
                "002 intro \u{2192} /01-intro/README.html",
                "    001 overview \u{2192} /01-intro/01-overview.html",
            ]
        );
    }

    #[test]
    fn empty_tree_is_marked() {
        assert_eq!(format_nav_tree(&NavTree::default(), 1), vec!["    (empty)"]);
    }

    #[test]
    fn check_output_ends_with_totals() {
        let lines = format_check_output(&[sample_mount()], 3);
        assert_eq!(lines[0], "Mount /");
        assert_eq!(
            lines.last().map(String::as_str),
            Some("1 mount, 2 documents, 3 catalogue entries")
        );
    }

    #[test]
    fn catalogue_lines_in_order() {
        let lines = format_catalogue(&sample_tree().catalogue());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "002 intro \u{2192} /01-intro/README.html");
    }

    #[test]
    fn build_output_groups_pages_by_mount() {
        let page = |mount: &str, title: &str, link: &str| GeneratedPage {
            mount: mount.to_string(),
            path: String::new(),
            link: link.to_string(),
            title: title.to_string(),
        };
        let report = BuildReport {
            output: PathBuf::from("dist"),
            pages: vec![
                page("/guide/", "Intro", "/guide/a.html"),
                page("/guide/", "Types", "/guide/b.html"),
                page("/notes/", "Misc", "/notes/c.html"),
            ],
            catalogue_entries: 1,
        };
        let lines = format_build_output(&report);
        assert_eq!(
            lines,
            vec![
                "Mount /guide/",
                "    001 Intro \u{2192} /guide/a.html",
                "    002 Types \u{2192} /guide/b.html",
                "",
                "Mount /notes/",
                "    001 Misc \u{2192} /notes/c.html",
                "",
                "Generated 3 pages (1 catalogue entry) in dist",
            ]
        );
    }

    #[test]
    fn empty_build_reports_zero_pages() {
        let report = BuildReport {
            output: PathBuf::from("dist"),
            ..BuildReport::default()
        };
        assert_eq!(
            format_build_output(&report),
            vec!["Generated 0 pages (0 catalogue entries) in dist"]
        );
    }
}
