//! Navigation tree synthesis from a flat document list.
//!
//! The builder turns scanner output into the ordered groups and items a
//! sidebar displays. Nothing here touches the filesystem: paths in, tree out.
//!
//! ## Folding
//!
//! With hierarchy on (the default), documents are grouped by their top-level
//! directory:
//!
//! ```text
//! 00-preface               → item  "preface"
//! 01-intro/README          → (index of group "intro", not an item)
//! 01-intro/01-overview     → group "intro"  → item "overview"
//! 02-syntax/01-types       → group "syntax" → item "types"
//! 2-syntax/02-traits       → group "syntax" → item "traits"   (same key)
//! ```
//!
//! A group links to `<dir>/<index_link>` when that document exists, otherwise
//! to its first item. A directory holding only its index document becomes an
//! item-less group, displayed as a bare link.
//!
//! With hierarchy off every document becomes a standalone item.
//!
//! ## Ordering
//!
//! Documents are sorted by the optional sort key, falling back to path order.
//! The sort is stable, so documents with equal keys keep their scan order.
//! Groups appear in the order their first document is reached.

use crate::link::{join, normalize};
use crate::naming::{base_name, derive_label, group_key};
use crate::scan::{ignored_labels, is_ignored_file};
use crate::types::{NavEntry, NavGroup, NavItem, NavTree};
use std::collections::HashMap;
use std::fmt;

/// Maps a catalogue path to its position in the sidebar.
pub type SortKey = Box<dyn Fn(&str) -> u64>;

/// Post-processes every generated item (cosmetic label fixups and the like).
pub type ItemHook = Box<dyn Fn(NavItem) -> NavItem>;

/// Builder configuration for one mount point.
pub struct NavOptions {
    /// Treat top-level directories as groups. Default `true`.
    pub hierarchy: bool,
    /// Base name of the per-directory index document. Default `"index"`.
    pub index_link: String,
    /// Directories whose documents never appear. Default `["node_modules"]`.
    pub ignore_dirs: Vec<String>,
    /// Path suffixes of documents that never appear. Default empty.
    pub ignore_files: Vec<String>,
    /// Custom ordering; `None` sorts by path.
    pub sort_key: Option<SortKey>,
    /// Applied to each item before it is placed in the tree.
    pub handle: Option<ItemHook>,
    /// Initial collapsed state for groups; `None` leaves groups non-collapsible.
    pub collapsed: Option<bool>,
    /// Mount directory prepended to every link.
    pub base: String,
    /// Output extension every link ends with. Default `"html"`.
    pub link_extension: String,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            hierarchy: true,
            index_link: "index".to_string(),
            ignore_dirs: vec!["node_modules".to_string()],
            ignore_files: Vec::new(),
            sort_key: None,
            handle: None,
            collapsed: None,
            base: String::new(),
            link_extension: "html".to_string(),
        }
    }
}

impl fmt::Debug for NavOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavOptions")
            .field("hierarchy", &self.hierarchy)
            .field("index_link", &self.index_link)
            .field("ignore_dirs", &self.ignore_dirs)
            .field("ignore_files", &self.ignore_files)
            .field("sort_key", &self.sort_key.is_some())
            .field("handle", &self.handle.is_some())
            .field("collapsed", &self.collapsed)
            .field("base", &self.base)
            .field("link_extension", &self.link_extension)
            .finish()
    }
}

impl NavOptions {
    fn link(&self, path: &str) -> String {
        normalize(&self.base, path, &self.link_extension)
    }

    fn item(&self, path: &str) -> NavItem {
        let item = NavItem {
            label: derive_label(base_name(path)),
            link: self.link(path),
        };
        match &self.handle {
            Some(handle) => handle(item),
            None => item,
        }
    }

    /// `dir/<index_link>` paths are group indexes; deeper ones are just dropped.
    fn index_dir<'a>(&self, path: &'a str) -> Option<&'a str> {
        let (dir, name) = path.split_once('/')?;
        (self.hierarchy && name == self.index_link).then_some(dir)
    }

    fn is_index(&self, path: &str) -> bool {
        self.hierarchy && base_name(path) == self.index_link
    }
}

/// Whether a path survives the ignore rules.
fn is_kept(path: &str, options: &NavOptions, ignored: &[String]) -> bool {
    if is_ignored_file(path, &options.ignore_files) {
        return false;
    }
    let key = group_key(path, options.hierarchy);
    if ignored.contains(&key) {
        return false;
    }
    let mut dirs = path.split('/');
    dirs.next_back();
    !dirs.any(|dir| ignored.contains(&derive_label(dir)))
}

/// Fold scanned paths into a navigation tree.
pub fn build<S: AsRef<str>>(paths: &[S], options: &NavOptions) -> NavTree {
    let ignored = ignored_labels(&options.ignore_dirs);
    let mut kept: Vec<&str> = paths
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| is_kept(p, options, &ignored))
        .collect();

    match &options.sort_key {
        Some(key) => kept.sort_by_key(|p| key(*p)),
        None => kept.sort(),
    }

    // First index document seen per group key wins.
    let mut index_links: HashMap<String, String> = HashMap::new();
    for path in &kept {
        if let Some(dir) = options.index_dir(path) {
            index_links
                .entry(derive_label(dir))
                .or_insert_with(|| options.link(&join(dir, &options.index_link)));
        }
    }

    let mut entries: Vec<NavEntry> = Vec::new();
    let mut groups: HashMap<String, usize> = HashMap::new();

    for path in kept {
        if !options.hierarchy {
            entries.push(NavEntry::Item(options.item(path)));
            continue;
        }

        let is_top_level = !path.contains('/');
        if is_top_level {
            if !options.is_index(path) {
                entries.push(NavEntry::Item(options.item(path)));
            }
            continue;
        }

        let key = group_key(path, true);
        let index_only = options.is_index(path);
        if index_only && options.index_dir(path).is_none() {
            // index document of a nested subdirectory
            continue;
        }

        if let Some(&pos) = groups.get(&key) {
            if !index_only
                && let NavEntry::Group(group) = &mut entries[pos]
            {
                group.items.push(options.item(path));
            }
            continue;
        }

        let items = if index_only {
            Vec::new()
        } else {
            vec![options.item(path)]
        };
        let link = match index_links.get(&key) {
            Some(link) => link.clone(),
            None => items.first().map(|i| i.link.clone()).unwrap_or_default(),
        };
        groups.insert(key.clone(), entries.len());
        entries.push(NavEntry::Group(NavGroup {
            label: key,
            link,
            items,
            collapsible: options.collapsed.map(|_| true),
            collapsed: options.collapsed,
        }));
    }

    NavTree { entries }
}
