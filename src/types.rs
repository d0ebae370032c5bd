//! Navigation types shared by the hierarchy builder, the linker, the site
//! generator, and the `sidebar` JSON output.
//!
//! Field names serialize as `text`/`link`/`items` so the JSON can be dropped
//! straight into a VitePress-style sidebar config.

use serde::{Deserialize, Serialize};

/// A single document in the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    #[serde(rename = "text")]
    pub label: String,
    /// Site-rooted link, always `/<path>.<link_extension>`.
    pub link: String,
}

/// A directory-level group of documents.
///
/// `link` points at the group's index document when one exists, otherwise at
/// its first item. A group with no items is an index-only directory and is
/// displayed as a plain link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavGroup {
    #[serde(rename = "text")]
    pub label: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<NavItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl NavGroup {
    /// True for index-only directories, which render as a bare link.
    pub fn is_bare(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavEntry {
    Group(NavGroup),
    Item(NavItem),
}

impl NavEntry {
    pub fn label(&self) -> &str {
        match self {
            NavEntry::Group(g) => &g.label,
            NavEntry::Item(i) => &i.label,
        }
    }

    pub fn link(&self) -> &str {
        match self {
            NavEntry::Group(g) => &g.link,
            NavEntry::Item(i) => &i.link,
        }
    }
}

/// Ordered top-level entries for one mount point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavTree {
    pub entries: Vec<NavEntry>,
}

impl NavTree {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten into catalogue entries: each group, then its items, in tree order.
    pub fn catalogue(&self) -> Vec<CatalogEntry> {
        let mut out = Vec::new();
        for entry in &self.entries {
            match entry {
                NavEntry::Group(group) => {
                    out.push(CatalogEntry::new(&group.label, &group.link));
                    out.extend(
                        group
                            .items
                            .iter()
                            .map(|item| CatalogEntry::new(&item.label, &item.link)),
                    );
                }
                NavEntry::Item(item) => out.push(CatalogEntry::new(&item.label, &item.link)),
            }
        }
        out
    }
}

/// One `(label, link)` pair the cross-reference linker scans against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub text: String,
    pub link: String,
}

impl CatalogEntry {
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
        }
    }
}
