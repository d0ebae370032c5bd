//! HTML site generation.
//!
//! Runs the whole build in one serial pass:
//!
//! ```text
//! 1. Scan       every mount's directory        →  documents
//! 2. Build      documents                      →  NavTree per mount
//! 3. Catalogue  all trees, in mount order      →  Linker
//! 4. Render     each document (linker applied) →  <output>/<dir>/<path>.<ext>
//! ```
//!
//! The trees and the catalogue are finished before the first document is
//! rendered and are never touched again, so a failed scan or a bad config
//! never leaves a half-written site behind.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── 00-preface.html
//! ├── 01-intro/
//! │   ├── README.html         # Group index page (also rendered)
//! │   └── 01-overview.html
//! └── 02-syntax/
//!     └── 01-types.html
//! ```
//!
//! Every page carries the sidebar of the mount it belongs to. Page titles come
//! from the document's first `# ` heading, falling back to the derived label of
//! its file name.

use crate::config::{ConfigError, SidebarConfig, SiteConfig};
use crate::link;
use crate::naming::{base_name, derive_label};
use crate::nav;
use crate::render;
use crate::scan::{self, Document, ScanError};
use crate::types::{CatalogEntry, NavEntry, NavGroup, NavTree};
use crate::xref::Linker;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

const CSS: &str = include_str!("../static/style.css");

/// One mount's scanned documents and the tree built from them.
#[derive(Debug, Clone)]
pub struct MountTree {
    pub mount: String,
    pub sidebar: SidebarConfig,
    pub documents: Vec<Document>,
    pub tree: NavTree,
}

impl MountTree {
    pub fn paths(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.path.as_str()).collect()
    }
}

/// A page written by [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub mount: String,
    /// Catalogue path of the source document.
    pub path: String,
    /// Site link of the page.
    pub link: String,
    pub title: String,
}

/// What a build produced.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub output: PathBuf,
    pub pages: Vec<GeneratedPage>,
    pub catalogue_entries: usize,
}

/// Scan and build the navigation tree of every configured mount.
pub fn build_trees(root: &Path, config: &SiteConfig) -> Result<Vec<MountTree>, GenerateError> {
    config
        .mounts()
        .into_iter()
        .map(|(mount, sidebar)| -> Result<MountTree, GenerateError> {
            let dir = mount_dir(root, &sidebar);
            let documents = scan::scan_documents(&dir, &config.scan_options(&sidebar))?;
            let paths: Vec<&str> = documents.iter().map(|d| d.path.as_str()).collect();
            let tree = nav::build(&paths, &config.nav_options(&sidebar)?);
            info!(
                mount = %mount,
                documents = documents.len(),
                entries = tree.entries.len(),
                "built navigation tree"
            );
            Ok(MountTree {
                mount,
                sidebar,
                documents,
                tree,
            })
        })
        .collect()
}

/// Combined catalogue of all mounts, in mount order.
pub fn catalogue(trees: &[MountTree]) -> Vec<CatalogEntry> {
    trees.iter().flat_map(|t| t.tree.catalogue()).collect()
}

fn mount_dir(root: &Path, sidebar: &SidebarConfig) -> PathBuf {
    if sidebar.dir.is_empty() {
        root.to_path_buf()
    } else {
        root.join(&sidebar.dir)
    }
}

/// Build the full site from `root` into `output_dir`.
pub fn generate(
    root: &Path,
    output_dir: &Path,
    config: &SiteConfig,
) -> Result<BuildReport, GenerateError> {
    let trees = build_trees(root, config)?;
    let catalogue = catalogue(&trees);
    let linker = config.linker(&catalogue)?;
    info!(entries = catalogue.len(), "catalogue ready");

    fs::create_dir_all(output_dir)?;
    let mut report = BuildReport {
        output: output_dir.to_path_buf(),
        pages: Vec::new(),
        catalogue_entries: catalogue.len(),
    };

    for mount in &trees {
        for doc in &mount.documents {
            let page = write_page(mount, doc, config, &linker, output_dir)?;
            report.pages.push(page);
        }
    }

    info!(
        pages = report.pages.len(),
        output = %output_dir.display(),
        "site generated"
    );
    Ok(report)
}

fn write_page(
    mount: &MountTree,
    doc: &Document,
    config: &SiteConfig,
    linker: &Linker,
    output_dir: &Path,
) -> Result<GeneratedPage, GenerateError> {
    let markdown = fs::read_to_string(&doc.file)?;
    let site_path = link::join(&mount.sidebar.dir, &doc.path);
    let link = link::normalize(&mount.sidebar.dir, &doc.path, &config.link_extension);
    let title = render::title_of(&markdown).unwrap_or_else(|| derive_label(base_name(&doc.path)));
    let body = render::render_markdown(&markdown, linker, &format!("/{site_path}"));

    let page = render_page(&title, &mount.tree, &link, &body);
    let target = output_dir.join(format!("{site_path}.{}", config.link_extension));
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, page.into_string())?;
    debug!(page = %target.display(), "wrote page");

    Ok(GeneratedPage {
        mount: mount.mount.clone(),
        path: doc.path.clone(),
        link,
        title,
    })
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="zh-CN" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders a document page with its mount's sidebar
fn render_page(title: &str, tree: &NavTree, current_link: &str, body: &str) -> Markup {
    let content = html! {
        (render_sidebar(tree, current_link))
        main.doc-page {
            article.doc-content {
                (PreEscaped(body))
            }
        }
    };
    base_document(title, content)
}

/// Renders the sidebar for one navigation tree
pub fn render_sidebar(tree: &NavTree, current_link: &str) -> Markup {
    html! {
        nav.sidebar {
            ul {
                @for entry in &tree.entries {
                    (render_entry(entry, current_link))
                }
            }
        }
    }
}

fn render_entry(entry: &NavEntry, current_link: &str) -> Markup {
    match entry {
        NavEntry::Group(group) if !group.is_bare() => render_group(group, current_link),
        // Index-only groups and top-level documents are plain links
        other => nav_link(other.label(), other.link(), current_link),
    }
}

fn nav_link(label: &str, link: &str, current_link: &str) -> Markup {
    let is_current = link == current_link;
    html! {
        li class=[is_current.then_some("current")] {
            a href=(link) { (label) }
        }
    }
}

fn render_group(group: &NavGroup, current_link: &str) -> Markup {
    let holds_current =
        group.link == current_link || group.items.iter().any(|i| i.link == current_link);
    let items = html! {
        ul {
            @for item in &group.items {
                (nav_link(&item.label, &item.link, current_link))
            }
        }
    };

    html! {
        li class=[holds_current.then_some("current-group")] {
            @if group.collapsible == Some(true) {
                @let open = holds_current || group.collapsed != Some(true);
                details.nav-group open[open] {
                    summary { a href=(group.link) { (group.label) } }
                    (items)
                }
            } @else {
                a.nav-group href=(group.link) { (group.label) }
                (items)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
