//! # docnav
//!
//! Sidebar synthesis and cross-reference linking for documentation sites.
//! Your directory tree is the table of contents: top-level directories become
//! sidebar groups, documents become items, numeric prefixes order them without
//! showing up in labels, and chapter/part mentions in page text become links.
//!
//! # Architecture: One Serial Pass
//!
//! ```text
//! 1. Scan       docs/          →  document paths   (per mount)
//! 2. Build      paths          →  NavTree          (per mount)
//! 3. Catalogue  NavTrees       →  Linker           (all mounts, flattened)
//! 4. Render     each document  →  dist/            (text fragments linked)
//! ```
//!
//! Steps 1–3 finish before the first document is rendered. The catalogue is
//! read-only from then on, and each text fragment is rewritten independently
//! of every other fragment.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Ordinal-prefix and variant-suffix stripping shared by labels and group keys |
//! | [`scan`] | Walks a mount directory and returns the ordered document paths |
//! | [`link`] | Catalogue path → absolute, URI-encoded site link |
//! | [`types`] | `NavItem`, `NavGroup`, `NavTree`, `CatalogEntry`, serialized as sidebar JSON |
//! | [`nav`] | Folds document paths into a `NavTree` |
//! | [`xref`] | Rewrites chapter/part mentions in text fragments into links |
//! | [`config`] | `config.toml` loading, merging, validation, and option factories |
//! | [`render`] | Markdown → HTML, feeding every text fragment through the linker |
//! | [`generate`] | Full site build across all mounts using Maud |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Rule for Every Label
//!
//! Directory and file names go through the same [`naming::derive_label`]:
//! a leading ordinal (`01-`, `2.`, `003_`) and a trailing `--variant` suffix
//! are stripped, nothing else. Group keys are derived labels too, so
//! `01-intro` and `1-intro` land in the same group. Authors reorder sections by
//! renumbering directories, and no label or link elsewhere changes.
//!
//! ## Absolute Links Only
//!
//! Every link the sidebar or the linker emits is `/`-rooted. Relative links
//! resolve differently one directory down and break previous/next navigation.
//!
//! ## Linking Never Nests
//!
//! The linker only touches text outside existing tags and anchors. Running it
//! over its own output changes nothing, and a chapter already linked by hand
//! is never wrapped a second time.

pub mod config;
pub mod generate;
pub mod link;
pub mod nav;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
pub mod types;
pub mod xref;

#[cfg(test)]
pub(crate) mod test_helpers;
