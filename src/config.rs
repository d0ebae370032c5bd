//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. A sparse user file
//! in the content root is merged over the stock defaults, then validated:
//! every pattern is compiled here, so a bad sort key or link rule fails the
//! build before a single document is rendered.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_extension = "md"   # Document extension to scan for
//! link_extension = "html"   # Extension every generated link ends with
//!
//! # One table per sidebar mount point. With no table at all, a single "/"
//! # mount with the defaults below covers the whole content root.
//! [sidebars."/"]
//! dir = ""                    # Directory under the content root
//! hierarchy = true            # Top-level directories become groups
//! index_link = "index"        # Per-directory index document name
//! ignore_dirs = ["node_modules"]
//! ignore_files = []           # Path suffixes to leave out
//! # collapsed = false         # Make groups collapsible, initially open/closed
//!
//! [sidebars."/".labels]       # Literal label fixups, applied to every item
//! # "_" = " "
//!
//! [sidebars."/".sort]         # Optional custom order
//! # pattern = '(\d+).+?/(\d+)\.(\d+)?'
//! # groups = [2, 3]           # Key = sum of these capture groups
//!
//! [links]
//! skip_paths = []             # Documents whose path contains these are not linked
//!
//! [[links.rules]]             # Extra phrase → URL rules, applied in order
//! # pattern = "RFC 1216"
//! # url = "https://rust-lang.github.io/rfcs/1216-bang-type.html"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::nav::{ItemHook, NavOptions, SortKey};
use crate::scan::ScanOptions;
use crate::types::{CatalogEntry, NavItem};
use crate::xref::{LinkRule, Linker};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Mount point used when no sidebar is configured.
pub const DEFAULT_MOUNT: &str = "/";

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Extension of source documents, without the dot.
    pub source_extension: String,
    /// Extension of generated pages, used in every link.
    pub link_extension: String,
    /// Sidebar per mount point.
    pub sidebars: BTreeMap<String, SidebarConfig>,
    /// Cross-reference linking.
    pub links: LinksConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source_extension: "md".to_string(),
            link_extension: "html".to_string(),
            sidebars: BTreeMap::new(),
            links: LinksConfig::default(),
        }
    }
}

/// One navigation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SidebarConfig {
    /// Directory under the content root this tree is built from.
    pub dir: String,
    /// Treat top-level directories as groups.
    pub hierarchy: bool,
    /// Base name of the per-directory index document.
    pub index_link: String,
    /// Directory names to leave out (compared after ordinal stripping).
    pub ignore_dirs: Vec<String>,
    /// Document path suffixes to leave out.
    pub ignore_files: Vec<String>,
    /// Collapsible groups, initially collapsed or not. Absent = not collapsible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    /// Literal substring replacements applied to every item label.
    pub labels: BTreeMap<String, String>,
    /// Custom ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortConfig>,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            hierarchy: true,
            index_link: "index".to_string(),
            ignore_dirs: vec!["node_modules".to_string()],
            ignore_files: Vec::new(),
            collapsed: None,
            labels: BTreeMap::new(),
            sort: None,
        }
    }
}

/// Regex-derived sort key.
///
/// The key of a path is the sum of the selected capture groups read as
/// integers. Paths the pattern does not match, and groups that did not
/// participate or are not numeric, count as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortConfig {
    pub pattern: String,
    /// Capture group indexes to sum; empty means every group.
    #[serde(default)]
    pub groups: Vec<usize>,
}

impl SortConfig {
    fn compile(&self) -> Result<Regex, ConfigError> {
        let regex = compile_pattern(&self.pattern)?;
        let available = regex.captures_len() - 1;
        if let Some(bad) = self.groups.iter().find(|&&g| g == 0 || g > available) {
            return Err(ConfigError::Validation(format!(
                "sort group {bad} out of range: `{}` has {available} capture group(s)",
                self.pattern
            )));
        }
        Ok(regex)
    }

    /// Build the sort key closure.
    pub fn sort_key(&self) -> Result<SortKey, ConfigError> {
        let regex = self.compile()?;
        let groups: Vec<usize> = if self.groups.is_empty() {
            (1..regex.captures_len()).collect()
        } else {
            self.groups.clone()
        };
        Ok(Box::new(move |path: &str| -> u64 {
            regex
                .captures(path)
                .map(|caps| {
                    groups
                        .iter()
                        .filter_map(|&g| caps.get(g))
                        .filter_map(|m| m.as_str().parse::<u64>().ok())
                        .fold(0, u64::saturating_add)
                })
                .unwrap_or(0)
        }))
    }
}

/// Cross-reference linking settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    /// Documents whose path contains any of these strings are not linked.
    pub skip_paths: Vec<String>,
    /// Auxiliary `pattern → url` rules, applied in order after catalogue links.
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub pattern: String,
    pub url: String,
}

fn compile_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl SiteConfig {
    /// Validate config values and compile every pattern once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_extension.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source_extension must not be empty".into(),
            ));
        }
        if self.link_extension.trim().is_empty() {
            return Err(ConfigError::Validation(
                "link_extension must not be empty".into(),
            ));
        }
        for (mount, sidebar) in &self.sidebars {
            if !mount.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "sidebar mount `{mount}` must start with `/`"
                )));
            }
            if sidebar.index_link.is_empty() || sidebar.index_link.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "sidebars.\"{mount}\".index_link must be a plain file name"
                )));
            }
            if let Some(sort) = &sidebar.sort {
                sort.compile()?;
            }
        }
        self.link_rules()?;
        Ok(())
    }

    /// Configured mounts, or the single default mount when none are set.
    pub fn mounts(&self) -> Vec<(String, SidebarConfig)> {
        if self.sidebars.is_empty() {
            vec![(DEFAULT_MOUNT.to_string(), SidebarConfig::default())]
        } else {
            self.sidebars
                .iter()
                .map(|(mount, sidebar)| (mount.clone(), sidebar.clone()))
                .collect()
        }
    }

    pub fn scan_options(&self, sidebar: &SidebarConfig) -> ScanOptions {
        ScanOptions {
            extension: self.source_extension.clone(),
            ignore_dirs: sidebar.ignore_dirs.clone(),
            ignore_files: sidebar.ignore_files.clone(),
            hierarchy: sidebar.hierarchy,
        }
    }

    /// Hierarchy builder options for one mount.
    pub fn nav_options(&self, sidebar: &SidebarConfig) -> Result<NavOptions, ConfigError> {
        let sort_key = sidebar.sort.as_ref().map(SortConfig::sort_key).transpose()?;
        Ok(NavOptions {
            hierarchy: sidebar.hierarchy,
            index_link: sidebar.index_link.clone(),
            ignore_dirs: sidebar.ignore_dirs.clone(),
            ignore_files: sidebar.ignore_files.clone(),
            sort_key,
            handle: label_hook(&sidebar.labels),
            collapsed: sidebar.collapsed,
            base: sidebar.dir.clone(),
            link_extension: self.link_extension.clone(),
        })
    }

    pub fn link_rules(&self) -> Result<Vec<LinkRule>, ConfigError> {
        self.links
            .rules
            .iter()
            .map(|rule| {
                Ok(LinkRule {
                    pattern: compile_pattern(&rule.pattern)?,
                    url: rule.url.clone(),
                })
            })
            .collect()
    }

    /// Cross-reference linker over `catalogue` with the configured rules.
    pub fn linker(&self, catalogue: &[CatalogEntry]) -> Result<Linker, ConfigError> {
        Ok(Linker::new(catalogue, self.link_rules()?).with_skip_paths(self.links.skip_paths.clone()))
    }
}

fn label_hook(labels: &BTreeMap<String, String>) -> Option<ItemHook> {
    if labels.is_empty() {
        return None;
    }
    let replacements: Vec<(String, String)> = labels
        .iter()
        .filter(|(from, _)| !from.is_empty())
        .map(|(from, to)| (from.clone(), to.clone()))
        .collect();
    Some(Box::new(move |mut item: NavItem| {
        for (from, to) in &replacements {
            item.label = item.label.replace(from.as_str(), to);
        }
        item
    }))
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Name of the config file looked up in the content root.
pub const CONFIG_FILE: &str = "config.toml";

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docnav configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# Extension of source documents (without the dot).
source_extension = "md"

# Extension of generated pages. Every sidebar and cross-reference link ends
# with it.
link_extension = "html"

# ---------------------------------------------------------------------------
# Sidebars
# ---------------------------------------------------------------------------
# One table per mount point. Without any [sidebars] table a single "/" mount
# covering the whole content root is used, with the values shown here.
[sidebars."/"]
# Directory under the content root the tree is built from.
dir = ""

# Top-level directories become groups. When false, every document is listed
# on its own.
hierarchy = true

# Name (without extension) of the document a group links to. It never shows
# up as an item itself.
index_link = "index"

# Directories to leave out. Ordinal prefixes are ignored when comparing, so
# "drafts" also matches "03-drafts".
ignore_dirs = ["node_modules"]

# Documents whose path (extension stripped) ends with one of these are left
# out.
ignore_files = []

# Make groups collapsible, initially collapsed (true) or open (false).
# collapsed = false

# Literal replacements applied to every item label.
[sidebars."/".labels]
# "_" = " "

# Custom order. The key of a path is the sum of the listed capture groups;
# paths the pattern does not match sort first. Ties keep path order.
# [sidebars."/".sort]
# pattern = '(\d+).+?/(\d+)\.(\d+)?'
# groups = [2, 3]

# ---------------------------------------------------------------------------
# Cross-references
# ---------------------------------------------------------------------------
[links]
# Documents whose path contains any of these strings are rendered without
# automatic links.
skip_paths = []

# Extra phrase → URL rules, applied in order after chapter/part links.
# Patterns are regular expressions.
# [[links.rules]]
# pattern = "RFC 文档|RFC 项目"
# url = "https://rust-lang.github.io/rfcs/"
"##
}
