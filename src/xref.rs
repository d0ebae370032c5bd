//! Automatic chapter and part cross-links.
//!
//! Prose in the book refers to other chapters by number ("见第 3 章的讨论")
//! and to parts by ordinal ("第二部分"). The [`Linker`] turns those mentions
//! into links to the matching sidebar entry, one rendered text fragment at a
//! time.
//!
//! ## Catalogue rules
//!
//! For every catalogue entry, in catalogue order:
//!
//! 1. Skip it if the fragment already contains the full label.
//! 2. Skip it if the label has the form `X（Y）` and the fragment mentions `X`
//!    or `Y`: such labels are ambiguous and never auto-linked.
//! 3. Extract the chapter marker (`第 N 章`) and the part marker (`第X部分`)
//!    from the label. Labels without a marker contribute nothing.
//! 4. Wrap every occurrence of each marker in an anchor to the entry's link.
//!
//! ## Auxiliary rules
//!
//! Site-defined `pattern → url` rules run afterwards, in configuration order,
//! with the same replace-all semantics and without step 1's guard.
//!
//! Replacements never touch markup: text inside tags or inside an existing
//! `<a>…</a>` is left alone. A fragment is therefore never double-linked, and
//! running the linker over its own output changes nothing.

use crate::render::escape_html;
use crate::types::CatalogEntry;
use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::debug;

static CHAPTER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第\s\d+\s章").expect("hardcoded regex pattern is valid"));

static PART_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第.部分").expect("hardcoded regex pattern is valid"));

static ALTERNATE_FORM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*)（(.*)）").expect("hardcoded regex pattern is valid"));

/// Existing anchors first, then any other tag.
static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<a[\s>].*?</a\s*>|<[^>]*>").expect("hardcoded regex pattern is valid")
});

/// An author-supplied `pattern → url` rule, compiled at configuration time.
#[derive(Debug, Clone)]
pub struct LinkRule {
    pub pattern: Regex,
    pub url: String,
}

impl LinkRule {
    pub fn new(pattern: &str, url: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            url: url.into(),
        })
    }
}

/// A catalogue entry with its markers extracted once up front.
#[derive(Debug, Clone)]
struct Target {
    label: String,
    link: String,
    alternates: Option<(String, String)>,
    markers: Vec<String>,
}

impl Target {
    fn new(entry: &CatalogEntry) -> Self {
        let alternates = ALTERNATE_FORM
            .captures(&entry.text)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()));
        Self {
            label: entry.text.clone(),
            link: entry.link.clone(),
            alternates,
            markers: extract_markers(&entry.text),
        }
    }

    fn is_ambiguous_in(&self, fragment: &str) -> bool {
        self.alternates
            .as_ref()
            .is_some_and(|(x, y)| fragment.contains(x.as_str()) || fragment.contains(y.as_str()))
    }
}

/// Chapter and part markers found in a label, in that order.
pub fn extract_markers(label: &str) -> Vec<String> {
    [&*CHAPTER_MARKER, &*PART_MARKER]
        .iter()
        .filter_map(|re| re.find(label))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Rewrites text fragments against a fixed catalogue and rule table.
///
/// Built once per site build and shared read-only by every render.
#[derive(Debug, Clone, Default)]
pub struct Linker {
    targets: Vec<Target>,
    rules: Vec<LinkRule>,
    skip_paths: Vec<String>,
}

impl Linker {
    pub fn new(catalogue: &[CatalogEntry], rules: Vec<LinkRule>) -> Self {
        let targets = catalogue
            .iter()
            .map(Target::new)
            .filter(|t| !t.markers.is_empty())
            .collect();
        Self {
            targets,
            rules,
            skip_paths: Vec::new(),
        }
    }

    /// Documents whose path contains any of `skip_paths` are left unlinked.
    ///
    /// Paths are compared unencoded, so `/笔记/` matches `/笔记/a`.
    pub fn with_skip_paths(mut self, skip_paths: Vec<String>) -> Self {
        self.skip_paths = skip_paths;
        self
    }

    /// Rewrite one rendered text fragment of the document at `current_path`
    /// (its `/`-rooted source path, not percent-encoded).
    pub fn link<'a>(&self, fragment: &'a str, current_path: &str) -> Cow<'a, str> {
        let mut text = Cow::Borrowed(fragment);
        if self
            .skip_paths
            .iter()
            .any(|p| !p.is_empty() && current_path.contains(p.as_str()))
        {
            return text;
        }

        for target in &self.targets {
            if text.contains(target.label.as_str()) {
                continue;
            }
            if target.is_ambiguous_in(&text) {
                debug!(label = %target.label, path = current_path, "ambiguous label, not linking");
                continue;
            }
            for marker in &target.markers {
                if let Some(rewritten) = changed(link_literal(&text, marker, &target.link)) {
                    text = Cow::Owned(rewritten);
                }
            }
        }

        for rule in &self.rules {
            if let Some(rewritten) = changed(link_pattern(&text, &rule.pattern, &rule.url)) {
                text = Cow::Owned(rewritten);
            }
        }

        text
    }
}

fn changed(result: Cow<'_, str>) -> Option<String> {
    match result {
        Cow::Owned(s) => Some(s),
        Cow::Borrowed(_) => None,
    }
}

fn anchor(href: &str, text: &str) -> String {
    let href = escape_html(href);
    format!(r#"<a href="{href}" target="_blank">{text}</a>"#)
}

/// Byte ranges of existing markup in `text`.
fn markup_ranges(text: &str) -> Vec<Range<usize>> {
    if !text.contains('<') {
        return Vec::new();
    }
    MARKUP.find_iter(text).map(|m| m.range()).collect()
}

fn overlaps(ranges: &[Range<usize>], span: &Range<usize>) -> bool {
    ranges
        .iter()
        .any(|r| r.start < span.end && span.start < r.end)
}

/// Wrap the given spans in anchors, skipping any that fall inside markup.
fn wrap_spans<'a>(
    text: &'a str,
    spans: impl Iterator<Item = Range<usize>>,
    href: &str,
) -> Cow<'a, str> {
    let protected = markup_ranges(text);
    let mut out = String::new();
    let mut last = 0;
    for span in spans {
        if overlaps(&protected, &span) {
            continue;
        }
        out.push_str(&text[last..span.start]);
        out.push_str(&anchor(href, &text[span.clone()]));
        last = span.end;
    }
    if last == 0 {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}

/// Replace every literal occurrence of `needle` with a link to `href`.
pub fn link_literal<'a>(text: &'a str, needle: &str, href: &str) -> Cow<'a, str> {
    if needle.is_empty() || !text.contains(needle) {
        return Cow::Borrowed(text);
    }
    let spans = text
        .match_indices(needle)
        .map(|(start, m)| start..start + m.len());
    wrap_spans(text, spans, href)
}

/// Replace every match of `pattern` with a link to `href`.
pub fn link_pattern<'a>(text: &'a str, pattern: &Regex, href: &str) -> Cow<'a, str> {
    let spans = pattern
        .find_iter(text)
        .map(|m| m.range())
        .filter(|r| !r.is_empty());
    wrap_spans(text, spans, href)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter_three() -> Vec<CatalogEntry> {
        vec![CatalogEntry::new("第 3 章 所有权", "/ch3")]
    }

    #[test]
    fn chapter_reference_linked() {
        let linker = Linker::new(&chapter_three(), vec![]);
        assert_eq!(
            linker.link("见第 3 章的讨论", "/notes"),
            r#"见<a href="/ch3" target="_blank">第 3 章</a>的讨论"#
        );
    }

    #[test]
    fn every_occurrence_linked() {
        let linker = Linker::new(&chapter_three(), vec![]);
        let out = linker.link("第 3 章和第 3 章", "/x");
        assert_eq!(out.matches(r#"<a href="/ch3""#).count(), 2);
    }

    #[test]
    fn part_reference_linked() {
        let linker = Linker::new(&[CatalogEntry::new("第二部分 进阶", "/part2")], vec![]);
        assert_eq!(
            linker.link("参见第二部分。", "/x"),
            r#"参见<a href="/part2" target="_blank">第二部分</a>。"#
        );
    }

    #[test]
    fn chapter_marker_needs_spaces() {
        let linker = Linker::new(&chapter_three(), vec![]);
        assert_eq!(linker.link("见第3章", "/x"), "见第3章");
    }

    #[test]
    fn no_match_is_borrowed() {
        let linker = Linker::new(&chapter_three(), vec![]);
        assert!(matches!(linker.link("nothing here", "/x"), Cow::Borrowed(_)));
    }

    #[test]
    fn labels_without_markers_contribute_nothing() {
        let linker = Linker::new(&[CatalogEntry::new("所有权", "/own")], vec![]);
        assert_eq!(linker.link("所有权与借用", "/x"), "所有权与借用");
    }

    #[test]
    fn fragment_containing_full_label_is_skipped() {
        let linker = Linker::new(&chapter_three(), vec![]);
        assert_eq!(
            linker.link("第 3 章 所有权", "/ch3"),
            "第 3 章 所有权"
        );
    }

    #[test]
    fn parenthetical_label_never_linked() {
        let catalogue = vec![CatalogEntry::new("迭代器（Iterator）", "/iter")];
        let linker = Linker::new(&catalogue, vec![]);
        let text = "迭代器 与 迭代器（Iterator）";
        assert_eq!(linker.link(text, "/x"), text);
    }

    #[test]
    fn parenthetical_guard_fires_on_either_form() {
        let catalogue = vec![CatalogEntry::new("第 9 章 迭代器（Iterator）", "/ch9")];
        let linker = Linker::new(&catalogue, vec![]);
        assert_eq!(linker.link("Iterator 见第 9 章", "/x"), "Iterator 见第 9 章");
        assert_eq!(
            linker.link("见第 9 章", "/x"),
            r#"见<a href="/ch9" target="_blank">第 9 章</a>"#
        );
    }

    #[test]
    fn second_entry_with_same_marker_does_not_nest() {
        let catalogue = vec![
            CatalogEntry::new("第 3 章 所有权", "/ch3"),
            CatalogEntry::new("第 3 章 练习", "/ch3-ex"),
        ];
        let linker = Linker::new(&catalogue, vec![]);
        assert_eq!(
            linker.link("见第 3 章", "/x"),
            r#"见<a href="/ch3" target="_blank">第 3 章</a>"#
        );
    }

    #[test]
    fn linking_twice_is_a_no_op() {
        let catalogue = vec![
            CatalogEntry::new("第 3 章 所有权", "/ch3"),
            CatalogEntry::new("第一部分 基础", "/part1"),
        ];
        let rules = vec![LinkRule::new("RFC 1216", "https://rfcs/1216").unwrap()];
        let linker = Linker::new(&catalogue, rules);
        let once = linker.link("第一部分里的第 3 章提到 RFC 1216", "/x").into_owned();
        let twice = linker.link(&once, "/x");
        assert_eq!(twice, once);
    }

    #[test]
    fn auxiliary_rules_apply_after_catalogue() {
        let rules = vec![
            LinkRule::new("RFC 文档|RFC 项目", "https://rust-lang.github.io/rfcs/").unwrap(),
        ];
        let linker = Linker::new(&[], rules);
        assert_eq!(
            linker.link("详见 RFC 文档 与 RFC 项目", "/x"),
            concat!(
                r#"详见 <a href="https://rust-lang.github.io/rfcs/" target="_blank">RFC 文档</a>"#,
                r#" 与 <a href="https://rust-lang.github.io/rfcs/" target="_blank">RFC 项目</a>"#
            )
        );
    }

    #[test]
    fn auxiliary_rules_do_not_rewrite_inside_hrefs() {
        let rules = vec![
            LinkRule::new("rust-lang/rust", "https://github.com/rust-lang/rust").unwrap(),
            LinkRule::new("github", "https://github.com").unwrap(),
        ];
        let linker = Linker::new(&[], rules);
        let out = linker.link("see rust-lang/rust", "/x");
        assert_eq!(
            out,
            r#"see <a href="https://github.com/rust-lang/rust" target="_blank">rust-lang/rust</a>"#
        );
    }

    #[test]
    fn rule_urls_are_attribute_escaped() {
        let rule = LinkRule::new("RFC", r#"https://x/"y&z"#).unwrap();
        let linker = Linker::new(&[], vec![rule]);
        assert_eq!(
            linker.link("see RFC", "/x"),
            r#"see <a href="https://x/&quot;y&amp;z" target="_blank">RFC</a>"#
        );
    }

    #[test]
    fn skip_paths_match_unencoded_paths() {
        let linker = Linker::new(&chapter_three(), vec![]).with_skip_paths(vec!["/笔记/".into()]);
        assert_eq!(linker.link("见第 3 章", "/笔记/a"), "见第 3 章");
    }

    #[test]
    fn skip_paths_disable_linking() {
        let linker = Linker::new(&chapter_three(), vec![]).with_skip_paths(vec!["/notes/".into()]);
        assert_eq!(linker.link("见第 3 章", "/notes/a"), "见第 3 章");
        assert_ne!(linker.link("见第 3 章", "/guide/a"), "见第 3 章");
    }

    #[test]
    fn markers_extracted_from_labels() {
        assert_eq!(extract_markers("第 12 章 并发"), vec!["第 12 章"]);
        assert_eq!(extract_markers("第三部分：第 7 章"), vec!["第 7 章", "第三部分"]);
        assert!(extract_markers("附录").is_empty());
    }

    #[test]
    fn link_literal_skips_text_inside_tags() {
        let text = r#"<span title="第 3 章">第 3 章</span>"#;
        assert_eq!(
            link_literal(text, "第 3 章", "/ch3"),
            r#"<span title="第 3 章"><a href="/ch3" target="_blank">第 3 章</a></span>"#
        );
    }
}
