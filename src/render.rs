//! Markdown → HTML with cross-references applied.
//!
//! The linker sees the document exactly the way the renderer emits it: one
//! text fragment at a time, in reading order. Fragments inside code blocks,
//! existing links, and image alt text are passed through untouched; every
//! other fragment is HTML-escaped, handed to [`Linker::link`], and emitted as
//! inline HTML.
//!
//! Rust code blocks that define `fn main` are wrapped in
//! `<div class="run-code">` so the site's "run" button can pick them up.

use crate::xref::Linker;
use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, TextMergeStream,
    html as md_html,
};

/// Escape text for inclusion in HTML body content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whether a fenced snippet can be offered to the remote "run" button.
///
/// The info string must start with `rust` and must not carry `no_run`.
pub fn is_runnable(lang: &str, code: &str) -> bool {
    let mut tokens = lang.split([',', ' ']).filter(|t| !t.is_empty());
    let is_rust = tokens.next().is_some_and(|t| t.eq_ignore_ascii_case("rust"));
    is_rust && !tokens.any(|t| t == "no_run") && code.contains("fn main")
}

/// Text of the first level-1 heading, if any.
pub fn title_of(markdown: &str) -> Option<String> {
    let mut title: Option<String> = None;
    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => title = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(title) = title.as_mut() {
                    title.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                match title.take().map(|t| t.trim().to_string()) {
                    Some(t) if !t.is_empty() => return Some(t),
                    _ => {}
                }
            }
            _ => {}
        }
    }
    None
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES
}

/// Render `markdown` for the document at `current_path` (its unencoded,
/// `/`-rooted source path).
pub fn render_markdown(markdown: &str, linker: &Linker, current_path: &str) -> String {
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut code_block: Option<(String, String)> = None;
    let mut opaque_depth = 0usize;

    for event in TextMergeStream::new(Parser::new_ext(markdown, parser_options())) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match &kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                code_block = Some((lang, String::new()));
                events.push(Event::Start(Tag::CodeBlock(kind)));
            }
            Event::End(TagEnd::CodeBlock) => {
                let start = events
                    .iter()
                    .rposition(|e| matches!(e, Event::Start(Tag::CodeBlock(_))));
                if let (Some(start), Some((lang, code))) = (start, code_block.take())
                    && is_runnable(&lang, &code)
                {
                    events.insert(start, Event::Html(CowStr::from("<div class=\"run-code\">\n")));
                    events.push(Event::End(TagEnd::CodeBlock));
                    events.push(Event::Html(CowStr::from("</div>\n")));
                } else {
                    events.push(Event::End(TagEnd::CodeBlock));
                }
            }
            Event::Text(text) if code_block.is_some() => {
                if let Some((_, code)) = code_block.as_mut() {
                    code.push_str(&text);
                }
                events.push(Event::Text(text));
            }
            Event::Start(tag @ (Tag::Link { .. } | Tag::Image { .. })) => {
                opaque_depth += 1;
                events.push(Event::Start(tag));
            }
            Event::End(end @ (TagEnd::Link | TagEnd::Image)) => {
                opaque_depth = opaque_depth.saturating_sub(1);
                events.push(Event::End(end));
            }
            Event::Text(text) if opaque_depth == 0 => {
                let escaped = escape_html(&text);
                let linked = linker.link(&escaped, current_path).into_owned();
                events.push(Event::InlineHtml(CowStr::from(linked)));
            }
            other => events.push(other),
        }
    }

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut html, events.into_iter());
    html
}
