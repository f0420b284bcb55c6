//! Markdown to HTML.
//!
//! Fenced code blocks whose language syntect knows are highlighted with
//! inline styles, one `span.line` per source line so the stylesheet can
//! number them. Unknown languages fall back to pulldown-cmark's plain
//! `code.language-*` output.

use std::sync::OnceLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use pulldown_cmark_escape::escape_html;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

const OPTIONS: Options = Options::empty()
    .union(Options::ENABLE_TABLES)
    .union(Options::ENABLE_STRIKETHROUGH)
    .union(Options::ENABLE_TASKLISTS)
    .union(Options::ENABLE_FOOTNOTES)
    .union(Options::ENABLE_HEADING_ATTRIBUTES)
    .union(Options::ENABLE_SMART_PUNCTUATION);

const THEME: &str = "base16-ocean.dark";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> Option<&'static Theme> {
    THEME_SET.get_or_init(ThemeSet::load_defaults).themes.get(THEME)
}

/// Render `markdown` to HTML. Headings without an explicit `{#id}` get one
/// derived from their text so they can be linked to.
#[must_use]
pub fn to_html(markdown: &str) -> String {
    let mut events: Vec<Event<'_>> = Parser::new_ext(markdown, OPTIONS).collect();

    let mut open: Option<usize> = None;
    let mut heading_text = String::new();
    for i in 0..events.len() {
        let closes = match &events[i] {
            Event::Start(Tag::Heading { id: None, .. }) => {
                open = Some(i);
                heading_text.clear();
                false
            }
            Event::Text(t) | Event::Code(t) if open.is_some() => {
                heading_text.push_str(t);
                false
            }
            Event::End(TagEnd::Heading(_)) => true,
            _ => false,
        };

        if !closes {
            continue;
        }
        let slug = slugify(&heading_text);
        if let (Some(start), false) = (open.take(), slug.is_empty()) {
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
                *id = Some(CowStr::from(slug));
            }
        }
    }

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, highlight_code_blocks(events).into_iter());
    out
}

/// Replace each highlightable fenced block (start, text, end) with one
/// pre-rendered HTML event.
fn highlight_code_blocks(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut iter = events.into_iter();

    while let Some(event) = iter.next() {
        let lang = match &event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                info.split_whitespace().next().unwrap_or_default().to_owned()
            }
            _ => {
                out.push(event);
                continue;
            }
        };
        let Some(syntax) = syntax_set().find_syntax_by_token(&lang) else {
            out.push(event);
            continue;
        };

        let mut code = String::new();
        for inner in iter.by_ref() {
            match inner {
                Event::Text(text) => code.push_str(&text),
                Event::End(TagEnd::CodeBlock) => break,
                _ => {}
            }
        }

        match highlight(&lang, &code, syntax) {
            Some(highlighted) => out.push(Event::Html(CowStr::from(highlighted))),
            None => {
                out.push(event);
                out.push(Event::Text(CowStr::from(code)));
                out.push(Event::End(TagEnd::CodeBlock));
            }
        }
    }
    out
}

fn highlight(lang: &str, code: &str, syntax: &SyntaxReference) -> Option<String> {
    let theme = theme()?;
    let mut highlighter = HighlightLines::new(syntax, theme);

    let mut out = String::from("<pre class=\"highlight\" data-lang=\"");
    let _ = escape_html(&mut out, lang);
    out.push_str("\"><code>");
    for line in LinesWithEndings::from(code) {
        let highlighted = highlighter
            .highlight_line(line, syntax_set())
            .and_then(|ranges| styled_line_to_highlighted_html(&ranges, IncludeBackground::No));
        match highlighted {
            Ok(html) => {
                out.push_str("<span class=\"line\">");
                out.push_str(html.trim_end_matches('\n'));
                out.push_str("</span>\n");
            }
            Err(e) => {
                tracing::warn!(error = %e, lang, "code highlighting failed");
                return None;
            }
        }
    }
    out.push_str("</code></pre>\n");
    Some(out)
}

/// Lowercase ASCII alphanumerics joined by single dashes; other characters
/// are dropped.
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            'a'..='z' | '0'..='9' => slug.push(ch),
            'A'..='Z' => slug.push(ch.to_ascii_lowercase()),
            ' ' | '.' | '-' | '_' if !slug.is_empty() && !slug.ends_with('-') => slug.push('-'),
            _ => {}
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
#[path = "markdown_test.rs"]
mod tests;
