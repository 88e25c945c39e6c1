//! Markdown to HTML conversion.
//!
//! Rendering reports every link target it emits to a caller-supplied
//! observer, in document order, so the exporter can discover linked pages
//! without a second parse.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream, html};
use regex::Regex;

use crate::infra::HeadingIds;

static BARE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:(?:https?|ftp)://|mailto:|www\.)[^\s<>]+").expect("valid autolink regex")
});

/// Fractions rendered as entities, with their source spelling.
const FRACTIONS: [(&str, &str); 3] = [("1/2", "&frac12;"), ("1/4", "&frac14;"), ("3/4", "&frac34;")];

static FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]+(?:/[0-9]+)+\b").expect("valid fraction regex"));

/// Parser options shared by every page.
///
/// Fenced code blocks are part of CommonMark and always on. Smart
/// punctuation covers curly quotes, `--` en dashes, `---` em dashes and
/// ellipses.
pub fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Converts markdown text to HTML, discarding link targets.
///
/// # Example
///
/// ```
/// use chanzero::export::markdown_to_html;
///
/// let html = markdown_to_html("# Hello\n\nWorld");
/// assert!(html.contains(r#"<h1 id="hello">Hello</h1>"#));
/// assert!(html.contains("<p>World</p>"));
/// ```
pub fn markdown_to_html(markdown: &str) -> String {
    render_markdown(markdown, |_| {})
}

/// Converts markdown text to HTML, calling `on_link` with the raw target of
/// every hyperlink and autolink as it is encountered.
///
/// Targets are passed through exactly as written in the source; images are
/// not links and are not reported.
pub fn render_markdown<F>(markdown: &str, mut on_link: F) -> String
where
    F: FnMut(&str),
{
    let parser = TextMergeStream::new(Parser::new_ext(markdown, markdown_options()));
    let events = gather_links(parser, &mut on_link);
    let events = assign_heading_ids(events);

    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, events.into_iter());
    html_output
}

/// Reports links, expands bare URLs and substitutes fractions.
fn gather_links<'a, I, F>(events: I, on_link: &mut F) -> Vec<Event<'a>>
where
    I: Iterator<Item = Event<'a>>,
    F: FnMut(&str),
{
    let mut out = Vec::new();
    let mut code_depth = 0usize;
    let mut link_depth = 0usize;

    for event in events {
        match event {
            Event::Start(Tag::Link { ref dest_url, .. }) => {
                on_link(dest_url);
                link_depth += 1;
                out.push(event);
            }
            Event::End(TagEnd::Link) => {
                link_depth = link_depth.saturating_sub(1);
                out.push(event);
            }
            Event::Start(Tag::Image { .. }) => {
                link_depth += 1;
                out.push(event);
            }
            Event::End(TagEnd::Image) => {
                link_depth = link_depth.saturating_sub(1);
                out.push(event);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                code_depth += 1;
                out.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                code_depth = code_depth.saturating_sub(1);
                out.push(event);
            }
            Event::Text(text) if code_depth == 0 && link_depth == 0 => {
                push_autolinked(&mut out, &text, on_link);
            }
            Event::Text(text) if code_depth == 0 => {
                push_with_fractions(&mut out, &text);
            }
            other => out.push(other),
        }
    }

    out
}

/// Splits plain text around bare URLs, emitting a link for each.
fn push_autolinked<'a, F>(out: &mut Vec<Event<'a>>, text: &str, on_link: &mut F)
where
    F: FnMut(&str),
{
    let mut last = 0;
    for found in BARE_URL_RE.find_iter(text) {
        let (url, matched) = source_url(found.as_str());
        if !is_bare_url(&url) {
            continue;
        }
        let start = found.start();

        push_with_fractions(out, &text[last..start]);

        // `www.` hosts carry no scheme; link them as http
        let href = if url.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www.")) {
            format!("http://{url}")
        } else {
            url.clone()
        };
        on_link(&href);
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(href),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(CowStr::from(url)));
        out.push(Event::End(TagEnd::Link));

        last = start + matched;
    }
    push_with_fractions(out, &text[last..]);
}

/// True if the whole of `url` is a bare URL with something after its prefix.
fn is_bare_url(url: &str) -> bool {
    BARE_URL_RE
        .find(url)
        .is_some_and(|m| m.start() == 0 && m.end() == url.len())
}

/// Source spelling of a character smart punctuation produces.
fn unsmarten(c: char) -> Option<&'static str> {
    match c {
        '\u{2018}' | '\u{2019}' => Some("'"),
        '\u{201C}' | '\u{201D}' => Some("\""),
        '\u{2026}' => Some("..."),
        '\u{2013}' => Some("--"),
        '\u{2014}' => Some("---"),
        _ => None,
    }
}

/// Recovers the source text of a URL matched in smart-punctuated text and
/// trims trailing prose from it.
///
/// Returns the URL and the byte length of `found` it spans.
fn source_url(found: &str) -> (String, usize) {
    let mut raw = String::with_capacity(found.len());
    // (source length, matched length) at each character boundary
    let mut bounds = vec![(0, 0)];
    for (offset, c) in found.char_indices() {
        match unsmarten(c) {
            Some(source) => raw.push_str(source),
            None => raw.push(c),
        }
        bounds.push((raw.len(), offset + c.len_utf8()));
    }

    let kept = trim_url_end(&raw).len();
    let (raw_len, matched) = bounds
        .into_iter()
        .rev()
        .find(|&(raw_len, _)| raw_len <= kept)
        .unwrap_or_default();
    raw.truncate(raw_len);
    (raw, matched)
}

/// Drops trailing punctuation that is more likely prose than URL.
fn trim_url_end(url: &str) -> &str {
    let mut end = url;
    loop {
        let trimmed = end.trim_end_matches(['.', ',', ':', ';', '!', '?', '"', '\'']);
        let trimmed = if trimmed.ends_with(')')
            && trimmed.matches(')').count() > trimmed.matches('(').count()
        {
            &trimmed[..trimmed.len() - 1]
        } else {
            trimmed
        };
        if trimmed.len() == end.len() {
            return end;
        }
        end = trimmed;
    }
}

/// Emits text, replacing standalone `1/2`, `1/4` and `3/4` with entities.
fn push_with_fractions<'a>(out: &mut Vec<Event<'a>>, text: &str) {
    if text.is_empty() {
        return;
    }

    let mut last = 0;
    for found in FRACTION_RE.find_iter(text) {
        let Some(&(_, entity)) = FRACTIONS.iter().find(|(text, _)| *text == found.as_str()) else {
            continue;
        };
        if found.start() > last {
            out.push(Event::Text(CowStr::from(text[last..found.start()].to_string())));
        }
        out.push(Event::InlineHtml(CowStr::Borrowed(entity)));
        last = found.end();
    }
    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Gives every heading without an explicit `{#id}` a slug of its text.
///
/// Explicit ids are claimed up front so no generated id repeats them.
fn assign_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut ids = HeadingIds::new();
    for event in &events {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            ids.reserve(id);
        }
    }

    let mut out = Vec::with_capacity(events.len());
    let mut open_heading: Option<usize> = None;
    let mut heading_text = String::new();

    for event in events {
        match &event {
            Event::Start(Tag::Heading { .. }) => {
                open_heading = Some(out.len());
                heading_text.clear();
            }
            Event::Text(text) | Event::Code(text) if open_heading.is_some() => {
                heading_text.push_str(text);
            }
            Event::InlineHtml(html) if open_heading.is_some() => {
                if let Some((text, _)) = FRACTIONS.iter().find(|(_, entity)| *entity == &**html) {
                    heading_text.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(index) = open_heading.take()
                    && let Event::Start(Tag::Heading { id, .. }) = &mut out[index]
                    && id.is_none()
                {
                    *id = Some(CowStr::from(ids.next_id(&heading_text)));
                }
            }
            _ => {}
        }
        out.push(event);
    }

    out
}
