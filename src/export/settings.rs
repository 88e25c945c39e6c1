//! Site settings header parsing.
//!
//! The root document may start with a block of `Key: value` lines closed by a
//! separator line of three or more slashes:
//!
//! ```text
//! Title: My Site
//! SiteCss: style/site.css
//! ///
//! # Welcome
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Setting naming the shared stylesheet href.
pub const SITE_CSS_KEY: &str = "SiteCss";

/// Setting naming the page title.
pub const TITLE_KEY: &str = "Title";

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*/{3,}[ \t]*\r?$").expect("valid separator regex"));

/// Key/value settings taken from a document header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `Key: value` lines.
    ///
    /// Lines are split on the first colon and both halves trimmed. Lines
    /// without a colon are ignored and later keys overwrite earlier ones.
    pub fn parse(header: &str) -> Self {
        let mut settings = Self::new();
        for line in header.lines() {
            if let Some((key, value)) = line.split_once(':') {
                settings.insert(key.trim(), value.trim());
            }
        }
        settings
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The shared stylesheet href, if declared.
    pub fn site_css(&self) -> Option<&str> {
        self.get(SITE_CSS_KEY)
    }

    /// The page title, if declared.
    pub fn title(&self) -> Option<&str> {
        self.get(TITLE_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Render configuration shared by every page of one export run.
///
/// Built once from the root page's settings, falling back to user defaults,
/// and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    /// Title for the standalone root document.
    pub title: Option<String>,
    /// Shared stylesheet href.
    pub stylesheet: Option<String>,
}

impl RenderConfig {
    /// Header settings win over `defaults`; empty values count as unset.
    pub fn from_settings(settings: &Settings, defaults: &RenderConfig) -> Self {
        let pick = |value: Option<&str>, fallback: &Option<String>| {
            value
                .filter(|v| !v.is_empty())
                .map(String::from)
                .or_else(|| fallback.clone())
        };

        Self {
            title: pick(settings.title(), &defaults.title),
            stylesheet: pick(settings.site_css(), &defaults.stylesheet),
        }
    }
}

/// Splits a document into its settings header and markdown body.
///
/// Everything before the first separator line is the header; everything after
/// it is the body, including any later separator lines. Without a separator
/// the whole text is the body and the settings are empty.
pub fn split_header(text: &str) -> (Settings, &str) {
    let Some(separator) = SEPARATOR_RE.find(text) else {
        return (Settings::new(), text);
    };

    let header = &text[..separator.start()];
    let rest = &text[separator.end()..];
    let body = rest.strip_prefix('\n').unwrap_or(rest);

    (Settings::parse(header), body)
}
