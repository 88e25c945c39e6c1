//! Slug generation for heading anchors.

use std::collections::HashMap;

/// Converts heading text to an anchor identifier.
///
/// - Converts to lowercase
/// - Keeps alphanumeric characters (including non-ASCII letters) and underscores
/// - Replaces every other run of characters with a single hyphen
/// - Trims leading/trailing hyphens
/// - Returns "section" for empty results
///
/// # Examples
///
/// ```
/// use chanzero::infra::slugify;
///
/// assert_eq!(slugify("Getting Started"), "getting-started");
/// assert_eq!(slugify("What's new?"), "what-s-new");
/// assert_eq!(slugify(""), "section");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_was_hyphen = true;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' {
            slug.push(c);
            prev_was_hyphen = false;
        } else if !prev_was_hyphen {
            slug.push('-');
            prev_was_hyphen = true;
        }
    }

    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        return "section".to_string();
    }
    trimmed.to_string()
}

/// Hands out unique heading anchors within one page.
///
/// The first heading with a given slug keeps it; later ones get `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct HeadingIds {
    seen: HashMap<String, usize>,
}

impl HeadingIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims an anchor written explicitly in the page.
    pub fn reserve(&mut self, id: &str) {
        let count = self.seen.entry(id.to_string()).or_insert(0);
        *count = (*count).max(1);
    }

    /// Returns a page-unique anchor for the given heading text.
    pub fn next_id(&mut self, text: &str) -> String {
        let base = slugify(text);
        loop {
            let count = self.seen.entry(base.clone()).or_insert(0);
            let candidate = if *count == 0 {
                base.clone()
            } else {
                format!("{}-{}", base, count)
            };
            *count += 1;

            // "intro-1" may already be taken by a heading literally titled "Intro 1"
            if candidate == base || !self.seen.contains_key(&candidate) {
                self.seen.entry(candidate.clone()).or_insert(1);
                return candidate;
            }
        }
    }
}
