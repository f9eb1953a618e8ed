//! Heading anchors and slug generation.

use std::collections::HashSet;

use html_escape::encode_double_quoted_attribute;
use pulldown_cmark::HeadingLevel;

/// Options for heading anchors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorOptions {
    /// Minimum heading level that receives an `id` (1-6).
    pub level: u8,
    /// Whether to insert a permalink into the heading.
    pub permalink: bool,
    /// Insert the permalink before the heading text instead of after it.
    pub permalink_before: bool,
    /// Visible permalink text.
    pub permalink_symbol: String,
    /// Class of the permalink element.
    pub permalink_class: String,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self {
            level: 2,
            permalink: true,
            permalink_before: true,
            permalink_symbol: "¶".to_owned(),
            permalink_class: "header-anchor".to_owned(),
        }
    }
}

impl AnchorOptions {
    /// Check whether a heading of this level gets an anchor.
    #[must_use]
    pub fn applies_to(&self, level: HeadingLevel) -> bool {
        heading_level_to_num(level) >= self.level
    }

    /// Permalink markup for a heading id.
    pub(crate) fn permalink_html(&self, id: &str) -> String {
        let id = encode_double_quoted_attribute(id);
        format!(
            r##"<a class="{}" href="#{id}" aria-hidden="true">{}</a>"##,
            encode_double_quoted_attribute(&self.permalink_class),
            self.permalink_symbol
        )
    }
}

/// Convert heading text to a URL-safe identifier.
///
/// Non-Latin text is transliterated to ASCII first, so Chinese headings
/// produce pinyin slugs. Whitespace, dashes and underscores collapse to single
/// dashes; other punctuation is dropped. Text with nothing left yields
/// `"section"`.
///
/// # Example
///
/// ```
/// use demodoc_renderer::slugify;
///
/// assert_eq!(slugify("Basic usage"), "basic-usage");
/// assert_eq!(slugify("What's New?"), "whats-new");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut result = String::with_capacity(ascii.len());
    let mut last_was_dash = true;

    for c in ascii.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    if result.is_empty() {
        result.push_str("section");
    }
    result
}

/// Hands out document-unique slugs: `x`, `x-2`, `x-3`, …
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashSet<String>,
}

impl Slugger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for `text`, suffixed if an identical slug was already issued.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        self.claim(base)
    }

    /// Reserve an explicit id, suffixing it on collision.
    pub fn claim(&mut self, base: String) -> String {
        let mut candidate = base.clone();
        let mut n = 2;
        while self.seen.contains(&candidate) {
            candidate = format!("{base}-{n}");
            n += 1;
        }
        self.seen.insert(candidate.clone());
        candidate
    }
}

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
