//! Single-pass placeholder substitution for post-processing.

/// Collects placeholder substitutions and applies them in one scan.
///
/// Every match is located in the original text before anything is replaced,
/// so markup inserted for one placeholder is never rescanned for another.
/// Where two matches overlap, the one starting first wins; for equal starts
/// the earlier registration wins.
///
/// # Example
///
/// ```
/// use demodoc_renderer::Replacements;
///
/// let mut html = "<!--open-->body<!--close-->".to_owned();
/// let mut replacements = Replacements::new();
/// replacements.add("<!--open-->", "<div class=\"tip\">");
/// replacements.add("<!--close-->", "</div>");
/// replacements.apply(&mut html);
///
/// assert_eq!(html, "<div class=\"tip\">body</div>");
/// ```
#[derive(Debug, Default)]
pub struct Replacements {
    items: Vec<(String, String)>,
}

impl Replacements {
    /// Create a new empty replacements collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new replacements collector with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Register a substitution: every occurrence of `from` becomes `to`.
    ///
    /// Empty patterns are ignored.
    pub fn add(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        if !from.is_empty() {
            self.items.push((from, to.into()));
        }
    }

    /// Apply all registered substitutions.
    ///
    /// Consumes the collector to prevent accidental reuse.
    pub fn apply(self, html: &mut String) {
        if self.items.is_empty() {
            return;
        }

        let mut matches: Vec<(usize, usize)> = self
            .items
            .iter()
            .enumerate()
            .flat_map(|(item, (from, _))| {
                html.match_indices(from.as_str())
                    .map(move |(pos, _)| (pos, item))
            })
            .collect();
        if matches.is_empty() {
            return;
        }
        matches.sort_unstable();

        let mut output = String::with_capacity(html.len());
        let mut cursor = 0;
        for (pos, item) in matches {
            if pos < cursor {
                continue;
            }
            let (from, to) = &self.items[item];
            output.push_str(&html[cursor..pos]);
            output.push_str(to);
            cursor = pos + from.len();
        }
        output.push_str(&html[cursor..]);
        *html = output;
    }

    /// Check if there are any substitutions registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of registered substitutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_replacements() {
        let mut html = "unchanged".to_owned();
        Replacements::new().apply(&mut html);
        assert_eq!(html, "unchanged");
    }

    #[test]
    fn test_placeholders_replaced() {
        let mut html = "<!--c-0-->\n<p>text</p>\n<!--c-1-->\n".to_owned();
        let mut replacements = Replacements::with_capacity(2);
        replacements.add("<!--c-0-->", "<div class=\"warning\">");
        replacements.add("<!--c-1-->", "</div>");
        replacements.apply(&mut html);
        assert_eq!(html, "<div class=\"warning\">\n<p>text</p>\n</div>\n");
    }

    #[test]
    fn test_pattern_not_found() {
        let mut html = "hello world".to_owned();
        let mut replacements = Replacements::new();
        replacements.add("foo", "bar");
        replacements.apply(&mut html);
        assert_eq!(html, "hello world");
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let mut html = "a a a".to_owned();
        let mut replacements = Replacements::new();
        replacements.add("a", "b");
        replacements.apply(&mut html);
        assert_eq!(html, "b b b");
    }

    #[test]
    fn test_inserted_text_not_rescanned() {
        let mut html = "<!--0--> <!--1-->".to_owned();
        let mut replacements = Replacements::new();
        replacements.add("<!--0-->", "<!--1-->");
        replacements.add("<!--1-->", "end");
        replacements.apply(&mut html);
        assert_eq!(html, "<!--1--> end");
    }

    #[test]
    fn test_overlap_first_match_wins() {
        let mut html = "abc".to_owned();
        let mut replacements = Replacements::new();
        replacements.add("bc", "X");
        replacements.add("ab", "Y");
        replacements.apply(&mut html);
        assert_eq!(html, "Yc");
    }

    #[test]
    fn test_empty_pattern_ignored() {
        let mut replacements = Replacements::new();
        replacements.add("", "x");
        assert!(replacements.is_empty());
    }

    #[test]
    fn test_len() {
        let mut replacements = Replacements::new();
        assert_eq!(replacements.len(), 0);
        replacements.add("a", "b");
        replacements.add("c", "d");
        assert_eq!(replacements.len(), 2);
    }
}
