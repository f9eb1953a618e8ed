//! Regex-level extraction of embedded `<script>`/`<style>`-like tags.
//!
//! [`strip_tags`] and [`fetch_tag`] share one pattern per tag name, so the
//! occurrences removed by one are exactly the occurrences read by the other.
//! Removal repeats until no occurrence is left, since cutting one element out
//! can splice its neighbours into a new one (`<scr<script></script>ipt>`).
//!
//! Matching is best-effort: an opening tag with optional attributes, content up
//! to the nearest closing tag of the same name (case-insensitive, across
//! newlines). This is not an HTML parser; unbalanced or nested tags of the same
//! name may be cut at the first closing tag.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| tag_pattern("script"));
static STYLE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| tag_pattern("style"));

/// Build the occurrence pattern for one tag name.
///
/// Capture group 1 is the inner content. Returns `None` for names the regex
/// engine refuses (e.g. over its size limit), which behave as absent tags.
fn tag_pattern(name: &str) -> Option<Regex> {
    let name = regex::escape(name);
    Regex::new(&format!(r"(?is)<{name}(?:\s[^>]*)?>(.*?)</{name}\s*>")).ok()
}

/// Run `f` with the pattern for `name`, reusing the precompiled ones.
fn with_pattern<T>(name: &str, f: impl FnOnce(Option<&Regex>) -> T) -> T {
    if name.eq_ignore_ascii_case("script") {
        f(SCRIPT_PATTERN.as_ref())
    } else if name.eq_ignore_ascii_case("style") {
        f(STYLE_PATTERN.as_ref())
    } else {
        f(tag_pattern(name).as_ref())
    }
}

/// Remove occurrences of `pattern` until none remain.
///
/// Returns the remaining text and the inner content of every removed
/// occurrence, pass by pass, each pass in document order. `None` when the
/// pattern does not occur.
fn remove_all(body: &str, pattern: &Regex) -> Option<(String, String)> {
    if !pattern.is_match(body) {
        return None;
    }
    let mut text = body.to_owned();
    let mut inner = String::new();
    while pattern.is_match(&text) {
        for caps in pattern.captures_iter(&text) {
            inner.push_str(caps.get(1).map_or("", |m| m.as_str()));
        }
        text = pattern.replace_all(&text, "").into_owned();
    }
    Some((text, inner))
}

/// Remove every occurrence of the named tags, markup and content included.
///
/// Tags not listed are left intact. With zero occurrences the body is returned
/// unchanged. The result contains no occurrence of any listed tag.
///
/// # Example
///
/// ```
/// use demodoc_renderer::strip_tags;
///
/// let body = "<div>hi</div><script>console.log(1)</script>";
/// assert_eq!(strip_tags(body, &["script", "style"]), "<div>hi</div>");
/// assert_eq!(strip_tags("<scr<script>x</script>ipt>y</script>", &["script"]), "");
/// ```
pub fn strip_tags<S: AsRef<str>>(body: &str, tag_names: &[S]) -> String {
    let mut stripped = Cow::Borrowed(body);
    // Removing one tag can form another listed tag, so repeat full rounds.
    loop {
        let mut changed = false;
        for name in tag_names {
            let next = with_pattern(name.as_ref(), |pattern| {
                pattern.and_then(|p| remove_all(&stripped, p))
            });
            if let Some((text, _)) = next {
                stripped = Cow::Owned(text);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    stripped.into_owned()
}

/// Concatenate the inner content of every occurrence of `tag_name`.
///
/// Occurrences are joined in document order with no separator. Occurrences
/// that only form once others are removed follow those of the earlier pass.
/// The result is exactly the inner content [`strip_tags`] drops for this tag.
/// Returns an empty string when the tag does not occur.
///
/// # Example
///
/// ```
/// use demodoc_renderer::fetch_tag;
///
/// let body = "<style>a{}</style><p>x</p><style>b{}</style>";
/// assert_eq!(fetch_tag(body, "style"), "a{}b{}");
/// ```
pub fn fetch_tag(body: &str, tag_name: &str) -> String {
    with_pattern(tag_name, |pattern| {
        pattern
            .and_then(|p| remove_all(body, p))
            .map(|(_, inner)| inner)
            .unwrap_or_default()
    })
}
