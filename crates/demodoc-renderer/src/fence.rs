//! Fenced code block rendering and the highlight wrapper.
//!
//! Demo pages render fences in raw mode: the `v-pre` marker keeps the page
//! framework from interpreting the listing as live template code. The same
//! marker on `<code>` also opts the block out of syntax highlighting, so
//! [`highlight`] wraps a renderer and swaps the marker for the `hljs` class.

use html_escape::{encode_double_quoted_attribute, encode_text};

/// Highlight-suppressing marker emitted by [`render_raw_fence`].
const RAW_CODE_OPEN: &str = r#"<code v-pre class=""#;
/// Replacement for [`RAW_CODE_OPEN`]; keeps the existing class list.
const HIGHLIGHT_CODE_OPEN: &str = r#"<code class="hljs "#;
/// Code element emitted without any class attribute.
const BARE_CODE_OPEN: &str = "<code>";
const BARE_HIGHLIGHT_CODE_OPEN: &str = r#"<code class="hljs">"#;

/// A fenced code block as seen by a fence renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fence<'a> {
    /// Info string after the opening fence (e.g. `html` or `js title=x`).
    pub info: &'a str,
    /// Literal block content, one trailing newline per line.
    pub content: &'a str,
}

impl Fence<'_> {
    /// Language token: the first word of the info string.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.info.split_whitespace().next()
    }
}

/// Renderer for fenced code blocks.
pub type FenceRenderFn = dyn Fn(&Fence<'_>) -> String + Send + Sync;

/// Default fence markup: `<pre><code class="language-x">…</code></pre>`.
///
/// # Example
///
/// ```
/// use demodoc_renderer::{Fence, render_fence};
///
/// let fence = Fence { info: "js", content: "a < b\n" };
/// assert_eq!(
///     render_fence(&fence),
///     "<pre><code class=\"language-js\">a &lt; b\n</code></pre>\n"
/// );
/// ```
#[must_use]
pub fn render_fence(fence: &Fence<'_>) -> String {
    match fence.language() {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            encode_double_quoted_attribute(lang),
            encode_text(fence.content)
        ),
        None => format!("<pre><code>{}</code></pre>\n", encode_text(fence.content)),
    }
}

/// Raw-mode fence markup.
///
/// `<pre v-pre>` protects the listing from template interpretation. With a
/// language, the code element also carries `v-pre`, which disables syntax
/// highlighting until [`highlight`] rewrites it.
#[must_use]
pub fn render_raw_fence(fence: &Fence<'_>) -> String {
    match fence.language() {
        Some(lang) => format!(
            "<pre v-pre>{RAW_CODE_OPEN}language-{}\">{}</code></pre>\n",
            encode_double_quoted_attribute(lang),
            encode_text(fence.content)
        ),
        None => format!(
            "<pre v-pre>{BARE_CODE_OPEN}{}</code></pre>\n",
            encode_text(fence.content)
        ),
    }
}

/// Wrap a fence renderer so its output is marked for syntax highlighting.
///
/// The wrapped renderer has the same signature. Its output is changed in two
/// places only: the first `<code v-pre class="` becomes `<code class="hljs `,
/// and the first bare `<code>` becomes `<code class="hljs">`.
///
/// # Example
///
/// ```
/// use demodoc_renderer::{Fence, highlight, render_raw_fence};
///
/// let render = highlight(render_raw_fence);
/// let fence = Fence { info: "html", content: "<p></p>\n" };
/// assert!(render(&fence).contains(r#"<code class="hljs language-html">"#));
/// ```
pub fn highlight<F>(render: F) -> impl Fn(&Fence<'_>) -> String + Send + Sync
where
    F: Fn(&Fence<'_>) -> String + Send + Sync,
{
    move |fence: &Fence<'_>| mark_highlighted(&render(fence))
}

/// Apply the highlight rewrite to already-rendered fence markup.
#[must_use]
pub fn mark_highlighted(rendered: &str) -> String {
    rendered
        .replacen(RAW_CODE_OPEN, HIGHLIGHT_CODE_OPEN, 1)
        .replacen(BARE_CODE_OPEN, BARE_HIGHLIGHT_CODE_OPEN, 1)
}
