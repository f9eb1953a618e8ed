//! Custom `:::` containers.
//!
//! A container wraps markdown between an opening `::: name params` line and a
//! closing `:::` line:
//!
//! ```markdown
//! ::: tip
//! Rendered as ordinary markdown inside `<div class="tip">`.
//! :::
//! ```
//!
//! # Architecture
//!
//! Containers use two-phase processing:
//!
//! 1. **Preprocessing**: marker lines are replaced by HTML comment placeholders
//!    that pass through pulldown-cmark unchanged, and one [`ContainerEvent`] is
//!    recorded per marker together with the content of the container's first
//!    block.
//!
//! 2. **Post-processing**: after rendering, each placeholder is replaced by the
//!    output of its [`ContainerRule`] for that event.
//!
//! Rules are plain values owned by a [`MarkdownConfig`](crate::MarkdownConfig);
//! a rule sees one event at a time and keeps no state between them.

mod block;
mod class;
mod fence;
mod parser;
mod preprocessor;
mod replacements;

pub use class::ClassContainer;
pub use replacements::Replacements;

pub(crate) use parser::{MarkerLine, parse_marker};
pub(crate) use preprocessor::{ContainerPreprocessor, Preprocessed};

use crate::Markdown;

/// One container marker, as delivered to a [`ContainerRule`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerEvent {
    /// Opening marker.
    Open {
        /// Marker parameters after the colons, trimmed (e.g. `demo a basic example`).
        info: String,
        /// Content of the first block in the container: the code of a fenced
        /// or indented code block, the raw lines of an HTML block, or empty
        /// for any other block.
        body: String,
    },
    /// Closing marker of the most recently opened container.
    Close,
}

/// Renderer for one kind of container.
///
/// # Example
///
/// ```
/// use demodoc_renderer::{ContainerEvent, ContainerRule, Markdown, MarkdownConfig};
///
/// struct Details;
///
/// impl ContainerRule for Details {
///     fn name(&self) -> &str { "details" }
///
///     fn render(&self, event: &ContainerEvent, _md: &Markdown) -> String {
///         match event {
///             ContainerEvent::Open { .. } => "<details>\n".to_owned(),
///             ContainerEvent::Close => "</details>\n".to_owned(),
///         }
///     }
/// }
///
/// let md = Markdown::new(MarkdownConfig::default().with_container(Details));
/// let result = md.render("::: details\nHidden *text*.\n:::\n");
/// assert!(result.html.contains("<details>"));
/// assert!(result.html.contains("<em>text</em>"));
/// ```
pub trait ContainerRule: Send + Sync {
    /// Container keyword (e.g. `demo`, `tip`).
    fn name(&self) -> &str;

    /// Decide whether an opening marker belongs to this rule.
    ///
    /// `params` is everything after the colons, trimmed. The default accepts
    /// markers whose first word is [`name`](Self::name).
    fn validate(&self, params: &str) -> bool {
        params.split_whitespace().next() == Some(self.name())
    }

    /// Produce the markup that replaces one marker.
    fn render(&self, event: &ContainerEvent, md: &Markdown) -> String;
}
