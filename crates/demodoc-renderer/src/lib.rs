//! Markdown renderer for component documentation with live demo blocks.
//!
//! This crate renders markdown with [`pulldown_cmark`] and adds the pieces a
//! component documentation site needs:
//!
//! - `::: demo <description>` containers that turn an HTML snippet into a
//!   widget element carrying the snippet as a JSON payload ([`DemoBlockRule`])
//! - plain class containers such as `::: tip` ([`ClassContainer`])
//! - raw fenced code blocks with highlighting restored ([`highlight`])
//! - heading anchors with transliterated slugs ([`AnchorOptions`], [`slugify`])
//!
//! All rules for a session live in one [`MarkdownConfig`]; the [`Markdown`]
//! engine built from it renders any number of documents through `&self`.
//!
//! # Example
//!
//! ```
//! use demodoc_renderer::{Markdown, MarkdownConfig};
//!
//! let md = Markdown::new(MarkdownConfig::demo_docs());
//! let result = md.render("## Button\n\n::: tip\nUse sparingly.\n:::\n");
//!
//! assert!(result.html.contains("<h2 id=\"button\">"));
//! assert!(result.html.contains("<div class=\"tip\">"));
//! ```

mod anchor;
pub mod container;
mod demo;
mod entities;
mod fence;
mod markdown;
mod tags;

pub use anchor::{AnchorOptions, Slugger, slugify};
pub use container::{ClassContainer, ContainerEvent, ContainerRule, Replacements};
pub use demo::{
    ContainerMatch, DemoBlockRule, DemoPayload, match_marker, parse_description, strip_empty_attrs,
};
pub use entities::normalize_entities;
pub use fence::{Fence, FenceRenderFn, highlight, mark_highlighted, render_fence, render_raw_fence};
pub use markdown::{Markdown, MarkdownConfig, RenderResult};
pub use tags::{fetch_tag, strip_tags};
