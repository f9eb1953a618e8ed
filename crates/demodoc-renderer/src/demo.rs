//! `::: demo` containers.
//!
//! A demo container holds an HTML snippet, usually as a fenced code block:
//!
//! ````markdown
//! ::: demo A *basic* button
//! ```html
//! <button class="primary">OK</button>
//! <script>console.log("clicked")</script>
//! ```
//! :::
//! ````
//!
//! The opening marker becomes a custom element carrying the snippet as a JSON
//! payload, a live copy of its markup and the rendered description. The fence
//! then renders as usual inside the `highlight` slot, and the closing marker
//! closes both.

use std::borrow::Cow;
use std::sync::LazyLock;

use html_escape::encode_double_quoted_attribute;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::container::{ContainerEvent, ContainerRule, MarkerLine, parse_marker};
use crate::entities::normalize_entities;
use crate::tags::{fetch_tag, strip_tags};
use crate::Markdown;

/// Tags whose content is moved out of the live markup into the payload.
const EMBEDDED_TAGS: [&str; 2] = ["script", "style"];

/// Marker parameters as delivered to container rules (`demo` + description).
static PARAMS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^demo(?:\s+(.*))?$").expect("invalid demo params regex"));

/// A tag containing at least one `attr=""` assignment.
static EMPTY_ATTR_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<[^<>]*=""[^<>]*>"#).expect("invalid empty attribute regex"));

/// Result of classifying one `:::` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerMatch {
    pub is_open: bool,
    /// Text after the `demo` keyword, trimmed. Empty for closing markers.
    pub description: String,
}

/// Classify a line as a demo opening marker, a closing marker, or neither.
///
/// Recognises lines exactly as the render pipeline does: up to three spaces of
/// indentation, three or more colons, then `demo` and an optional description.
///
/// # Example
///
/// ```
/// use demodoc_renderer::match_marker;
///
/// let open = match_marker("::: demo a basic example").unwrap();
/// assert!(open.is_open);
/// assert_eq!(open.description, "a basic example");
///
/// assert!(!match_marker(":::").unwrap().is_open);
/// assert_eq!(match_marker("::: tip"), None);
/// ```
#[must_use]
pub fn match_marker(line: &str) -> Option<ContainerMatch> {
    match parse_marker(line)? {
        MarkerLine::Close { .. } => Some(ContainerMatch {
            is_open: false,
            description: String::new(),
        }),
        MarkerLine::Open { params, .. } => {
            PARAMS_PATTERN.is_match(params).then(|| ContainerMatch {
                is_open: true,
                description: parse_description(params).to_owned(),
            })
        }
    }
}

/// Description from marker parameters such as `demo a basic example`.
///
/// Parameters that do not start with the `demo` keyword yield an empty
/// description.
#[must_use]
pub fn parse_description(params: &str) -> &str {
    PARAMS_PATTERN
        .captures(params.trim())
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str().trim())
}

/// Reduce `attr=""` assignments inside tags to bare attributes.
///
/// Text outside tags is left alone.
#[must_use]
pub fn strip_empty_attrs(html: &str) -> Cow<'_, str> {
    EMPTY_ATTR_TAG_PATTERN.replace_all(html, |caps: &Captures<'_>| caps[0].replace(r#"="""#, ""))
}

/// The snippet handed to the demo widget.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoPayload {
    /// Markup with script and style blocks removed and entities decoded.
    pub html: String,
    /// Concatenated `<script>` contents.
    pub script: String,
    /// Concatenated `<style>` contents.
    pub style: String,
}

impl DemoPayload {
    /// Split a raw container body into markup, script and style.
    ///
    /// # Example
    ///
    /// ```
    /// use demodoc_renderer::DemoPayload;
    ///
    /// let payload = DemoPayload::from_body("<div>hi</div><script>console.log(1)</script>");
    /// assert_eq!(payload.html, "<div>hi</div>");
    /// assert_eq!(payload.script, "console.log(1)");
    /// assert_eq!(payload.style, "");
    /// ```
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        let stripped = strip_tags(body, &EMBEDDED_TAGS);
        let html = strip_empty_attrs(&normalize_entities(&stripped)).into_owned();
        Self {
            html,
            script: fetch_tag(body, "script"),
            style: fetch_tag(body, "style"),
        }
    }

    /// Serialize to JSON escaped for a double-quoted attribute value.
    #[must_use]
    pub fn to_attribute(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => encode_double_quoted_attribute(&json).into_owned(),
            Err(err) => {
                warn!(error = %err, "failed to serialize demo payload");
                "{}".to_owned()
            }
        }
    }
}

/// Container rule for `::: demo <description>`.
///
/// Open markers render the widget element with its `source` slot and open the
/// `highlight` slot; close markers close both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoBlockRule {
    element: String,
    class: String,
    payload_attr: String,
}

impl Default for DemoBlockRule {
    fn default() -> Self {
        Self {
            element: "demo-block".to_owned(),
            class: "demo-box".to_owned(),
            payload_attr: ":jsfiddle".to_owned(),
        }
    }
}

impl DemoBlockRule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom element name of the widget.
    #[must_use]
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = element.into();
        self
    }

    /// Class attribute of the widget element.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Attribute carrying the serialized payload.
    #[must_use]
    pub fn with_payload_attr(mut self, payload_attr: impl Into<String>) -> Self {
        self.payload_attr = payload_attr.into();
        self
    }

    fn render_open(&self, info: &str, body: &str, md: &Markdown) -> String {
        let description = parse_description(info);
        let payload = DemoPayload::from_body(body);
        debug!(
            description,
            html_len = payload.html.len(),
            script_len = payload.script.len(),
            style_len = payload.style.len(),
            "rendering demo block"
        );

        let description_html = if description.is_empty() {
            String::new()
        } else {
            md.render_fragment(description)
        };

        format!(
            "<{element} class=\"{class}\" {attr}=\"{payload}\">\
             <div class=\"source\" slot=\"source\">{html}</div>\
             {description_html}\
             <div class=\"highlight\" slot=\"highlight\">",
            element = self.element,
            class = encode_double_quoted_attribute(&self.class),
            attr = self.payload_attr,
            payload = payload.to_attribute(),
            html = payload.html,
        )
    }
}

impl ContainerRule for DemoBlockRule {
    fn name(&self) -> &str {
        "demo"
    }

    fn validate(&self, params: &str) -> bool {
        PARAMS_PATTERN.is_match(params.trim())
    }

    fn render(&self, event: &ContainerEvent, md: &Markdown) -> String {
        match event {
            ContainerEvent::Open { info, body } => self.render_open(info, body, md),
            ContainerEvent::Close => format!("</div></{}>\n", self.element),
        }
    }
}
