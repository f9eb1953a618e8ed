//! Markdown engine configured per render session.

use std::fmt;

use html_escape::encode_double_quoted_attribute;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use tracing::debug;

use crate::anchor::{AnchorOptions, Slugger};
use crate::container::{ClassContainer, ContainerPreprocessor, ContainerRule, Preprocessed, Replacements};
use crate::demo::DemoBlockRule;
use crate::fence::{Fence, FenceRenderFn, highlight, render_fence, render_raw_fence};

/// Marker emitted right after `<table>` when tables get a class.
const TABLE_MARKER: &str = "<!--demodoc-table-->";

/// Result of rendering markdown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Non-fatal structural problems (stray or unclosed containers).
    pub warnings: Vec<String>,
}

/// Rendering rules for one session.
///
/// Built once, then moved into a [`Markdown`] engine. Nothing here changes
/// while documents are rendered.
pub struct MarkdownConfig {
    gfm: bool,
    table_class: Option<String>,
    anchors: Option<AnchorOptions>,
    fence: Box<FenceRenderFn>,
    containers: Vec<Box<dyn ContainerRule>>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            table_class: None,
            anchors: None,
            fence: Box::new(render_fence),
            containers: Vec::new(),
        }
    }
}

impl fmt::Debug for MarkdownConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let containers: Vec<&str> = self.containers.iter().map(|rule| rule.name()).collect();
        f.debug_struct("MarkdownConfig")
            .field("gfm", &self.gfm)
            .field("table_class", &self.table_class)
            .field("anchors", &self.anchors)
            .field("containers", &containers)
            .finish_non_exhaustive()
    }
}

impl MarkdownConfig {
    /// Documentation site preset.
    ///
    /// Tables get the `table` class, headings from level 2 get anchors with a
    /// leading permalink, fences render raw with highlighting restored, and
    /// `demo`, `tip` and `warning` containers are enabled.
    #[must_use]
    pub fn demo_docs() -> Self {
        Self::default()
            .with_table_class("table")
            .with_anchors(AnchorOptions::default())
            .with_fence_renderer(highlight(render_raw_fence))
            .with_container(DemoBlockRule::default())
            .with_container(ClassContainer::new("tip"))
            .with_container(ClassContainer::new("warning"))
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Class attribute for markdown tables.
    #[must_use]
    pub fn with_table_class(mut self, class: impl Into<String>) -> Self {
        self.table_class = Some(class.into());
        self
    }

    /// Enable heading anchors.
    #[must_use]
    pub fn with_anchors(mut self, anchors: AnchorOptions) -> Self {
        self.anchors = Some(anchors);
        self
    }

    /// Replace the fenced code block renderer.
    #[must_use]
    pub fn with_fence_renderer<F>(mut self, render: F) -> Self
    where
        F: Fn(&Fence<'_>) -> String + Send + Sync + 'static,
    {
        self.fence = Box::new(render);
        self
    }

    /// Add a container rule.
    ///
    /// Rules are tried in order; the first whose `validate` accepts an opening
    /// marker handles that container.
    #[must_use]
    pub fn with_container<R: ContainerRule + 'static>(mut self, rule: R) -> Self {
        self.containers.push(Box::new(rule));
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }
}

/// Markdown engine for one session.
///
/// Rendering takes `&self`, so one engine can be shared between threads.
///
/// # Example
///
/// ```
/// use demodoc_renderer::{Markdown, MarkdownConfig};
///
/// let md = Markdown::new(MarkdownConfig::demo_docs());
/// let result = md.render("::: demo Click it\n```html\n<button>OK</button>\n```\n:::\n");
///
/// assert!(result.html.starts_with("<demo-block class=\"demo-box\" :jsfiddle=\""));
/// assert!(result.html.contains("<div class=\"source\" slot=\"source\"><button>OK</button>\n</div>"));
/// assert!(result.html.ends_with("</div></demo-block>\n"));
/// assert!(result.warnings.is_empty());
/// ```
#[derive(Debug)]
pub struct Markdown {
    config: MarkdownConfig,
}

impl Markdown {
    #[must_use]
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    /// Render a document with containers, anchors and custom fences.
    #[must_use]
    pub fn render(&self, source: &str) -> RenderResult {
        let Preprocessed {
            markdown,
            events,
            warnings,
        } = ContainerPreprocessor::new(&self.config.containers).process(source);

        let parser = Parser::new_ext(&markdown, self.config.parser_options());
        let rewritten = EventRewriter::new(&self.config).rewrite(parser);

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, rewritten.into_iter());

        let mut replacements = Replacements::with_capacity(events.len() * 2 + 1);
        if let Some(class) = &self.config.table_class {
            replacements.add(
                format!("<table>{TABLE_MARKER}"),
                format!("<table class=\"{}\">", encode_double_quoted_attribute(class)),
            );
        }
        for pending in &events {
            let rendered = self.config.containers[pending.rule].render(&pending.event, self);
            // The HTML block keeps the placeholder on its own line.
            replacements.add(format!("{}\n", pending.placeholder), rendered.clone());
            replacements.add(pending.placeholder.clone(), rendered);
        }
        replacements.apply(&mut html);

        debug!(
            container_markers = events.len(),
            warnings = warnings.len(),
            "rendered document"
        );
        RenderResult { html, warnings }
    }

    /// Render a markdown fragment with plain parser options.
    ///
    /// Containers, anchors and fence customisations are not applied. Used for
    /// inline descriptions inside container markup.
    #[must_use]
    pub fn render_fragment(&self, source: &str) -> String {
        let mut html = String::with_capacity(source.len() * 3 / 2);
        let parser = Parser::new_ext(source, self.config.parser_options());
        pulldown_cmark::html::push_html(&mut html, parser);
        html
    }
}

/// Heading buffered until its text is known.
struct PendingHeading<'a> {
    level: HeadingLevel,
    id: Option<CowStr<'a>>,
    classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    events: Vec<Event<'a>>,
    text: String,
}

/// Fenced code block buffered until its end.
struct PendingFence {
    info: String,
    content: String,
}

/// Applies session customisations to the parser's event stream.
struct EventRewriter<'c> {
    config: &'c MarkdownConfig,
    slugger: Slugger,
    heading: Option<PendingHeading<'static>>,
    fence: Option<PendingFence>,
}

impl<'c> EventRewriter<'c> {
    fn new(config: &'c MarkdownConfig) -> Self {
        Self {
            config,
            slugger: Slugger::new(),
            heading: None,
            fence: None,
        }
    }

    fn rewrite<'a>(mut self, events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'static>> {
        let mut output = Vec::new();
        for event in events {
            self.process_event(event.into_static(), &mut output);
        }
        output
    }

    fn process_event(&mut self, event: Event<'static>, output: &mut Vec<Event<'static>>) {
        if let Some(fence) = &mut self.fence {
            match event {
                Event::Text(text) => fence.content.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    let rendered = (self.config.fence)(&Fence {
                        info: &fence.info,
                        content: &fence.content,
                    });
                    output.push(Event::Html(rendered.into()));
                    self.fence = None;
                }
                _ => {}
            }
            return;
        }

        if let Some(heading) = &mut self.heading {
            match event {
                Event::End(TagEnd::Heading(_)) => self.finish_heading(output),
                other => {
                    if let Event::Text(text) | Event::Code(text) = &other {
                        heading.text.push_str(text);
                    }
                    heading.events.push(other);
                }
            }
            return;
        }

        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                self.fence = Some(PendingFence {
                    info: info.into_string(),
                    content: String::new(),
                });
            }
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) if self.config.anchors.as_ref().is_some_and(|a| a.applies_to(level)) => {
                self.heading = Some(PendingHeading {
                    level,
                    id,
                    classes,
                    attrs,
                    events: Vec::new(),
                    text: String::new(),
                });
            }
            Event::Start(Tag::Table(alignments)) if self.config.table_class.is_some() => {
                output.push(Event::Start(Tag::Table(alignments)));
                output.push(Event::Html(TABLE_MARKER.into()));
            }
            other => output.push(other),
        }
    }

    fn finish_heading(&mut self, output: &mut Vec<Event<'static>>) {
        let (Some(heading), Some(anchors)) = (self.heading.take(), self.config.anchors.as_ref())
        else {
            return;
        };

        let id = match heading.id {
            Some(id) => self.slugger.claim(id.into_string()),
            None => self.slugger.slug(&heading.text),
        };
        let permalink = anchors.permalink.then(|| anchors.permalink_html(&id));

        output.push(Event::Start(Tag::Heading {
            level: heading.level,
            id: Some(id.into()),
            classes: heading.classes,
            attrs: heading.attrs,
        }));
        if let Some(link) = &permalink
            && anchors.permalink_before
        {
            output.push(Event::InlineHtml(format!("{link} ").into()));
        }
        output.extend(heading.events);
        if let Some(link) = &permalink
            && !anchors.permalink_before
        {
            output.push(Event::InlineHtml(format!(" {link}").into()));
        }
        output.push(Event::End(TagEnd::Heading(heading.level)));
    }
}
