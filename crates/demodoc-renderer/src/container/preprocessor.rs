//! Container preprocessor.
//!
//! Replaces container marker lines with HTML comment placeholders and records
//! one [`ContainerEvent`] per recognised marker.

use tracing::{debug, warn};

use super::block::leading_block_content;
use super::fence::FenceTracker;
use super::parser::{MarkerLine, marker_name, parse_marker};
use super::{ContainerEvent, ContainerRule};

/// A recorded marker waiting for post-processing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PendingEvent {
    /// Placeholder text present in the rendered HTML.
    pub(crate) placeholder: String,
    /// Index of the handling rule.
    pub(crate) rule: usize,
    pub(crate) event: ContainerEvent,
}

/// Output of [`ContainerPreprocessor::process`].
#[derive(Debug)]
pub(crate) struct Preprocessed {
    /// Markdown with container markers replaced by placeholders.
    pub(crate) markdown: String,
    /// Events in document order.
    pub(crate) events: Vec<PendingEvent>,
    pub(crate) warnings: Vec<String>,
}

/// A container whose closing marker has not been seen yet.
struct OpenContainer {
    name: String,
    colon_count: usize,
    /// Line of the opening marker (1-indexed).
    line: usize,
    /// `(rule, open event)` for handled containers; `None` for containers no
    /// rule accepted, whose markers pass through as text.
    target: Option<(usize, usize)>,
    /// Raw lines between the markers.
    body: String,
}

/// Line-based container preprocessor.
///
/// Markers inside fenced code blocks are ignored. Containers nest; a closing
/// marker closes the innermost open container if it has at least as many
/// colons as its opener. Containers still open at the end of input are closed
/// there with a warning.
pub(crate) struct ContainerPreprocessor<'r> {
    rules: &'r [Box<dyn ContainerRule>],
    fence: FenceTracker,
    stack: Vec<OpenContainer>,
    events: Vec<PendingEvent>,
    warnings: Vec<String>,
}

impl<'r> ContainerPreprocessor<'r> {
    pub(crate) fn new(rules: &'r [Box<dyn ContainerRule>]) -> Self {
        Self {
            rules,
            fence: FenceTracker::new(),
            stack: Vec::new(),
            events: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Process markdown text and return the transformed output with its events.
    pub(crate) fn process(mut self, input: &str) -> Preprocessed {
        if self.rules.is_empty() {
            return Preprocessed {
                markdown: input.to_owned(),
                events: Vec::new(),
                warnings: Vec::new(),
            };
        }

        let mut output = String::with_capacity(input.len());
        let lines: Vec<&str> = input.lines().collect();
        let line_count = lines.len();

        for (idx, line) in lines.into_iter().enumerate() {
            let processed = self.process_line(line, idx + 1);
            output.push_str(&processed);
            // Preserve line endings
            if idx < line_count - 1 || input.ends_with('\n') {
                output.push('\n');
            }
        }

        self.finalize(&mut output);

        Preprocessed {
            markdown: output,
            events: self.events,
            warnings: self.warnings,
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> String {
        self.fence.update(line);

        // Skip marker processing inside code fences
        if self.fence.in_fence() {
            self.append_to_bodies(line);
            return line.to_owned();
        }

        match parse_marker(line) {
            Some(MarkerLine::Open {
                params,
                colon_count,
            }) => self.open(line, params, colon_count, line_num),
            Some(MarkerLine::Close { colon_count }) if self.closes_innermost(colon_count) => {
                self.close(line)
            }
            Some(MarkerLine::Close { .. }) if self.stack.is_empty() => {
                let message = format!("line {line_num}: stray ::: with no opening container");
                warn!("{message}");
                self.warnings.push(message);
                line.to_owned()
            }
            _ => {
                self.append_to_bodies(line);
                line.to_owned()
            }
        }
    }

    fn closes_innermost(&self, colon_count: usize) -> bool {
        self.stack
            .last()
            .is_some_and(|open| colon_count >= open.colon_count)
    }

    fn open(&mut self, line: &str, params: &str, colon_count: usize, line_num: usize) -> String {
        self.append_to_bodies(line);

        let name = marker_name(params).to_owned();
        let Some(rule) = self.rules.iter().position(|r| r.validate(params)) else {
            // Unhandled: keep the marker as text, and its closer too.
            self.stack.push(OpenContainer {
                name,
                colon_count,
                line: line_num,
                target: None,
                body: String::new(),
            });
            return line.to_owned();
        };

        debug!(line = line_num, container = %name, "container opened");
        let open_event = self.push_event(
            rule,
            ContainerEvent::Open {
                info: params.to_owned(),
                body: String::new(),
            },
        );
        self.stack.push(OpenContainer {
            name,
            colon_count,
            line: line_num,
            target: Some((rule, open_event)),
            body: String::new(),
        });
        self.block_placeholder(open_event)
    }

    fn close(&mut self, line: &str) -> String {
        let Some(container) = self.stack.pop() else {
            return line.to_owned();
        };
        self.append_to_bodies(line);
        self.finish(container).unwrap_or_else(|| line.to_owned())
    }

    /// Fill in the body of a handled container and record its close event.
    ///
    /// Returns the placeholder block, or `None` for unhandled containers.
    fn finish(&mut self, container: OpenContainer) -> Option<String> {
        let (rule, open_event) = container.target?;

        let body = leading_block_content(&container.body);
        if let ContainerEvent::Open { body: slot, .. } = &mut self.events[open_event].event {
            *slot = body;
        }

        debug!(container = %container.name, opened_at = container.line, "container closed");
        let close_event = self.push_event(rule, ContainerEvent::Close);
        Some(self.block_placeholder(close_event))
    }

    fn push_event(&mut self, rule: usize, event: ContainerEvent) -> usize {
        let id = self.events.len();
        self.events.push(PendingEvent {
            placeholder: format!("<!--demodoc-container-{id}-->"),
            rule,
            event,
        });
        id
    }

    /// Placeholder on its own line, separated by blank lines so pulldown-cmark
    /// sees an HTML block and parses the surrounding markdown normally.
    fn block_placeholder(&self, id: usize) -> String {
        format!("\n{}\n", self.events[id].placeholder)
    }

    fn append_to_bodies(&mut self, line: &str) {
        for open in &mut self.stack {
            if open.target.is_some() {
                open.body.push_str(line);
                open.body.push('\n');
            }
        }
    }

    /// Close containers left open at the end of input.
    fn finalize(&mut self, output: &mut String) {
        if !self.stack.iter().any(|open| open.target.is_some()) {
            return;
        }
        // A fence left open would swallow the closing placeholders.
        if let Some(marker) = self.fence.closing_marker() {
            if !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&marker);
            output.push('\n');
        }

        while let Some(container) = self.stack.pop() {
            if container.target.is_none() {
                continue;
            }
            let message = format!(
                "unclosed container :::{} opened on line {} (closed at end of document)",
                container.name, container.line
            );
            warn!("{message}");
            self.warnings.push(message);

            if let Some(placeholder) = self.finish(container) {
                if !output.ends_with('\n') {
                    output.push('\n');
                }
                output.push_str(&placeholder);
            }
        }
    }
}
