//! Code fence tracking for line-based preprocessing.
//!
//! Container markers inside fenced code blocks are ordinary text. A fence that
//! opens a container body supplies that container's content.

/// Tracks code fence state during line-by-line processing.
///
/// Code fences in `CommonMark` can use backticks or tildes (three or more).
/// The closing fence must use the same character and be at least as long
/// as the opening fence.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<OpenFence>,
}

#[derive(Debug, Clone, Copy)]
struct OpenFence {
    fence_char: char,
    fence_len: usize,
    indent: usize,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Line that closes the currently open fence.
    pub(crate) fn closing_marker(&self) -> Option<String> {
        self.open
            .map(|open| open.fence_char.to_string().repeat(open.fence_len))
    }

    /// Update fence state based on a line.
    ///
    /// Returns `true` if the line is a fence marker (opening or closing).
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let indent = leading_spaces(line);
        let trimmed = line.trim_start();

        if let Some(open) = self.open {
            if indent <= 3 && is_closing_fence(trimmed, open.fence_char, open.fence_len) {
                self.open = None;
                return true;
            }
            return false;
        }

        if indent > 3 {
            return false;
        }
        match detect_fence(trimmed) {
            Some((fence_char, fence_len)) => {
                self.open = Some(OpenFence {
                    fence_char,
                    fence_len,
                    indent,
                });
                true
            }
            None => false,
        }
    }
}

/// Content of the fenced code block that starts `text`, if it starts with one.
///
/// Leading blank lines are skipped. The returned content keeps one newline per
/// line and has the opening fence's indentation removed from each line. An
/// unterminated fence runs to the end of `text`.
pub(crate) fn leading_fence_content(text: &str) -> Option<String> {
    let mut lines = text.lines().skip_while(|line| line.trim().is_empty());
    let opening = lines.next()?;

    let mut tracker = FenceTracker::new();
    if !tracker.update(opening) {
        return None;
    }
    let indent = tracker.open.map_or(0, |open| open.indent);

    let mut content = String::new();
    for line in lines {
        if tracker.update(line) {
            break;
        }
        content.push_str(strip_indent(line, indent));
        content.push('\n');
    }
    Some(content)
}

fn leading_spaces(line: &str) -> usize {
    line.chars().take_while(|&c| c == ' ').count()
}

/// Remove up to `indent` leading spaces.
fn strip_indent(line: &str, indent: usize) -> &str {
    let n = leading_spaces(line).min(indent);
    &line[n..]
}

/// Detect if a line starts a code fence.
///
/// Returns the fence character and length if found. Backtick fences may not
/// carry backticks in their info string.
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    if count < 3 {
        return None;
    }
    if first == '`' && trimmed[count..].contains('`') {
        return None;
    }
    Some((first, count))
}

/// Check if a line is a valid closing fence.
fn is_closing_fence(trimmed: &str, expected_char: char, min_len: usize) -> bool {
    let count = trimmed.chars().take_while(|&c| c == expected_char).count();
    if count == 0 || count < min_len {
        return false;
    }

    // After fence chars, only whitespace is allowed
    trimmed[count..].chars().all(char::is_whitespace)
}
