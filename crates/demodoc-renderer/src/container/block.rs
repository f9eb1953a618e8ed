//! Content of the first block inside a container.
//!
//! Container rules receive the content of the block that opens the container
//! body, the way markdown-it exposes it on the token after the container
//! opener. Fenced and indented code yield their code, HTML blocks yield their
//! raw lines, and every other block (paragraphs, headings, lists, quotes)
//! carries no content of its own.

use std::sync::LazyLock;

use regex::Regex;

use super::fence::leading_fence_content;

/// HTML block kinds that end on a line containing a terminator.
static TERMINATED_HTML_STARTS: LazyLock<[(Regex, Regex); 5]> = LazyLock::new(|| {
    let pair = |start: &str, end: &str| {
        (
            Regex::new(start).expect("invalid html block start regex"),
            Regex::new(end).expect("invalid html block end regex"),
        )
    };
    [
        pair(
            r"(?i)^<(?:script|pre|style|textarea)(?:\s|>|$)",
            r"(?i)</(?:script|pre|style|textarea)>",
        ),
        pair(r"^<!--", r"-->"),
        pair(r"^<\?", r"\?>"),
        pair(r"^<![A-Za-z]", r">"),
        pair(r"^<!\[CDATA\[", r"\]\]>"),
    ]
});

/// HTML blocks opened by a known block-level tag name.
static BLOCK_TAG_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^</?(?:address|article|aside|base|basefont|blockquote|body|caption|center|col|colgroup|dd|details|dialog|dir|div|dl|dt|fieldset|figcaption|figure|footer|form|frame|frameset|h[1-6]|head|header|hr|html|iframe|legend|li|link|main|menu|menuitem|nav|noframes|ol|optgroup|option|p|param|search|section|source|summary|table|tbody|td|tfoot|th|thead|title|tr|track|ul)(?:\s|/?>|$)",
    )
    .expect("invalid block tag regex")
});

/// A line holding nothing but one complete open or closing tag.
static LONE_TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:<[A-Za-z][A-Za-z0-9-]*(?:\s+[A-Za-z_:][A-Za-z0-9_.:-]*(?:\s*=\s*(?:[^"'=<>`\x00-\x20]+|'[^']*'|"[^"]*"))?)*\s*/?>|</[A-Za-z][A-Za-z0-9-]*\s*>)\s*$"#,
    )
    .expect("invalid lone tag regex")
});

/// Content of the first block of a container body.
///
/// Returns an empty string when the body is empty or starts with a block that
/// has no literal content.
pub(crate) fn leading_block_content(text: &str) -> String {
    if let Some(code) = leading_fence_content(text) {
        return code;
    }

    let lines: Vec<&str> = text
        .lines()
        .skip_while(|line| line.trim().is_empty())
        .collect();
    let Some(first) = lines.first() else {
        return String::new();
    };

    if indent_width(first) >= 4 {
        return indented_code(&lines);
    }
    html_block(&lines).unwrap_or_default()
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|&c| c == ' ').count()
}

/// Indented code block: lines with four columns removed, trailing blank lines
/// dropped.
fn indented_code(lines: &[&str]) -> String {
    let end = lines
        .iter()
        .position(|line| !line.trim().is_empty() && indent_width(line) < 4)
        .unwrap_or(lines.len());
    let body = &lines[..end];
    let last = body
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |idx| idx + 1);

    body[..last]
        .iter()
        .map(|line| {
            let n = indent_width(line).min(4);
            format!("{}\n", &line[n..])
        })
        .collect()
}

/// Raw lines of the HTML block starting at `lines[0]`, if it starts one.
fn html_block(lines: &[&str]) -> Option<String> {
    let first = lines.first()?;
    let start = first.trim_start();

    let end = if let Some((_, end)) = TERMINATED_HTML_STARTS
        .iter()
        .find(|(open, _)| open.is_match(start))
    {
        lines
            .iter()
            .position(|line| end.is_match(line))
            .map_or(lines.len(), |idx| idx + 1)
    } else if BLOCK_TAG_START.is_match(start) || LONE_TAG_LINE.is_match(start) {
        lines
            .iter()
            .position(|line| line.trim().is_empty())
            .unwrap_or(lines.len())
    } else {
        return None;
    };

    Some(lines[..end].iter().map(|line| format!("{line}\n")).collect())
}
