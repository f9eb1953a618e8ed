//! Container marker line parsing.

/// A line recognised as a container marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkerLine<'a> {
    /// `::: name params`; `params` is trimmed and never empty.
    Open { params: &'a str, colon_count: usize },
    /// `:::` followed by nothing but whitespace.
    Close { colon_count: usize },
}

/// Parse a line for container marker syntax.
///
/// Markers start with at most three spaces of indentation and three or more
/// colons. Returns `None` for any other line.
pub(crate) fn parse_marker(line: &str) -> Option<MarkerLine<'_>> {
    let indent = line.chars().take_while(|&c| c == ' ').count();
    if indent > 3 {
        return None;
    }

    let rest = &line[indent..];
    let colon_count = rest.chars().take_while(|&c| c == ':').count();
    if colon_count < 3 {
        return None;
    }

    let params = rest[colon_count..].trim();
    if params.is_empty() {
        Some(MarkerLine::Close { colon_count })
    } else {
        Some(MarkerLine::Open {
            params,
            colon_count,
        })
    }
}

/// Container keyword: the first word of the marker parameters.
pub(crate) fn marker_name(params: &str) -> &str {
    params.split_whitespace().next().unwrap_or_default()
}
