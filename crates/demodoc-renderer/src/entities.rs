//! Numeric character reference repair.
//!
//! HTML serializers upstream of the demo compiler may rewrite non-ASCII text as
//! `&#xHHHH;` references. [`normalize_entities`] restores the original characters
//! so demo markup shows `你好` instead of `&#x4F60;&#x597D;`.

use std::borrow::Cow;
use std::ops::{Range, RangeInclusive};
use std::sync::LazyLock;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

const HIGH_SURROGATES: RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: RangeInclusive<u32> = 0xDC00..=0xDFFF;

/// Four-character hexadecimal reference, case-insensitive on the `x`.
static REFERENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&#x(\w{4});").expect("invalid reference regex"));

/// A reference after percent-encoding: `%26%23x` + four hex digits + `%3B`.
static ENCODED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^%26%23x([0-9a-f]{4})%3B$").expect("invalid encoded reference regex")
});

/// Replace every `&#xHHHH;` reference with the character it encodes.
///
/// A high-surrogate reference directly followed by a low-surrogate reference
/// decodes to the single character the pair encodes. References that are not
/// exactly four hex digits, and lone surrogates, are left as they are.
/// Decoding is repeated until no reference remains, so the result is a fixed
/// point:
/// `normalize_entities(&normalize_entities(s)) == normalize_entities(s)`.
///
/// Returns the input borrowed when nothing was decoded.
///
/// # Example
///
/// ```
/// use demodoc_renderer::normalize_entities;
///
/// assert_eq!(normalize_entities("&#x4F60;&#x597D;"), "你好");
/// assert_eq!(normalize_entities("&#xD83D;&#xDE00;"), "😀");
/// assert_eq!(normalize_entities("&#x4F6;"), "&#x4F6;");
/// ```
pub fn normalize_entities(text: &str) -> Cow<'_, str> {
    let Some(mut current) = decode_pass(text) else {
        return Cow::Borrowed(text);
    };
    // Every successful pass shrinks the string, so this terminates.
    while let Some(next) = decode_pass(&current) {
        current = next;
    }
    Cow::Owned(current)
}

/// Run one replacement pass. Returns `None` if no reference was decoded.
fn decode_pass(text: &str) -> Option<String> {
    let references: Vec<(Range<usize>, Option<u32>)> = REFERENCE_PATTERN
        .find_iter(text)
        .map(|m| (m.range(), code_unit(m.as_str())))
        .collect();

    let mut decoded = String::with_capacity(text.len());
    let mut decoded_any = false;
    let mut last = 0;
    let mut refs = references.iter().peekable();
    while let Some((range, unit)) = refs.next() {
        let Some(unit) = *unit else { continue };
        let found = match char::from_u32(unit) {
            Some(ch) => Some((ch, range.end)),
            None if HIGH_SURROGATES.contains(&unit) => refs
                .next_if(|(next, low)| {
                    next.start == range.end && low.is_some_and(|low| LOW_SURROGATES.contains(&low))
                })
                .and_then(|(next, low)| Some((combine_surrogates(unit, (*low)?)?, next.end))),
            None => None,
        };
        let Some((ch, end)) = found else { continue };
        decoded.push_str(&text[last..range.start]);
        decoded.push(ch);
        last = end;
        decoded_any = true;
    }

    if !decoded_any {
        return None;
    }
    decoded.push_str(&text[last..]);
    Some(decoded)
}

/// Code unit named by a single `&#xHHHH;` reference.
///
/// The reference is percent-encoded first so that `&`, `#` and `;` are literal
/// escapes, then exactly the four hex digits are pulled back out.
fn code_unit(reference: &str) -> Option<u32> {
    let encoded = utf8_percent_encode(reference, NON_ALPHANUMERIC).to_string();
    let caps = ENCODED_PATTERN.captures(&encoded)?;
    u32::from_str_radix(&caps[1], 16).ok()
}

fn combine_surrogates(high: u32, low: u32) -> Option<char> {
    char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
}
