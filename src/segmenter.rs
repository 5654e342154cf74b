use once_cell::sync::Lazy;
use regex::Regex;

// @module: Placeholder-aware value segmentation

// @const: Interpolation expressions (`${..}` / `%{..}`, up to two nested brace
// levels) and escaped newline sequences (`\n` / `\N`)
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([$%]\{(?:[^{}]|\{(?:[^{}]|\{[^{}]*\})*\})*\})|(\\[nN])").unwrap()
});

// @const: Dotted reference keys such as `Faction.Player.Name` or `i:Some.Key`
static REFERENCE_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(i:)?[A-Za-z0-9_.\-]+(\.[A-Za-z0-9_.\-]+)+$").unwrap()
});

/// A slice of a field value, tagged by whether it may be translated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Prose text, subject to translation
    Literal(String),
    /// An interpolation token or escape sequence, preserved verbatim
    Placeholder(String),
}

impl Segment {
    /// The underlying text of the segment
    pub fn text(&self) -> &str {
        match self {
            Segment::Literal(s) => s,
            Segment::Placeholder(s) => s,
        }
    }
}

/// Split a value into alternating literal and placeholder segments.
///
/// Leftmost non-overlapping placeholder matches become `Placeholder` segments,
/// emitted verbatim; the text around them becomes `Literal` segments. Adjacent
/// literals are coalesced and segments that are empty or all whitespace are
/// dropped. Concatenating the remaining segments in order reproduces the input
/// for any value without whitespace-only gaps between placeholders.
pub fn segment_value(value: &str) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut last_end = 0;

    let push_literal = |segments: &mut Vec<Segment>, text: &str| {
        if text.is_empty() || text.trim().is_empty() {
            return;
        }
        // Coalesce with a preceding literal so consecutive non-matches form one segment
        if let Some(Segment::Literal(prev)) = segments.last_mut() {
            prev.push_str(text);
        } else {
            segments.push(Segment::Literal(text.to_string()));
        }
    };

    for m in PLACEHOLDER_REGEX.find_iter(value) {
        if m.start() > last_end {
            push_literal(&mut segments, &value[last_end..m.start()]);
        }
        segments.push(Segment::Placeholder(m.as_str().to_string()));
        last_end = m.end();
    }

    if last_end < value.len() {
        push_literal(&mut segments, &value[last_end..]);
    }

    segments
}

/// Whether a value is a dotted reference key rather than prose.
///
/// Reference keys (one or more dot-separated word segments, optional `i:`
/// prefix) must never be sent to the translation backend; the caller is
/// expected to re-emit the original line unchanged.
pub fn is_reference_token(value: &str) -> bool {
    REFERENCE_TOKEN_REGEX.is_match(value)
}
