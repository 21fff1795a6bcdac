//! Splits standard lines into colored spans around PlatformIO status markers.
//!
//! The first marker found in the line decides how it is sliced. A `Prefix`
//! marker gets one look-ahead for a bracketed status further along the line;
//! there is no general multi-marker parsing.

use crate::ir::{HighlightRule, MarkerKind, RenderEvent, Tag};

/// Markers in lookup order. Order also breaks ties between markers found at
/// the same position.
pub static HIGHLIGHT_RULES: &[HighlightRule] = &[
    HighlightRule {
        marker: "Environment",
        kind: MarkerKind::Prefix,
        tag: Tag::HighlightBlue,
    },
    HighlightRule {
        marker: "[SKIP]",
        kind: MarkerKind::Bracketed,
        tag: Tag::Warning,
    },
    HighlightRule {
        marker: "[IGNORED]",
        kind: MarkerKind::Bracketed,
        tag: Tag::Warning,
    },
    HighlightRule {
        marker: "[ERROR]",
        kind: MarkerKind::Bracketed,
        tag: Tag::Error,
    },
    HighlightRule {
        marker: "[FAILED]",
        kind: MarkerKind::Bracketed,
        tag: Tag::Error,
    },
    HighlightRule {
        marker: "[SUCCESS]",
        kind: MarkerKind::Bracketed,
        tag: Tag::HighlightGreen,
    },
];

/// Segments a line that was classified as standard output.
///
/// The returned events concatenate to `line` followed by padding: one newline
/// for plain and prefix-marked lines, two for bracketed status lines. Lines
/// without markers that contain carriage returns are split into one event per
/// overwritten progress segment.
pub fn segment(line: &str) -> Vec<RenderEvent> {
    let mut events = Vec::new();
    match find_first_marker(line) {
        None => split_progress(line, &mut events),
        Some((start, rule)) => match rule.kind {
            MarkerKind::Prefix => segment_prefix(line, start, rule, &mut events),
            MarkerKind::Bracketed => segment_bracketed(line, start, rule, &mut events),
        },
    }
    events
}

/// Earliest marker in `line`; on equal positions the table order wins.
fn find_first_marker(line: &str) -> Option<(usize, &'static HighlightRule)> {
    HIGHLIGHT_RULES
        .iter()
        .filter_map(|rule| line.find(rule.marker).map(|pos| (pos, rule)))
        .min_by_key(|(pos, _)| *pos)
}

fn find_whitespace(text: &str, from: usize) -> Option<usize> {
    text[from..].find([' ', '\t']).map(|idx| from + idx)
}

fn split_progress(line: &str, events: &mut Vec<RenderEvent>) {
    if line.starts_with('\r') || line.ends_with('\r') {
        // mid-progress fragment, keep it whole
        events.push(RenderEvent::normal(format!("{line}\n")));
        return;
    }
    if line.is_empty() {
        events.push(RenderEvent::normal("\n"));
        return;
    }
    for part in line.split('\r').filter(|part| !part.is_empty()) {
        events.push(RenderEvent::normal(format!("{part}\n")));
    }
}

fn segment_prefix(
    line: &str,
    start: usize,
    rule: &HighlightRule,
    events: &mut Vec<RenderEvent>,
) {
    // The token is the first run of non-blank text after the marker's whitespace.
    let token_start = find_whitespace(line, start + rule.marker.len()).and_then(|gap| {
        line[gap..]
            .find(|c: char| c != ' ' && c != '\t')
            .map(|idx| gap + idx)
    });
    let Some(token_start) = token_start else {
        log::debug!("no token after {:?} marker, emitting line as plain text", rule.marker);
        events.push(RenderEvent::normal(format!("{line}\n")));
        return;
    };
    // Space and tab are single bytes.
    let token_end = find_whitespace(line, token_start).map_or(line.len(), |ws| ws + 1);

    events.push(RenderEvent::normal(&line[..token_start]));
    events.push(RenderEvent::new(&line[token_start..token_end], rule.tag));

    let rest = &line[token_end..];
    let second = HIGHLIGHT_RULES
        .iter()
        .find(|candidate| candidate.marker != rule.marker)
        .filter(|candidate| candidate.kind == MarkerKind::Bracketed);
    if let Some(second) = second {
        if let Some(pos) = rest.find(second.marker) {
            let open = pos + 1;
            if let Some(close) = rest[open..].find(']').map(|idx| open + idx) {
                events.push(RenderEvent::normal(&rest[..open]));
                events.push(RenderEvent::new(&rest[open..close], second.tag));
                events.push(RenderEvent::normal(format!("{}\n", &rest[close..])));
                return;
            }
        }
    }
    events.push(RenderEvent::normal(format!("{rest}\n")));
}

fn segment_bracketed(
    line: &str,
    start: usize,
    rule: &HighlightRule,
    events: &mut Vec<RenderEvent>,
) {
    let open = start + 1;
    let Some(close) = line[open..].find(']').map(|idx| open + idx) else {
        log::debug!("unterminated {:?} marker, emitting line as plain text", rule.marker);
        events.push(RenderEvent::normal(format!("{line}\n")));
        return;
    };
    events.push(RenderEvent::normal(&line[..open]));
    events.push(RenderEvent::new(&line[open..close], rule.tag));
    events.push(RenderEvent::normal(format!("{}\n\n", &line[close..])));
}
