use crate::classifier::ClassifierState;
use crate::highlight::segment;
use crate::ir::{Category, RenderEvent, Tag};

/// Turns a classified line into the events a viewer should display.
///
/// Standard lines go through [`segment`]; warnings and errors become a single
/// event colored by their severity.
pub fn route(line: &str, category: Category) -> Vec<RenderEvent> {
    match category {
        Category::Standard => segment(line),
        Category::Warning | Category::Error => {
            vec![RenderEvent::new(format!("{line}\n"), Tag::from(category))]
        }
    }
}

/// Classifies and highlights build output one line at a time.
///
/// `LineHighlighter` keeps the classifier state between calls, so it must be fed
/// the lines of a single build in order.
#[derive(Debug, Default)]
pub struct LineHighlighter {
    state: ClassifierState,
    lines: usize,
}

impl LineHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one line (without its trailing newline).
    pub fn feed_line(&mut self, line: &str) -> (Category, Vec<RenderEvent>) {
        self.lines += 1;
        let category = self.state.advance(line);
        (category, route(line, category))
    }

    /// Highlights a whole transcript, such as a saved build log.
    ///
    /// Lines are split on `\n` only; a `\r` before the newline stays part of
    /// the line, the same way the live stream treats it.
    pub fn highlight(mut self, text: &str) -> Vec<RenderEvent> {
        if text.is_empty() {
            return Vec::new();
        }
        let body = text.strip_suffix('\n').unwrap_or(text);
        body.split('\n')
            .flat_map(|line| self.feed_line(line).1)
            .collect()
    }

    pub fn lines_seen(&self) -> usize {
        self.lines
    }
}
