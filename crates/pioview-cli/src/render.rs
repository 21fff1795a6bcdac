use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use pioview_build::EventSink;
use pioview_log::ir::{RenderEvent, Tag};
use std::io::{self, Write};

/// Normal text keeps the terminal's own foreground color.
fn tag_color(tag: Tag) -> Option<Color> {
    match tag {
        Tag::Normal => None,
        Tag::Warning => Some(Color::Yellow),
        Tag::Error => Some(Color::Red),
        Tag::HighlightGreen => Some(Color::Green),
        Tag::HighlightBlue => Some(Color::Cyan),
    }
}

/// Writes events to a terminal, colored by tag unless `color` is off.
pub struct TerminalSink<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for TerminalSink<W> {
    fn write_event(&mut self, event: &RenderEvent) -> io::Result<()> {
        match tag_color(event.tag).filter(|_| self.color) {
            Some(color) => queue!(
                self.out,
                SetForegroundColor(color),
                Print(&event.text),
                ResetColor
            ),
            None => self.out.write_all(event.text.as_bytes()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Sends every event to two sinks, e.g. the terminal and a saved transcript.
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: EventSink, B: EventSink> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: EventSink, B: EventSink> EventSink for Tee<A, B> {
    fn write_event(&mut self, event: &RenderEvent) -> io::Result<()> {
        self.first.write_event(event)?;
        self.second.write_event(event)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}
