use crate::queue::EventSender;
use pioview_log::{Category, LineHighlighter};
use serde::Serialize;
use std::io::BufRead;
use thiserror::Error;

/// Failures that end a pump run. Classification itself never fails.
#[derive(Debug, Error)]
pub enum PumpError {
    #[error("build output line {line} is not valid UTF-8")]
    Decode {
        line: usize,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("failed to read build output")]
    Io(#[from] std::io::Error),
}

/// Line counts for one finished pump run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PumpReport {
    pub lines: usize,
    pub standard: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl PumpReport {
    fn record(&mut self, category: Category) {
        self.lines += 1;
        match category {
            Category::Standard => self.standard += 1,
            Category::Warning => self.warnings += 1,
            Category::Error => self.errors += 1,
        }
    }
}

/// Drives raw build output through the highlighter and into the render queue.
///
/// The pump owns the classifier state for the whole run; it is consumed by
/// [`run`](Self::run), which returns once the stream reaches end of file.
pub struct StreamPump<R> {
    reader: R,
    highlighter: LineHighlighter,
    sender: EventSender,
    report: PumpReport,
}

impl<R: BufRead> StreamPump<R> {
    pub fn new(reader: R, sender: EventSender) -> Self {
        Self {
            reader,
            highlighter: LineHighlighter::new(),
            sender,
            report: PumpReport::default(),
        }
    }

    /// Reads until end of stream, pushing events for every line.
    ///
    /// # Errors
    ///
    /// Stops at the first line that is not valid UTF-8, or at the first read
    /// error. Events for earlier lines have already been pushed.
    pub fn run(mut self) -> Result<PumpReport, PumpError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if self.reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            // Only the newline is stripped; a preceding '\r' stays in the line.
            if buf.last() == Some(&b'\n') {
                buf.pop();
            }
            let line = String::from_utf8(std::mem::take(&mut buf)).map_err(|source| {
                PumpError::Decode {
                    line: self.report.lines + 1,
                    source,
                }
            })?;
            self.process_line(&line);
            buf = line.into_bytes();
        }
        log::debug!(
            "build output closed after {} lines ({} warnings, {} errors)",
            self.report.lines,
            self.report.warnings,
            self.report.errors
        );
        Ok(self.report)
    }

    /// Classifies one decoded line and enqueues its events.
    pub fn process_line(&mut self, line: &str) -> Category {
        let (category, events) = self.highlighter.feed_line(line);
        self.report.record(category);
        self.sender.push_all(events);
        category
    }
}
