//! # pioview Log Highlighter
//!
//! Severity classification and status highlighting for PlatformIO build output.
//!
//! ## Overview
//!
//! PlatformIO (and the GCC toolchains it drives) prints diagnostics as loosely
//! structured, multi-line blocks with no terminating marker. This crate turns
//! that output into a stream of typed [`RenderEvent`](ir::RenderEvent)s that a
//! viewer can color:
//!
//! - **Line classification**: each line is `Standard`, `Warning` or `Error`,
//!   decided by a priority-ordered rule list plus a little carry-over state
//! - **Status highlighting**: standard lines are split around markers such as
//!   `Environment`, `[SUCCESS]` or `[FAILED]`
//! - **Progress lines**: carriage-return overwrites are split into separate lines
//!
//! ## Architecture
//!
//! ```text
//! line ──► classify(line, state) ──► Category ──► route() ──► Vec<RenderEvent>
//!               ▲          │                        │
//!               └─ state' ─┘          Standard ─► segment()
//! ```
//!
//! [`classify`](classifier::classify) is a pure function over
//! [`ClassifierState`](classifier::ClassifierState);
//! [`LineHighlighter`](highlighter::LineHighlighter) threads the state for callers
//! that just want events.
//!
//! ## Examples
//!
//! ```
//! use pioview_log::LineHighlighter;
//! use pioview_log::ir::Tag;
//!
//! let mut highlighter = LineHighlighter::new();
//! let (_, events) = highlighter.feed_line("src/main.cpp:3:1: warning: unused variable 'x'");
//! assert_eq!(events[0].tag, Tag::Warning);
//!
//! // The warning block stays open until a status line closes it.
//! let (_, events) = highlighter.feed_line("Building .pio/build/mega2560/firmware.hex");
//! assert_eq!(events[0].tag, Tag::Normal);
//!
//! let (_, events) = highlighter.feed_line("[SUCCESS] Took 4.20 seconds");
//! assert_eq!(events[1].text, "SUCCESS");
//! assert_eq!(events[1].tag, Tag::HighlightGreen);
//! ```
//!
//! ### Exporting to JSON
//!
//! ```no_run
//! use pioview_log::LineHighlighter;
//! use std::fs;
//!
//! let log = fs::read_to_string("build.log")?;
//! let events = LineHighlighter::new().highlight(&log);
//! fs::write("events.json", serde_json::to_string_pretty(&events)?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Line severity rules and their carry-over state.
pub mod classifier;
/// Marker-based segmentation of standard lines.
pub mod highlight;
/// Stateful classify-then-route driver.
pub mod highlighter;
/// Render event types.
pub mod ir;


pub use classifier::{ClassifierState, classify};
pub use highlight::{HIGHLIGHT_RULES, segment};
pub use highlighter::{LineHighlighter, route};
pub use ir::{Category, RenderEvent, Tag};
