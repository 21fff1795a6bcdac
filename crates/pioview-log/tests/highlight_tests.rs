use pioview_log::ir::{RenderEvent, Tag};
use pioview_log::segment;

fn texts(events: &[RenderEvent]) -> String {
    events.iter().map(|e| e.text.as_str()).collect()
}

#[test]
fn test_plain_line_round_trip() {
    let line = "Checking size .pio/build/mega2560/firmware.elf";
    let events = segment(line);
    assert_eq!(events, vec![RenderEvent::normal(format!("{line}\n"))]);
}

#[test]
fn test_empty_line_keeps_blank_row() {
    assert_eq!(segment(""), vec![RenderEvent::normal("\n")]);
}

#[test]
fn test_carriage_return_progress_is_split() {
    let events = segment("progress 10%\rprogress 50%\rprogress 100%");
    assert_eq!(
        events,
        vec![
            RenderEvent::normal("progress 10%\n"),
            RenderEvent::normal("progress 50%\n"),
            RenderEvent::normal("progress 100%\n"),
        ]
    );
}

#[test]
fn test_repeated_carriage_returns_emit_no_empty_events() {
    let events = segment("a\r\r\rb");
    assert_eq!(
        events,
        vec![RenderEvent::normal("a\n"), RenderEvent::normal("b\n")]
    );
}

#[test]
fn test_leading_or_trailing_carriage_return_kept_verbatim() {
    assert_eq!(
        segment("\rUploading 45%"),
        vec![RenderEvent::normal("\rUploading 45%\n")]
    );
    assert_eq!(
        segment("Writing | 10%\rWriting | 20%\r"),
        vec![RenderEvent::normal("Writing | 10%\rWriting | 20%\r\n")]
    );
}

#[test]
fn test_success_marker() {
    let events = segment("[SUCCESS] Took 4.20 seconds");
    assert_eq!(
        events,
        vec![
            RenderEvent::normal("["),
            RenderEvent::new("SUCCESS", Tag::HighlightGreen),
            RenderEvent::normal("] Took 4.20 seconds\n\n"),
        ]
    );
}

#[test]
fn test_failed_marker_inside_banner() {
    let line = "========== [FAILED] Took 1.35 seconds ==========";
    let events = segment(line);
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], RenderEvent::normal("========== ["));
    assert_eq!(events[1], RenderEvent::new("FAILED", Tag::Error));
    assert_eq!(events[2].tag, Tag::Normal);
    assert_eq!(texts(&events), format!("{line}\n\n"));
}

#[test]
fn test_bracketed_marker_tags() {
    for (line, word, tag) in [
        ("[SKIP] uno", "SKIP", Tag::Warning),
        ("[IGNORED] due", "IGNORED", Tag::Warning),
        ("[ERROR] mega", "ERROR", Tag::Error),
        ("[FAILED] teensy", "FAILED", Tag::Error),
    ] {
        let events = segment(line);
        assert_eq!(events[1], RenderEvent::new(word, tag), "line {line:?}");
    }
}

#[test]
fn test_environment_with_skip_status() {
    let events = segment("Environment mega2560 [SKIP]  Took");
    assert_eq!(
        events,
        vec![
            RenderEvent::normal("Environment "),
            RenderEvent::new("mega2560 ", Tag::HighlightBlue),
            RenderEvent::normal("["),
            RenderEvent::new("SKIP", Tag::Warning),
            RenderEvent::normal("]  Took\n"),
        ]
    );
}

#[test]
fn test_environment_with_tab_separator() {
    let events = segment("Environment\tLPC1768\t[SKIP]");
    assert_eq!(events[0], RenderEvent::normal("Environment\t"));
    assert_eq!(events[1], RenderEvent::new("LPC1768\t", Tag::HighlightBlue));
    assert_eq!(events[3], RenderEvent::new("SKIP", Tag::Warning));
    assert_eq!(texts(&events), "Environment\tLPC1768\t[SKIP]\n");
}

#[test]
fn test_environment_only_looks_ahead_for_first_status() {
    // Only the first other table entry is checked after a prefix marker.
    let events = segment("Environment uno [SUCCESS]");
    assert_eq!(
        events,
        vec![
            RenderEvent::normal("Environment "),
            RenderEvent::new("uno ", Tag::HighlightBlue),
            RenderEvent::normal("[SUCCESS]\n"),
        ]
    );
}

#[test]
fn test_environment_token_runs_to_end_of_line() {
    let events = segment("Environment mega2560");
    assert_eq!(
        events,
        vec![
            RenderEvent::normal("Environment "),
            RenderEvent::new("mega2560", Tag::HighlightBlue),
            RenderEvent::normal("\n"),
        ]
    );
}

#[test]
fn test_environment_without_token_degrades_to_plain() {
    assert_eq!(
        segment("Environment"),
        vec![RenderEvent::normal("Environment\n")]
    );
}

#[test]
fn test_environment_skips_whitespace_run_before_token() {
    let events = segment("Environment    Status    Duration");
    assert_eq!(
        events,
        vec![
            RenderEvent::normal("Environment    "),
            RenderEvent::new("Status ", Tag::HighlightBlue),
            RenderEvent::normal("   Duration\n"),
        ]
    );
}

#[test]
fn test_environment_with_only_trailing_whitespace() {
    for line in ["Environment ", "Environment \t  "] {
        let events = segment(line);
        assert_eq!(events, vec![RenderEvent::normal(format!("{line}\n"))]);
        assert!(events.iter().all(|e| !e.text.is_empty()));
    }
}

#[test]
fn test_marker_after_multibyte_text() {
    let line = "Größe → [SUCCESS] fertig";
    let events = segment(line);
    assert_eq!(events[1], RenderEvent::new("SUCCESS", Tag::HighlightGreen));
    assert_eq!(texts(&events), format!("{line}\n\n"));
}

#[test]
fn test_carriage_returns_ignored_when_marker_present() {
    let events = segment("Uploading\r[SUCCESS] done");
    assert_eq!(events[0], RenderEvent::normal("Uploading\r["));
}
