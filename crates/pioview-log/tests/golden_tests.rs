use pioview_log::LineHighlighter;
use pioview_log::ir::RenderEvent;
use std::fs;
use std::path::Path;

#[test]
fn run_golden_tests() {
    let fixtures_dir = Path::new("tests/fixtures");
    if !fixtures_dir.exists() {
        return;
    }

    for entry in fs::read_dir(fixtures_dir).unwrap() {
        let path = entry.unwrap().path();

        if path.extension().is_some_and(|ext| ext == "log") {
            let log_content = fs::read_to_string(&path).expect("Failed to read log");
            let events = LineHighlighter::new().highlight(&log_content);

            let golden_path = path.with_extension("golden.json");

            if std::env::var("UPDATE_GOLDEN").is_ok() {
                let json_output =
                    serde_json::to_string_pretty(&events).expect("Failed to serialize events");
                fs::write(&golden_path, &json_output).expect("Failed to update golden file");
            } else {
                let expected = fs::read_to_string(&golden_path)
                    .expect("Failed to read golden file (run with UPDATE_GOLDEN=1 to create)");
                let expected: Vec<RenderEvent> =
                    serde_json::from_str(&expected).expect("Golden file is not an event list");
                assert_eq!(events, expected, "Golden test failed for {:?}", path);
            }
        }
    }
}

#[test]
fn test_golden_transcript_is_lossless() {
    let log = include_str!("fixtures/platformio_build.log");
    let events = LineHighlighter::new().highlight(log);
    let rendered: String = events.iter().map(|e| e.text.as_str()).collect();

    // Padding and progress splitting only ever add newlines.
    let squash = |s: &str| s.replace(['\n', '\r'], "");
    assert_eq!(squash(&rendered), squash(log));
}
