#![no_main]
use libfuzzer_sys::fuzz_target;
use pioview_log::{LineHighlighter, segment};

fuzz_target!(|data: &[u8]| {
    // Tool output is not guaranteed to be UTF-8; lossy keeps near-text inputs.
    let s = String::from_utf8_lossy(data);

    let _ = LineHighlighter::default().highlight(&s);

    for line in s.split('\n') {
        let text: String = segment(line).into_iter().map(|e| e.text).collect();
        assert_eq!(text.replace(['\r', '\n'], ""), line.replace('\r', ""));
    }
});
