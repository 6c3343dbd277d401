//! Fuzz target for reading back single label rows.

#![no_main]

use coco2yolo::ir::io_yolo::parse_label_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(Some(parsed)) = parse_label_line(line) {
        let rendered = parsed.to_string();
        let _ = parse_label_line(&rendered);
    }
});
