//! Feeds arbitrary bytes to the COCO document parser and, when a document
//! parses, through indexing and box conversion.
//!
//! Run with:
//!   cargo +nightly fuzz run coco_json_parse

#![no_main]

use coco2yolo::conversion::{transform_annotations, ConversionStats, DEFAULT_CLASS_NAME};
use coco2yolo::ir::io_coco_json::from_coco_slice;
use coco2yolo::ir::CocoIndex;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(document) = from_coco_slice(data) else {
        return;
    };

    let index = CocoIndex::build(&document);
    let mut stats = ConversionStats::default();
    let labels = transform_annotations(
        &document.annotations,
        &index,
        DEFAULT_CLASS_NAME,
        &mut stats,
    );

    assert_eq!(stats.boxes + stats.dropped, document.annotations.len());
    assert_eq!(labels.line_count(), stats.boxes);
});
