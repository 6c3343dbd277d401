#![allow(dead_code)]

use coco2yolo::ir::io_coco_json::CocoDocument;
use coco2yolo::ir::{Annotation, Category, ImageRecord};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Slack for float comparisons against the unit interval.
pub const EPS_NORMALIZED: f64 = 1e-9;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Image sizes in whole pixels, as COCO exporters write them.
pub fn arb_image_size() -> impl Strategy<Value = (f64, f64)> {
    (1u32..=4096, 1u32..=4096).prop_map(|(w, h)| (f64::from(w), f64::from(h)))
}

/// Any `[x, y, w, h]`, including negative origins, degenerate sizes and boxes
/// that run past the image.
pub fn arb_bbox_xywh() -> impl Strategy<Value = [f64; 4]> {
    (
        -100.0f64..5000.0,
        -100.0f64..5000.0,
        -10.0f64..5000.0,
        -10.0f64..5000.0,
    )
        .prop_map(|(x, y, w, h)| [x, y, w, h])
}

/// A box whose origin lies inside a `width` x `height` image.
pub fn arb_bbox_inside(width: f64, height: f64) -> impl Strategy<Value = [f64; 4]> {
    (
        0.0..width,
        0.0..height,
        0.5f64..(width * 2.0),
        0.5f64..(height * 2.0),
    )
        .prop_map(|(x, y, w, h)| [x, y, w, h])
}

pub fn arb_class_names(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z_]{1,12}", 1..=max)
}

/// One image, one category, one annotation.
pub fn single_box_document(width: f64, height: f64, bbox: [f64; 4]) -> CocoDocument {
    CocoDocument {
        images: vec![ImageRecord::new(1, "frame_0001.jpg", width, height)],
        categories: vec![Category::new(1, "plate")],
        annotations: vec![Annotation::new(1, 1, bbox)],
    }
}
