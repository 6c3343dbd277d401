#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use coco2yolo::ir::io_yolo::{parse_label_line, LabelLine};

/// Creates `<root>/<split>/` with the given COCO document and returns the
/// split directory.
pub fn write_split(root: &Path, split: &str, coco_json: &str) -> PathBuf {
    let split_dir = root.join(split);
    fs::create_dir_all(&split_dir).expect("create split dir");
    fs::write(split_dir.join("annotations.coco.json"), coco_json).expect("write annotations");
    split_dir
}

/// Writes placeholder image files; pixel content is never read.
pub fn touch_images(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).expect("create image dir");
    for name in names {
        fs::write(dir.join(name), b"\xff\xd8\xff").expect("write image");
    }
}

pub fn read_label_rows(path: &Path) -> Vec<LabelLine> {
    let content = fs::read_to_string(path).expect("read label file");
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            parse_label_line(line)
                .unwrap_or_else(|err| panic!("{}:{}: {err}", path.display(), idx + 1))
        })
        .collect()
}

/// Maps label file name → raw bytes for every file in `labels_dir`.
pub fn snapshot_labels(labels_dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<(String, Vec<u8>)> = fs::read_dir(labels_dir)
        .expect("list labels dir")
        .map(|entry| {
            let entry = entry.expect("dir entry");
            (
                entry.file_name().to_string_lossy().into_owned(),
                fs::read(entry.path()).expect("read label file"),
            )
        })
        .collect();
    files.sort();
    files
}

/// The plate dataset used across integration tests: two 100x100 images and
/// one 200x100 image, categories listed in non-alphabetical order.
pub const PLATES_JSON: &str = r#"{
    "images": [
        {"id": 1, "file_name": "car_001.jpg", "width": 100, "height": 100},
        {"id": 2, "file_name": "car_002.jpg", "width": 100, "height": 100},
        {"id": 3, "file_name": "sub/car_003.PNG", "width": 200, "height": 100},
        {"id": 4, "file_name": "empty.jpg", "width": 100, "height": 100}
    ],
    "categories": [
        {"id": 5, "name": "plate"},
        {"id": 9, "name": "car"}
    ],
    "annotations": [
        {"id": 1, "image_id": 1, "category_id": 5, "bbox": [10, 20, 30, 40]},
        {"id": 2, "image_id": 1, "category_id": 9, "bbox": [90, 90, 30, 30]},
        {"id": 3, "image_id": 2, "category_id": 5, "bbox": [-5, 10, 20, 30]},
        {"id": 4, "image_id": 2, "category_id": 5, "bbox": [0, 0, 0, 5]},
        {"id": 5, "image_id": 3, "category_id": 9, "bbox": [0, 0, 100, 50]},
        {"id": 6, "image_id": 42, "category_id": 5, "bbox": [0, 0, 10, 10]},
        {"id": 7, "image_id": 4, "category_id": 5, "bbox": [120, 0, 10, 10]},
        {"id": 8, "image_id": 3, "category_id": 77, "bbox": [0, 0, 10, 10]}
    ]
}"#;
