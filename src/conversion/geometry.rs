//! COCO pixel boxes to YOLO label rows.
//!
//! A box with a negative top-left corner or a non-positive size is malformed
//! and dropped outright. A well-formed box that merely extends past the right
//! or bottom edge is clamped into the image and kept.

use tracing::debug;

use super::report::{ConversionStats, DropReason};
use crate::ir::io_yolo::{LabelLine, LabelSet};
use crate::ir::{Annotation, CocoIndex};

/// Class name used when an annotation's `category_id` is missing or unknown.
pub const DEFAULT_CLASS_NAME: &str = "license_plate";

/// Class index used when the resolved class name is not in the class map.
pub const FALLBACK_CLASS_INDEX: usize = 0;

/// A retained annotation, ready to be appended to its image's label file.
#[derive(Clone, Debug, PartialEq)]
pub struct Transformed<'a> {
    /// Label file stem of the image the box belongs to.
    pub stem: &'a str,
    pub line: LabelLine,
    /// True if any corner was moved to fit the image.
    pub clamped: bool,
}

/// Converts one annotation into a label row, or says why it was dropped.
pub fn transform_annotation<'a>(
    annotation: &Annotation,
    index: &CocoIndex<'a>,
    default_class: &str,
) -> Result<Transformed<'a>, DropReason> {
    let image = annotation
        .image_id
        .and_then(|id| index.image(id))
        .ok_or(DropReason::OrphanAnnotation)?;

    if !image.has_positive_size() {
        return Err(DropReason::InvalidImageSize);
    }
    let (width, height) = (image.width, image.height);

    let bbox = annotation.bbox_pixels().ok_or(DropReason::MalformedBbox)?;
    if bbox.width() <= 0.0 || bbox.height() <= 0.0 || bbox.xmin < 0.0 || bbox.ymin < 0.0 {
        return Err(DropReason::InvalidGeometry);
    }

    let clamped_bbox = bbox.clamp_to(width, height);
    if clamped_bbox.width() <= 0.0 || clamped_bbox.height() <= 0.0 {
        return Err(DropReason::ZeroAreaAfterClamp);
    }
    let clamped = clamped_bbox != bbox;

    let class_name = annotation
        .category_id
        .and_then(|id| index.category_name(id))
        .unwrap_or(default_class);
    let class_index = index
        .class_map()
        .index_of(class_name)
        .unwrap_or(FALLBACK_CLASS_INDEX);

    let stem = image.stem().ok_or(DropReason::MissingFileName)?;

    Ok(Transformed {
        stem,
        line: LabelLine::new(class_index, clamped_bbox.to_normalized_cxcywh(width, height)),
        clamped,
    })
}

/// Transforms every annotation in document order, grouping retained rows by
/// image stem and recording drops and clamps in `stats`.
pub fn transform_annotations(
    annotations: &[Annotation],
    index: &CocoIndex<'_>,
    default_class: &str,
    stats: &mut ConversionStats,
) -> LabelSet {
    let mut labels = LabelSet::new();

    for (position, annotation) in annotations.iter().enumerate() {
        match transform_annotation(annotation, index, default_class) {
            Ok(transformed) => {
                stats.record_box(transformed.clamped);
                labels.push(transformed.stem, transformed.line);
            }
            Err(reason) => {
                debug!(
                    position,
                    image_id = ?annotation.image_id,
                    %reason,
                    "dropped annotation"
                );
                stats.record_drop(reason);
            }
        }
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::io_coco_json::{from_coco_str, CocoDocument};
    use crate::ir::{Category, CategoryId, ImageRecord};

    fn document(annotations: Vec<Annotation>) -> CocoDocument {
        CocoDocument {
            images: vec![
                ImageRecord::new(1, "images/square.jpg", 100.0, 100.0),
                ImageRecord::new(2, "wide.png", 200.0, 100.0),
                ImageRecord::new(3, "broken.jpg", 0.0, 100.0),
                ImageRecord::new(4, "", 100.0, 100.0),
            ],
            categories: vec![Category::new(1, "plate"), Category::new(2, "car")],
            annotations,
        }
    }

    fn transform_one(annotation: Annotation) -> Result<(String, String, bool), DropReason> {
        let doc = document(vec![]);
        let index = CocoIndex::build(&doc);
        transform_annotation(&annotation, &index, DEFAULT_CLASS_NAME)
            .map(|t| (t.stem.to_string(), t.line.to_string(), t.clamped))
    }

    #[test]
    fn in_bounds_box_is_normalized() {
        let (stem, line, clamped) =
            transform_one(Annotation::new(1, 1, [10.0, 20.0, 30.0, 40.0])).unwrap();
        assert_eq!(stem, "square");
        assert_eq!(line, "1 0.250000 0.400000 0.300000 0.400000");
        assert!(!clamped);
    }

    #[test]
    fn overflowing_box_is_clamped() {
        let (_, line, clamped) =
            transform_one(Annotation::new(1, 2, [90.0, 90.0, 30.0, 30.0])).unwrap();
        assert_eq!(line, "0 0.950000 0.950000 0.100000 0.100000");
        assert!(clamped);
    }

    #[test]
    fn x_clamps_against_width_and_y_against_height() {
        let (_, line, clamped) =
            transform_one(Annotation::new(2, 2, [150.0, 50.0, 100.0, 100.0])).unwrap();
        // x: 150..200 of 200, y: 50..100 of 100
        assert_eq!(line, "0 0.875000 0.750000 0.250000 0.500000");
        assert!(clamped);
    }

    #[test]
    fn negative_origin_is_dropped_not_clamped() {
        assert_eq!(
            transform_one(Annotation::new(1, 1, [-5.0, 10.0, 20.0, 30.0])),
            Err(DropReason::InvalidGeometry)
        );
        assert_eq!(
            transform_one(Annotation::new(1, 1, [5.0, -0.5, 20.0, 30.0])),
            Err(DropReason::InvalidGeometry)
        );
    }

    #[test]
    fn non_positive_size_is_dropped() {
        assert_eq!(
            transform_one(Annotation::new(1, 1, [0.0, 0.0, 0.0, 5.0])),
            Err(DropReason::InvalidGeometry)
        );
        assert_eq!(
            transform_one(Annotation::new(1, 1, [0.0, 0.0, 5.0, -1.0])),
            Err(DropReason::InvalidGeometry)
        );
    }

    #[test]
    fn box_outside_image_has_zero_area_after_clamp() {
        assert_eq!(
            transform_one(Annotation::new(1, 1, [100.0, 10.0, 20.0, 20.0])),
            Err(DropReason::ZeroAreaAfterClamp)
        );
        assert_eq!(
            transform_one(Annotation::new(1, 1, [10.0, 150.0, 20.0, 20.0])),
            Err(DropReason::ZeroAreaAfterClamp)
        );
    }

    #[test]
    fn orphan_and_bad_image_annotations_are_dropped() {
        assert_eq!(
            transform_one(Annotation::new(99, 1, [0.0, 0.0, 5.0, 5.0])),
            Err(DropReason::OrphanAnnotation)
        );
        assert_eq!(
            transform_one(Annotation::default()),
            Err(DropReason::OrphanAnnotation)
        );
        assert_eq!(
            transform_one(Annotation::new(3, 1, [0.0, 0.0, 5.0, 5.0])),
            Err(DropReason::InvalidImageSize)
        );
        assert_eq!(
            transform_one(Annotation::new(4, 1, [0.0, 0.0, 5.0, 5.0])),
            Err(DropReason::MissingFileName)
        );
    }

    #[test]
    fn malformed_bbox_is_dropped() {
        let mut ann = Annotation::new(1, 1, [0.0, 0.0, 5.0, 5.0]);
        ann.bbox = Some(serde_json::json!([0, 0, 5]));
        assert_eq!(transform_one(ann.clone()), Err(DropReason::MalformedBbox));

        ann.bbox = None;
        assert_eq!(transform_one(ann), Err(DropReason::MalformedBbox));
    }

    #[test]
    fn unknown_category_falls_back_to_default_class() {
        let doc = from_coco_str(
            r#"{
                "images": [{"id": 1, "file_name": "a.jpg", "width": 10, "height": 10}],
                "categories": [
                    {"id": 0, "name": "plates"},
                    {"id": 1, "name": "license_plate"}
                ]
            }"#,
        )
        .unwrap();
        let index = CocoIndex::build(&doc);

        // Sorted names: license_plate=0, plates=1.
        let mut ann = Annotation::new(1, 0, [0.0, 0.0, 5.0, 5.0]);
        let t = transform_annotation(&ann, &index, DEFAULT_CLASS_NAME).unwrap();
        assert_eq!(t.line.class_index, 1);

        ann.category_id = None;
        let t = transform_annotation(&ann, &index, "plates").unwrap();
        assert_eq!(t.line.class_index, 1);

        ann.category_id = Some(CategoryId::new(42));
        let t = transform_annotation(&ann, &index, DEFAULT_CLASS_NAME).unwrap();
        assert_eq!(t.line.class_index, 0);

        let t = transform_annotation(&ann, &index, "not-a-class").unwrap();
        assert_eq!(t.line.class_index, FALLBACK_CLASS_INDEX);
    }

    #[test]
    fn mistyped_ids_drop_or_fall_back_instead_of_failing() {
        let doc = from_coco_str(
            r#"{
                "images": [{"id": 1, "file_name": "a.jpg", "width": 10, "height": 10}],
                "categories": [{"id": 1, "name": "car"}, {"id": 2, "name": "license_plate"}],
                "annotations": [
                    {"image_id": 1, "category_id": 1, "bbox": [0, 0, 5, 5]},
                    {"image_id": 1, "category_id": "1", "bbox": [0, 0, 5, 5]},
                    {"image_id": "1", "category_id": 1, "bbox": [0, 0, 5, 5]},
                    {"image_id": 1.0, "category_id": 1.0, "bbox": [0, 0, 5, 5]}
                ]
            }"#,
        )
        .expect("mistyped ids still parse");
        let index = CocoIndex::build(&doc);
        let transform =
            |i: usize| transform_annotation(&doc.annotations[i], &index, DEFAULT_CLASS_NAME);

        assert_eq!(transform(0).unwrap().line.class_index, 0);
        // "1" is not a category id, so the default class name applies.
        assert_eq!(transform(1).unwrap().line.class_index, 1);
        assert_eq!(transform(2), Err(DropReason::OrphanAnnotation));
        assert_eq!(transform(3).unwrap().line.class_index, 0);
    }

    #[test]
    fn image_without_file_name_drops_its_annotations() {
        let doc = from_coco_str(
            r#"{
                "images": [{"id": 1, "width": 10, "height": 10}],
                "annotations": [{"image_id": 1, "category_id": 1, "bbox": [0, 0, 5, 5]}]
            }"#,
        )
        .expect("missing file_name still parses");
        let index = CocoIndex::build(&doc);

        assert_eq!(
            transform_annotation(&doc.annotations[0], &index, DEFAULT_CLASS_NAME),
            Err(DropReason::MissingFileName)
        );
    }

    #[test]
    fn transform_annotations_accumulates_stats_and_rows() {
        let doc = document(vec![
            Annotation::new(1, 1, [10.0, 10.0, 10.0, 10.0]),
            Annotation::new(1, 2, [90.0, 90.0, 30.0, 30.0]),
            Annotation::new(1, 1, [-5.0, 10.0, 20.0, 30.0]),
            Annotation::new(2, 1, [0.0, 0.0, 200.0, 100.0]),
            Annotation::new(7, 1, [0.0, 0.0, 1.0, 1.0]),
        ]);
        let index = CocoIndex::build(&doc);
        let mut stats = ConversionStats::default();

        let labels =
            transform_annotations(&doc.annotations, &index, DEFAULT_CLASS_NAME, &mut stats);

        assert_eq!(stats.boxes, 3);
        assert_eq!(stats.dropped, 2);
        assert_eq!(stats.clamped, 1);
        assert_eq!(stats.drops.get(DropReason::InvalidGeometry), 1);
        assert_eq!(stats.drops.get(DropReason::OrphanAnnotation), 1);

        let square = labels.lines("square").expect("square rows");
        assert_eq!(square.len(), 2);
        assert_eq!(square[0].class_index, 1);
        assert_eq!(square[1].class_index, 0);
        assert_eq!(labels.lines("wide").map(<[_]>::len), Some(1));
    }
}
