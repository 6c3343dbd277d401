//! The per-split COCO → YOLO pipeline.
//!
//! For each split directory:
//!
//! 1. check the annotation document exists (otherwise skip the split),
//! 2. move loose images into `images/` ([`crate::layout`]),
//! 3. parse the document and index it ([`crate::ir::CocoIndex`]),
//! 4. turn annotations into label rows ([`geometry`]),
//! 5. write `labels/*.txt` and delete the stale `labels.cache`
//!    ([`crate::ir::io_yolo`]).
//!
//! Splits share no state. An error aborts only the split it happened in.

pub mod geometry;
pub mod report;

pub use geometry::{
    transform_annotation, transform_annotations, Transformed, DEFAULT_CLASS_NAME,
    FALLBACK_CLASS_INDEX,
};
pub use report::{
    ConversionStats, DropCounts, DropReason, SkipReason, SplitOutcome, SplitReport, SplitStatus,
    SplitSummary,
};

use std::path::Path;

use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::error::ConvertError;
use crate::ir::io_coco_json::{read_coco_json, DEFAULT_ANNOTATIONS_FILE};
use crate::ir::io_yolo::{remove_stale_cache, write_label_files, LABELS_DIR};
use crate::ir::CocoIndex;
use crate::layout::ensure_images_dir;

/// Splits converted when none are requested explicitly.
pub const DEFAULT_SPLITS: [&str; 3] = ["train", "valid", "test"];

/// Settings shared by every split of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// File name of the COCO document inside each split directory.
    pub annotations_file: String,
    /// Class name for annotations whose category is missing or unknown.
    pub default_class: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            annotations_file: DEFAULT_ANNOTATIONS_FILE.to_string(),
            default_class: DEFAULT_CLASS_NAME.to_string(),
        }
    }
}

/// Converts `<root>/<split>`.
///
/// Returns `Ok(SplitOutcome::Skipped(..))` when there is nothing to convert
/// and `Err` when a file operation or the document parse failed.
pub fn convert_split(
    root: &Path,
    split: &str,
    opts: &ConvertOptions,
) -> Result<SplitOutcome, ConvertError> {
    let split_dir = root.join(split);
    let annotations_path = split_dir.join(&opts.annotations_file);
    if !annotations_path.is_file() {
        warn!(
            split,
            path = %annotations_path.display(),
            "annotation file not found; skipping split"
        );
        return Ok(SplitOutcome::Skipped(SkipReason::MissingAnnotations {
            path: annotations_path,
        }));
    }

    let layout = ensure_images_dir(&split_dir)?;
    if !layout.images_dir.is_dir() {
        warn!(
            split,
            path = %layout.images_dir.display(),
            "images folder missing; skipping split"
        );
        return Ok(SplitOutcome::Skipped(SkipReason::MissingImagesDir {
            path: layout.images_dir,
        }));
    }

    let document = read_coco_json(&annotations_path)?;
    let index = CocoIndex::build(&document);
    info!(
        split,
        images = document.images.len(),
        annotations = document.annotations.len(),
        classes = index.class_map().len(),
        "parsed annotations"
    );

    let mut stats = ConversionStats::default();
    let labels = transform_annotations(
        &document.annotations,
        &index,
        &opts.default_class,
        &mut stats,
    );
    if labels.is_empty() && !document.annotations.is_empty() {
        warn!(split, dropped = stats.dropped, "every annotation was dropped");
    }

    let labels_dir = split_dir.join(LABELS_DIR);
    stats.written = write_label_files(&labels_dir, &labels)?;
    let cache_removed = remove_stale_cache(&split_dir)?;

    Ok(SplitOutcome::Converted(SplitReport {
        labels_dir,
        stats,
        images_moved: layout.moved,
        cache_removed,
        duplicate_image_ids: index.duplicate_image_ids().to_vec(),
    }))
}

/// Converts one split and folds any error into the summary.
pub fn summarize_split(root: &Path, split: &str, opts: &ConvertOptions) -> SplitSummary {
    let status = match convert_split(root, split, opts) {
        Ok(SplitOutcome::Converted(report)) => SplitStatus::Converted(report),
        Ok(SplitOutcome::Skipped(reason)) => SplitStatus::Skipped { reason },
        Err(err) => {
            error!(split, error = %err, "split failed");
            SplitStatus::Failed {
                error: err.to_string(),
            }
        }
    };

    SplitSummary {
        split: split.to_string(),
        status,
    }
}

/// Converts every split, returning summaries in the order requested.
///
/// With `parallel` the splits run on the rayon thread pool; they touch
/// disjoint directories so no coordination is needed.
pub fn convert_splits<S>(
    root: &Path,
    splits: &[S],
    opts: &ConvertOptions,
    parallel: bool,
) -> Vec<SplitSummary>
where
    S: AsRef<str> + Sync,
{
    if parallel {
        splits
            .par_iter()
            .map(|split| summarize_split(root, split.as_ref(), opts))
            .collect()
    } else {
        splits
            .iter()
            .map(|split| summarize_split(root, split.as_ref(), opts))
            .collect()
    }
}
