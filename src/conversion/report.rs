//! Per-split conversion statistics and outcomes.
//!
//! Everything here is serializable so the CLI can emit either the one-line
//! text summaries or a JSON array for scripting.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::ir::ImageId;

/// Why an annotation did not become a label row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// `image_id` is missing or does not name an image record.
    OrphanAnnotation,
    /// The referenced image has a width or height `<= 0`.
    InvalidImageSize,
    /// `bbox` is absent, not 4 entries long, or not all numbers.
    MalformedBbox,
    /// Non-positive width/height or a negative top-left corner.
    InvalidGeometry,
    /// The box lies entirely outside the image once clamped.
    ZeroAreaAfterClamp,
    /// The image file name has no usable stem to name a label file after.
    MissingFileName,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::OrphanAnnotation => "orphan annotation",
            DropReason::InvalidImageSize => "invalid image size",
            DropReason::MalformedBbox => "malformed bbox",
            DropReason::InvalidGeometry => "invalid geometry",
            DropReason::ZeroAreaAfterClamp => "zero area after clamp",
            DropReason::MissingFileName => "missing file name",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drop counts broken down by [`DropReason`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DropCounts {
    pub orphan_annotation: usize,
    pub invalid_image_size: usize,
    pub malformed_bbox: usize,
    pub invalid_geometry: usize,
    pub zero_area_after_clamp: usize,
    pub missing_file_name: usize,
}

impl DropCounts {
    fn slot(&mut self, reason: DropReason) -> &mut usize {
        match reason {
            DropReason::OrphanAnnotation => &mut self.orphan_annotation,
            DropReason::InvalidImageSize => &mut self.invalid_image_size,
            DropReason::MalformedBbox => &mut self.malformed_bbox,
            DropReason::InvalidGeometry => &mut self.invalid_geometry,
            DropReason::ZeroAreaAfterClamp => &mut self.zero_area_after_clamp,
            DropReason::MissingFileName => &mut self.missing_file_name,
        }
    }

    pub fn get(&self, reason: DropReason) -> usize {
        match reason {
            DropReason::OrphanAnnotation => self.orphan_annotation,
            DropReason::InvalidImageSize => self.invalid_image_size,
            DropReason::MalformedBbox => self.malformed_bbox,
            DropReason::InvalidGeometry => self.invalid_geometry,
            DropReason::ZeroAreaAfterClamp => self.zero_area_after_clamp,
            DropReason::MissingFileName => self.missing_file_name,
        }
    }
}

/// Counters accumulated while converting one split.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    /// Label files written.
    pub written: usize,
    /// Rows retained across all label files.
    pub boxes: usize,
    /// Annotations dropped for any reason.
    pub dropped: usize,
    /// Retained annotations whose box had to be clamped into the image.
    pub clamped: usize,
    pub drops: DropCounts,
}

impl ConversionStats {
    pub fn record_drop(&mut self, reason: DropReason) {
        self.dropped += 1;
        *self.drops.slot(reason) += 1;
    }

    pub fn record_box(&mut self, clamped: bool) {
        self.boxes += 1;
        if clamped {
            self.clamped += 1;
        }
    }
}

/// Result of a successfully converted split.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SplitReport {
    pub labels_dir: PathBuf,
    #[serde(flatten)]
    pub stats: ConversionStats,
    /// Loose images moved into `images/` by the layout step.
    pub images_moved: usize,
    /// Whether a stale `labels.cache` was deleted.
    pub cache_removed: bool,
    pub duplicate_image_ids: Vec<ImageId>,
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "labels={} boxes={} dropped={} clamped={} -> {}",
            self.stats.written,
            self.stats.boxes,
            self.stats.dropped,
            self.stats.clamped,
            self.labels_dir.display()
        )
    }
}

/// Why a split was skipped without converting anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    MissingAnnotations { path: PathBuf },
    MissingImagesDir { path: PathBuf },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingAnnotations { path } => write!(f, "missing {}", path.display()),
            SkipReason::MissingImagesDir { path } => {
                write!(f, "no images folder at {}", path.display())
            }
        }
    }
}

/// The non-error outcomes of converting a split.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitOutcome {
    Converted(SplitReport),
    Skipped(SkipReason),
}

/// How one requested split ended, including failures.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SplitStatus {
    Converted(SplitReport),
    Skipped { reason: SkipReason },
    Failed { error: String },
}

/// Outcome of one requested split, as printed by the CLI.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SplitSummary {
    pub split: String,
    #[serde(flatten)]
    pub status: SplitStatus,
}

impl SplitSummary {
    pub fn is_converted(&self) -> bool {
        matches!(self.status, SplitStatus::Converted(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, SplitStatus::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SplitStatus::Failed { .. })
    }
}

impl fmt::Display for SplitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            SplitStatus::Converted(report) => write!(f, "[OK] {}: {}", self.split, report),
            SplitStatus::Skipped { reason } => write!(f, "[SKIP] {}: {}", self.split, reason),
            SplitStatus::Failed { error } => write!(f, "[FAIL] {}: {}", self.split, error),
        }
    }
}
