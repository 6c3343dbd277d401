//! Records read from a COCO annotation document.
//!
//! Fields the converter can survive without are `Option`s or defaulted, so a
//! single bad annotation becomes a counted drop instead of a parse failure
//! for the whole split.

use serde::Deserialize;

use super::ids::lenient_id;
use super::{BBoxXYXY, CategoryId, ImageId, Pixel};

/// An entry of the COCO `images` array.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ImageRecord {
    pub id: ImageId,

    /// Missing names read as empty; annotations on the image are then dropped.
    #[serde(default)]
    pub file_name: String,

    /// Missing dimensions read as `0.0` and make the image unusable.
    #[serde(default)]
    pub width: f64,

    #[serde(default)]
    pub height: f64,
}

impl ImageRecord {
    pub fn new(id: i64, file_name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: ImageId::new(id),
            file_name: file_name.into(),
            width,
            height,
        }
    }

    /// Returns true if both dimensions are strictly positive.
    pub fn has_positive_size(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// The file name without directories or extension, used to name the
    /// label file.
    ///
    /// Both `/` and `\` are treated as separators. Returns `None` when
    /// nothing is left.
    pub fn stem(&self) -> Option<&str> {
        let base = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_name);
        let stem = match base.rfind('.') {
            Some(0) | None => base,
            Some(dot) => &base[..dot],
        };
        (!stem.is_empty()).then_some(stem)
    }
}

/// An entry of the COCO `categories` array.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.into(),
        }
    }
}

/// An entry of the COCO `annotations` array.
///
/// Only the detection subset is read; `segmentation`, `area`, `iscrowd` and
/// other keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Annotation {
    /// `None` when absent or not a whole number; the annotation is an orphan.
    #[serde(default, deserialize_with = "lenient_id")]
    pub image_id: Option<ImageId>,

    /// `None` when absent or not a whole number; the default class applies.
    #[serde(default, deserialize_with = "lenient_id")]
    pub category_id: Option<CategoryId>,

    /// Kept as raw JSON: shape problems are a per-annotation drop.
    #[serde(default)]
    pub bbox: Option<serde_json::Value>,
}

impl Annotation {
    pub fn new(image_id: i64, category_id: i64, bbox: [f64; 4]) -> Self {
        Self {
            image_id: Some(ImageId::new(image_id)),
            category_id: Some(CategoryId::new(category_id)),
            bbox: Some(serde_json::Value::from(bbox.to_vec())),
        }
    }

    /// Returns the `[x, y, w, h]` box if `bbox` is an array of exactly four
    /// numbers.
    pub fn bbox_xywh(&self) -> Option<[f64; 4]> {
        let values = self.bbox.as_ref()?.as_array()?;
        if values.len() != 4 {
            return None;
        }
        let mut out = [0.0; 4];
        for (slot, value) in out.iter_mut().zip(values) {
            *slot = value.as_f64()?;
        }
        Some(out)
    }

    /// The bbox as pixel-space corners, if well-formed.
    pub fn bbox_pixels(&self) -> Option<BBoxXYXY<Pixel>> {
        self.bbox_xywh().map(|[x, y, w, h]| BBoxXYXY::from_xywh(x, y, w, h))
    }
}
