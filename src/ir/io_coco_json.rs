//! COCO JSON annotation reader.
//!
//! Only the bounding-box subset is read: `images`, `categories` and
//! `annotations`. All three arrays are optional and default to empty.
//!
//! # COCO Format Reference
//!
//! COCO bounding boxes use `[x, y, width, height]` where `(x, y)` is the
//! top-left corner in absolute pixel coordinates.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::model::{Annotation, Category, ImageRecord};
use crate::error::ConvertError;

/// Default annotation file name inside a split directory.
pub const DEFAULT_ANNOTATIONS_FILE: &str = "annotations.coco.json";

/// A parsed COCO annotation document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CocoDocument {
    #[serde(default)]
    pub images: Vec<ImageRecord>,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Reads a COCO document from a file.
///
/// # Errors
/// Returns an error if the file cannot be opened or is not a COCO document.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use coco2yolo::ir::io_coco_json::read_coco_json;
///
/// let doc = read_coco_json(Path::new("train/annotations.coco.json"))?;
/// println!("{} annotations", doc.annotations.len());
/// # Ok::<(), coco2yolo::ConvertError>(())
/// ```
pub fn read_coco_json(path: &Path) -> Result<CocoDocument, ConvertError> {
    let file = File::open(path).map_err(ConvertError::file_op("open", path))?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| ConvertError::CocoJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a COCO document from a string.
///
/// Useful for testing without file I/O.
pub fn from_coco_str(json: &str) -> Result<CocoDocument, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a COCO document from raw bytes.
pub fn from_coco_slice(bytes: &[u8]) -> Result<CocoDocument, serde_json::Error> {
    serde_json::from_slice(bytes)
}
