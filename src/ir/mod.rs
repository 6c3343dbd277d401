//! Data types shared by the converter stages.
//!
//! Boxes carry a zero-sized coordinate-space parameter ([`Pixel`] or
//! [`Normalized`]) so that a pixel box read from COCO cannot be written to a
//! YOLO label file without going through the normalization step.
//!
//! # Example
//!
//! ```
//! use coco2yolo::ir::{BBoxXYXY, Pixel};
//!
//! let bbox = BBoxXYXY::<Pixel>::from_xywh(90.0, 90.0, 30.0, 30.0).clamp_to(100.0, 100.0);
//! let norm = bbox.to_normalized_cxcywh(100.0, 100.0);
//! assert!((norm.cx - 0.95).abs() < 1e-9);
//! ```

mod bbox;
mod ids;
mod index;
pub mod io_coco_json;
pub mod io_yolo;
mod model;
mod space;

pub use bbox::{BBoxCxCyWh, BBoxXYXY};
pub use ids::{CategoryId, ImageId};
pub use index::{ClassMap, CocoIndex};
pub use model::{Annotation, Category, ImageRecord};
pub use space::{Normalized, Pixel};
