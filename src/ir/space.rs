//! Coordinate spaces for [`BBoxXYXY`](super::BBoxXYXY) and
//! [`BBoxCxCyWh`](super::BBoxCxCyWh).
//!
//! COCO boxes are read in [`Pixel`] space and only become [`Normalized`]
//! through `to_normalized_cxcywh`, which is the one place the image size is
//! divided out. Label rows only accept normalized boxes.

use std::fmt;

/// Image pixels as written in COCO `bbox` arrays, origin at the top-left.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Fractions of the image width and height, as written to YOLO label rows.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
