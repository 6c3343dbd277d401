//! Bounding box types for the two box layouts the converter touches.
//!
//! COCO stores `[x, y, w, h]` in pixels; it is read into [`BBoxXYXY<Pixel>`]
//! so that clamping works on corners. YOLO label files store a normalized
//! center box, represented by [`BBoxCxCyWh<Normalized>`].

use std::marker::PhantomData;

use super::{Normalized, Pixel};

/// An axis-aligned box given by its top-left and bottom-right corners.
///
/// The constructor does not enforce `min <= max`; callers decide what to do
/// with malformed boxes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    /// Creates a box from explicit corner coordinates.
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
            _space: PhantomData,
        }
    }

    /// Creates a box from a top-left corner plus width and height.
    ///
    /// This is the layout of a COCO `bbox` array.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_xyxy(x, y, x + width, y + height)
    }

    /// Returns the width (`xmax - xmin`).
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Returns the height (`ymax - ymin`).
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

impl BBoxXYXY<Pixel> {
    /// Clamps each corner coordinate independently into the image bounds.
    ///
    /// `xmin`/`xmax` are clamped into `[0, image_width]` and `ymin`/`ymax`
    /// into `[0, image_height]`.
    pub fn clamp_to(&self, image_width: f64, image_height: f64) -> Self {
        Self::from_xyxy(
            self.xmin.clamp(0.0, image_width),
            self.ymin.clamp(0.0, image_height),
            self.xmax.clamp(0.0, image_width),
            self.ymax.clamp(0.0, image_height),
        )
    }

    /// Converts to a normalized center-format box.
    ///
    /// Centers are computed in pixel space before dividing, so
    /// `cx = (xmin + xmax) / 2 / image_width`.
    pub fn to_normalized_cxcywh(
        &self,
        image_width: f64,
        image_height: f64,
    ) -> BBoxCxCyWh<Normalized> {
        BBoxCxCyWh::new(
            (self.xmin + self.xmax) / 2.0 / image_width,
            (self.ymin + self.ymax) / 2.0 / image_height,
            self.width() / image_width,
            self.height() / image_height,
        )
    }
}

/// A box given by its center point plus width and height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBoxCxCyWh<TSpace> {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxCxCyWh<TSpace> {
    #[inline]
    pub fn new(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self {
            cx,
            cy,
            w,
            h,
            _space: PhantomData,
        }
    }

    /// Returns true if all four values are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.cx.is_finite() && self.cy.is_finite() && self.w.is_finite() && self.h.is_finite()
    }
}
