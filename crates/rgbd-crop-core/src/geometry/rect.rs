//! Crop rectangle and integer crop window.
//!
//! The rectangle is what the operator drags: floating-point, in raster pixel
//! space. The window is what actually gets extracted: floored, clamped to the
//! raster, and possibly one pixel off the rectangle on each axis.
//!
//! [`compute_crop_window`] is the single definition of that conversion.
//! Validation and export both call it so preview and export cannot disagree.

use serde::{Deserialize, Serialize};

/// A point in raster pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Floating-point crop rectangle in raster pixel space.
///
/// While settled, `width > 0`, `height > 0`, `x >= 0` and `y >= 0`. During
/// creation the rectangle may be zero-sized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive hit test: points on the border count as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Smallest rectangle spanning two corner points.
    pub fn spanning(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }
}

/// Pixel-aligned region extracted on export.
///
/// Coordinates are signed: a rectangle dragged past the top-left edge yields
/// a negative start, which validation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropWindow {
    pub start_x: i64,
    pub start_y: i64,
    pub end_x: i64,
    pub end_y: i64,
}

impl CropWindow {
    #[inline]
    pub fn width(&self) -> i64 {
        self.end_x.saturating_sub(self.start_x)
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.end_y.saturating_sub(self.start_y)
    }

    /// True when the window is non-empty and lies inside a raster of the
    /// given size.
    pub fn fits_within(&self, raster_width: u32, raster_height: u32) -> bool {
        self.width() > 0
            && self.height() > 0
            && self.start_x >= 0
            && self.start_y >= 0
            && self.end_x <= raster_width as i64
            && self.end_y <= raster_height as i64
    }
}

/// Floored coordinates are held to `±2^32`, far outside any raster, so window
/// arithmetic stays exact for every finite rectangle.
const COORD_LIMIT: i64 = 1 << 32;

#[inline]
fn floor_coord(value: f64) -> i64 {
    (value.floor() as i64).clamp(-COORD_LIMIT, COORD_LIMIT)
}

/// Convert a crop rectangle to the integer window actually extracted.
///
/// `start = floor(origin)`, `end = min(floor(origin + extent), raster_extent)`
/// on each axis. The start is never clamped to the raster.
pub fn compute_crop_window(rect: &CropRect, raster_width: u32, raster_height: u32) -> CropWindow {
    let start_x = floor_coord(rect.x);
    let start_y = floor_coord(rect.y);
    let end_x = floor_coord(rect.right()).min(raster_width as i64);
    let end_y = floor_coord(rect.bottom()).min(raster_height as i64);

    CropWindow {
        start_x,
        start_y,
        end_x,
        end_y,
    }
}

/// Round half up (`2.5 -> 3`, `-2.5 -> -2`), the convention used for every
/// rounded value in reports and metadata.
#[inline]
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round half up to two decimal places.
#[inline]
pub(crate) fn round2(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}


// ============================================================================
// Property-Based Tests
// ============================================================================
