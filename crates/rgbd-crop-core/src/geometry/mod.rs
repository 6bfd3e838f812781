//! Crop geometry: the pointer-editable rectangle and its pixel window.
//!
//! # Coordinate System
//!
//! - Coordinates are raster pixels, not normalized values
//! - Origin is the top-left corner
//! - The canvas is the raster at its natural size

mod rect;
mod state;

pub use rect::{compute_crop_window, CropRect, CropWindow, Point};
pub use state::{apply_pointer_event, CropGeometry, CursorHint, DragMode, PointerEvent};

pub(crate) use rect::{round2, round_half_up};
