//! Raster handling for RGB captures.
//!
//! This module provides functionality for:
//! - Decoding PNG and JPEG rasters, with the format picked by file extension
//! - Applying EXIF orientation so dimensions match the displayed image
//! - Slicing a raster to an integer crop window
//! - Encoding rasters to PNG for export
//!
//! Pixels are held as RGBA so PNG transparency survives a crop.

mod crop;
mod decode;
mod encode;
mod types;

pub use crop::crop_to_window;
pub use decode::{decode_raster, decode_raster_file};
pub use encode::encode_png;
pub use types::{Orientation, RasterError, RasterFormat, RasterImage};
