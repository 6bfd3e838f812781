//! Raster slicing to an integer crop window.

use super::{RasterError, RasterImage};
use crate::geometry::CropWindow;

/// Copy the pixels inside `window` into a new raster with its origin at
/// `(0, 0)`.
///
/// # Errors
///
/// Returns `RasterError::InvalidPixelData` if the pixel buffer does not match
/// the raster size, and `RasterError::WindowOutOfBounds` if the window is
/// empty or reaches outside the raster. Nothing is clamped here; clamping is
/// the window formula's job.
pub fn crop_to_window(image: &RasterImage, window: &CropWindow) -> Result<RasterImage, RasterError> {
    let expected_len = image.width as usize * image.height as usize * RasterImage::CHANNELS;
    if image.pixels.len() != expected_len {
        return Err(RasterError::InvalidPixelData {
            expected: expected_len,
            actual: image.pixels.len(),
        });
    }
    if !window.fits_within(image.width, image.height) {
        return Err(RasterError::WindowOutOfBounds {
            start_x: window.start_x,
            start_y: window.start_y,
            end_x: window.end_x,
            end_y: window.end_y,
            width: image.width,
            height: image.height,
        });
    }

    let channels = RasterImage::CHANNELS;
    let src_stride = image.width as usize * channels;
    let out_width = window.width() as usize;
    let out_height = window.height() as usize;
    let row_bytes = out_width * channels;
    let x_offset = window.start_x as usize * channels;

    let mut output = Vec::with_capacity(row_bytes * out_height);

    // Copy pixel data row by row
    for y in 0..out_height {
        let src_row_start = (window.start_y as usize + y) * src_stride + x_offset;
        output.extend_from_slice(&image.pixels[src_row_start..src_row_start + row_bytes]);
    }

    Ok(RasterImage::new(out_width as u32, out_height as u32, output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
