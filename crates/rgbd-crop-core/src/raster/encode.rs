//! PNG encoding for exported rasters.
//!
//! Cropped rasters are always written losslessly, whatever format the
//! source raster came in.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{RasterError, RasterImage};

/// Encode an RGBA raster to PNG bytes.
///
/// # Errors
///
/// Returns an error if either dimension is zero, if the pixel buffer does not
/// hold `width * height * 4` bytes, or if the encoder fails.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, RasterError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidDimensions { width, height });
    }

    let expected_len = width as usize * height as usize * RasterImage::CHANNELS;
    if image.pixels.len() != expected_len {
        return Err(RasterError::InvalidPixelData {
            expected: expected_len,
            actual: image.pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(&image.pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| RasterError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
