//! Raster decoding with EXIF orientation handling.
//!
//! Orientation is applied so the decoded size matches the natural size a
//! browser reports for the same file, which is the size the crop rectangle
//! was drawn against.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;

use super::{Orientation, RasterError, RasterFormat, RasterImage};

/// Decode raster bytes of a known format, applying EXIF orientation.
///
/// # Errors
///
/// Returns `RasterError::CorruptedFile` if the bytes do not decode as
/// `format`.
pub fn decode_raster(bytes: &[u8], format: RasterFormat) -> Result<RasterImage, RasterError> {
    let orientation = extract_orientation(bytes);

    let img = image::load_from_memory_with_format(bytes, format.to_image_format())
        .map_err(|e| RasterError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    Ok(RasterImage::from_rgba_image(oriented.into_rgba8()))
}

/// Decode a raster, choosing the format from its file name.
pub fn decode_raster_file(file_name: &str, bytes: &[u8]) -> Result<RasterImage, RasterError> {
    let format = RasterFormat::from_file_name(file_name)
        .ok_or_else(|| RasterError::UnsupportedFormat(file_name.to_string()))?;
    decode_raster(bytes, format)
}

/// Extract EXIF orientation from raster bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
