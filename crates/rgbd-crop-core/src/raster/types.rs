//! Core types for raster handling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for raster operations.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The file extension names no supported format.
    #[error("Unsupported raster file type: {0}")]
    UnsupportedFormat(String),

    /// The raster bytes could not be decoded.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Crop window is empty or reaches outside the raster
    #[error("Crop window ({start_x}, {start_y})..({end_x}, {end_y}) does not fit a {width}x{height} raster")]
    WindowOutOfBounds {
        start_x: i64,
        start_y: i64,
        end_x: i64,
        end_y: i64,
        width: u32,
        height: u32,
    },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Raster container formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl RasterFormat {
    /// Pick the format from a file name's extension (case-insensitive).
    ///
    /// The file contents are not inspected.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(RasterFormat::Png),
            "jpg" | "jpeg" => Some(RasterFormat::Jpeg),
            _ => None,
        }
    }

    /// Extension used when writing a file of this format.
    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpg",
        }
    }

    /// Convert to the image crate's ImageFormat.
    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            RasterFormat::Png => image::ImageFormat::Png,
            RasterFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A decoded raster with RGBA pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Bytes per pixel.
    pub const CHANNELS: usize = 4;

    /// Create a new RasterImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * Self::CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a RasterImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(RasterFormat::from_file_name("rgb.png"), Some(RasterFormat::Png));
        assert_eq!(RasterFormat::from_file_name("IMG_01.JPG"), Some(RasterFormat::Jpeg));
        assert_eq!(RasterFormat::from_file_name("a.b.jpeg"), Some(RasterFormat::Jpeg));
        assert_eq!(RasterFormat::from_file_name("depth.npy"), None);
        assert_eq!(RasterFormat::from_file_name("noext"), None);
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(RasterFormat::Png.extension(), "png");
        assert_eq!(RasterFormat::Jpeg.extension(), "jpg");
        assert_eq!(RasterFormat::Jpeg.to_image_format(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal); // Invalid defaults to Normal
    }

    #[test]
    fn test_raster_image_creation() {
        let img = RasterImage::new(10, 5, vec![0u8; 10 * 5 * 4]);
        assert_eq!(img.pixel_count(), 50);
        assert!(!img.is_empty());
        assert!(RasterImage::new(0, 0, vec![]).is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = RasterError::UnsupportedFormat("depth.npy".to_string());
        assert_eq!(err.to_string(), "Unsupported raster file type: depth.npy");
    }
}
