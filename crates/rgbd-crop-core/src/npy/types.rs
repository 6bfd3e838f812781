//! Core types for the depth array codec.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding a `.npy` file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The first six bytes are not the `\x93NUMPY` signature.
    #[error("Not a valid .npy file")]
    InvalidMagic,

    /// Fewer bytes than the fixed 10-byte preamble.
    #[error("File too short for a .npy preamble: {0} bytes")]
    TruncatedPreamble(usize),

    /// The header length field points past the end of the input.
    #[error("Header length {declared} exceeds the {available} bytes available")]
    TruncatedHeader { declared: usize, available: usize },

    /// The header bytes are not valid UTF-8.
    #[error("Header is not valid text")]
    HeaderEncoding,

    /// `shape` or `descr` could not be extracted from the header.
    #[error("Could not parse .npy header")]
    UnparsableHeader,

    /// The element or byte count of `shape` does not fit in `usize`.
    #[error("Shape {shape:?} is too large")]
    ShapeOverflow { shape: Vec<usize> },

    /// The payload holds fewer bytes than the shape requires.
    #[error("Payload too short: shape {shape:?} needs {expected} bytes, got {actual}")]
    TruncatedPayload {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// A buffer handed to [`NumericArray::new`] does not match its shape.
    #[error("Buffer holds {actual} elements but shape {shape:?} needs {expected}")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
}

/// Errors raised while encoding a `.npy` file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Value count doesn't match the product of the shape
    #[error("Invalid depth data: expected {expected} values for the shape, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Element count of the shape does not fit in `usize`
    #[error("Shape {0:?} is too large")]
    ShapeOverflow(Vec<usize>),

    /// Padded header does not fit the 16-bit length field
    #[error("Header of {0} bytes does not fit a version 1.0 .npy file")]
    HeaderTooLong(usize),
}

/// The array is neither `[H, W]` nor `[H, W, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported depth data format: shape {shape:?}")]
pub struct UnsupportedShapeError {
    pub shape: Vec<usize>,
}

/// Element types understood by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Float32,
    Float64,
    Int32,
    Uint8,
}

impl DType {
    /// Match a `descr` token such as `<f4` or `|u1`.
    ///
    /// Returns `None` for tokens that match none of the supported types.
    pub fn from_descr(descr: &str) -> Option<Self> {
        if descr.contains("f4") || descr.contains("float32") {
            Some(DType::Float32)
        } else if descr.contains("f8") || descr.contains("float64") {
            Some(DType::Float64)
        } else if descr.contains("i4") || descr.contains("int32") {
            Some(DType::Int32)
        } else if descr.contains("u1") || descr.contains("uint8") {
            Some(DType::Uint8)
        } else {
            None
        }
    }

    /// Size of one element in bytes.
    #[inline]
    pub fn item_size(self) -> usize {
        match self {
            DType::Float32 | DType::Int32 => 4,
            DType::Float64 => 8,
            DType::Uint8 => 1,
        }
    }

    /// Canonical little-endian `descr` token.
    pub fn descr(self) -> &'static str {
        match self {
            DType::Float32 => "<f4",
            DType::Float64 => "<f8",
            DType::Int32 => "<i4",
            DType::Uint8 => "|u1",
        }
    }
}

/// Typed storage behind a [`NumericArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Int32(Vec<i32>),
    Uint8(Vec<u8>),
}

impl ArrayData {
    pub fn dtype(&self) -> DType {
        match self {
            ArrayData::Float32(_) => DType::Float32,
            ArrayData::Float64(_) => DType::Float64,
            ArrayData::Int32(_) => DType::Int32,
            ArrayData::Uint8(_) => DType::Uint8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayData::Float32(v) => v.len(),
            ArrayData::Float64(v) => v.len(),
            ArrayData::Int32(v) => v.len(),
            ArrayData::Uint8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index` widened to `f64`.
    pub fn get(&self, index: usize) -> Option<f64> {
        match self {
            ArrayData::Float32(v) => v.get(index).map(|&x| x as f64),
            ArrayData::Float64(v) => v.get(index).copied(),
            ArrayData::Int32(v) => v.get(index).map(|&x| x as f64),
            ArrayData::Uint8(v) => v.get(index).map(|&x| x as f64),
        }
    }

    /// Element at `index` narrowed to `f32`, the export storage type.
    pub fn get_f32(&self, index: usize) -> Option<f32> {
        match self {
            ArrayData::Float32(v) => v.get(index).copied(),
            ArrayData::Float64(v) => v.get(index).map(|&x| x as f32),
            ArrayData::Int32(v) => v.get(index).map(|&x| x as f32),
            ArrayData::Uint8(v) => v.get(index).map(|&x| x as f32),
        }
    }

    /// Number of elements that are finite numbers.
    ///
    /// Integer storage is always finite.
    pub fn count_finite(&self) -> usize {
        match self {
            ArrayData::Float32(v) => v.iter().filter(|x| x.is_finite()).count(),
            ArrayData::Float64(v) => v.iter().filter(|x| x.is_finite()).count(),
            ArrayData::Int32(v) => v.len(),
            ArrayData::Uint8(v) => v.len(),
        }
    }

    /// Copy every element into a new `f32` buffer.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match self {
            ArrayData::Float32(v) => v.clone(),
            ArrayData::Float64(v) => v.iter().map(|&x| x as f32).collect(),
            ArrayData::Int32(v) => v.iter().map(|&x| x as f32).collect(),
            ArrayData::Uint8(v) => v.iter().map(|&x| x as f32).collect(),
        }
    }
}

/// Width and height of a depth map in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthDimensions {
    pub width: usize,
    pub height: usize,
}

/// A decoded numeric array.
///
/// Fields are private: an array is never mutated after construction, and
/// cropping always produces a new array.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    descr: String,
    shape: Vec<usize>,
    data: ArrayData,
}

impl NumericArray {
    /// Build an array, checking that the buffer length matches the shape.
    pub fn new(shape: Vec<usize>, data: ArrayData) -> Result<Self, FormatError> {
        let descr = data.dtype().descr().to_string();
        Self::with_descr(descr, shape, data)
    }

    /// Convenience constructor for `f32` depth maps.
    pub fn from_f32(shape: Vec<usize>, values: Vec<f32>) -> Result<Self, FormatError> {
        Self::new(shape, ArrayData::Float32(values))
    }

    pub(crate) fn with_descr(
        descr: String,
        shape: Vec<usize>,
        data: ArrayData,
    ) -> Result<Self, FormatError> {
        let Some(expected) = element_count(&shape) else {
            return Err(FormatError::ShapeOverflow { shape });
        };
        if data.len() != expected {
            return Err(FormatError::LengthMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { descr, shape, data })
    }

    /// The element type the buffer is stored as.
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// The raw `descr` token from the file header.
    pub fn descr(&self) -> &str {
        &self.descr
    }

    /// False when the header named a dtype the decoder does not know and the
    /// payload was read as `f32` instead.
    pub fn is_dtype_recognized(&self) -> bool {
        DType::from_descr(&self.descr).is_some()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extract `(width, height)` from a `[H, W]` or `[H, W, 1]` shape.
    pub fn depth_dimensions(&self) -> Result<DepthDimensions, UnsupportedShapeError> {
        match self.shape.as_slice() {
            [height, width] | [height, width, 1] => Ok(DepthDimensions {
                width: *width,
                height: *height,
            }),
            _ => Err(UnsupportedShapeError {
                shape: self.shape.clone(),
            }),
        }
    }
}

/// Product of the shape, or `None` on overflow. An empty shape describes a
/// single scalar.
pub(crate) fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}
