//! Depth array codec for NumPy `.npy` files.
//!
//! This module provides functionality for:
//! - Decoding version 1.0 `.npy` files with `f4`, `f8`, `i4` or `u1` payloads
//! - Encoding `f32` buffers back to `.npy` for export
//!
//! # Format
//!
//! ```text
//! magic (6) | version (2) | header_len (u16 LE) | header text | payload
//! ```
//!
//! The header is a Python dict literal exposing at least `descr` and `shape`.
//! The preamble is padded with spaces to a multiple of 16 bytes. Only
//! little-endian, C-ordered, uncompressed data is supported.
//!
//! # Asymmetry
//!
//! Decoding understands four dtypes; encoding always writes `<f4`. Exported
//! depth maps are normalized to `f32` regardless of the source dtype.
//!
//! # Examples
//!
//! ```ignore
//! use rgbd_crop_core::npy::decode_npy;
//!
//! let bytes = std::fs::read("depth.npy").unwrap();
//! let depth = decode_npy(&bytes).unwrap();
//! println!("Decoded {:?} array of {:?}", depth.shape(), depth.dtype());
//! ```

mod decode;
mod encode;
mod types;

pub use decode::decode_npy;
pub use encode::encode_npy;
pub use types::{
    ArrayData, DType, DepthDimensions, EncodeError, FormatError, NumericArray,
    UnsupportedShapeError,
};

/// File signature.
pub const MAGIC: &[u8] = b"\x93NUMPY";

/// Format version written by the encoder (1.0).
pub(crate) const VERSION: [u8; 2] = [0x01, 0x00];

/// Magic + version + header length field.
pub(crate) const PREAMBLE_LEN: usize = 10;

/// Alignment of the full preamble including header text.
pub(crate) const HEADER_ALIGNMENT: usize = 16;
