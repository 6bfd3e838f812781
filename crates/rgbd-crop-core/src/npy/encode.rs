//! `.npy` encoding for export.
//!
//! Every exported depth array is written as little-endian `f32`, whatever
//! dtype it was decoded from.

use super::types::element_count;
use super::{EncodeError, HEADER_ALIGNMENT, MAGIC, PREAMBLE_LEN, VERSION};

/// Encode `f32` values with the given shape as a version 1.0 `.npy` file.
///
/// # Arguments
///
/// * `values` - Row-major element values
/// * `shape` - Array shape; its product must equal `values.len()`
///
/// # Layout
///
/// `magic | version | u16 header length | header | payload`, where the
/// header is a Python dict literal terminated by a newline and padded with
/// spaces so the whole preamble is a multiple of 16 bytes.
///
/// # Example
///
/// ```
/// use rgbd_crop_core::npy::{decode_npy, encode_npy};
///
/// let bytes = encode_npy(&[1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
/// assert_eq!(bytes.len() % 16, 0);
/// assert_eq!(decode_npy(&bytes).unwrap().shape(), &[2, 2]);
/// ```
pub fn encode_npy(values: &[f32], shape: &[usize]) -> Result<Vec<u8>, EncodeError> {
    let expected =
        element_count(shape).ok_or_else(|| EncodeError::ShapeOverflow(shape.to_vec()))?;
    if values.len() != expected {
        return Err(EncodeError::LengthMismatch {
            expected,
            actual: values.len(),
        });
    }

    let header = padded_header(shape);
    let header_len =
        u16::try_from(header.len()).map_err(|_| EncodeError::HeaderTooLong(header.len()))?;

    let mut buffer = Vec::with_capacity(PREAMBLE_LEN + header.len() + values.len() * 4);
    buffer.extend_from_slice(MAGIC);
    buffer.extend_from_slice(&VERSION);
    buffer.extend_from_slice(&header_len.to_le_bytes());
    buffer.extend_from_slice(header.as_bytes());
    for value in values {
        buffer.extend_from_slice(&value.to_le_bytes());
    }

    Ok(buffer)
}

/// Python tuple literal: `(n,)` for one element, `(a, b)` otherwise.
pub(crate) fn format_shape(shape: &[usize]) -> String {
    match shape {
        [single] => format!("({single},)"),
        _ => {
            let parts: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}

/// Header text with its newline and alignment padding.
fn padded_header(shape: &[usize]) -> String {
    let mut header = format!(
        "{{'descr': '<f4', 'fortran_order': False, 'shape': {}}}\n",
        format_shape(shape)
    );
    let padding = (HEADER_ALIGNMENT - (PREAMBLE_LEN + header.len()) % HEADER_ALIGNMENT)
        % HEADER_ALIGNMENT;
    header.extend(std::iter::repeat(' ').take(padding));
    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npy::{decode_npy, ArrayData, DType};

    #[test]
    fn test_encode_header_text() {
        let bytes = encode_npy(&[0.0; 6], &[2, 3]).unwrap();
        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        let header = std::str::from_utf8(&bytes[10..10 + header_len]).unwrap();

        assert!(header.starts_with(
            "{'descr': '<f4', 'fortran_order': False, 'shape': (2, 3)}\n"
        ));
        assert!(header.trim_end_matches(' ').ends_with('\n'));
    }

    #[test]
    fn test_encode_magic_and_version() {
        let bytes = encode_npy(&[1.0], &[1, 1]).unwrap();
        assert_eq!(&bytes[0..6], b"\x93NUMPY");
        assert_eq!(&bytes[6..8], &[1, 0]);
    }

    #[test]
    fn test_format_shape() {
        assert_eq!(format_shape(&[5]), "(5,)");
        assert_eq!(format_shape(&[480, 640]), "(480, 640)");
        assert_eq!(format_shape(&[480, 640, 1]), "(480, 640, 1)");
        assert_eq!(format_shape(&[]), "()");
    }

    #[test]
    fn test_single_element_shape_round_trips() {
        let bytes = encode_npy(&[1.0, 2.0, 3.0], &[3]).unwrap();
        let arr = decode_npy(&bytes).unwrap();
        assert_eq!(arr.shape(), &[3]);
    }

    #[test]
    fn test_payload_is_little_endian_f32() {
        let bytes = encode_npy(&[1.0, -2.5], &[1, 2]).unwrap();
        let payload = &bytes[bytes.len() - 8..];
        assert_eq!(&payload[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&payload[4..8], &(-2.5f32).to_le_bytes());
    }

    #[test]
    fn test_length_mismatch() {
        let result = encode_npy(&[0.0; 5], &[2, 3]);
        assert_eq!(
            result,
            Err(EncodeError::LengthMismatch {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_oversized_shape() {
        assert_eq!(
            encode_npy(&[], &[usize::MAX, 3]),
            Err(EncodeError::ShapeOverflow(vec![usize::MAX, 3]))
        );
    }

    #[test]
    fn test_nan_survives_encoding() {
        let bytes = encode_npy(&[f32::NAN, 1.0], &[1, 2]).unwrap();
        let arr = decode_npy(&bytes).unwrap();
        match arr.data() {
            ArrayData::Float32(v) => {
                assert!(v[0].is_nan());
                assert_eq!(v[1], 1.0);
            }
            other => panic!("unexpected storage {:?}", other.dtype()),
        }
        assert_eq!(arr.dtype(), DType::Float32);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::npy::{decode_npy, ArrayData};
    use proptest::prelude::*;

    /// Strategy for a rank-2 shape and matching finite values.
    fn array_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<f32>)> {
        (1usize..=24, 1usize..=24).prop_flat_map(|(h, w)| {
            (
                Just(vec![h, w]),
                prop::collection::vec(-1.0e6f32..1.0e6, h * w),
            )
        })
    }

    proptest! {
        /// Property: the preamble is always a multiple of 16 bytes.
        #[test]
        fn prop_header_is_aligned(shape in prop::collection::vec(1usize..=100_000, 1..=4)) {
            let header = padded_header(&shape);
            prop_assert_eq!((PREAMBLE_LEN + header.len()) % HEADER_ALIGNMENT, 0);
            prop_assert!(header.trim_end_matches(' ').ends_with('\n'));
        }

        /// Property: decoding an encoded rank-2 array restores shape and values.
        #[test]
        fn prop_round_trip((shape, values) in array_strategy()) {
            let bytes = encode_npy(&values, &shape).unwrap();
            let arr = decode_npy(&bytes).unwrap();

            prop_assert_eq!(arr.shape(), shape.as_slice());
            prop_assert_eq!(arr.data(), &ArrayData::Float32(values));
        }

        /// Property: stored header length matches the padded header.
        #[test]
        fn prop_header_length_field((shape, values) in array_strategy()) {
            let bytes = encode_npy(&values, &shape).unwrap();
            let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;

            prop_assert_eq!((PREAMBLE_LEN + header_len) % HEADER_ALIGNMENT, 0);
            prop_assert_eq!(bytes.len(), PREAMBLE_LEN + header_len + values.len() * 4);
        }
    }
}
