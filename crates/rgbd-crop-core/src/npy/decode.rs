//! `.npy` decoding.

use super::types::element_count;
use super::{ArrayData, DType, FormatError, NumericArray, MAGIC, PREAMBLE_LEN};

/// Decode a `.npy` file into a [`NumericArray`].
///
/// # Arguments
///
/// * `bytes` - Raw file bytes
///
/// # Errors
///
/// Returns `FormatError::InvalidMagic` if the signature is wrong and
/// `FormatError::UnparsableHeader` if `shape` or `descr` cannot be read.
/// Truncated input yields one of the `Truncated*` variants. No partial array
/// is ever returned.
///
/// # Dtype fallback
///
/// A `descr` token matching none of `f4`, `f8`, `i4`, `u1` is read as `f32`.
/// Callers can detect this through [`NumericArray::is_dtype_recognized`].
pub fn decode_npy(bytes: &[u8]) -> Result<NumericArray, FormatError> {
    if bytes.len() < MAGIC.len() || &bytes[..MAGIC.len()] != MAGIC {
        return Err(FormatError::InvalidMagic);
    }
    if bytes.len() < PREAMBLE_LEN {
        return Err(FormatError::TruncatedPreamble(bytes.len()));
    }

    let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    let available = bytes.len() - PREAMBLE_LEN;
    if header_len > available {
        return Err(FormatError::TruncatedHeader {
            declared: header_len,
            available,
        });
    }

    let header_end = PREAMBLE_LEN + header_len;
    let header = std::str::from_utf8(&bytes[PREAMBLE_LEN..header_end])
        .map_err(|_| FormatError::HeaderEncoding)?;

    let shape = parse_shape(header).ok_or(FormatError::UnparsableHeader)?;
    let descr = parse_descr(header).ok_or(FormatError::UnparsableHeader)?;

    let dtype = match DType::from_descr(descr) {
        Some(dtype) => dtype,
        None => {
            tracing::warn!(descr, "unrecognized .npy dtype, reading payload as float32");
            DType::Float32
        }
    };

    let Some(expected) =
        element_count(&shape).and_then(|count| count.checked_mul(dtype.item_size()))
    else {
        return Err(FormatError::ShapeOverflow { shape });
    };
    let payload = &bytes[header_end..];
    if payload.len() < expected {
        return Err(FormatError::TruncatedPayload {
            shape,
            expected,
            actual: payload.len(),
        });
    }

    let data = read_payload(&payload[..expected], dtype);
    tracing::debug!(?shape, descr, "decoded .npy array");
    NumericArray::with_descr(descr.to_string(), shape, data)
}

/// Interpret little-endian payload bytes as `dtype` elements.
fn read_payload(payload: &[u8], dtype: DType) -> ArrayData {
    match dtype {
        DType::Float32 => ArrayData::Float32(
            payload
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        DType::Float64 => ArrayData::Float64(
            payload
                .chunks_exact(8)
                .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        ),
        DType::Int32 => ArrayData::Int32(
            payload
                .chunks_exact(4)
                .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        DType::Uint8 => ArrayData::Uint8(payload.to_vec()),
    }
}

/// Locate `'key'` followed by optional whitespace and a colon, returning the
/// text after the colon with leading whitespace removed.
fn value_after_key<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let quoted = format!("'{key}'");
    let start = header.find(&quoted)? + quoted.len();
    let rest = header[start..].trim_start().strip_prefix(':')?;
    Some(rest.trim_start())
}

/// Parse the `'shape': (a, b, ...)` entry.
///
/// Tokens that are not integers are dropped, so `(3,)` yields `[3]`. An
/// empty pair of parentheses does not parse.
fn parse_shape(header: &str) -> Option<Vec<usize>> {
    let rest = value_after_key(header, "shape")?.strip_prefix('(')?;
    let close = rest.find(')')?;
    let inner = &rest[..close];
    if inner.is_empty() {
        return None;
    }
    Some(
        inner
            .split(',')
            .filter_map(|token| token.trim().parse::<usize>().ok())
            .collect(),
    )
}

/// Parse the `'descr': '<token>'` entry.
fn parse_descr(header: &str) -> Option<&str> {
    let rest = value_after_key(header, "descr")?.strip_prefix('\'')?;
    let close = rest.find('\'')?;
    let token = &rest[..close];
    (!token.is_empty()).then_some(token)
}
