//! Depth array WASM bindings.
//!
//! # Functions
//!
//! - [`decode_depth`] - Decode a `.npy` file into a `JsDepthArray`
//! - [`encode_depth`] - Encode `float32` values and a shape as `.npy` bytes
//!
//! # Example
//!
//! ```typescript
//! const depth = decode_depth(new Uint8Array(await file.arrayBuffer()));
//! console.log(`Depth ${depth.width}x${depth.height} (${depth.dtype})`);
//! ```

use rgbd_crop_core::npy::{decode_npy, encode_npy, NumericArray};
use wasm_bindgen::prelude::*;

use crate::js_error;

/// A decoded depth array held in WASM memory.
///
/// Values stay in their stored dtype until `values()` copies them out as
/// `Float32Array`.
#[wasm_bindgen]
pub struct JsDepthArray {
    inner: NumericArray,
}

#[wasm_bindgen]
impl JsDepthArray {
    /// Depth map width, or 0 when the shape is not `[H, W]` / `[H, W, 1]`.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner
            .depth_dimensions()
            .map(|d| d.width as u32)
            .unwrap_or(0)
    }

    /// Depth map height, or 0 when the shape is unsupported.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner
            .depth_dimensions()
            .map(|d| d.height as u32)
            .unwrap_or(0)
    }

    /// Array shape as written in the file header.
    pub fn shape(&self) -> Vec<u32> {
        self.inner.shape().iter().map(|&d| d as u32).collect()
    }

    /// Element type the values were read as (`float32`, `float64`, ...).
    #[wasm_bindgen(getter)]
    pub fn dtype(&self) -> String {
        format!("{:?}", self.inner.dtype()).to_lowercase()
    }

    /// The raw `descr` token from the header, e.g. `<f4`.
    #[wasm_bindgen(getter)]
    pub fn descr(&self) -> String {
        self.inner.descr().to_string()
    }

    /// False when the header named an unknown dtype and the payload was
    /// read as `float32`.
    #[wasm_bindgen(getter)]
    pub fn dtype_recognized(&self) -> bool {
        self.inner.is_dtype_recognized()
    }

    /// Number of elements.
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    /// Number of finite (non-NaN, non-infinite) elements.
    #[wasm_bindgen(getter)]
    pub fn finite_count(&self) -> usize {
        self.inner.data().count_finite()
    }

    /// Copy the values out as `Float32Array`.
    pub fn values(&self) -> Vec<f32> {
        self.inner.data().to_f32_vec()
    }
}

impl JsDepthArray {
    pub(crate) fn from_array(inner: NumericArray) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &NumericArray {
        &self.inner
    }
}

/// Decode `.npy` bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a `.npy` file, the header cannot be
/// parsed, or the payload is shorter than the shape requires.
#[wasm_bindgen]
pub fn decode_depth(bytes: &[u8]) -> Result<JsDepthArray, JsValue> {
    decode_npy(bytes)
        .map(JsDepthArray::from_array)
        .map_err(|e| js_error("Failed to load depth file", e))
}

/// Encode `float32` values with the given shape as `.npy` bytes.
///
/// # Errors
///
/// Returns an error if `values.length` is not the product of `shape`.
#[wasm_bindgen]
pub fn encode_depth(values: &[f32], shape: Vec<u32>) -> Result<Vec<u8>, JsValue> {
    let shape: Vec<usize> = shape.into_iter().map(|d| d as usize).collect();
    encode_npy(values, &shape).map_err(|e| js_error("Failed to encode depth data", e))
}
