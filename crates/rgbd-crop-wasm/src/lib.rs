//! RGBD Crop WASM - WebAssembly bindings for the RGB-D cropper
//!
//! This crate exposes rgbd-crop-core to the browser shell, which owns file
//! pickers, canvas drawing and downloads.
//!
//! # Module Structure
//!
//! - `depth` - `.npy` decoding and encoding (`JsDepthArray`)
//! - `geometry` - pointer-driven crop rectangle (`JsCropGeometry`)
//! - `validation` - validation reports as plain JS objects
//! - `export` - export bundles (`JsExportBundle`)
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_depth, JsCropGeometry, validate, export_bundle } from 'rgbd-crop-wasm';
//!
//! await init();
//!
//! const depth = decode_depth(new Uint8Array(await depthFile.arrayBuffer()));
//! const geometry = new JsCropGeometry(img.naturalWidth, img.naturalHeight);
//! geometry.pointer_down(10, 10);
//! geometry.pointer_move(200, 150);
//! geometry.pointer_up();
//!
//! const report = validate(img.naturalWidth, img.naturalHeight, depth, geometry);
//! if (report.isValid) {
//!   const bundle = export_bundle(rgbFile.name, rgbBytes, depth, geometry, report);
//!   for (const path of bundle.paths()) zip.file(`${bundle.folder_name}/${path}`, bundle.file(path));
//! }
//! ```
//!
//! # Errors
//!
//! Failures cross the boundary as `JsValue` strings and are also written to
//! the browser console.

use std::fmt::Display;

use wasm_bindgen::prelude::*;

mod depth;
mod export;
mod geometry;
mod validation;

// Re-export public types
pub use depth::{decode_depth, encode_depth, JsDepthArray};
pub use export::{export_bundle, JsExportBundle};
pub use geometry::JsCropGeometry;
pub use validation::{incomplete_report, validate, validate_with_thresholds};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Log an error to the browser console and convert it for JavaScript.
pub(crate) fn js_error(context: &str, err: impl Display) -> JsValue {
    let message = format!("{context}: {err}");
    let value = JsValue::from_str(&message);
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&value);
    value
}
