//! RGBD Crop Core - paired RGB/depth cropping library
//!
//! This crate provides the core functionality for cropping an RGB capture and
//! its depth map together: `.npy` decoding and encoding, the pointer-driven
//! crop rectangle, validation reports, and export bundling. It performs no
//! I/O; callers hand in bytes and receive bytes back.
//!
//! # Pipeline
//!
//! ```text
//! decode_npy ─┐
//! raster size ├─> validate ─> ValidationReport ─(is_valid)─> export_bundle
//! CropGeometry┘
//! ```

pub mod config;
pub mod export;
pub mod geometry;
pub mod npy;
pub mod raster;
pub mod validation;

pub use config::{CropperConfig, ExportSettings, ValidationThresholds};
pub use export::{
    export_bundle, export_bundle_with, CropMetadata, ExportBundle, ExportError, RasterSource,
};
pub use geometry::{
    apply_pointer_event, compute_crop_window, CropGeometry, CropRect, CropWindow, CursorHint,
    DragMode, Point, PointerEvent,
};
pub use npy::{decode_npy, encode_npy, DType, FormatError, NumericArray};
pub use raster::{RasterError, RasterFormat, RasterImage};
pub use validation::{validate, validate_with, ValidationReport};
