//! Export bundling.
//!
//! An export turns a validated crop into an in-memory [`ExportBundle`]:
//!
//! ```text
//! <folder_name>/
//!   original/rgb.<ext>         raster bytes, untouched
//!   original/depth.npy         source depth array, re-encoded as float32
//!   crop/rgb.png               cropped raster
//!   crop/depth.npy             cropped depth array, [h, w] float32
//!   crop/crop_metadata.json    CropMetadata, pretty-printed
//! ```
//!
//! Exports are gated on [`ValidationReport::is_valid`] and are
//! all-or-nothing: any failure returns an error and no bundle.
//! [`ExportBundle::to_zip`] packs the bundle into a single
//! `<folder_name>.zip`; writing it somewhere is the caller's job.

mod archive;
mod metadata;

pub use metadata::{folder_name, format_timestamp, CropMetadata, CroppedFrom, RemainingArea};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ExportSettings;
use crate::geometry::{compute_crop_window, CropRect, CropWindow};
use crate::npy::{encode_npy, ArrayData, EncodeError, NumericArray, UnsupportedShapeError};
use crate::raster::{crop_to_window, decode_raster, encode_png, RasterError, RasterFormat};
use crate::validation::{Extent, ValidationReport};

/// Group holding the untouched inputs.
pub const ORIGINAL_DIR: &str = "original";

/// Group holding the cropped outputs.
pub const CROP_DIR: &str = "crop";

/// Errors that abort an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The report has blocking issues.
    #[error("Validation failed: {}", .issues.join(", "))]
    ValidationBlocked { issues: Vec<String> },

    /// The report was computed for a different rectangle or raster.
    #[error("Validation report is stale: it describes a {expected:?} crop, the rectangle now yields {actual:?}")]
    StaleReport {
        expected: Option<Extent>,
        actual: Extent,
    },

    #[error(transparent)]
    UnsupportedShape(#[from] UnsupportedShapeError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Failed to serialize crop metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Failed to build zip archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The crop window reaches outside the depth map.
    #[error("Crop window {window:?} does not fit the {width}x{height} depth map")]
    DepthOutOfBounds {
        window: CropWindow,
        width: usize,
        height: usize,
    },
}

/// A raster file as the user supplied it.
#[derive(Debug, Clone, Copy)]
pub struct RasterSource<'a> {
    /// Original file name; its extension picks the decoder.
    pub file_name: &'a str,
    pub bytes: &'a [u8],
}

impl<'a> RasterSource<'a> {
    pub fn new(file_name: &'a str, bytes: &'a [u8]) -> Self {
        Self { file_name, bytes }
    }
}

/// One file inside a bundle group.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl BundleFile {
    fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A named folder of files.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleGroup {
    pub dir: &'static str,
    pub files: Vec<BundleFile>,
}

/// The complete export package.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBundle {
    pub folder_name: String,
    pub original: BundleGroup,
    pub crop: BundleGroup,
    pub metadata: CropMetadata,
    pub created_at: DateTime<Utc>,
}

impl ExportBundle {
    /// Every file with its path relative to the bundle folder, originals
    /// first.
    pub fn files(&self) -> impl Iterator<Item = (String, &[u8])> {
        [&self.original, &self.crop].into_iter().flat_map(|group| {
            group
                .files
                .iter()
                .map(move |file| (format!("{}/{}", group.dir, file.name), file.bytes.as_slice()))
        })
    }

    /// Look up a file by its relative path, e.g. `crop/depth.npy`.
    pub fn file(&self, path: &str) -> Option<&[u8]> {
        let (dir, name) = path.split_once('/')?;
        [&self.original, &self.crop]
            .into_iter()
            .find(|group| group.dir == dir)?
            .files
            .iter()
            .find(|file| file.name == name)
            .map(|file| file.bytes.as_slice())
    }

    /// Total payload size in bytes.
    pub fn total_bytes(&self) -> usize {
        self.files().map(|(_, bytes)| bytes.len()).sum()
    }
}

/// Export with default file names, stamped with the current time.
pub fn export_bundle(
    raster: RasterSource<'_>,
    depth: &NumericArray,
    rect: &CropRect,
    report: &ValidationReport,
) -> Result<ExportBundle, ExportError> {
    export_bundle_with(
        &ExportSettings::default(),
        raster,
        depth,
        rect,
        report,
        Utc::now(),
    )
}

/// Export a validated crop.
///
/// # Errors
///
/// - `ValidationBlocked` when `report.is_valid` is false. Nothing is decoded
///   in that case.
/// - `StaleReport` when the window recomputed from `rect` and the decoded
///   raster differs from `report.details.cropped_dimensions`.
/// - Decoding, shape and encoding errors from the assets themselves.
pub fn export_bundle_with(
    settings: &ExportSettings,
    raster: RasterSource<'_>,
    depth: &NumericArray,
    rect: &CropRect,
    report: &ValidationReport,
    timestamp: DateTime<Utc>,
) -> Result<ExportBundle, ExportError> {
    if !report.is_valid {
        warn!(issues = report.issues.len(), "Export blocked by validation");
        return Err(ExportError::ValidationBlocked {
            issues: report.issues.clone(),
        });
    }

    let format = RasterFormat::from_file_name(raster.file_name)
        .ok_or_else(|| RasterError::UnsupportedFormat(raster.file_name.to_string()))?;
    let image = decode_raster(raster.bytes, format)?;

    let window = compute_crop_window(rect, image.width, image.height);
    let actual = Extent::of_window(&window);
    if report.details.cropped_dimensions != Some(actual) {
        return Err(ExportError::StaleReport {
            expected: report.details.cropped_dimensions,
            actual,
        });
    }

    let dims = depth.depth_dimensions()?;
    if !window_fits(&window, dims.width, dims.height) {
        return Err(ExportError::DepthOutOfBounds {
            window,
            width: dims.width,
            height: dims.height,
        });
    }

    let cropped_rgb = encode_png(&crop_to_window(&image, &window)?)?;

    let crop_width = window.width() as usize;
    let crop_height = window.height() as usize;
    let cropped_depth = crop_depth(depth.data(), dims.width, &window);
    let cropped_npy = encode_npy(&cropped_depth, &[crop_height, crop_width])?;
    let original_npy = encode_npy(&depth.data().to_f32_vec(), depth.shape())?;

    let metadata = CropMetadata::new(
        image.width,
        image.height,
        rect,
        &window,
        &timestamp,
        &settings.folder_prefix,
    );
    let metadata_json = serde_json::to_string_pretty(&metadata)?;

    let raster_name = format!(
        "{}.{}",
        settings.raster_stem,
        source_extension(raster.file_name, format)
    );

    let bundle = ExportBundle {
        folder_name: metadata.folder_name.clone(),
        original: BundleGroup {
            dir: ORIGINAL_DIR,
            files: vec![
                BundleFile::new(raster_name, raster.bytes.to_vec()),
                BundleFile::new(settings.depth_file_name.as_str(), original_npy),
            ],
        },
        crop: BundleGroup {
            dir: CROP_DIR,
            files: vec![
                BundleFile::new(format!("{}.png", settings.raster_stem), cropped_rgb),
                BundleFile::new(settings.depth_file_name.as_str(), cropped_npy),
                BundleFile::new(
                    settings.metadata_file_name.as_str(),
                    metadata_json.into_bytes(),
                ),
            ],
        },
        metadata,
        created_at: timestamp,
    };

    debug!(
        folder = %bundle.folder_name,
        crop_width,
        crop_height,
        bytes = bundle.total_bytes(),
        "Export bundle assembled"
    );

    Ok(bundle)
}

fn window_fits(window: &CropWindow, width: usize, height: usize) -> bool {
    window.width() > 0
        && window.height() > 0
        && window.start_x >= 0
        && window.start_y >= 0
        && window.end_x as u64 <= width as u64
        && window.end_y as u64 <= height as u64
}

/// Gather the window out of a row-major depth map `depth_width` wide.
///
/// The window must already be checked against the depth dimensions.
fn crop_depth(data: &ArrayData, depth_width: usize, window: &CropWindow) -> Vec<f32> {
    let start_x = window.start_x as usize;
    let start_y = window.start_y as usize;
    let crop_width = window.width() as usize;
    let crop_height = window.height() as usize;

    let mut out = Vec::with_capacity(crop_width * crop_height);
    for y in 0..crop_height {
        let row = (start_y + y) * depth_width + start_x;
        out.extend((row..row + crop_width).map(|i| data.get_f32(i).unwrap_or(f32::NAN)));
    }
    out
}

/// Lowercased extension of the source file, falling back to the format's.
fn source_extension(file_name: &str, format: RasterFormat) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_else(|| format.extension().to_string())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::npy::decode_npy;
    use crate::raster::RasterImage;
    use crate::validation::validate;
    use proptest::prelude::*;

    fn raster_png(width: u32, height: u32) -> Vec<u8> {
        let pixels = vec![90u8; (width * height * 4) as usize];
        encode_png(&RasterImage::new(width, height, pixels)).unwrap()
    }

    fn rect_in_raster() -> impl Strategy<Value = (u32, u32, CropRect)> {
        (4u32..=32, 4u32..=32).prop_flat_map(|(w, h)| {
            (0.0..w as f64 / 2.0, 0.0..h as f64 / 2.0).prop_flat_map(move |(x, y)| {
                (1.0..=(w as f64 - x), 1.0..=(h as f64 - y))
                    .prop_map(move |(cw, ch)| (w, h, CropRect::new(x, y, cw, ch)))
            })
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        /// Property: a valid report always exports, and the cropped depth
        /// shape equals the window recorded in the report.
        #[test]
        fn prop_valid_report_exports_matching_window((w, h, rect) in rect_in_raster()) {
            let depth = NumericArray::from_f32(
                vec![h as usize, w as usize],
                vec![1.0; (w * h) as usize],
            ).unwrap();
            let report = validate(w, h, &depth, &rect);
            prop_assume!(report.is_valid);

            let png = raster_png(w, h);
            let bundle = export_bundle(RasterSource::new("rgb.png", &png), &depth, &rect, &report)
                .unwrap();

            let dims = report.details.cropped_dimensions.unwrap();
            let cropped = decode_npy(bundle.file("crop/depth.npy").unwrap()).unwrap();
            prop_assert_eq!(cropped.shape(), &[dims.height as usize, dims.width as usize]);
            prop_assert_eq!(bundle.metadata.crop_box.width, dims.width);
            prop_assert_eq!(bundle.metadata.crop_box.height, dims.height);
        }
    }
}
