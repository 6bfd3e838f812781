//! Tunable validation thresholds and export naming.
//!
//! Every field has a default, so a configuration file only needs the values
//! it overrides:
//!
//! ```json
//! { "validation": { "min_valid_depth_percent": 75.0 } }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    /// Thresholds used when building validation reports.
    pub validation: ValidationThresholds,

    /// File and folder names used in export bundles.
    pub export: ExportSettings,
}

impl CropperConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Warning and blocking thresholds for validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    /// Warn when the crop covers less than this share of the raster (percent).
    pub min_area_percent: f64,

    /// Warn when the crop covers more than this share of the raster (percent).
    pub max_area_percent: f64,

    /// Warn when fewer depth samples than this are finite (percent).
    pub min_valid_depth_percent: f64,

    /// Largest rectangle/window disagreement per axis that is only a warning.
    pub max_border_adjustment_px: i64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            min_area_percent: 1.0,
            max_area_percent: 95.0,
            min_valid_depth_percent: 90.0,
            max_border_adjustment_px: 1,
        }
    }
}

/// Names used inside an export bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Prefix of the bundle folder name; the sanitized timestamp follows.
    pub folder_prefix: String,

    /// Stem of the raster file; the extension comes from the format.
    pub raster_stem: String,

    /// Depth array file name in both groups.
    pub depth_file_name: String,

    /// Metadata record file name in the crop group.
    pub metadata_file_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            folder_prefix: "rgbd_crop_".to_string(),
            raster_stem: "rgb".to_string(),
            depth_file_name: "depth.npy".to_string(),
            metadata_file_name: "crop_metadata.json".to_string(),
        }
    }
}
