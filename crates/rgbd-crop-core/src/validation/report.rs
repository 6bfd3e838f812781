//! Validation report types.
//!
//! Field names serialize in camelCase; the UI shell and the exported
//! metadata depend on them verbatim.

use serde::{Deserialize, Serialize};

use crate::geometry::{round_half_up, CropRect, CropWindow};

/// Issue reported when there is nothing to validate yet.
pub const INCOMPLETE_ISSUE: &str = "No crop area defined or data not loaded";

/// Result of checking a crop against its raster and depth array.
///
/// `issues` block export, `warnings` do not. A report is a snapshot: it is
/// rebuilt from scratch on every call, never updated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub details: ValidationDetails,
}

impl ValidationReport {
    /// Build a report; validity is derived from the issue list.
    pub fn from_parts(issues: Vec<String>, warnings: Vec<String>, details: ValidationDetails) -> Self {
        Self {
            is_valid: issues.is_empty(),
            issues,
            warnings,
            details,
        }
    }

    /// Report for a session that lacks a raster, depth array or rectangle.
    pub fn incomplete() -> Self {
        Self::from_parts(
            vec![INCOMPLETE_ISSUE.to_string()],
            Vec::new(),
            ValidationDetails::default(),
        )
    }
}

/// Metrics computed during validation.
///
/// Fields stay `None` when the check producing them was skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_dimensions: Option<Dimensions>,
    pub dimensions_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_box: Option<CropBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cropped_dimensions: Option<Extent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_validation: Option<BorderValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<DataQuality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_dtype: Option<String>,
}

/// Width and height of a raster or depth map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// Signed width and height; a window computed from an out-of-bounds
/// rectangle can be empty or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub width: i64,
    pub height: i64,
}

impl Extent {
    pub fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    pub fn of_window(window: &CropWindow) -> Self {
        Self {
            width: window.width(),
            height: window.height(),
        }
    }
}

/// Crop box in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBox {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub right: i64,
    pub bottom: i64,
}

impl CropBox {
    /// Every edge of the rectangle rounded independently.
    pub fn rounded(rect: &CropRect) -> Self {
        Self {
            x: round_half_up(rect.x) as i64,
            y: round_half_up(rect.y) as i64,
            width: round_half_up(rect.width) as i64,
            height: round_half_up(rect.height) as i64,
            right: round_half_up(rect.right()) as i64,
            bottom: round_half_up(rect.bottom()) as i64,
        }
    }
}

/// Rounded rectangle extent against the extracted window extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderValidation {
    pub expected: Extent,
    pub actual: Extent,
    pub width_diff: i64,
    pub height_diff: i64,
}

impl BorderValidation {
    pub fn new(expected: Extent, actual: Extent) -> Self {
        Self {
            expected,
            actual,
            width_diff: expected.width.saturating_sub(actual.width).saturating_abs(),
            height_diff: expected.height.saturating_sub(actual.height).saturating_abs(),
        }
    }
}

/// Share of depth samples that are finite numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    pub total_pixels: usize,
    pub valid_pixels: usize,
    pub valid_percentage: f64,
}
