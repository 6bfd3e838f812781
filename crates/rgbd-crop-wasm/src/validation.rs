//! Validation WASM bindings.
//!
//! Reports are returned as plain JS objects with camelCase fields
//! (`isValid`, `issues`, `warnings`, `details`).

use rgbd_crop_core::config::ValidationThresholds;
use rgbd_crop_core::validation::{validate_with, ValidationReport};
use wasm_bindgen::prelude::*;

use crate::depth::JsDepthArray;
use crate::geometry::JsCropGeometry;
use crate::js_error;

/// Validate the current crop with the default thresholds.
///
/// Returns the incomplete report when no rectangle has been drawn yet.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const report = validate(img.naturalWidth, img.naturalHeight, depth, geometry);
/// report.issues.forEach((issue) => showError(issue));
/// downloadButton.disabled = !report.isValid;
/// ```
#[wasm_bindgen]
pub fn validate(
    raster_width: u32,
    raster_height: u32,
    depth: &JsDepthArray,
    geometry: &JsCropGeometry,
) -> Result<JsValue, JsValue> {
    let report = build_report(
        &ValidationThresholds::default(),
        raster_width,
        raster_height,
        depth,
        geometry,
    );
    report_to_js(&report)
}

/// Validate with custom thresholds.
///
/// `thresholds` is an object with any of `min_area_percent`,
/// `max_area_percent`, `min_valid_depth_percent` and
/// `max_border_adjustment_px`; missing fields keep their defaults.
#[wasm_bindgen]
pub fn validate_with_thresholds(
    thresholds: JsValue,
    raster_width: u32,
    raster_height: u32,
    depth: &JsDepthArray,
    geometry: &JsCropGeometry,
) -> Result<JsValue, JsValue> {
    let thresholds: ValidationThresholds = serde_wasm_bindgen::from_value(thresholds)
        .map_err(|e| js_error("Invalid validation thresholds", e))?;
    let report = build_report(&thresholds, raster_width, raster_height, depth, geometry);
    report_to_js(&report)
}

/// The report to show before a raster, depth file and rectangle all exist.
#[wasm_bindgen]
pub fn incomplete_report() -> Result<JsValue, JsValue> {
    report_to_js(&ValidationReport::incomplete())
}

pub(crate) fn build_report(
    thresholds: &ValidationThresholds,
    raster_width: u32,
    raster_height: u32,
    depth: &JsDepthArray,
    geometry: &JsCropGeometry,
) -> ValidationReport {
    match geometry.rect() {
        Some(rect) => validate_with(thresholds, raster_width, raster_height, depth.inner(), &rect),
        None => ValidationReport::incomplete(),
    }
}

fn report_to_js(report: &ValidationReport) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(report).map_err(|e| js_error("Failed to serialize report", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgbd_crop_core::npy::NumericArray;
    use rgbd_crop_core::validation::INCOMPLETE_ISSUE;

    fn depth(width: usize, height: usize) -> JsDepthArray {
        let array = NumericArray::from_f32(vec![height, width], vec![1.0; width * height]).unwrap();
        JsDepthArray::from_array(array)
    }

    fn dragged(x0: f64, y0: f64, x1: f64, y1: f64) -> JsCropGeometry {
        let mut geometry = JsCropGeometry::new(100, 100);
        geometry.pointer_down(x0, y0);
        geometry.pointer_move(x1, y1);
        geometry.pointer_up();
        geometry
    }

    #[test]
    fn test_no_rect_is_incomplete() {
        let geometry = JsCropGeometry::new(100, 100);
        let report = build_report(
            &ValidationThresholds::default(),
            100,
            100,
            &depth(100, 100),
            &geometry,
        );
        assert!(!report.is_valid);
        assert_eq!(report.issues, vec![INCOMPLETE_ISSUE.to_string()]);
    }

    #[test]
    fn test_valid_drag() {
        let report = build_report(
            &ValidationThresholds::default(),
            100,
            100,
            &depth(100, 100),
            &dragged(10.0, 10.0, 60.0, 50.0),
        );
        assert!(report.is_valid, "{:?}", report.issues);
        assert_eq!(report.details.area_percent, Some(20.0));
    }

    #[test]
    fn test_mismatched_depth_blocks() {
        let report = build_report(
            &ValidationThresholds::default(),
            100,
            100,
            &depth(50, 50),
            &dragged(10.0, 10.0, 30.0, 30.0),
        );
        assert!(!report.is_valid);
        assert_eq!(
            report.issues[0],
            "RGB and Depth dimensions do not match: RGB (100x100) vs Depth (50x50)"
        );
    }
}
