//! Crop validation.
//!
//! [`validate`] checks a crop rectangle against the raster size and the
//! decoded depth array and returns a [`ValidationReport`]. It never fails:
//! every problem is collected into the report. Blocking problems go to
//! `issues`, advisory ones to `warnings`, and `is_valid` is true exactly when
//! there are no issues.
//!
//! # Check Order
//!
//! 1. Depth shape (`[H, W]` or `[H, W, 1]`)
//! 2. Raster/depth dimension match
//! 3. Rectangle bounds
//! 4. Area share
//! 5. Integer crop window
//! 6. Border reconciliation (rounded rectangle vs. window)
//! 7. Window bounds, re-checked on the integers
//! 8. Depth data quality
//! 9. Depth dtype recognition
//!
//! Steps 3 and 7 overlap on purpose. The rectangle check and the window
//! check guard two separately computed values.

mod report;

pub use report::{
    BorderValidation, CropBox, DataQuality, Dimensions, Extent, ValidationDetails,
    ValidationReport, INCOMPLETE_ISSUE,
};

use crate::config::ValidationThresholds;
use crate::geometry::{compute_crop_window, round2, round_half_up, CropRect};
use crate::npy::NumericArray;

/// Validate with the default thresholds.
///
/// # Example
///
/// ```
/// use rgbd_crop_core::geometry::CropRect;
/// use rgbd_crop_core::npy::NumericArray;
/// use rgbd_crop_core::validation::validate;
///
/// let depth = NumericArray::from_f32(vec![100, 100], vec![1.0; 10_000]).unwrap();
/// let report = validate(100, 100, &depth, &CropRect::new(10.0, 10.0, 50.0, 50.0));
/// assert!(report.is_valid);
/// ```
pub fn validate(
    raster_width: u32,
    raster_height: u32,
    depth: &NumericArray,
    rect: &CropRect,
) -> ValidationReport {
    validate_with(
        &ValidationThresholds::default(),
        raster_width,
        raster_height,
        depth,
        rect,
    )
}

/// Validate with explicit thresholds.
pub fn validate_with(
    thresholds: &ValidationThresholds,
    raster_width: u32,
    raster_height: u32,
    depth: &NumericArray,
    rect: &CropRect,
) -> ValidationReport {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut details = ValidationDetails::default();

    let raster_w = raster_width as f64;
    let raster_h = raster_height as f64;

    // 1. Depth shape
    let depth_dims = match depth.depth_dimensions() {
        Ok(dims) => Some(dims),
        Err(_) => {
            issues.push("Unsupported depth data format".to_string());
            None
        }
    };
    details.original_dimensions = Some(Dimensions::new(
        raster_width as usize,
        raster_height as usize,
    ));
    details.depth_dimensions = depth_dims.map(|d| Dimensions::new(d.width, d.height));

    // 2. Dimension match
    if let Some(dims) = depth_dims {
        if dims.width == raster_width as usize && dims.height == raster_height as usize {
            details.dimensions_match = true;
        } else {
            issues.push(format!(
                "RGB and Depth dimensions do not match: RGB ({}x{}) vs Depth ({}x{})",
                raster_width, raster_height, dims.width, dims.height
            ));
        }
    }

    // 3. Rectangle bounds
    details.crop_box = Some(CropBox::rounded(rect));
    if rect.x < 0.0 || rect.y < 0.0 {
        issues.push("Crop coordinates are negative".to_string());
    }
    if rect.right() > raster_w || rect.bottom() > raster_h {
        issues.push("Crop extends beyond image boundaries".to_string());
    }
    if rect.width <= 0.0 || rect.height <= 0.0 {
        issues.push("Crop dimensions are invalid (zero or negative)".to_string());
    }

    // 4. Area share
    let raster_area = raster_w * raster_h;
    if raster_area > 0.0 {
        let area_percent = (rect.width * rect.height) / raster_area * 100.0;
        details.area_percent = Some(round2(area_percent));

        if area_percent < thresholds.min_area_percent {
            warnings.push(format!(
                "Crop area is very small (< {}%)",
                thresholds.min_area_percent
            ));
        } else if area_percent > thresholds.max_area_percent {
            warnings.push(format!(
                "Crop area is very large (> {}%)",
                thresholds.max_area_percent
            ));
        }
    }

    // 5. Integer crop window
    let window = compute_crop_window(rect, raster_width, raster_height);
    let actual = Extent::of_window(&window);
    details.cropped_dimensions = Some(actual);

    // 6. Border reconciliation
    let expected = Extent::new(
        round_half_up(rect.width) as i64,
        round_half_up(rect.height) as i64,
    );
    let border = BorderValidation::new(expected, actual);
    details.border_validation = Some(border);

    let mut check_axis = |axis: &str, expected: i64, actual: i64, diff: i64| {
        if diff > thresholds.max_border_adjustment_px {
            issues.push(format!(
                "CRITICAL: {axis} dimension mismatch - expected {expected}, got {actual} ({diff}px difference)"
            ));
        } else if diff > 0 {
            warnings.push(format!(
                "BORDER ADJUSTMENT: {axis} adjusted by {diff}px ({expected} → {actual})"
            ));
        }
    };
    check_axis("Width", expected.width, actual.width, border.width_diff);
    check_axis("Height", expected.height, actual.height, border.height_diff);

    // 7. Window bounds on the integers
    if actual.width <= 0 || actual.height <= 0 {
        issues.push(format!(
            "CRITICAL: Invalid cropped dimensions - {} × {}",
            actual.width, actual.height
        ));
    }
    if actual.width > raster_width as i64 || actual.height > raster_height as i64 {
        issues.push("CRITICAL: Cropped dimensions exceed original image bounds".to_string());
    }
    if window.start_x < 0
        || window.start_y < 0
        || window.end_x > raster_width as i64
        || window.end_y > raster_height as i64
    {
        issues.push("CRITICAL: Crop coordinates extend beyond image boundaries".to_string());
    }

    // 8. Depth data quality
    let total = depth.len();
    if total > 0 {
        let valid = depth.data().count_finite();
        let valid_percentage = valid as f64 / total as f64 * 100.0;
        details.data_quality = Some(DataQuality {
            total_pixels: total,
            valid_pixels: valid,
            valid_percentage: round2(valid_percentage),
        });

        if valid_percentage < thresholds.min_valid_depth_percent {
            warnings.push(format!(
                "Low depth data quality: {:.1}% valid pixels",
                valid_percentage
            ));
        }
    }

    // 9. Dtype recognition
    details.depth_dtype = Some(depth.descr().to_string());
    if !depth.is_dtype_recognized() {
        warnings.push(format!(
            "Unrecognized depth dtype '{}': values were read as float32",
            depth.descr()
        ));
    }

    let report = ValidationReport::from_parts(issues, warnings, details);
    tracing::debug!(
        is_valid = report.is_valid,
        issues = report.issues.len(),
        warnings = report.warnings.len(),
        "validated crop"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npy::{ArrayData, NumericArray};

    fn depth(height: usize, width: usize) -> NumericArray {
        NumericArray::from_f32(vec![height, width], vec![1.0; height * width]).unwrap()
    }

    fn has_issue(report: &ValidationReport, needle: &str) -> bool {
        report.issues.iter().any(|i| i.contains(needle))
    }

    fn has_warning(report: &ValidationReport, needle: &str) -> bool {
        report.warnings.iter().any(|w| w.contains(needle))
    }

    #[test]
    fn test_clean_crop_is_valid() {
        let report = validate(100, 100, &depth(100, 100), &CropRect::new(10.0, 10.0, 50.0, 40.0));

        assert!(report.is_valid, "unexpected issues: {:?}", report.issues);
        assert!(report.warnings.is_empty());
        assert!(report.details.dimensions_match);
        assert_eq!(report.details.area_percent, Some(20.0));
        assert_eq!(report.details.cropped_dimensions, Some(Extent::new(50, 40)));
    }

    #[test]
    fn test_dimension_mismatch_blocks() {
        let report = validate(100, 100, &depth(50, 50), &CropRect::new(0.0, 0.0, 10.0, 10.0));

        assert!(!report.is_valid);
        assert!(has_issue(&report, "dimensions do not match"));
        assert!(has_issue(&report, "RGB (100x100) vs Depth (50x50)"));
        assert!(!report.details.dimensions_match);
    }

    #[test]
    fn test_rank_three_trailing_singleton_accepted() {
        let arr = NumericArray::from_f32(vec![20, 30, 1], vec![0.5; 600]).unwrap();
        let report = validate(30, 20, &arr, &CropRect::new(0.0, 0.0, 10.0, 10.0));
        assert!(report.is_valid, "unexpected issues: {:?}", report.issues);
        assert_eq!(report.details.depth_dimensions, Some(Dimensions::new(30, 20)));
    }

    #[test]
    fn test_unsupported_shape_skips_dimension_check() {
        let arr = NumericArray::from_f32(vec![10, 10, 3], vec![0.0; 300]).unwrap();
        let report = validate(10, 10, &arr, &CropRect::new(0.0, 0.0, 5.0, 5.0));

        assert!(!report.is_valid);
        assert_eq!(report.issues, vec!["Unsupported depth data format".to_string()]);
        assert!(report.details.depth_dimensions.is_none());
    }

    #[test]
    fn test_border_tolerance_is_warning() {
        let report = validate(100, 100, &depth(100, 100), &CropRect::new(0.0, 0.0, 10.5, 20.0));

        assert!(report.is_valid, "unexpected issues: {:?}", report.issues);
        let border = report.details.border_validation.unwrap();
        assert_eq!(border.expected, Extent::new(11, 20));
        assert_eq!(border.actual, Extent::new(10, 20));
        assert_eq!(border.width_diff, 1);
        assert!(has_warning(&report, "Width adjusted by 1px (11 → 10)"));
    }

    #[test]
    fn test_negative_origin_blocks() {
        let report = validate(100, 100, &depth(100, 100), &CropRect::new(-5.0, 0.0, 10.0, 10.0));

        assert!(!report.is_valid);
        assert!(has_issue(&report, "negative"));
        assert!(has_issue(&report, "CRITICAL: Crop coordinates extend beyond image boundaries"));
        assert_eq!(report.details.crop_box.unwrap().x, -5);
    }

    #[test]
    fn test_overflowing_rect_is_critical() {
        let report = validate(100, 100, &depth(100, 100), &CropRect::new(90.0, 0.0, 30.0, 10.0));

        assert!(!report.is_valid);
        assert!(has_issue(&report, "Crop extends beyond image boundaries"));
        assert!(has_issue(
            &report,
            "CRITICAL: Width dimension mismatch - expected 30, got 10 (20px difference)"
        ));
        assert_eq!(report.details.cropped_dimensions, Some(Extent::new(10, 10)));
    }

    #[test]
    fn test_extreme_finite_rect_is_reported() {
        for rect in [
            CropRect::new(-1e300, 0.0, 2e300, 5.0),
            CropRect::new(0.0, -f64::MAX, 5.0, f64::MAX),
            CropRect::new(1e300, 1e300, 1e300, 1e300),
        ] {
            let report = validate(10, 10, &depth(10, 10), &rect);
            assert!(!report.is_valid, "{rect:?} should be blocked");
            assert!(has_issue(&report, "CRITICAL"));
        }
    }

    #[test]
    fn test_zero_size_rect_blocks() {
        let report = validate(100, 100, &depth(100, 100), &CropRect::new(5.0, 5.0, 0.0, 0.0));

        assert!(!report.is_valid);
        assert!(has_issue(&report, "Crop dimensions are invalid (zero or negative)"));
        assert!(has_issue(&report, "CRITICAL: Invalid cropped dimensions - 0 × 0"));
        assert!(has_warning(&report, "Crop area is very small (< 1%)"));
    }

    #[test]
    fn test_large_area_warns() {
        let report = validate(100, 100, &depth(100, 100), &CropRect::new(0.0, 0.0, 100.0, 100.0));
        assert!(report.is_valid);
        assert!(has_warning(&report, "Crop area is very large (> 95%)"));
        assert_eq!(report.details.area_percent, Some(100.0));
    }

    #[test]
    fn test_low_data_quality_warns() {
        let mut values = vec![1.0f32; 100];
        values[..20].fill(f32::NAN);
        let arr = NumericArray::from_f32(vec![10, 10], values).unwrap();

        let report = validate(10, 10, &arr, &CropRect::new(0.0, 0.0, 5.0, 5.0));
        assert!(report.is_valid);
        assert!(has_warning(&report, "Low depth data quality: 80.0% valid pixels"));

        let quality = report.details.data_quality.unwrap();
        assert_eq!(quality.total_pixels, 100);
        assert_eq!(quality.valid_pixels, 80);
        assert_eq!(quality.valid_percentage, 80.0);
    }

    #[test]
    fn test_integer_depth_is_fully_valid() {
        let arr = NumericArray::new(vec![4, 4], ArrayData::Uint8(vec![0; 16])).unwrap();
        let report = validate(4, 4, &arr, &CropRect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(report.details.data_quality.unwrap().valid_percentage, 100.0);
        assert_eq!(report.details.depth_dtype.as_deref(), Some("|u1"));
    }

    #[test]
    fn test_unrecognized_dtype_warns_without_blocking() {
        let arr = NumericArray::with_descr(
            "<f2".to_string(),
            vec![10, 10],
            ArrayData::Float32(vec![1.0; 100]),
        )
        .unwrap();
        let report = validate(10, 10, &arr, &CropRect::new(0.0, 0.0, 5.0, 5.0));

        assert!(report.is_valid);
        assert!(has_warning(&report, "Unrecognized depth dtype '<f2'"));
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = ValidationThresholds {
            max_border_adjustment_px: 0,
            ..Default::default()
        };
        let report = validate_with(
            &thresholds,
            100,
            100,
            &depth(100, 100),
            &CropRect::new(0.0, 0.0, 10.5, 20.0),
        );
        assert!(!report.is_valid);
        assert!(has_issue(&report, "CRITICAL: Width dimension mismatch"));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let arr = depth(60, 80);
        let rect = CropRect::new(3.3, 4.7, 20.5, 30.2);
        assert_eq!(validate(80, 60, &arr, &rect), validate(80, 60, &arr, &rect));
    }

    #[test]
    fn test_details_field_names() {
        let report = validate(100, 100, &depth(100, 100), &CropRect::new(10.0, 10.0, 20.0, 20.0));
        let value = serde_json::to_value(&report).unwrap();
        let details = &value["details"];

        assert_eq!(details["originalDimensions"]["width"], 100);
        assert_eq!(details["depthDimensions"]["height"], 100);
        assert_eq!(details["dimensionsMatch"], true);
        assert_eq!(details["cropBox"]["right"], 30);
        assert_eq!(details["cropBox"]["bottom"], 30);
        assert_eq!(details["areaPercent"], 4.0);
        assert_eq!(details["borderValidation"]["expected"]["width"], 20);
        assert_eq!(details["dataQuality"]["validPercentage"], 100.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
