//! Validate a crop rectangle.

use rgbd_crop_core::config::CropperConfig;
use rgbd_crop_core::validation::{validate_with, ValidationReport};

use crate::CropInput;

pub fn run(input: &CropInput, config: &CropperConfig, json: bool) -> anyhow::Result<()> {
    let raster = super::load_raster(&input.rgb)?;
    let depth = super::load_depth(&input.depth)?;

    let report = validate_with(
        &config.validation,
        raster.image.width,
        raster.image.height,
        &depth,
        &input.rect,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Validating crop of {} ({}x{}) with {}",
            raster.file_name,
            raster.image.width,
            raster.image.height,
            input.depth.display()
        );
        print_report(&report);
    }

    if !report.is_valid {
        anyhow::bail!("{} validation issue(s) found", report.issues.len());
    }
    Ok(())
}

/// Human-readable report.
pub fn print_report(report: &ValidationReport) {
    let details = &report.details;
    if let Some(window) = details.cropped_dimensions {
        println!("  Cropped size: {}x{}", window.width, window.height);
    }
    if let Some(area) = details.area_percent {
        println!("  Area: {area}% of the image");
    }
    if let Some(quality) = details.data_quality {
        println!(
            "  Depth quality: {}/{} valid ({}%)",
            quality.valid_pixels, quality.total_pixels, quality.valid_percentage
        );
    }

    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &report.warnings {
            println!("  - {warning}");
        }
    }

    if report.is_valid {
        println!("\nCrop is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgbd_crop_core::geometry::CropRect;
    use rgbd_crop_core::npy::encode_npy;
    use rgbd_crop_core::raster::{encode_png, RasterImage};
    use std::fs;
    use std::path::Path;

    fn write_inputs(dir: &Path, depth_width: usize) -> (std::path::PathBuf, std::path::PathBuf) {
        let rgb = dir.join("rgb.png");
        let depth = dir.join("depth.npy");
        fs::write(
            &rgb,
            encode_png(&RasterImage::new(20, 10, vec![0u8; 20 * 10 * 4])).unwrap(),
        )
        .unwrap();
        fs::write(
            &depth,
            encode_npy(&vec![1.0; depth_width * 10], &[10, depth_width]).unwrap(),
        )
        .unwrap();
        (rgb, depth)
    }

    #[test]
    fn test_valid_crop_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let (rgb, depth) = write_inputs(dir.path(), 20);
        let input = CropInput {
            rgb,
            depth,
            rect: CropRect::new(2.0, 2.0, 10.0, 5.0),
        };
        assert!(run(&input, &CropperConfig::default(), false).is_ok());
    }

    #[test]
    fn test_invalid_crop_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (rgb, depth) = write_inputs(dir.path(), 15);
        let input = CropInput {
            rgb,
            depth,
            rect: CropRect::new(2.0, 2.0, 10.0, 5.0),
        };
        let err = run(&input, &CropperConfig::default(), true).unwrap_err();
        assert_eq!(err.to_string(), "1 validation issue(s) found");
    }
}
