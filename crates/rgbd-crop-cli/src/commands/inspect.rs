//! Show the layout of a depth file.

use std::path::Path;

use rgbd_crop_core::npy::NumericArray;
use serde_json::json;

pub fn run(path: &Path, json: bool) -> anyhow::Result<()> {
    let depth = super::load_depth(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary(&depth))?);
        return Ok(());
    }

    println!("Depth file: {}", path.display());
    println!("  Dtype: {:?} ({})", depth.dtype(), depth.descr());
    if !depth.is_dtype_recognized() {
        println!("  Note: unrecognized dtype, values were read as float32");
    }
    println!("  Shape: {:?}", depth.shape());
    match depth.depth_dimensions() {
        Ok(dims) => println!("  Depth map: {}x{}", dims.width, dims.height),
        Err(e) => println!("  Depth map: {e}"),
    }
    println!("  Elements: {}", depth.len());
    println!(
        "  Finite: {} ({:.1}%)",
        depth.data().count_finite(),
        finite_percent(&depth)
    );

    Ok(())
}

fn finite_percent(depth: &NumericArray) -> f64 {
    if depth.is_empty() {
        return 0.0;
    }
    depth.data().count_finite() as f64 / depth.len() as f64 * 100.0
}

fn summary(depth: &NumericArray) -> serde_json::Value {
    let dims = depth.depth_dimensions().ok();
    json!({
        "dtype": depth.dtype(),
        "descr": depth.descr(),
        "dtypeRecognized": depth.is_dtype_recognized(),
        "shape": depth.shape(),
        "width": dims.map(|d| d.width),
        "height": dims.map(|d| d.height),
        "elements": depth.len(),
        "finite": depth.data().count_finite(),
        "finitePercent": finite_percent(depth),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let depth = NumericArray::from_f32(vec![2, 2, 1], vec![1.0, f32::NAN, 2.0, 3.0]).unwrap();
        let value = summary(&depth);

        assert_eq!(value["dtype"], "float32");
        assert_eq!(value["descr"], "<f4");
        assert_eq!(value["shape"], json!([2, 2, 1]));
        assert_eq!(value["width"], 2);
        assert_eq!(value["finite"], 3);
        assert_eq!(value["finitePercent"], 75.0);
    }

    #[test]
    fn test_summary_unsupported_shape() {
        let depth = NumericArray::from_f32(vec![4], vec![0.0; 4]).unwrap();
        let value = summary(&depth);
        assert!(value["width"].is_null());
    }

    #[test]
    fn test_empty_array_percent() {
        let depth = NumericArray::from_f32(vec![0, 5], vec![]).unwrap();
        assert_eq!(finite_percent(&depth), 0.0);
    }
}
