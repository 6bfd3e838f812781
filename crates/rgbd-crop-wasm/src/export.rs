//! Export bundle WASM bindings.
//!
//! The bundle is assembled in WASM memory. The shell either downloads the
//! single archive from `zip_bytes` or reads the files it lists one by one.

use chrono::{DateTime, Utc};
use rgbd_crop_core::config::ExportSettings;
use rgbd_crop_core::export::{export_bundle_with, ExportBundle, RasterSource, CROP_DIR};
use rgbd_crop_core::validation::ValidationReport;
use wasm_bindgen::prelude::*;

use crate::depth::JsDepthArray;
use crate::geometry::JsCropGeometry;
use crate::js_error;

/// An assembled export bundle.
#[wasm_bindgen]
pub struct JsExportBundle {
    inner: ExportBundle,
    metadata_path: String,
}

#[wasm_bindgen]
impl JsExportBundle {
    /// Folder name, e.g. `rgbd_crop_2024-01-15T10-30-45`.
    #[wasm_bindgen(getter)]
    pub fn folder_name(&self) -> String {
        self.inner.folder_name.clone()
    }

    /// Relative file paths, originals first.
    pub fn paths(&self) -> js_sys::Array {
        self.path_list()
            .iter()
            .map(|path| JsValue::from_str(path))
            .collect()
    }

    /// Bytes of the file at `path`, or `undefined` if there is none.
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.file(path).map(<[u8]>::to_vec)
    }

    /// Number of files in the bundle.
    #[wasm_bindgen(getter)]
    pub fn file_count(&self) -> usize {
        self.inner.files().count()
    }

    /// The metadata record as pretty-printed JSON.
    #[wasm_bindgen(getter)]
    pub fn metadata_json(&self) -> String {
        self.inner
            .file(&self.metadata_path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }

    /// Archive name, `<folder_name>.zip`.
    #[wasm_bindgen(getter)]
    pub fn zip_file_name(&self) -> String {
        self.inner.zip_file_name()
    }

    /// The whole bundle as one zip archive, files under `<folder_name>/`.
    pub fn zip_bytes(&self) -> Result<Vec<u8>, JsValue> {
        self.inner
            .to_zip()
            .map_err(|e| js_error("Failed to build zip archive", e))
    }

    /// The metadata record as a JS object.
    pub fn metadata(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.metadata)
            .map_err(|e| js_error("Failed to serialize metadata", e))
    }
}

impl JsExportBundle {
    pub(crate) fn path_list(&self) -> Vec<String> {
        self.inner.files().map(|(path, _)| path).collect()
    }
}

/// Build the export bundle for a validated crop.
///
/// `report` must be the object returned by `validate` for the current
/// rectangle; exports are refused when it is invalid or stale.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const bundle = export_bundle(rgbFile.name, rgbBytes, depth, geometry, report);
/// const blob = new Blob([bundle.zip_bytes()], { type: "application/zip" });
/// download(blob, bundle.zip_file_name);
/// ```
#[wasm_bindgen]
pub fn export_bundle(
    raster_name: &str,
    raster_bytes: &[u8],
    depth: &JsDepthArray,
    geometry: &JsCropGeometry,
    report: JsValue,
) -> Result<JsExportBundle, JsValue> {
    let report: ValidationReport = serde_wasm_bindgen::from_value(report)
        .map_err(|e| js_error("Invalid validation report", e))?;
    build_bundle(raster_name, raster_bytes, depth, geometry, &report, Utc::now())
        .map_err(|e| js_error("Export failed", e))
}

pub(crate) fn build_bundle(
    raster_name: &str,
    raster_bytes: &[u8],
    depth: &JsDepthArray,
    geometry: &JsCropGeometry,
    report: &ValidationReport,
    timestamp: DateTime<Utc>,
) -> Result<JsExportBundle, String> {
    let rect = geometry
        .rect()
        .ok_or_else(|| "No crop area defined".to_string())?;
    let settings = ExportSettings::default();

    let inner = export_bundle_with(
        &settings,
        RasterSource::new(raster_name, raster_bytes),
        depth.inner(),
        &rect,
        report,
        timestamp,
    )
    .map_err(|e| e.to_string())?;

    Ok(JsExportBundle {
        inner,
        metadata_path: format!("{CROP_DIR}/{}", settings.metadata_file_name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rgbd_crop_core::npy::NumericArray;
    use rgbd_crop_core::raster::{encode_png, RasterImage};
    use rgbd_crop_core::validation::validate;

    fn fixture() -> (Vec<u8>, JsDepthArray, JsCropGeometry) {
        let png = encode_png(&RasterImage::new(16, 12, vec![40u8; 16 * 12 * 4])).unwrap();
        let depth = JsDepthArray::from_array(
            NumericArray::from_f32(vec![12, 16], vec![2.0; 16 * 12]).unwrap(),
        );
        let mut geometry = JsCropGeometry::new(16, 12);
        geometry.pointer_down(2.0, 2.0);
        geometry.pointer_move(10.0, 8.0);
        geometry.pointer_up();
        (png, depth, geometry)
    }

    fn time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 5).unwrap()
    }

    #[test]
    fn test_build_bundle() {
        let (png, depth, geometry) = fixture();
        let report = validate(16, 12, depth.inner(), &geometry.rect().unwrap());

        let bundle = build_bundle("rgb.png", &png, &depth, &geometry, &report, time()).unwrap();
        assert_eq!(bundle.folder_name(), "rgbd_crop_2025-03-01T08-00-05");
        assert_eq!(bundle.file_count(), 5);
        assert_eq!(bundle.path_list()[4], "crop/crop_metadata.json");
        assert_eq!(bundle.file("original/rgb.png"), Some(png));
        assert!(bundle.metadata_json().contains("\"folderName\": \"rgbd_crop_2025-03-01T08-00-05\""));
    }

    #[test]
    fn test_bundle_zip() {
        let (png, depth, geometry) = fixture();
        let report = validate(16, 12, depth.inner(), &geometry.rect().unwrap());
        let bundle = build_bundle("rgb.png", &png, &depth, &geometry, &report, time()).unwrap();

        assert_eq!(bundle.zip_file_name(), "rgbd_crop_2025-03-01T08-00-05.zip");
        let zip = bundle.inner.to_zip().unwrap();
        // Local file header signature
        assert_eq!(&zip[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_build_bundle_without_rect() {
        let (png, depth, _) = fixture();
        let geometry = JsCropGeometry::new(16, 12);
        let err = build_bundle(
            "rgb.png",
            &png,
            &depth,
            &geometry,
            &ValidationReport::incomplete(),
            time(),
        )
        .err()
        .unwrap();
        assert_eq!(err, "No crop area defined");
    }

    #[test]
    fn test_build_bundle_blocked() {
        let (png, depth, geometry) = fixture();
        let err = build_bundle(
            "rgb.png",
            &png,
            &depth,
            &geometry,
            &ValidationReport::incomplete(),
            time(),
        )
        .err()
        .unwrap();
        assert!(err.starts_with("Validation failed"));
    }
}
