//! Subcommand implementations and the file loading they share.

pub mod export;
pub mod inspect;
pub mod validate;

use std::fs;
use std::path::Path;

use anyhow::Context;
use rgbd_crop_core::config::CropperConfig;
use rgbd_crop_core::npy::{decode_npy, NumericArray};
use rgbd_crop_core::raster::{decode_raster_file, RasterImage};

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CropperConfig> {
    let Some(path) = path else {
        return Ok(CropperConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = CropperConfig::from_json(&text)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Read and decode a `.npy` depth file.
pub fn load_depth(path: &Path) -> anyhow::Result<NumericArray> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read depth file {}", path.display()))?;
    decode_npy(&bytes).with_context(|| format!("Failed to load depth file {}", path.display()))
}

/// A raster file's name and bytes, plus its decoded form.
pub struct LoadedRaster {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub image: RasterImage,
}

/// Read and decode an RGB image; the extension picks the decoder.
pub fn load_raster(path: &Path) -> anyhow::Result<LoadedRaster> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    let image = decode_raster_file(&file_name, &bytes)
        .with_context(|| format!("Failed to load image {}", path.display()))?;

    Ok(LoadedRaster {
        file_name,
        bytes,
        image,
    })
}
