//! Validate a crop and write its export bundle to disk.
//!
//! Output is staged inside the target directory and moved into place only
//! once every byte is written, so a failed export leaves nothing behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use rgbd_crop_core::config::CropperConfig;
use rgbd_crop_core::export::{export_bundle_with, ExportBundle, RasterSource};
use rgbd_crop_core::validation::validate_with;

use super::validate::print_report;
use crate::CropInput;

/// How the bundle lands on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// A `<folder_name>/` directory tree.
    Folder,
    /// A single `<folder_name>.zip` archive.
    Zip,
}

pub fn run(
    input: &CropInput,
    output: &Path,
    layout: Layout,
    config: &CropperConfig,
    json: bool,
) -> anyhow::Result<()> {
    let raster = super::load_raster(&input.rgb)?;
    let depth = super::load_depth(&input.depth)?;

    let report = validate_with(
        &config.validation,
        raster.image.width,
        raster.image.height,
        &depth,
        &input.rect,
    );
    if !report.is_valid {
        print_report(&report);
        anyhow::bail!("Validation failed: {}", report.issues.join(", "));
    }
    for warning in &report.warnings {
        tracing::warn!("{warning}");
    }

    let bundle = export_bundle_with(
        &config.export,
        RasterSource::new(&raster.file_name, &raster.bytes),
        &depth,
        &input.rect,
        &report,
        Utc::now(),
    )
    .context("Export failed")?;

    let target = match layout {
        Layout::Folder => write_bundle(&bundle, output)?,
        Layout::Zip => write_zip(&bundle, output)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&bundle.metadata)?);
    } else {
        println!("Exported to: {}", target.display());
        for (path, bytes) in bundle.files() {
            println!("  {path} ({} bytes)", bytes.len());
        }
    }
    Ok(())
}

/// Write every bundle file under `<output>/<folder_name>/`.
///
/// Files go to a hidden staging directory first, which is renamed to the
/// bundle folder once complete. An existing folder of the same name is an
/// error.
pub fn write_bundle(bundle: &ExportBundle, output: &Path) -> anyhow::Result<PathBuf> {
    let folder = output.join(&bundle.folder_name);
    ensure_vacant(&folder)?;
    let staging = tempfile::Builder::new()
        .prefix(".rgbd_crop_staging")
        .tempdir_in(prepare_output(output)?)
        .with_context(|| format!("Failed to create staging directory in {}", output.display()))?;

    for (path, bytes) in bundle.files() {
        let target = staging.path().join(&path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&target, bytes)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        tracing::debug!(path = %path, bytes = bytes.len(), "Staged bundle file");
    }

    fs::rename(staging.path(), &folder)
        .with_context(|| format!("Failed to move bundle into {}", folder.display()))?;
    tracing::info!(folder = %folder.display(), "Wrote export bundle");
    Ok(folder)
}

/// Write the bundle as `<output>/<folder_name>.zip`.
pub fn write_zip(bundle: &ExportBundle, output: &Path) -> anyhow::Result<PathBuf> {
    let target = output.join(bundle.zip_file_name());
    ensure_vacant(&target)?;
    let archive = bundle.to_zip().context("Export failed")?;

    let mut staged = tempfile::Builder::new()
        .prefix(".rgbd_crop_staging")
        .suffix(".zip")
        .tempfile_in(prepare_output(output)?)
        .with_context(|| format!("Failed to create staging file in {}", output.display()))?;
    staged
        .write_all(&archive)
        .with_context(|| format!("Failed to write {}", staged.path().display()))?;
    staged
        .persist_noclobber(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move archive into {}", target.display()))?;

    tracing::info!(archive = %target.display(), bytes = archive.len(), "Wrote export archive");
    Ok(target)
}

fn prepare_output(output: &Path) -> anyhow::Result<&Path> {
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;
    Ok(output)
}

fn ensure_vacant(target: &Path) -> anyhow::Result<()> {
    if target.exists() {
        anyhow::bail!("{} already exists", target.display());
    }
    Ok(())
}
