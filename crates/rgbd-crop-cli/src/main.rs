//! rgbd-crop CLI: inspect, validate and export paired RGB/depth crops.
//!
//! Usage:
//!   rgbd-crop inspect <DEPTH>                                   Show a depth file's layout
//!   rgbd-crop validate --rgb <IMG> --depth <NPY> --rect x,y,w,h Check a crop
//!   rgbd-crop export --rgb <IMG> --depth <NPY> --rect x,y,w,h   Write an export bundle
//!   rgbd-crop export ... --zip                                  Write it as one .zip

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rgbd_crop_core::geometry::CropRect;

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "rgbd-crop",
    about = "Crop an RGB image and its depth map in lockstep",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print reports and metadata as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as structured JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file (JSON) with validation thresholds and export names
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show dtype, shape and data quality of a depth file
    Inspect {
        /// Path to the .npy depth file
        depth: PathBuf,
    },

    /// Validate a crop rectangle against an RGB image and depth file
    Validate {
        #[command(flatten)]
        input: CropInput,
    },

    /// Validate, then write the export bundle to disk
    Export {
        #[command(flatten)]
        input: CropInput,

        /// Directory the bundle is created in
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Write a single <folder>.zip instead of a folder
        #[arg(long)]
        zip: bool,
    },
}

/// The three inputs every crop needs.
#[derive(clap::Args, Debug, Clone)]
pub struct CropInput {
    /// RGB image (.png, .jpg or .jpeg)
    #[arg(long)]
    pub rgb: PathBuf,

    /// Depth map (.npy)
    #[arg(long)]
    pub depth: PathBuf,

    /// Crop rectangle in raster pixels: x,y,width,height
    #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
    pub rect: CropRect,
}

/// Parse `x,y,width,height`.
fn parse_rect(s: &str) -> Result<CropRect, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid number in rectangle '{s}': {e}"))?;

    match parts.as_slice() {
        [x, y, width, height] if parts.iter().all(|v| v.is_finite()) => {
            Ok(CropRect::new(*x, *y, *width, *height))
        }
        [_, _, _, _] => Err(format!("rectangle '{s}' must contain finite numbers")),
        _ => Err(format!(
            "rectangle must be x,y,width,height, got {} value(s)",
            parts.len()
        )),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(&logging::LoggingConfig::from_flags(cli.verbose, cli.log_json));

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { depth } => commands::inspect::run(&depth, cli.json),
        Commands::Validate { input } => commands::validate::run(&input, &config, cli.json),
        Commands::Export { input, output, zip } => {
            let layout = if zip {
                commands::export::Layout::Zip
            } else {
                commands::export::Layout::Folder
            };
            commands::export::run(&input, &output, layout, &config, cli.json)
        }
    }
}
