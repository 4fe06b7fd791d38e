// src/main.rs

//! `assetbake`: bakes source art into the raw binary assets used by the
//! embedded desktop renderer.
//!
//! - `assetbake convert <INPUT> <OUTPUT>` converts one image to raw RGB8.
//! - `assetbake fonts` generates the bitmap font atlases.
//! - `assetbake batch` (the default) runs the whole layout table and fonts.

// Declare modules
pub mod bitmap;
pub mod config;
pub mod font;
pub mod layout;
pub mod pipeline;
pub mod raster;
pub mod region;

use crate::config::Config;
use crate::pipeline::{convert_file, run_batch, run_fonts, BatchReport};
use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

/// Converts images and bitmap fonts into raw renderer assets.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON configuration file; built-in defaults are used when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured output directory
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a single image to raw RGB8
    Convert {
        /// Source image (PNG or JPEG)
        input: PathBuf,
        /// Destination file
        output: PathBuf,
        /// Output width in pixels
        #[arg(long, default_value_t = 64)]
        width: u32,
        /// Output height in pixels
        #[arg(long, default_value_t = 64)]
        height: u32,
    },
    /// Generate font atlases from the hex base font
    Fonts,
    /// Convert every asset in the layout table and generate fonts
    Batch,
}

fn print_summary(report: &BatchReport) {
    for path in &report.written {
        println!("  {}", path.display());
    }
    println!("Done: {}", report);
}

/// Main entry point for `assetbake`.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    // clap prints usage and exits non-zero on bad arguments.
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    // Command-line output directory beats the config file.
    if let Some(dir) = args.output_dir {
        info!("Output directory overridden: {}", dir.display());
        config.paths.output_dir = dir;
    }

    // No subcommand means a full batch run.
    match args.command.unwrap_or(Command::Batch) {
        Command::Convert {
            input,
            output,
            width,
            height,
        } => {
            convert_file(&input, &output, (width, height), &config.color_key)?;
            println!("Wrote {}", output.display());
        }
        Command::Fonts => {
            let report = run_fonts(&config)?;
            print_summary(&report);
        }
        Command::Batch => {
            let report = run_batch(&config)?;
            print_summary(&report);
        }
    }

    Ok(())
}
