// src/pipeline.rs

//! Drives conversions: locates sources, runs the layout table and font
//! generation, and writes the resolved outputs.
//!
//! Failure handling follows three tiers. A source missing from every search
//! directory is skipped. A source that fails to decode, or an entry whose
//! crop does not fit, fails that rule's remaining entries while the batch
//! carries on. Failing to write output is fatal for the whole run.

use crate::config::Config;
use crate::font::metrics::{atlas_file_name, module_file_name, render_font_module, TERMINUS_SIZES};
use crate::font::{base_atlas, generate_font_set, GlyphGrid};
use crate::layout::{resolve_outputs, LayoutEntry, Produced};
use crate::raster::{convert, ColorKey};
use crate::region::crop;
use anyhow::{Context, Result};
use image::{DynamicImage, ImageReader};
use log::{debug, error, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Tally of a batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Entries converted successfully (before override resolution).
    pub converted: usize,
    /// Entries whose source could not be found.
    pub skipped: usize,
    /// Entries that failed to decode or convert.
    pub failed: usize,
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
}

impl BatchReport {
    pub fn merge(&mut self, other: BatchReport) {
        self.converted += other.converted;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.written.extend(other.written);
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} converted, {} skipped, {} failed, {} files written",
            self.converted,
            self.skipped,
            self.failed,
            self.written.len()
        )
    }
}

/// Returns the first `dirs[i]/name` that exists.
pub fn find_source(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter().map(|dir| dir.join(name)).find(|candidate| {
        let found = candidate.is_file();
        debug!("Looking for {}: {}", candidate.display(), found);
        found
    })
}

/// Decodes an image, sniffing the format from its contents.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)
        .with_context(|| format!("Failed to open '{}'", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read '{}'", path.display()))?
        .decode()
        .with_context(|| format!("Failed to decode '{}'", path.display()))
}

/// Writes `data` to `dir/name`, creating directories as needed.
fn write_output(dir: &Path, name: &str, data: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    fs::write(&path, data).with_context(|| format!("Failed to write '{}'", path.display()))?;
    Ok(path)
}

fn convert_entry(image: &DynamicImage, entry: &LayoutEntry, config: &Config) -> Result<Vec<u8>> {
    let region = crop(image.clone(), entry.crop)?;
    let edge = entry.edge(config.icons.default_size);
    let raw = convert(&region, (edge, edge), &config.color_key)?;
    Ok(raw.pixels)
}

/// Runs every layout rule in order, then writes one file per output name
/// holding the last rule's result.
pub fn run_layout(config: &Config) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    let mut produced = Vec::new();

    for rule in &config.layout {
        // Missing source: skip every entry of the rule.
        let Some(path) = find_source(&rule.source, &config.paths.source_dirs) else {
            warn!(
                "Skipping {}: not found in {:?}",
                rule.source, config.paths.source_dirs
            );
            report.skipped += rule.entries.len();
            continue;
        };

        // Undecodable source: the rule's entries all fail.
        let image = match load_image(&path) {
            Ok(image) => image,
            Err(e) => {
                error!("Skipping {}: {:#}", rule.source, e);
                report.failed += rule.entries.len();
                continue;
            }
        };

        for (i, entry) in rule.entries.iter().enumerate() {
            match convert_entry(&image, entry, config) {
                Ok(data) => {
                    let edge = entry.edge(config.icons.default_size);
                    info!("{} -> {} ({}x{})", rule.source, entry.output, edge, edge);
                    report.converted += 1;
                    produced.push(Produced {
                        output: entry.output.clone(),
                        source: rule.source.clone(),
                        data,
                    });
                }
                Err(e) => {
                    // This entry and the ones after it count as failed.
                    let remaining = rule.entries.len() - i;
                    error!(
                        "{} -> {} failed: {:#}; abandoning {} remaining entries",
                        rule.source, entry.output, e, remaining
                    );
                    report.failed += remaining;
                    break;
                }
            }
        }
    }

    // Nothing is written until every rule has run, so overridden outputs
    // never touch the disk.
    for item in resolve_outputs(produced) {
        let path = write_output(&config.paths.output_dir, &item.output, &item.data)?;
        debug!("Wrote {} bytes to {}", item.data.len(), path.display());
        report.written.push(path);
    }

    Ok(report)
}

/// Generates every configured font size from the hex base atlas and writes
/// each atlas with its `MonoFont` module.
pub fn run_fonts(config: &Config) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    let fonts = &config.fonts;

    let Some(path) = find_source(&fonts.hex_source, &config.paths.source_dirs) else {
        warn!(
            "Skipping fonts: {} not found in {:?}",
            fonts.hex_source, config.paths.source_dirs
        );
        report.skipped += 1;
        return Ok(report);
    };

    let selected = fonts.selected_sizes();
    // Scale the full table; the selection only filters what gets written.
    let atlases = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read '{}'", path.display()))
        .and_then(|text| base_atlas(&text, &TERMINUS_SIZES))
        .and_then(|base| generate_font_set(&base, &TERMINUS_SIZES));
    let atlases = match atlases {
        Ok(atlases) => atlases,
        Err(e) => {
            error!("Skipping fonts: {:#}", e);
            report.failed += selected.len();
            return Ok(report);
        }
    };

    let grid = GlyphGrid::ascii();
    for atlas in atlases
        .iter()
        .filter(|a| selected.iter().any(|d| d.size == a.descriptor.size))
    {
        let size = atlas.descriptor.size;
        let name = atlas_file_name(&fonts.file_prefix, size);
        let written = write_output(&config.paths.output_dir, &name, &atlas.data)?;
        info!(
            "{} -> {} ({} bytes)",
            fonts.hex_source,
            name,
            atlas.data.len()
        );
        report.converted += 1;
        report.written.push(written);

        // The module include_bytes! its atlas by bare file name.
        let module_name = module_file_name(&fonts.file_prefix, size);
        let module = render_font_module(&atlas.descriptor, &grid, &fonts.file_prefix);
        let written = write_output(&config.paths.output_dir, &module_name, module.as_bytes())?;
        debug!("Wrote MonoFont module {}", written.display());
        report.written.push(written);
    }

    Ok(report)
}

/// Runs the layout table and font generation.
pub fn run_batch(config: &Config) -> Result<BatchReport> {
    info!(
        "Batch: {} layout rules, output to {}",
        config.layout.len(),
        config.paths.output_dir.display()
    );
    let mut report = run_layout(config)?;
    report.merge(run_fonts(config)?);
    Ok(report)
}

/// Converts a single image to raw RGB8.
pub fn convert_file(input: &Path, output: &Path, size: (u32, u32), key: &ColorKey) -> Result<()> {
    // Unlike batch mode, any failure here is the command's failure.
    let image = load_image(input)?;
    let raw = convert(&image, size, key)
        .with_context(|| format!("Failed to convert '{}'", input.display()))?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    fs::write(output, &raw.pixels)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    info!(
        "{} -> {} ({}x{}, {} bytes)",
        input.display(),
        output.display(),
        raw.width,
        raw.height,
        raw.pixels.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests;
