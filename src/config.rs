// src/config.rs

//! Configuration for the asset pipeline.
//!
//! Every field has a default matching the desktop shell's asset layout, so
//! running without a config file produces the standard asset set. A JSON
//! file may override any subset of fields:
//!
//! ```json
//! {
//!   "paths": { "source_dirs": ["art"], "output_dir": "build/assets" },
//!   "color_key": { "threshold": 16 }
//! }
//! ```
//!
//! The loaded value is passed down explicitly; nothing here is global.

use crate::font::metrics::{descriptor_for, FontSizeDescriptor, TERMINUS_SIZES};
use crate::layout::{default_layout, LayoutRule, STANDARD_ICON_SIZE};
use crate::raster::ColorKey;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where sources are searched and outputs written.
    pub paths: PathsConfig,
    /// Color-key thresholds for raster conversion.
    pub color_key: ColorKey,
    /// Icon defaults.
    pub icons: IconConfig,
    /// Font atlas generation.
    pub fonts: FontConfig,
    /// Ordered source → output rules. Later rules override earlier outputs.
    pub layout: Vec<LayoutRule>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            paths: PathsConfig::default(),
            color_key: ColorKey::default(),
            icons: IconConfig::default(),
            fonts: FontConfig::default(),
            layout: default_layout(),
        }
    }
}

impl Config {
    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Config::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        info!("Configuration loaded from '{}'", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// --- Paths ---

/// Source search order and output location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directories searched in order for each source file; the first hit wins.
    pub source_dirs: Vec<PathBuf>,
    /// Directory receiving every generated asset. Created if missing.
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            source_dirs: vec![
                PathBuf::from("assets/src"),
                PathBuf::from("assets"),
                PathBuf::from("."),
            ],
            output_dir: PathBuf::from("assets/out"),
        }
    }
}

// --- Icons ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Edge length used when a layout entry has no explicit size.
    pub default_size: u32,
}

impl Default for IconConfig {
    fn default() -> Self {
        IconConfig {
            default_size: STANDARD_ICON_SIZE,
        }
    }
}

// --- Fonts ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Hex dump of the base-size atlas, looked up like any other source.
    pub hex_source: String,
    /// Atlases are named `<file_prefix><size>.bin`, their `MonoFont`
    /// modules `<file_prefix><size>.rs`.
    pub file_prefix: String,
    /// Sizes to emit. Each must be one of the supported sizes.
    pub sizes: Vec<u32>,
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            // Base size only; every other size is scaled from it.
            hex_source: "font_terminus_12.hex".to_string(),
            file_prefix: "font_terminus_".to_string(),
            sizes: TERMINUS_SIZES.iter().map(|d| d.size).collect(), // All six
        }
    }
}

impl FontConfig {
    /// Descriptors for the configured sizes, in table order. Unsupported
    /// sizes are reported and skipped.
    pub fn selected_sizes(&self) -> Vec<FontSizeDescriptor> {
        // Warn once per bad entry; the filter below drops them.
        for size in &self.sizes {
            if descriptor_for(&TERMINUS_SIZES, *size).is_none() {
                warn!("Font size {} is not supported; skipping", size);
            }
        }
        TERMINUS_SIZES
            .iter()
            .filter(|d| self.sizes.contains(&d.size))
            .copied()
            .collect()
    }
}
