// src/layout.rs

//! The ordered table mapping source images to output assets.
//!
//! Rules run in declaration order. When two rules produce the same output
//! name the later one wins: this is how individually drawn title-bar buttons
//! replace the slices cut from the composite fallback sheet.

use crate::region::CropRect;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard desktop icon edge length.
pub const STANDARD_ICON_SIZE: u32 = 64;
/// Title-bar control edge length.
pub const BUTTON_ICON_SIZE: u32 = 20;
/// Pointer edge length; the compositor blits it as a fixed 24x24 block.
pub const CURSOR_SIZE: u32 = 24;
/// Boot/login logo edge length.
pub const LOGO_SIZE: u32 = 600;

/// One output produced from a rule's source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    /// Region of the source to use; the whole image when absent.
    #[serde(default)]
    pub crop: Option<CropRect>,
    /// Output file name, relative to the output directory.
    pub output: String,
    /// Square output edge length; the standard icon size when absent.
    #[serde(default)]
    pub size: Option<u32>,
}

impl LayoutEntry {
    pub fn new(output: &str) -> Self {
        Self {
            crop: None,
            output: output.to_string(),
            size: None,
        }
    }

    pub fn sized(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn cropped(mut self, rect: CropRect) -> Self {
        self.crop = Some(rect);
        self
    }

    /// Output edge length, falling back to `default_size`.
    pub fn edge(&self, default_size: u32) -> u32 {
        self.size.unwrap_or(default_size)
    }
}

/// A source image and the outputs cut from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRule {
    /// Source file name, looked up in the configured search directories.
    pub source: String,
    pub entries: Vec<LayoutEntry>,
}

impl LayoutRule {
    pub fn new(source: &str, entries: Vec<LayoutEntry>) -> Self {
        Self {
            source: source.to_string(),
            entries,
        }
    }
}

/// The built-in asset table for the desktop shell.
pub fn default_layout() -> Vec<LayoutRule> {
    let mut rules: Vec<LayoutRule> = ["system", "apps", "files", "network"]
        .iter()
        .map(|name| {
            LayoutRule::new(
                &format!("{}.png", name),
                vec![LayoutEntry::new(&format!("{}.bin", name)).sized(STANDARD_ICON_SIZE)],
            )
        })
        .collect();

    rules.push(LayoutRule::new(
        "cursor.png",
        vec![LayoutEntry::new("cursor.bin").sized(CURSOR_SIZE)],
    ));

    // Composite 1024x1024 sheet with close / minimize / maximize columns.
    rules.push(LayoutRule::new(
        "title_buttons.png",
        vec![
            LayoutEntry::new("btn_close.bin")
                .cropped(CropRect::new(0, 0, 341, 1024))
                .sized(BUTTON_ICON_SIZE),
            LayoutEntry::new("btn_min.bin")
                .cropped(CropRect::new(341, 0, 341, 1024))
                .sized(BUTTON_ICON_SIZE),
            LayoutEntry::new("btn_max.bin")
                .cropped(CropRect::new(682, 0, 342, 1024))
                .sized(BUTTON_ICON_SIZE),
        ],
    ));

    // Individually drawn buttons supersede the sheet slices when present.
    for name in ["btn_close", "btn_min", "btn_max"] {
        rules.push(LayoutRule::new(
            &format!("{}.png", name),
            vec![LayoutEntry::new(&format!("{}.bin", name)).sized(BUTTON_ICON_SIZE)],
        ));
    }

    rules.push(LayoutRule::new(
        "logo.png",
        vec![LayoutEntry::new("logo.bin").sized(LOGO_SIZE)],
    ));

    rules
}

/// A converted asset waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Produced {
    pub output: String,
    /// Source the bytes came from, for logging.
    pub source: String,
    pub data: Vec<u8>,
}

/// Collapses `produced` so each output name appears once, holding the bytes
/// of the last rule that produced it. Outputs keep the order in which their
/// names first appeared.
pub fn resolve_outputs(produced: Vec<Produced>) -> Vec<Produced> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut resolved: Vec<Produced> = Vec::with_capacity(produced.len());

    for item in produced {
        match index.get(&item.output) {
            Some(&slot) => {
                debug!(
                    "{} from {} overrides {}",
                    item.output, item.source, resolved[slot].source
                );
                resolved[slot] = item;
            }
            None => {
                index.insert(item.output.clone(), resolved.len());
                resolved.push(item);
            }
        }
    }

    resolved
}
