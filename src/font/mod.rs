// src/font/mod.rs

//! Bitmap font atlas generation.
//!
//! The base font arrives as a hex dump of a packed 1bpp atlas at
//! [`metrics::BASE_FONT_SIZE`]. Every other size is produced from it by
//! nearest-neighbor scaling on a fixed 16x6 glyph grid covering printable
//! ASCII, then normalized to the exact byte length the renderer expects.

pub mod metrics;
pub mod scaler;

use crate::bitmap::PackedBitmap;
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use metrics::{descriptor_for, FontSizeDescriptor, BASE_FONT_SIZE};
use scaler::{ensure_size, scale};

/// Layout of glyphs inside an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphGrid {
    /// Cell size of the atlas this grid describes.
    pub glyph_w: usize,
    pub glyph_h: usize,
    pub glyphs_per_row: usize,
    pub rows: usize,
    pub total_glyphs: usize,
    /// Character stored at glyph index 0.
    pub first_char: char,
}

impl GlyphGrid {
    /// The 96-glyph printable ASCII grid with the base 6x12 cell.
    pub fn ascii() -> Self {
        Self::with_cell(6, 12)
    }

    /// The printable ASCII grid with an arbitrary cell size.
    pub fn with_cell(glyph_w: usize, glyph_h: usize) -> Self {
        let grid = Self {
            glyph_w,
            glyph_h,
            glyphs_per_row: 16,
            rows: 6,
            total_glyphs: 96,
            first_char: ' ',
        };
        debug_assert!(grid.glyphs_per_row * grid.rows >= grid.total_glyphs);
        grid
    }

    /// The printable ASCII grid of an atlas with `font`'s glyph cell.
    pub fn for_font(font: &FontSizeDescriptor) -> Self {
        let (w, h) = font.cell();
        Self::with_cell(w, h)
    }

    /// Glyph cell as `(width, height)`.
    pub fn cell(&self) -> (usize, usize) {
        (self.glyph_w, self.glyph_h)
    }
}

/// One generated atlas together with the metrics that describe it.
#[derive(Debug, Clone)]
pub struct FontAtlas {
    pub descriptor: FontSizeDescriptor,
    pub data: Vec<u8>,
}

/// Decodes a whitespace-tolerant hex dump into raw bytes.
///
/// A trailing odd nibble cannot form a byte and is dropped.
pub fn decode_hex_atlas(text: &str) -> Result<Vec<u8>> {
    let mut digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        warn!(
            "Font hex has an odd number of digits ({}); dropping the trailing nibble",
            digits.len()
        );
        digits.pop();
    }
    hex::decode(&digits).context("Font hex contains non-hex characters")
}

/// Decodes the base-size atlas and normalizes it to the exact base length.
pub fn base_atlas(text: &str, table: &[FontSizeDescriptor]) -> Result<PackedBitmap> {
    let base = descriptor_for(table, BASE_FONT_SIZE)
        .ok_or_else(|| anyhow!("Font size table has no base size {}", BASE_FONT_SIZE))?;
    let grid = GlyphGrid::for_font(base);

    let raw = decode_hex_atlas(text)?;
    let expected = base.atlas_len(&grid);
    if raw.len() != expected {
        warn!(
            "Base font atlas is {} bytes, expected {}; normalizing",
            raw.len(),
            expected
        );
    }
    let data = ensure_size(&raw, expected);
    Ok(PackedBitmap::from_bytes(
        base.atlas_width as usize,
        base.atlas_height(&grid),
        &data,
    ))
}

/// Scales `base` to every size in `table`.
pub fn generate_font_set(base: &PackedBitmap, table: &[FontSizeDescriptor]) -> Result<Vec<FontAtlas>> {
    let base_desc = descriptor_for(table, BASE_FONT_SIZE)
        .ok_or_else(|| anyhow!("Font size table has no base size {}", BASE_FONT_SIZE))?;
    // The base atlas is laid out on the base size's cells.
    let grid = GlyphGrid::for_font(base_desc);

    let mut atlases = Vec::with_capacity(table.len());
    for descriptor in table {
        let scaled = scale(base, &grid, descriptor.cell());
        let data = ensure_size(scaled.as_bytes(), descriptor.atlas_len(&grid));
        debug!(
            "Font {}: {}x{} cell, {} bytes",
            descriptor.size,
            descriptor.glyph_width,
            descriptor.glyph_height,
            data.len()
        );
        atlases.push(FontAtlas {
            descriptor: *descriptor,
            data,
        });
    }
    info!("Generated {} font atlases", atlases.len());
    Ok(atlases)
}
