// src/font/metrics.rs

//! Fixed per-size font metrics and the generated `MonoFont` modules.

use super::GlyphGrid;

/// A horizontal decoration line (underline or strikethrough).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationLine {
    /// Offset from the top of the glyph cell in pixels.
    pub offset: u32,
    /// Line thickness in pixels.
    pub thickness: u32,
}

impl DecorationLine {
    const fn thin(offset: u32) -> Self {
        Self {
            offset,
            thickness: 1,
        }
    }
}

/// Metrics for one supported font size.
///
/// These are lookup-table constants taken from the Terminus bitmap family;
/// nothing here is derived from the atlas data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizeDescriptor {
    /// Nominal pixel size (also the glyph cell height).
    pub size: u32,
    pub glyph_width: u32,
    pub glyph_height: u32,
    /// Atlas width in pixels (`glyphs_per_row * glyph_width`).
    pub atlas_width: u32,
    pub character_spacing: u32,
    /// Baseline offset from the top of the cell.
    pub baseline: u32,
    pub underline: DecorationLine,
    pub strikethrough: DecorationLine,
}

impl FontSizeDescriptor {
    const fn new(
        size: u32,
        glyph_width: u32,
        baseline: u32,
        underline: u32,
        strikethrough: u32,
    ) -> Self {
        Self {
            size,
            glyph_width,
            glyph_height: size,
            atlas_width: glyph_width * 16,
            character_spacing: 0,
            baseline,
            underline: DecorationLine::thin(underline),
            strikethrough: DecorationLine::thin(strikethrough),
        }
    }

    /// Glyph cell as `(width, height)`.
    pub fn cell(&self) -> (usize, usize) {
        (self.glyph_width as usize, self.glyph_height as usize)
    }

    /// Exact byte length of this size's packed atlas.
    pub fn atlas_len(&self, grid: &GlyphGrid) -> usize {
        (self.atlas_width as usize).div_ceil(8) * grid.rows * self.glyph_height as usize
    }

    /// Atlas height in pixels.
    pub fn atlas_height(&self, grid: &GlyphGrid) -> usize {
        grid.rows * self.glyph_height as usize
    }
}

/// The six sizes the renderer ships with, smallest first.
pub const TERMINUS_SIZES: [FontSizeDescriptor; 6] = [
    FontSizeDescriptor::new(12, 6, 9, 11, 6),
    FontSizeDescriptor::new(14, 8, 11, 13, 7),
    FontSizeDescriptor::new(16, 8, 12, 14, 8),
    FontSizeDescriptor::new(18, 10, 14, 16, 9),
    FontSizeDescriptor::new(20, 10, 15, 17, 10),
    FontSizeDescriptor::new(24, 12, 19, 22, 12),
];

/// Size of the hex-encoded source atlas.
pub const BASE_FONT_SIZE: u32 = 12;

/// Looks up the descriptor for `size` in `table`.
pub fn descriptor_for(table: &[FontSizeDescriptor], size: u32) -> Option<&FontSizeDescriptor> {
    table.iter().find(|d| d.size == size)
}

/// File name of the atlas for `size`, e.g. `font_terminus_14.bin`.
pub fn atlas_file_name(prefix: &str, size: u32) -> String {
    format!("{}{}.bin", prefix, size)
}

/// File name of the generated font module for `size`, e.g. `font_terminus_14.rs`.
pub fn module_file_name(prefix: &str, size: u32) -> String {
    format!("{}{}.rs", prefix, size)
}

/// Renders the `embedded_graphics` `MonoFont` module for one size.
///
/// The module is written next to its atlas and pulls it in with
/// `include_bytes!`, so the renderer crate declares `mod font_terminus_14;`
/// and uses `font_terminus_14::FONT_TERMINUS_14` directly.
pub fn render_font_module(d: &FontSizeDescriptor, grid: &GlyphGrid, prefix: &str) -> String {
    let const_name = format!("{}{}", prefix, d.size).to_uppercase();

    // StrGlyphMapping takes "\0<first><last>" for a contiguous range.
    let first = grid.first_char;
    let last = char::from_u32(first as u32 + grid.total_glyphs as u32 - 1).unwrap_or(first);
    let mapping = format!(
        "\\0{}{}",
        first.escape_default(),
        last.escape_unicode()
    );
    // Unmapped characters render as '?'.
    let replacement = ('?' as u32).saturating_sub(first as u32);

    format!(
        r#"//! Generated by assetbake. Do not edit.

use embedded_graphics::{{
    geometry::Size,
    image::ImageRaw,
    mono_font::{{mapping::StrGlyphMapping, DecorationDimensions, MonoFont}},
}};

/// {size}px bitmap font with {w}x{h} glyph cells.
pub const {name}: MonoFont = MonoFont {{
    image: ImageRaw::new(include_bytes!("{file}"), {atlas_w}),
    glyph_mapping: &StrGlyphMapping::new("{mapping}", {replacement}),
    character_size: Size::new({w}, {h}),
    character_spacing: {spacing},
    baseline: {baseline},
    underline: DecorationDimensions::new({u_off}, {u_th}),
    strikethrough: DecorationDimensions::new({s_off}, {s_th}),
}};
"#,
        size = d.size,
        w = d.glyph_width,
        h = d.glyph_height,
        name = const_name,
        file = atlas_file_name(prefix, d.size),
        atlas_w = d.atlas_width,
        mapping = mapping,
        replacement = replacement,
        spacing = d.character_spacing,
        baseline = d.baseline,
        u_off = d.underline.offset,
        u_th = d.underline.thickness,
        s_off = d.strikethrough.offset,
        s_th = d.strikethrough.thickness,
    )
}
