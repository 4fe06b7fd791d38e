// src/font/scaler.rs

//! Nearest-neighbor glyph atlas rescaling and buffer length normalization.

use super::GlyphGrid;
use crate::bitmap::PackedBitmap;
use log::trace;

/// Width and height of a single glyph cell in pixels.
pub type CellSize = (usize, usize);

/// Pads with zeros or truncates `data` so the result is exactly `expected_len` bytes.
pub fn ensure_size(data: &[u8], expected_len: usize) -> Vec<u8> {
    if data.len() >= expected_len {
        return data[..expected_len].to_vec();
    }
    let mut out = Vec::with_capacity(expected_len);
    out.extend_from_slice(data);
    out.resize(expected_len, 0);
    out
}

/// Resamples every glyph of `src` from the cell of `grid` to `dst_cell`.
///
/// `grid` describes the source atlas: glyphs laid out row-major,
/// `grid.glyphs_per_row` per row, each `grid.cell()` pixels. The destination
/// uses the same layout with `dst_cell` glyphs. Each destination pixel samples the source pixel at
/// `floor(d * src_dim / dst_dim)` inside the same glyph, so identical cell
/// sizes reproduce the source unchanged.
pub fn scale(src: &PackedBitmap, grid: &GlyphGrid, dst_cell: CellSize) -> PackedBitmap {
    let (src_w, src_h) = grid.cell();
    let (dst_w, dst_h) = dst_cell;
    let mut dst = PackedBitmap::new(grid.glyphs_per_row * dst_w, grid.rows * dst_h);

    if dst_w == 0 || dst_h == 0 {
        return dst;
    }

    trace!(
        "scale: {}x{} -> {}x{} over {} glyphs",
        src_w,
        src_h,
        dst_w,
        dst_h,
        grid.total_glyphs
    );

    for glyph in 0..grid.total_glyphs {
        let col = glyph % grid.glyphs_per_row;
        let row = glyph / grid.glyphs_per_row;
        // Top-left corner of this glyph in each atlas.
        let (src_x0, src_y0) = (col * src_w, row * src_h);
        let (dst_x0, dst_y0) = (col * dst_w, row * dst_h);

        for dy in 0..dst_h {
            let sy = dy * src_h / dst_h;
            for dx in 0..dst_w {
                let sx = dx * src_w / dst_w;
                if src.get_pixel(src_x0 + sx, src_y0 + sy) {
                    dst.set_pixel(dst_x0 + dx, dst_y0 + dy, true);
                }
            }
        }
    }

    dst
}
