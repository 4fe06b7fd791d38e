// src/bitmap.rs

//! Packed 1-bit-per-pixel raster used for glyph atlases.
//!
//! Rows are stored top to bottom, each row padded to a whole number of bytes
//! (`stride = ceil(width / 8)`). Within a byte the leftmost pixel is the most
//! significant bit, which is the layout the embedded renderer expects.

use crate::font::scaler::ensure_size;
use log::debug;

/// A packed monochrome bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    width: usize,
    height: usize,
    bits: Vec<u8>,
}

impl PackedBitmap {
    /// Creates an all-background bitmap of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        let stride = Self::stride_for(width);
        Self {
            width,
            height,
            bits: vec![0; stride * height],
        }
    }

    /// Wraps an existing buffer. The buffer is padded or truncated so that
    /// `bits.len() == stride * height` always holds.
    pub fn from_bytes(width: usize, height: usize, data: &[u8]) -> Self {
        let expected = Self::stride_for(width) * height;
        if data.len() != expected {
            debug!(
                "PackedBitmap: normalizing {} bytes to {} for {}x{}",
                data.len(),
                expected,
                width,
                height
            );
        }
        Self {
            width,
            height,
            bits: ensure_size(data, expected),
        }
    }

    /// Bytes per row for a bitmap `width` pixels wide.
    pub fn stride_for(width: usize) -> usize {
        width.div_ceil(8)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        Self::stride_for(self.width)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Locates the byte index and bit mask for `(x, y)`, or `None` when the
    /// coordinate falls outside the bitmap or its buffer.
    fn locate(&self, x: usize, y: usize) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y * self.stride() + x / 8;
        if index >= self.bits.len() {
            return None;
        }
        // MSB first: x = 0 is bit 7.
        Some((index, 0x80 >> (x % 8)))
    }

    /// Reads a pixel. Anything out of range reads as background.
    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        match self.locate(x, y) {
            Some((index, mask)) => self.bits[index] & mask != 0,
            None => false,
        }
    }

    /// Writes a pixel. Out-of-range writes are dropped.
    pub fn set_pixel(&mut self, x: usize, y: usize, value: bool) {
        if let Some((index, mask)) = self.locate(x, y) {
            if value {
                self.bits[index] |= mask;
            } else {
                self.bits[index] &= !mask;
            }
        }
    }
}
