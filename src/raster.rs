// src/raster.rs

//! Converts decoded raster images into raw RGB8 buffers with color-key
//! transparency.
//!
//! The renderer has no alpha channel; it treats pure black `(0, 0, 0)` as
//! transparent. Conversion therefore forces transparent pixels to black and
//! snaps near-black pixels to exact black so they key out cleanly instead of
//! leaving a dark fringe.

use anyhow::{bail, Result};
use image::imageops::{self, FilterType};
use image::DynamicImage;
use log::trace;
use serde::{Deserialize, Serialize};

/// Thresholds for the color-key transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorKey {
    /// Pixels whose channels are all strictly below this value become black.
    pub threshold: u8,
    /// Pixels with alpha strictly below this value become black.
    pub alpha_cutoff: u8,
}

impl Default for ColorKey {
    fn default() -> Self {
        ColorKey {
            threshold: 24,
            alpha_cutoff: 128,
        }
    }
}

impl ColorKey {
    /// Applies both keying rules to a single pixel.
    pub fn apply(&self, [r, g, b, a]: [u8; 4], has_alpha: bool) -> [u8; 3] {
        // Alpha wins over color; opaque sources never key on alpha.
        if has_alpha && a < self.alpha_cutoff {
            return [0, 0, 0];
        }
        // Near-black snaps to the key color.
        if r < self.threshold && g < self.threshold && b < self.threshold {
            return [0, 0, 0];
        }
        [r, g, b]
    }
}

/// A headerless row-major RGB8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

/// Resizes `image` to `target` with Lanczos3 and applies `key` to every pixel.
pub fn convert(image: &DynamicImage, target: (u32, u32), key: &ColorKey) -> Result<RawImage> {
    let (width, height) = target;
    if width == 0 || height == 0 {
        bail!("Target size {}x{} has a zero dimension", width, height);
    }
    if image.width() == 0 || image.height() == 0 {
        bail!("Source image is empty");
    }

    // Checked before the RGBA conversion, which gives every image an alpha channel.
    let has_alpha = image.color().has_alpha();
    trace!(
        "convert: {}x{} (alpha: {}) -> {}x{}",
        image.width(),
        image.height(),
        has_alpha,
        width,
        height
    );

    let rgba = image.to_rgba8();
    let resized = imageops::resize(&rgba, width, height, FilterType::Lanczos3);

    // Row-major RGB8, alpha dropped.
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            let px = resized.get_pixel(x, y).0;
            pixels.extend_from_slice(&key.apply(px, has_alpha));
        }
    }

    Ok(RawImage {
        width,
        height,
        pixels,
    })
}
