// src/region.rs

//! Extraction of named sub-rectangles from a source image.

use anyhow::{bail, Result};
use image::DynamicImage;
use log::debug;
use serde::{Deserialize, Serialize};

/// A rectangle in absolute source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rectangle is non-empty and lies entirely inside a
    /// `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        self.width > 0
            && self.height > 0
            && matches!(right, Some(r) if r <= width)
            && matches!(bottom, Some(b) if b <= height)
    }
}

/// Returns the region of `image` selected by `rect`, or the whole image
/// when `rect` is `None`.
///
/// A rectangle that does not fit inside the image is an error; the layout
/// rule that produced it is malformed.
pub fn crop(image: DynamicImage, rect: Option<CropRect>) -> Result<DynamicImage> {
    let Some(rect) = rect else {
        return Ok(image);
    };

    if !rect.fits_within(image.width(), image.height()) {
        bail!(
            "Crop rectangle {}x{}+{}+{} exceeds {}x{} source",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            image.width(),
            image.height()
        );
    }

    debug!(
        "Cropping {}x{} at ({}, {})",
        rect.width, rect.height, rect.x, rect.y
    );
    Ok(image.crop_imm(rect.x, rect.y, rect.width, rect.height))
}
