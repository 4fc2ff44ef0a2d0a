// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel buffer.  A raster is one contiguous block of packed
//! `0xRRGGBB` values, row 0 first, indexed by `y * width + x`.

use crate::errors::{MandelError, Result};

/// A fixed-size grid of packed 24-bit colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Raster {
    /// An all-black raster.  Both dimensions must be non-zero.
    pub fn new(width: usize, height: usize) -> Result<Raster> {
        if width == 0 || height == 0 {
            return Err(MandelError::InvalidDimensions {
                width,
                height,
                reason: "width and height must be non-zero",
            });
        }
        Ok(Raster {
            width,
            height,
            pixels: vec![0 as u32; width * height],
        })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Every pixel, row-major, top row first.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Mutable access to the whole buffer, for splitting into bands.
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// The raster as a flat RGB byte buffer, as wanted by the image
    /// encoders.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for &color in &self.pixels {
            let (r, g, b) = crate::escape::channels(color);
            bytes.extend_from_slice(&[r, g, b]);
        }
        bytes
    }
}
