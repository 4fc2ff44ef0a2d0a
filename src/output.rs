// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Image writers.  The native format is uncompressed 24-bit TGA: an
//! 18-byte header and then one blue, green, red triple per pixel,
//! top row first.  Binary PPM is available through the `image`
//! crate's PNM encoder.

use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::{MandelError, Result};
use crate::escape::channels;
use crate::raster::Raster;

/// Size of the TGA header in bytes.
pub const TGA_HEADER_LEN: usize = 18;

fn tga_header(width: usize, height: usize) -> Result<[u8; TGA_HEADER_LEN]> {
    if width > 0xFFFF || height > 0xFFFF {
        return Err(MandelError::InvalidDimensions {
            width,
            height,
            reason: "TGA images are at most 65535 pixels on a side",
        });
    }
    Ok([
        0, // no image id
        0, // no colour map
        2, // uncompressed truecolor
        0, 0, 0, 0, 0, // colour map specification
        0, 0, // x origin
        0, 0, // y origin
        (width & 0xFF) as u8,
        ((width >> 8) & 0xFF) as u8,
        (height & 0xFF) as u8,
        ((height >> 8) & 0xFF) as u8,
        24, // bits per pixel
        0,  // image descriptor
    ])
}

/// Writes the raster as a TGA stream.
pub fn write_tga<W: Write>(out: &mut W, raster: &Raster) -> Result<()> {
    out.write_all(&tga_header(raster.width(), raster.height())?)?;
    for &color in raster.pixels() {
        let (r, g, b) = channels(color);
        out.write_all(&[b, g, r])?;
    }
    out.flush()?;
    Ok(())
}

/// Writes the raster as a binary PPM stream.
pub fn write_ppm<W: Write>(out: W, raster: &Raster) -> Result<()> {
    let mut encoder = PNMEncoder::new(out).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    encoder.encode(
        &raster.to_rgb_bytes()[..],
        raster.width() as u32,
        raster.height() as u32,
        ColorType::RGB(8),
    )?;
    Ok(())
}

/// The encodings `save` knows about.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Format {
    /// Uncompressed truecolor TGA
    Tga,
    /// Binary PPM
    Ppm,
}

impl Format {
    /// Picks the encoder from the file extension.  Anything that is
    /// not `.ppm` or `.pnm` is written as TGA.
    pub fn from_path(path: &Path) -> Format {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
        {
            Some(ref e) if e == "ppm" || e == "pnm" => Format::Ppm,
            _ => Format::Tga,
        }
    }
}

/// Writes the raster to `path`.
pub fn save(path: &Path, raster: &Raster) -> Result<()> {
    let format = Format::from_path(path);
    info!("writing {:?} as {:?}", path, format);
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    let written = match format {
        Format::Tga => write_tga(&mut out, raster),
        Format::Ppm => write_ppm(&mut out, raster),
    };
    written?;
    out.flush()?;
    Ok(())
}
