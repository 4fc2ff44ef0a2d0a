// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Splits a raster into horizontal bands and renders each band on its
//! own thread.
//!
//! For K threads and H rows every band is `ceil(H / K)` rows tall and
//! the last ones are clamped to H.  When that width overshoots, some
//! trailing bands come out empty: they still get a worker, and the
//! worker has nothing to do.  Each worker owns a disjoint `&mut`
//! slice of the raster, so no locking is needed for the writes.

use itertools::iproduct;
use std::ops::Range;

use crate::errors::{MandelError, Result};
use crate::escape::evaluate;
use crate::planes::{Pixel, PlaneMapper};
use crate::raster::Raster;

/// A half-open range of rows `[start, end)` assigned to one worker.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Band {
    /// First row, inclusive
    pub start: usize,
    /// Last row, exclusive
    pub end: usize,
}

impl Band {
    /// Number of rows in the band.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// An empty band renders nothing.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The rows as a range.
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Divides `height` rows into exactly `threads` bands of `ceil(height /
/// threads)` rows each, clamping to `height`.  The bands are in order,
/// never overlap, and cover every row exactly once.
pub fn partition(height: usize, threads: usize) -> Result<Vec<Band>> {
    if threads == 0 {
        return Err(MandelError::NoThreads);
    }
    let width = (height + threads - 1) / threads;
    Ok((0..threads)
        .map(|i| Band {
            start: (i * width).min(height),
            end: ((i + 1) * width).min(height),
        })
        .collect())
}

/// Renders every pixel of `band` into `rows`, which must be exactly
/// that band's slice of the raster (row `band.start` at offset 0).
pub fn render_band(plane: &PlaneMapper, limit: usize, band: &Band, rows: &mut [u32]) {
    let width = plane.width();
    assert!(rows.len() == band.len() * width);
    for (y, x) in iproduct!(band.rows(), 0..width) {
        rows[(y - band.start) * width + x] = evaluate(plane, &Pixel(x, y), limit);
    }
}

/// Cuts the raster buffer into one mutable slice per band.
fn split_rows<'a>(mut pixels: &'a mut [u32], bands: &[Band], width: usize) -> Vec<&'a mut [u32]> {
    let mut slices = Vec::with_capacity(bands.len());
    for band in bands {
        let (rows, rest) = std::mem::take(&mut pixels).split_at_mut(band.len() * width);
        slices.push(rows);
        pixels = rest;
    }
    slices
}

/// Renders the whole raster with one thread per band, returning once
/// every worker has finished.
pub fn dispatch(plane: &PlaneMapper, limit: usize, threads: usize, raster: &mut Raster) -> Result<()> {
    if raster.width() != plane.width() || raster.height() != plane.height() {
        return Err(MandelError::InvalidDimensions {
            width: raster.width(),
            height: raster.height(),
            reason: "raster does not match the plane being rendered",
        });
    }
    let bands = partition(plane.height(), threads)?;
    debug!(
        "dispatching {} rows over {} bands of {} rows",
        plane.height(),
        bands.len(),
        bands[0].len()
    );

    let width = plane.width();
    let regions = split_rows(raster.pixels_mut(), &bands, width);
    crossbeam::scope(|spawner| {
        for (band, rows) in bands.iter().zip(regions) {
            spawner.spawn(move |_| {
                trace!("band {:?} starting", band);
                render_band(plane, limit, band, rows);
            });
        }
    })
    .map_err(|_| MandelError::WorkerPanicked)
}

/// Allocates a raster and renders it with `threads` workers.
pub fn render(plane: &PlaneMapper, limit: usize, threads: usize) -> Result<Raster> {
    let mut raster = Raster::new(plane.width(), plane.height())?;
    dispatch(plane, limit, threads, &mut raster)?;
    Ok(raster)
}
