// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Failure types for rendering, benchmarking and writing images.

use failure::Fail;
use std::io;

/// Everything that can go wrong between parsing a configuration and
/// putting the finished raster on disk.
#[derive(Debug, Fail)]
pub enum MandelError {
    /// The raster must have at least one row and one column, and an
    /// encoder may impose an upper bound.
    #[fail(display = "invalid image dimensions {}x{}: {}", width, height, reason)]
    InvalidDimensions {
        /// Requested width in pixels
        width: usize,
        /// Requested height in pixels
        height: usize,
        /// What was wrong with them
        reason: &'static str,
    },

    /// The viewport collapses to a line or a point, or is not finite.
    #[fail(display = "degenerate viewport: {}", _0)]
    DegenerateViewport(String),

    /// Partitioning into zero bands makes no sense.
    #[fail(display = "thread count must be at least 1")]
    NoThreads,

    /// A band worker panicked before finishing its rows.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// The named viewport preset does not exist.
    #[fail(display = "unknown view '{}' (expected 'full' or 'zoom')", _0)]
    UnknownPreset(String),

    /// The named benchmark mode does not exist.
    #[fail(display = "unknown mode '{}' (expected 'sweep' or 'repeat')", _0)]
    UnknownMode(String),

    /// Writing the output image failed.
    #[fail(display = "i/o error: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for MandelError {
    fn from(err: io::Error) -> Self {
        MandelError::Io(err)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MandelError>;
