#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer and thread-scaling benchmark
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which `z = z * z + c`, started at zero, stays bounded.  This
//! crate renders a rectangle of that plane into a raster, coloring
//! each pixel by how many iterations its point took to escape, and
//! measures how the wall-clock cost of a render changes with the
//! number of threads it is split across.
//!
//! A render is split into horizontal bands of equal height, one per
//! thread.  Every band owns its own rows of the raster outright, so
//! the workers never contend for anything.  The benchmark repeats a
//! render several times per thread count and reports the median.

extern crate crossbeam;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

pub mod bands;
pub mod errors;
pub mod escape;
pub mod output;
pub mod planes;
pub mod raster;
pub mod timing;

pub use bands::{dispatch, partition, render, render_band, Band};
pub use errors::{MandelError, Result};
pub use escape::{colorize, escape_time, evaluate};
pub use output::{save, write_ppm, write_tga, Format};
pub use planes::{Pixel, PlaneMapper, Preset, Viewport};
pub use raster::Raster;
pub use timing::{median, time_round, Benchmark, Summary, TrialRunner};
