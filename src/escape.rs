// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.  Each pixel is classified by iterating
//! `z = z * z + c` from zero until `z` leaves the circle of radius 2
//! or the iteration limit is reached.  Points that never leave are
//! members of the Mandelbrot set and are painted black; the rest are
//! shaded by how long they took to escape.
//!
//! Everything here is a pure function of its arguments, so any number
//! of band workers may call it at once.

use num::Complex;

use crate::planes::{Pixel, PlaneMapper};

/// The limit used when nothing else is configured.
pub const DEFAULT_LIMIT: usize = 200;

/// The color the escape gradient is scaled against, as `0xRRGGBB`.
pub const BASE_COLOR: u32 = (255 << 16) | (100 << 8) | 100;

/// Color of points inside the set.
pub const BLACK: u32 = 0x00_0000;

/// Returns the number of iterations `c` needed to reach `|z| >= 2`,
/// or `None` if it was still inside after `limit` iterations.
pub fn escape_time(c: Complex<f64>, limit: usize) -> Option<usize> {
    let mut z = Complex { re: 0.0, im: 0.0 };
    let mut iterations = 0;
    while z.norm_sqr() < 4.0 && iterations < limit {
        z = z * z + c;
        iterations += 1;
    }
    if iterations == limit {
        None
    } else {
        Some(iterations)
    }
}

/// Maps an escape time onto the linear gradient.  The multiply is done
/// on the packed value, so low channels pick up the carry from high
/// ones; that banding is the look of the original renderer.  A zero
/// limit has no gradient to scale against and gives black.
pub fn colorize(escape: Option<usize>, limit: usize) -> u32 {
    match escape {
        None => BLACK,
        Some(_) if limit == 0 => BLACK,
        Some(iterations) => {
            let scaled = (u64::from(BASE_COLOR) * iterations as u64) / limit as u64;
            (scaled & 0xFF_FFFF) as u32
        }
    }
}

/// The whole per-pixel pipeline: pixel to point, point to escape time,
/// escape time to color.
#[inline]
pub fn evaluate(plane: &PlaneMapper, pixel: &Pixel, limit: usize) -> u32 {
    colorize(escape_time(plane.pixel_to_point(pixel), limit), limit)
}

/// Splits a packed color into its red, green and blue channels.
pub fn channels(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planes::Viewport;

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), DEFAULT_LIMIT), None);
        assert_eq!(colorize(None, DEFAULT_LIMIT), BLACK);
    }

    #[test]
    fn far_points_escape_at_once() {
        let escape = escape_time(Complex::new(5.0, 5.0), DEFAULT_LIMIT);
        assert_eq!(escape, Some(1));
        let color = colorize(escape, DEFAULT_LIMIT);
        assert_ne!(color, BLACK);
        assert_eq!(channels(color), (0x01, 0x46, 0xE6));
    }

    #[test]
    fn points_near_the_boundary_take_longer() {
        let near = escape_time(Complex::new(-0.75, 0.1), DEFAULT_LIMIT).unwrap();
        let far = escape_time(Complex::new(1.0, 1.0), DEFAULT_LIMIT).unwrap();
        assert!(near > far);
    }

    #[test]
    fn gradient_is_linear_in_the_packed_value() {
        assert_eq!(colorize(Some(DEFAULT_LIMIT), DEFAULT_LIMIT), BASE_COLOR);
        assert_eq!(colorize(Some(DEFAULT_LIMIT - 1), DEFAULT_LIMIT), 16_653_693);
        assert_eq!(colorize(Some(100), DEFAULT_LIMIT), BASE_COLOR / 2);
    }

    #[test]
    fn zero_limit_is_black() {
        assert_eq!(colorize(Some(1), 0), BLACK);
        assert_eq!(colorize(Some(0), 0), BLACK);
        assert_eq!(escape_time(Complex::new(5.0, 5.0), 0), None);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let pm = PlaneMapper::new(16, 16, Viewport::zoomed()).unwrap();
        for x in 0..16 {
            for y in 0..16 {
                let p = Pixel(x, y);
                assert_eq!(evaluate(&pm, &p, DEFAULT_LIMIT), evaluate(&pm, &p, DEFAULT_LIMIT));
            }
        }
    }

    #[test]
    fn full_view_centre_column_hits_the_set() {
        // Column 2/3 of the way across the full view is re = 0.
        let pm = PlaneMapper::new(3, 2, Viewport::full()).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(2, 1)), Complex::new(0.0, 0.0));
        assert_eq!(evaluate(&pm, &Pixel(2, 1), DEFAULT_LIMIT), BLACK);
        assert_ne!(evaluate(&pm, &Pixel(0, 0), DEFAULT_LIMIT), BLACK);
    }
}
