// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0
//! (the raster, row 0 at the top), and a rectangle on the complex
//! plane described by its left, right, top and bottom edges.
use num::Complex;
use std::str::FromStr;

use crate::errors::{MandelError, Result};

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel in the raster.  Column first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The rectangle of the complex plane mapped onto the raster.  The
/// left edge lands on column 0 and the top edge on row 0; nothing
/// requires `top` to be numerically above `bottom`, so a viewport may
/// be flipped vertically.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Real part at column 0
    pub left: f64,
    /// Real part at column `width`
    pub right: f64,
    /// Imaginary part at row 0
    pub top: f64,
    /// Imaginary part at row `height`
    pub bottom: f64,
}

impl Viewport {
    /// Builds a viewport from its four edges.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Viewport {
            left,
            right,
            top,
            bottom,
        }
    }

    /// The whole set.
    pub fn full() -> Self {
        Viewport::new(-2.0, 1.0, 1.125, -1.125)
    }

    /// An interesting bit of detail on the edge of the main cardioid.
    pub fn zoomed() -> Self {
        Viewport::new(-0.751085, -0.734975, 0.118378, 0.134488)
    }

    fn validate(&self) -> Result<()> {
        let edges = [self.left, self.right, self.top, self.bottom];
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(MandelError::DegenerateViewport(
                "all four edges must be finite".to_string(),
            ));
        }
        if self.left == self.right {
            return Err(MandelError::DegenerateViewport(
                "left and right edges coincide".to_string(),
            ));
        }
        if self.top == self.bottom {
            return Err(MandelError::DegenerateViewport(
                "top and bottom edges coincide".to_string(),
            ));
        }
        Ok(())
    }
}

/// The two named regions the benchmark knows how to render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Preset {
    /// See `Viewport::full`
    Full,
    /// See `Viewport::zoomed`
    Zoom,
}

impl Preset {
    /// The viewport this preset stands for.
    pub fn viewport(self) -> Viewport {
        match self {
            Preset::Full => Viewport::full(),
            Preset::Zoom => Viewport::zoomed(),
        }
    }
}

impl FromStr for Preset {
    type Err = MandelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(Preset::Full),
            "zoom" => Ok(Preset::Zoom),
            other => Err(MandelError::UnknownPreset(other.to_string())),
        }
    }
}

/// Contains the definitions of two planes: an integral cartesian
/// plane, and a viewport on the complex plane.  Maps points from one
/// to the other.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The lower-right corner of the integral plane, exclusive.  The
    /// upper-left is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The region of the complex plane being rendered
    pub viewport: Viewport,
    // Complex distance covered by one column and one row respectively.
    grid_factors: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the raster size and a viewport.  Both
    /// dimensions must be non-zero and the viewport must enclose some
    /// area.
    pub fn new(width: usize, height: usize, viewport: Viewport) -> Result<PlaneMapper> {
        if width == 0 || height == 0 {
            return Err(MandelError::InvalidDimensions {
                width,
                height,
                reason: "width and height must be non-zero",
            });
        }
        viewport.validate()?;

        let grid_factors = (
            (viewport.right - viewport.left) / (width as f64),
            (viewport.bottom - viewport.top) / (height as f64),
        );

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            viewport,
            grid_factors,
        })
    }

    /// Raster width in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Raster height in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// complex number at its upper-left corner.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.viewport.left
                + (pixel.0 as f64) * (self.viewport.right - self.viewport.left)
                    / (self.integral_plane.0 as f64),
            self.viewport.top
                + (pixel.1 as f64) * (self.viewport.bottom - self.viewport.top)
                    / (self.integral_plane.1 as f64),
        )
    }

    /// Given a complex number, find the pixel it falls in, or `None`
    /// when the point lies outside the viewport.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let left = (point.re - self.viewport.left) / self.grid_factors.0;
        let top = (point.im - self.viewport.top) / self.grid_factors.1;
        // Written so that NaN lands outside.
        if !(left >= 0.0 && left < (self.integral_plane.0 as f64))
            || !(top >= 0.0 && top < (self.integral_plane.1 as f64))
        {
            return None;
        }
        Some(Pixel(left as usize, top as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planemapper_fails_on_empty_raster() {
        assert!(PlaneMapper::new(0, 4, Viewport::full()).is_err());
        assert!(PlaneMapper::new(4, 0, Viewport::full()).is_err());
    }

    #[test]
    fn planemapper_fails_on_flat_viewport() {
        let pm = PlaneMapper::new(4, 4, Viewport::new(-1.0, -1.0, 1.0, -1.0));
        assert!(pm.is_err());
        let pm = PlaneMapper::new(4, 4, Viewport::new(-1.0, 1.0, 0.5, 0.5));
        assert!(pm.is_err());
        let pm = PlaneMapper::new(4, 4, Viewport::new(std::f64::NAN, 1.0, 1.0, -1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_accepts_both_presets() {
        assert!(PlaneMapper::new(640, 640, Viewport::full()).is_ok());
        assert!(PlaneMapper::new(640, 640, Viewport::zoomed()).is_ok());
    }

    #[test]
    fn pixel_to_point_walks_down_from_the_top() {
        let pm = PlaneMapper::new(4, 4, Viewport::new(-2.0, 2.0, 2.0, -2.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 1)), Complex::new(1.0, 1.0));
    }

    #[test]
    fn pixel_to_point_on_flipped_viewport() {
        let pm = PlaneMapper::new(5, 5, Viewport::new(0.0, 5.0, 0.0, 5.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 2)), Complex::new(4.0, 2.0));
    }

    #[test]
    fn point_to_pixel_inverts_pixel_to_point() {
        let pm = PlaneMapper::new(512, 512, Viewport::new(-2.0, 2.0, 2.0, -2.0)).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.0)), Some(Pixel(256, 256)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.0, 2.0)), Some(Pixel(0, 0)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.0, -1.0)), Some(Pixel(384, 384)));
        let p = Pixel(100, 37);
        assert_eq!(pm.point_to_pixel(&pm.pixel_to_point(&p)), Some(p));
    }

    #[test]
    fn point_to_pixel_rejects_points_outside() {
        let pm = PlaneMapper::new(4, 4, Viewport::new(-2.0, 2.0, 2.0, -2.0)).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(2.0, 0.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 2.5)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.1, 0.0)), None);
    }

    #[test]
    fn point_to_pixel_rejects_non_finite_points() {
        let pm = PlaneMapper::new(4, 4, Viewport::new(-2.0, 2.0, 2.0, -2.0)).unwrap();
        let nan = std::f64::NAN;
        let inf = std::f64::INFINITY;
        assert_eq!(pm.point_to_pixel(&Complex::new(nan, nan)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, nan)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(inf, 0.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(-inf, 0.0)), None);
    }

    #[test]
    fn presets_parse_by_name() {
        assert_eq!("full".parse::<Preset>().unwrap(), Preset::Full);
        assert_eq!("zoom".parse::<Preset>().unwrap(), Preset::Zoom);
        assert!("wide".parse::<Preset>().is_err());
        assert_eq!(Preset::Zoom.viewport(), Viewport::zoomed());
    }
}
