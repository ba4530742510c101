//! Cartesian to pixel mapping.
//!
//! A fixed affine transform per renderer:
//!
//! ```text
//! offset = round(ppm × (x, y))
//! normal mount:    uv = origin + ( offset.x, −offset.y)     origin = (W/2, H)
//! inverted mount:  uv = origin + (−offset.x,  offset.y)     origin = (W/2, 0)
//! ```
//!
//! Exactly one pixel axis is flipped. With the robot standing on its base the
//! image `v` axis runs opposite to Cartesian `y`; hanging tip-down, Cartesian
//! `y` already grows down the image and the mirror moves to `u`.

use glam::{DVec2, IVec2};

use crate::pose::Pose;

/// Largest pixel coordinate magnitude a projection produces.
pub const PIXEL_LIMIT: f64 = (1 << 20) as f64;

/// Maps planar poses to integer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelProjector {
    pixels_per_meter: f64,
    origin: IVec2,
    inverted: bool,
}

impl PixelProjector {
    /// Projector with the robot base at the canvas edge chosen by `inverted`.
    pub fn for_canvas(width: u32, height: u32, pixels_per_meter: f64, inverted: bool) -> Self {
        let u = (width / 2) as i32;
        let v = if inverted { 0 } else { height as i32 };
        Self {
            pixels_per_meter,
            origin: IVec2::new(u, v),
            inverted,
        }
    }

    pub fn pixels_per_meter(&self) -> f64 {
        self.pixels_per_meter
    }

    /// Pixel location of the Cartesian origin.
    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Project a Cartesian point.
    ///
    /// Results are clamped to `±PIXEL_LIMIT`, so a far-off but finite point
    /// lands on a distant off-canvas pixel instead of overflowing.
    pub fn project_point(&self, position: DVec2) -> IVec2 {
        let mut offset = (position * self.pixels_per_meter).round();
        if self.inverted {
            offset.x = -offset.x;
        } else {
            offset.y = -offset.y;
        }
        let limit = DVec2::splat(PIXEL_LIMIT);
        let uv = (self.origin.as_dvec2() + offset).clamp(-limit, limit);
        IVec2::new(uv.x as i32, uv.y as i32)
    }

    /// Project a pose; orientation does not affect placement.
    pub fn project(&self, pose: &Pose) -> IVec2 {
        self.project_point(pose.position())
    }

    /// Project every pose, preserving order.
    pub fn project_all(&self, poses: &[Pose]) -> Vec<IVec2> {
        poses.iter().map(|p| self.project(p)).collect()
    }

    /// Convert a length in meters to whole pixels, clamped to `±PIXEL_LIMIT`.
    pub fn length_to_pixels(&self, meters: f64) -> i32 {
        (meters * self.pixels_per_meter).round().clamp(-PIXEL_LIMIT, PIXEL_LIMIT) as i32
    }
}
