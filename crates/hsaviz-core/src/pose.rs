//! Planar SE(2) poses.

use std::fmt;

use glam::{DMat2, DVec2};
use serde::{Deserialize, Serialize};

/// A planar pose `(x, y, theta)` in meters and radians.
///
/// `theta = 0` points the robot's longitudinal axis along `+y`; positive
/// angles rotate counter-clockwise, so the local tangent is `(-sin θ, cos θ)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose {
    /// The pose at the robot base.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0, theta: 0.0 };

    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Planar position, orientation dropped.
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Rotation matrix of this pose's orientation.
    pub fn rotation(&self) -> DMat2 {
        DMat2::from_angle(self.theta)
    }

    /// Unit vector along the local longitudinal axis.
    pub fn tangent(&self) -> DVec2 {
        DVec2::new(-self.theta.sin(), self.theta.cos())
    }

    /// Map a point given in this pose's local frame into the parent frame.
    pub fn transform_point(&self, local: DVec2) -> DVec2 {
        self.position() + self.rotation() * local
    }

    /// Compose `self ∘ other`, with `other` expressed in this pose's frame.
    pub fn compose(&self, other: &Pose) -> Pose {
        let p = self.transform_point(other.position());
        Pose::new(p.x, p.y, self.theta + other.theta)
    }

    /// Translate along the local longitudinal axis by `distance`.
    pub fn advance(&self, distance: f64) -> Pose {
        let p = self.position() + self.tangent() * distance;
        Pose::new(p.x, p.y, self.theta)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.theta.is_finite()
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4} m, {:.4} m, {:.4} rad)", self.x, self.y, self.theta)
    }
}
