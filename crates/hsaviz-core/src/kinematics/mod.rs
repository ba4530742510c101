//! Boundary to the forward-kinematics model.
//!
//! The renderer never computes kinematics itself; it samples the four
//! functions of a [`Kinematics`] implementation. Implementations must be pure:
//! the same geometry, configuration and argument always produce the same pose.

pub mod reference;

use crate::configuration::Configuration;
use crate::params::GeometryParams;
use crate::pose::Pose;

pub use reference::PiecewiseConstantStrain;

/// Which of the two rods running alongside the virtual backbone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RodSide {
    Left,
    Right,
}

impl RodSide {
    /// Rod index as used by kinematics libraries (`0` left, `1` right).
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// Forward kinematics of a planar HSA robot.
///
/// Arc-length arguments `s` run over `[0, Σ flexible]`, the flexible parts of
/// all segments laid end to end; rigid caps are not part of that range.
pub trait Kinematics {
    /// Pose of the end-effector.
    fn end_effector(&self, params: &GeometryParams, q: &Configuration) -> Pose;

    /// Pose of the virtual backbone at arc length `s`.
    fn virtual_backbone(&self, params: &GeometryParams, q: &Configuration, s: f64) -> Pose;

    /// Pose of one rod at arc length `s`.
    fn rod(&self, params: &GeometryParams, q: &Configuration, s: f64, side: RodSide) -> Pose;

    /// Pose of the center of the distal platform of `segment`.
    fn platform(&self, params: &GeometryParams, q: &Configuration, segment: usize) -> Pose;
}

impl<K: Kinematics + ?Sized> Kinematics for &K {
    fn end_effector(&self, params: &GeometryParams, q: &Configuration) -> Pose {
        (**self).end_effector(params, q)
    }

    fn virtual_backbone(&self, params: &GeometryParams, q: &Configuration, s: f64) -> Pose {
        (**self).virtual_backbone(params, q, s)
    }

    fn rod(&self, params: &GeometryParams, q: &Configuration, s: f64, side: RodSide) -> Pose {
        (**self).rod(params, q, s, side)
    }

    fn platform(&self, params: &GeometryParams, q: &Configuration, segment: usize) -> Pose {
        (**self).platform(params, q, segment)
    }
}

/// Adapts four plain functions or closures to [`Kinematics`].
pub struct FnKinematics<E, V, R, P> {
    pub end_effector: E,
    pub virtual_backbone: V,
    pub rod: R,
    pub platform: P,
}

impl<E, V, R, P> Kinematics for FnKinematics<E, V, R, P>
where
    E: Fn(&GeometryParams, &Configuration) -> Pose,
    V: Fn(&GeometryParams, &Configuration, f64) -> Pose,
    R: Fn(&GeometryParams, &Configuration, f64, RodSide) -> Pose,
    P: Fn(&GeometryParams, &Configuration, usize) -> Pose,
{
    fn end_effector(&self, params: &GeometryParams, q: &Configuration) -> Pose {
        (self.end_effector)(params, q)
    }

    fn virtual_backbone(&self, params: &GeometryParams, q: &Configuration, s: f64) -> Pose {
        (self.virtual_backbone)(params, q, s)
    }

    fn rod(&self, params: &GeometryParams, q: &Configuration, s: f64, side: RodSide) -> Pose {
        (self.rod)(params, q, s, side)
    }

    fn platform(&self, params: &GeometryParams, q: &Configuration, segment: usize) -> Pose {
        (self.platform)(params, q, segment)
    }
}
