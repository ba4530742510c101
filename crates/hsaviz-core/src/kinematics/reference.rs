//! Reference planar kinematics with piecewise constant strain.
//!
//! Each flexible segment has a constant strain twist `ξ = (κ, σ_sh, 1 + σ_a)`
//! (curvature, shear, elongation) in its local frame, so its pose is the SE(2)
//! exponential of `ξ·s`:
//!
//! ```text
//! θ(s) = θ₀ + κ·s
//! p(s) = p₀ + R(θ₀) · ( v_x·S − v_y·C ,  v_x·C + v_y·S )
//!        S = sin(κ·s)/κ,  C = (1 − cos(κ·s))/κ      (S → s, C → κ·s²/2 as κ → 0)
//! ```
//!
//! Rigid caps are pure translations along the local longitudinal axis. Rods
//! are the backbone offset sideways by `rod_offset`; rod strain coupling is not
//! modelled. Intended for demos and tests, not for control.

use glam::DVec2;

use super::{Kinematics, RodSide};
use crate::configuration::{Configuration, STRAINS_PER_SEGMENT, SegmentStrain};
use crate::params::GeometryParams;
use crate::pose::Pose;

/// Curvatures below this are integrated with the straight-line expansion.
const STRAIGHT_CURVATURE: f64 = 1e-9;

/// Piecewise constant strain model of a planar HSA robot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiecewiseConstantStrain {
    /// Lateral distance from the virtual backbone to each rod axis, in meters.
    pub rod_offset: f64,
}

impl Default for PiecewiseConstantStrain {
    fn default() -> Self {
        Self { rod_offset: 24e-3 }
    }
}

impl PiecewiseConstantStrain {
    pub const fn new(rod_offset: f64) -> Self {
        Self { rod_offset }
    }

    /// Pose at the start of the flexible part of `segment`.
    fn segment_base(params: &GeometryParams, q: &Configuration, segment: usize) -> Pose {
        let mut chi = Pose::ORIGIN;
        for j in 0..segment {
            chi = chi.advance(params.proximal_cap[j]);
            chi = integrate(&chi, strain(q, j), params.flexible[j]);
            chi = chi.advance(params.distal_cap[j]);
        }
        chi.advance(params.proximal_cap[segment])
    }

    /// Pose at the distal end of the flexible part of `segment`.
    fn segment_tip(params: &GeometryParams, q: &Configuration, segment: usize) -> Pose {
        let base = Self::segment_base(params, q, segment);
        integrate(&base, strain(q, segment), params.flexible[segment])
    }
}

impl Kinematics for PiecewiseConstantStrain {
    fn end_effector(&self, params: &GeometryParams, q: &Configuration) -> Pose {
        let last = params.num_segments() - 1;
        Self::segment_tip(params, q, last)
            .advance(params.distal_cap[last])
            .compose(&params.end_effector_offset)
    }

    fn virtual_backbone(&self, params: &GeometryParams, q: &Configuration, s: f64) -> Pose {
        let last = params.num_segments() - 1;
        let mut start = 0.0;
        for (i, &l) in params.flexible.iter().enumerate() {
            if s <= start + l || i == last {
                let local = (s - start).clamp(0.0, l);
                let base = Self::segment_base(params, q, i);
                return integrate(&base, strain(q, i), local);
            }
            start += l;
        }
        Pose::ORIGIN
    }

    fn rod(&self, params: &GeometryParams, q: &Configuration, s: f64, side: RodSide) -> Pose {
        let backbone = self.virtual_backbone(params, q, s);
        let lateral = match side {
            RodSide::Left => -self.rod_offset,
            RodSide::Right => self.rod_offset,
        };
        let p = backbone.transform_point(DVec2::new(lateral, 0.0));
        Pose::new(p.x, p.y, backbone.theta)
    }

    fn platform(&self, params: &GeometryParams, q: &Configuration, segment: usize) -> Pose {
        Self::segment_tip(params, q, segment).advance(params.distal_cap[segment] / 2.0)
    }
}

/// Strains of `segment`; a configuration too short to hold them yields NaN so
/// the resulting poses are rejected downstream instead of silently defaulted.
fn strain(q: &Configuration, segment: usize) -> SegmentStrain {
    let at = |k: usize| {
        q.as_slice()
            .get(segment * STRAINS_PER_SEGMENT + k)
            .copied()
            .unwrap_or(f64::NAN)
    };
    SegmentStrain { bend: at(0), shear: at(1), axial: at(2) }
}

/// Advance `base` by arc length `s` under the constant strain `xi`.
fn integrate(base: &Pose, xi: SegmentStrain, s: f64) -> Pose {
    let kappa = xi.bend;
    let v = DVec2::new(xi.shear, 1.0 + xi.axial);
    let (sin_term, cos_term) = if kappa.abs() < STRAIGHT_CURVATURE {
        (s, kappa * s * s / 2.0)
    } else {
        ((kappa * s).sin() / kappa, (1.0 - (kappa * s).cos()) / kappa)
    };
    let local = DVec2::new(
        v.x * sin_term - v.y * cos_term,
        v.x * cos_term + v.y * sin_term,
    );
    let p = base.transform_point(local);
    Pose::new(p.x, p.y, base.theta + kappa * s)
}
