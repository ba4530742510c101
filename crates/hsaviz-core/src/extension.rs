//! Rigid end-cap extension of sampled curves.
//!
//! The kinematics only sample the flexible parts. The proximal cap below the
//! first sample and the distal cap above the last one are rigid, so each curve
//! gets one synthetic point at either end:
//!
//! ```text
//! first' = first − (0, L_pc)
//! last'  = last  + (−sin θ_last · L_dc, cos θ_last · L_dc)
//! ```
//!
//! The base cap is mounted upright, so the prepended point always steps
//! straight down; the distal cap follows the final sampled orientation.

use crate::pose::Pose;

/// Prepend the proximal cap point and append the distal cap point.
///
/// A curve of `n ≥ 1` poses becomes `n + 2` poses. An empty curve has no
/// anchor for the caps and stays empty.
pub fn extend_with_caps(curve: &[Pose], proximal_cap: f64, distal_cap: f64) -> Vec<Pose> {
    let (Some(first), Some(last)) = (curve.first(), curve.last()) else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(curve.len() + 2);
    out.push(Pose::new(first.x, first.y - proximal_cap, first.theta));
    out.extend_from_slice(curve);
    out.push(last.advance(distal_cap));
    out
}
