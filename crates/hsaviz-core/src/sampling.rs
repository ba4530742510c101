//! Batched evaluation of the kinematics over fixed sample sets.
//!
//! Curves (backbone, rods) are sampled at every arc length of an
//! [`ArcLengthSamples`] vector; platforms are sampled once per segment index.
//! Samples are independent, so each batch is an order-preserving map.

use crate::configuration::Configuration;
use crate::error::{RenderError, RenderResult};
use crate::kinematics::{Kinematics, RodSide};
use crate::params::GeometryParams;
use crate::pose::Pose;

/// Evenly spaced arc lengths over the flexible length of the robot.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLengthSamples(Vec<f64>);

impl ArcLengthSamples {
    /// `count` values from `0` to `total` inclusive. A single sample sits at `0`.
    pub fn evenly_spaced(total: f64, count: usize) -> Self {
        let step = if count > 1 { total / (count - 1) as f64 } else { 0.0 };
        let mut values: Vec<f64> = (0..count).map(|i| i as f64 * step).collect();
        // Pin the end so accumulated rounding never undershoots the tip.
        if count > 1 {
            values[count - 1] = total;
        }
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Backbone poses at every sample.
pub fn sample_backbone<K: Kinematics>(
    kinematics: &K,
    params: &GeometryParams,
    q: &Configuration,
    samples: &ArcLengthSamples,
) -> Vec<Pose> {
    samples
        .as_slice()
        .iter()
        .map(|&s| kinematics.virtual_backbone(params, q, s))
        .collect()
}

/// Poses of one rod at every sample.
pub fn sample_rod<K: Kinematics>(
    kinematics: &K,
    params: &GeometryParams,
    q: &Configuration,
    samples: &ArcLengthSamples,
    side: RodSide,
) -> Vec<Pose> {
    samples
        .as_slice()
        .iter()
        .map(|&s| kinematics.rod(params, q, s, side))
        .collect()
}

/// One platform pose per segment, in segment order.
pub fn sample_platforms<K: Kinematics>(
    kinematics: &K,
    params: &GeometryParams,
    q: &Configuration,
) -> Vec<Pose> {
    (0..params.num_segments())
        .map(|i| kinematics.platform(params, q, i))
        .collect()
}

/// All sampled geometry needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotSamples {
    pub backbone: Vec<Pose>,
    pub left_rod: Vec<Pose>,
    pub right_rod: Vec<Pose>,
    pub platforms: Vec<Pose>,
}

impl RobotSamples {
    /// Evaluate all batches and reject any non-finite pose.
    pub fn evaluate<K: Kinematics>(
        kinematics: &K,
        params: &GeometryParams,
        q: &Configuration,
        samples: &ArcLengthSamples,
    ) -> RenderResult<Self> {
        let out = Self {
            backbone: sample_backbone(kinematics, params, q, samples),
            left_rod: sample_rod(kinematics, params, q, samples, RodSide::Left),
            right_rod: sample_rod(kinematics, params, q, samples, RodSide::Right),
            platforms: sample_platforms(kinematics, params, q),
        };
        ensure_finite(&out.backbone, "backbone")?;
        ensure_finite(&out.left_rod, "left rod")?;
        ensure_finite(&out.right_rod, "right rod")?;
        ensure_finite(&out.platforms, "platform")?;
        Ok(out)
    }
}

fn ensure_finite(poses: &[Pose], what: &'static str) -> RenderResult<()> {
    if poses.iter().all(Pose::is_finite) {
        Ok(())
    } else {
        Err(RenderError::NonFinitePose(what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::PiecewiseConstantStrain;

    #[test]
    fn test_samples_span_flexible_length() {
        let samples = ArcLengthSamples::evenly_spaced(0.118, 25);
        assert_eq!(samples.len(), 25);
        assert_eq!(samples.as_slice()[0], 0.0);
        assert_eq!(samples.as_slice()[24], 0.118);
        let step = samples.as_slice()[1] - samples.as_slice()[0];
        assert!((step - 0.118 / 24.0).abs() < 1e-15);
    }

    #[test]
    fn test_single_sample_sits_at_zero() {
        assert_eq!(ArcLengthSamples::evenly_spaced(1.0, 1).as_slice(), &[0.0]);
        assert!(ArcLengthSamples::evenly_spaced(1.0, 0).is_empty());
    }

    #[test]
    fn test_batches_have_expected_lengths() {
        let params = GeometryParams::uniform(3, 0.01, 0.05, 0.02, [0.08, 0.01], 0.01);
        let q = Configuration::rest(3);
        let samples = ArcLengthSamples::evenly_spaced(params.flexible_length(), 10);
        let kin = PiecewiseConstantStrain::default();

        let out = RobotSamples::evaluate(&kin, &params, &q, &samples).unwrap();
        assert_eq!(out.backbone.len(), 10);
        assert_eq!(out.left_rod.len(), 10);
        assert_eq!(out.right_rod.len(), 10);
        assert_eq!(out.platforms.len(), 3);
        // Platforms follow segment order up the robot.
        assert!(out.platforms.windows(2).all(|w| w[0].y < w[1].y));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let params = GeometryParams::default();
        let q = Configuration(vec![3.0, 0.05, 0.1]);
        let samples = ArcLengthSamples::evenly_spaced(params.flexible_length(), 25);
        let kin = PiecewiseConstantStrain::default();

        let a = RobotSamples::evaluate(&kin, &params, &q, &samples).unwrap();
        let b = RobotSamples::evaluate(&kin, &params, &q, &samples).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_finite_pose_is_rejected() {
        let params = GeometryParams::uniform(2, 0.01, 0.05, 0.02, [0.08, 0.01], 0.01);
        let samples = ArcLengthSamples::evenly_spaced(params.flexible_length(), 5);
        let kin = PiecewiseConstantStrain::default();
        let err = RobotSamples::evaluate(&kin, &params, &Configuration(vec![0.0; 3]), &samples)
            .unwrap_err();
        assert!(matches!(err, RenderError::NonFinitePose(_)));
    }
}
