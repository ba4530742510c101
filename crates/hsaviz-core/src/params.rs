//! Robot geometry supplied once per renderer.
//!
//! Every per-segment array must have one entry per segment. Consistency is
//! checked by [`GeometryParams::validate`] when a renderer is built, never per
//! frame.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::pose::Pose;

/// HSA material, used to pick precomputed workspace boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HsaMaterial {
    /// Flexible polyurethane.
    #[default]
    Fpu,
    /// Elastic polyurethane.
    Epu,
}

impl fmt::Display for HsaMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fpu => write!(f, "fpu"),
            Self::Epu => write!(f, "epu"),
        }
    }
}

/// Physical dimensions of a segmented planar HSA robot, in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryParams {
    /// Rigid proximal cap length per segment.
    pub proximal_cap: Vec<f64>,
    /// Flexible (sampled) length per segment.
    pub flexible: Vec<f64>,
    /// Rigid distal cap length per segment.
    pub distal_cap: Vec<f64>,
    /// Platform `[width, height]` per segment.
    pub platform_dims: Vec<[f64; 2]>,
    /// Outer radius of the rods.
    pub rod_outer_radius: f64,
    /// Pose of the end-effector relative to the last distal platform.
    #[serde(default)]
    pub end_effector_offset: Pose,
}

impl GeometryParams {
    pub fn num_segments(&self) -> usize {
        self.flexible.len()
    }

    /// Sum of the flexible lengths, the span covered by arc-length samples.
    pub fn flexible_length(&self) -> f64 {
        self.flexible.iter().sum()
    }

    /// Full length including both rigid caps of every segment.
    pub fn total_length(&self) -> f64 {
        self.proximal_cap.iter().sum::<f64>() + self.flexible_length() + self.distal_cap.iter().sum::<f64>()
    }

    /// Cap length prepended to sampled curves (first segment's proximal cap).
    pub fn base_cap(&self) -> f64 {
        self.proximal_cap.first().copied().unwrap_or(0.0)
    }

    /// Cap length appended to sampled curves (last segment's distal cap).
    pub fn tip_cap(&self) -> f64 {
        self.distal_cap.last().copied().unwrap_or(0.0)
    }

    /// Whether an end-effector is mounted, i.e. the offset moves the tip.
    pub fn end_effector_attached(&self) -> bool {
        self.end_effector_offset.x != 0.0 || self.end_effector_offset.y != 0.0
    }

    /// Check that all per-segment arrays agree and hold usable lengths.
    pub fn validate(&self) -> RenderResult<()> {
        let n = self.num_segments();
        if n == 0 {
            return Err(RenderError::InvalidGeometry("robot has no segments".into()));
        }

        let counts = [
            ("proximal_cap", self.proximal_cap.len()),
            ("distal_cap", self.distal_cap.len()),
            ("platform_dims", self.platform_dims.len()),
        ];
        for (name, len) in counts {
            if len != n {
                return Err(RenderError::InvalidGeometry(format!(
                    "{name} has {len} entries but there are {n} segments"
                )));
            }
        }

        let lengths = self
            .proximal_cap
            .iter()
            .chain(&self.flexible)
            .chain(&self.distal_cap)
            .chain(self.platform_dims.iter().flatten())
            .chain(std::iter::once(&self.rod_outer_radius));
        for &value in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(RenderError::InvalidGeometry(format!(
                    "lengths must be finite and non-negative, got {value}"
                )));
            }
        }

        if !self.end_effector_offset.is_finite() {
            return Err(RenderError::InvalidGeometry(
                "end-effector offset is not finite".into(),
            ));
        }
        if self.total_length() <= 0.0 {
            return Err(RenderError::InvalidGeometry("total robot length is zero".into()));
        }
        Ok(())
    }

    /// Uniform geometry with `num_segments` identical segments.
    pub fn uniform(
        num_segments: usize,
        proximal_cap: f64,
        flexible: f64,
        distal_cap: f64,
        platform_dims: [f64; 2],
        rod_outer_radius: f64,
    ) -> Self {
        Self {
            proximal_cap: vec![proximal_cap; num_segments],
            flexible: vec![flexible; num_segments],
            distal_cap: vec![distal_cap; num_segments],
            platform_dims: vec![platform_dims; num_segments],
            rod_outer_radius,
            end_effector_offset: Pose::ORIGIN,
        }
    }
}

impl Default for GeometryParams {
    /// A single segment with the proportions of the lab prototype.
    fn default() -> Self {
        Self::uniform(1, 25e-3, 59e-3, 25e-3, [80.8e-3, 12e-3], 25.4e-3 / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry_is_valid() {
        assert!(GeometryParams::default().validate().is_ok());
    }

    #[test]
    fn test_total_length_sums_all_caps() {
        let params = GeometryParams::uniform(2, 0.01, 0.05, 0.02, [0.08, 0.01], 0.01);
        assert!((params.total_length() - 0.16).abs() < 1e-12);
        assert!((params.flexible_length() - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_platform_count_mismatch_is_rejected() {
        let mut params = GeometryParams::uniform(2, 0.01, 0.05, 0.02, [0.08, 0.01], 0.01);
        params.platform_dims.pop();
        let err = params.validate().unwrap_err();
        assert!(matches!(err, RenderError::InvalidGeometry(ref msg) if msg.contains("platform_dims")));
    }

    #[test]
    fn test_negative_length_is_rejected() {
        let mut params = GeometryParams::default();
        params.flexible[0] = -0.01;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_no_segments_is_rejected() {
        let params = GeometryParams::uniform(0, 0.01, 0.05, 0.02, [0.08, 0.01], 0.01);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_end_effector_attached_ignores_orientation() {
        let mut params = GeometryParams::default();
        assert!(!params.end_effector_attached());
        params.end_effector_offset = Pose::new(0.0, 0.0, 0.3);
        assert!(!params.end_effector_attached());
        params.end_effector_offset = Pose::new(0.0, 0.024, 0.0);
        assert!(params.end_effector_attached());
    }

    #[test]
    fn test_material_serializes_lowercase() {
        let json = serde_json::to_string(&HsaMaterial::Epu).unwrap();
        assert_eq!(json, "\"epu\"");
    }
}
