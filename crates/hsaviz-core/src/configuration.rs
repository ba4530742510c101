//! Per-frame inputs: the configuration vector and operator annotations.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::pose::Pose;

/// Number of generalized coordinates per segment: bend, shear, axial strain.
pub const STRAINS_PER_SEGMENT: usize = 3;

/// Generalized coordinates `q`, ordered `[bend, shear, axial]` per segment.
///
/// Values are strains relative to the rest configuration, so all zeros is the
/// unbent, unstretched robot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration(pub Vec<f64>);

impl Configuration {
    /// Rest configuration for `num_segments` segments.
    pub fn rest(num_segments: usize) -> Self {
        Self(vec![0.0; num_segments * STRAINS_PER_SEGMENT])
    }

    pub fn from_segments(segments: &[SegmentStrain]) -> Self {
        Self(
            segments
                .iter()
                .flat_map(|s| [s.bend, s.shear, s.axial])
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Strains of one segment. Callers must have run [`Self::validate`].
    pub fn segment(&self, index: usize) -> SegmentStrain {
        let q = &self.0[index * STRAINS_PER_SEGMENT..(index + 1) * STRAINS_PER_SEGMENT];
        SegmentStrain { bend: q[0], shear: q[1], axial: q[2] }
    }

    /// Check shape and finiteness against the robot's segment count.
    pub fn validate(&self, num_segments: usize) -> RenderResult<()> {
        let expected = num_segments * STRAINS_PER_SEGMENT;
        if self.0.len() != expected {
            return Err(RenderError::InvalidConfiguration {
                expected,
                actual: self.0.len(),
            });
        }
        if self.0.iter().any(|v| !v.is_finite()) {
            return Err(RenderError::NonFiniteInput("configuration"));
        }
        Ok(())
    }
}

impl From<Vec<f64>> for Configuration {
    fn from(q: Vec<f64>) -> Self {
        Self(q)
    }
}

/// Strains of a single segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentStrain {
    /// Bending strain (curvature) in rad/m.
    pub bend: f64,
    /// Shear strain, dimensionless.
    pub shear: f64,
    /// Axial elongation strain, dimensionless.
    pub axial: f64,
}

/// Axis along which the operator is currently moving the attractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttractionAxis {
    X,
    Y,
}

impl AttractionAxis {
    /// Decode the integer convention used on the message bus:
    /// `0` is x, `1` is y, anything else means no active axis.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            _ => None,
        }
    }

    pub const fn index(self) -> i64 {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }
}

/// Optional overlays drawn on top of the robot. Absent fields are not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationSet {
    /// Desired end-effector pose.
    #[serde(default)]
    pub setpoint: Option<Pose>,
    /// Attractor end-effector pose.
    #[serde(default)]
    pub attractor: Option<Pose>,
    /// Axis currently being manipulated by the operator.
    #[serde(default)]
    pub active_axis: Option<AttractionAxis>,
}

impl AnnotationSet {
    pub const NONE: Self = Self {
        setpoint: None,
        attractor: None,
        active_axis: None,
    };

    pub fn with_setpoint(mut self, pose: Pose) -> Self {
        self.setpoint = Some(pose);
        self
    }

    pub fn with_attractor(mut self, pose: Pose) -> Self {
        self.attractor = Some(pose);
        self
    }

    pub fn with_active_axis(mut self, axis: AttractionAxis) -> Self {
        self.active_axis = Some(axis);
        self
    }

    /// Whether the current end-effector marker should be drawn.
    pub fn marks_end_effector(&self) -> bool {
        self.setpoint.is_some() || self.attractor.is_some()
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.setpoint.is_some_and(|p| !p.is_finite()) {
            return Err(RenderError::NonFiniteInput("setpoint"));
        }
        if self.attractor.is_some_and(|p| !p.is_finite()) {
            return Err(RenderError::NonFiniteInput("attractor"));
        }
        Ok(())
    }
}
