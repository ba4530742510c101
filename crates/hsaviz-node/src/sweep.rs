//! Synthetic input source: a periodic bending sweep.
//!
//! ```text
//! κ_be(t) = A · sin(2π t / T)        for every segment
//! setpoint = end-effector pose at κ_be = A/2
//! axis     = x for the first half of each period, y for the second
//! ```

use std::f64::consts::TAU;

use hsaviz_core::{AnnotationSet, AttractionAxis, Configuration, Pose, SegmentStrain};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendingSweep {
    pub num_segments: usize,
    /// Peak bending strain in rad/m.
    pub amplitude: f64,
    /// Seconds per full sweep.
    pub period: f64,
}

impl BendingSweep {
    pub fn configuration_at(&self, t: f64) -> Configuration {
        let bend = self.amplitude * (TAU * t / self.period).sin();
        self.uniform_bend(bend)
    }

    /// Configuration whose end-effector pose is used as the setpoint.
    pub fn target(&self) -> Configuration {
        self.uniform_bend(self.amplitude / 2.0)
    }

    pub fn axis_at(&self, t: f64) -> AttractionAxis {
        if (t / self.period).fract() < 0.5 {
            AttractionAxis::X
        } else {
            AttractionAxis::Y
        }
    }

    pub fn annotations_at(&self, t: f64, setpoint: Pose) -> AnnotationSet {
        AnnotationSet::NONE
            .with_setpoint(setpoint)
            .with_active_axis(self.axis_at(t))
    }

    fn uniform_bend(&self, bend: f64) -> Configuration {
        let strain = SegmentStrain {
            bend,
            shear: 0.0,
            axial: 0.0,
        };
        Configuration::from_segments(&vec![strain; self.num_segments])
    }
}
