//! Latest inputs shared between input sources and the render loop.

use hsaviz_core::{AnnotationSet, AttractionAxis, Configuration, Pose};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct Inputs {
    configuration: Option<Configuration>,
    annotations: AnnotationSet,
}

/// Most recent configuration and annotations.
///
/// Writers replace values as they arrive; the render loop takes one snapshot
/// per tick. Nothing is queued, so intermediate updates are simply replaced.
#[derive(Debug, Default)]
pub struct LatestInputs {
    inner: Mutex<Inputs>,
}

impl LatestInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_configuration(&self, q: Configuration) {
        self.inner.lock().configuration = Some(q);
    }

    pub fn set_setpoint(&self, setpoint: Option<Pose>) {
        self.inner.lock().annotations.setpoint = setpoint;
    }

    pub fn set_attractor(&self, attractor: Option<Pose>) {
        self.inner.lock().annotations.attractor = attractor;
    }

    pub fn set_active_axis(&self, axis: Option<AttractionAxis>) {
        self.inner.lock().annotations.active_axis = axis;
    }

    /// Set the active axis from its bus index (`-1` none, `0` x, `1` y).
    pub fn set_active_axis_index(&self, index: i64) {
        self.set_active_axis(AttractionAxis::from_index(index));
    }

    pub fn set_annotations(&self, annotations: AnnotationSet) {
        self.inner.lock().annotations = annotations;
    }

    /// Copy of the current inputs, or `None` before the first configuration.
    pub fn snapshot(&self) -> Option<(Configuration, AnnotationSet)> {
        let inputs = self.inner.lock();
        let q = inputs.configuration.clone()?;
        Some((q, inputs.annotations))
    }
}
