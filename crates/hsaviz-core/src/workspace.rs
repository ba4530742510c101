//! Operational workspace overlay, built once per renderer.
//!
//! A provider supplies the minimum and maximum reachable end-effector
//! position sequences for a material. Walking the minimum boundary forward
//! and the maximum boundary backward traces the outline of the reachable
//! region, which is closed by repeating its first vertex.

use std::collections::HashMap;
use std::path::Path;

use glam::{DVec2, IVec2};
use serde::Deserialize;

use crate::error::{RenderError, RenderResult};
use crate::params::HsaMaterial;
use crate::projection::PixelProjector;
use crate::raster::normalize_ring;

/// Minimum and maximum reachable end-effector positions, in meters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkspaceBoundaries {
    pub min: Vec<DVec2>,
    pub max: Vec<DVec2>,
}

/// On-disk form: `{ "min": [[x, y], ...], "max": [[x, y], ...] }`.
#[derive(Debug, Deserialize)]
struct BoundaryFile {
    min: Vec<[f64; 2]>,
    max: Vec<[f64; 2]>,
}

impl WorkspaceBoundaries {
    pub fn from_json(json: &str) -> RenderResult<Self> {
        let file: BoundaryFile = serde_json::from_str(json)
            .map_err(|e| RenderError::WorkspaceBoundary(format!("malformed boundary file: {e}")))?;
        let to_points = |v: Vec<[f64; 2]>| v.into_iter().map(DVec2::from).collect();
        Ok(Self {
            min: to_points(file.min),
            max: to_points(file.max),
        })
    }

    pub fn load(path: &Path) -> RenderResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            RenderError::WorkspaceBoundary(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Closed outline: `min` forward, then `max` reversed, then `min[0]` again.
    pub fn outline(&self) -> Vec<DVec2> {
        let mut outline: Vec<DVec2> = self.min.iter().chain(self.max.iter().rev()).copied().collect();
        if let Some(&first) = outline.first() {
            if outline.last() != Some(&first) {
                outline.push(first);
            }
        }
        outline
    }
}

/// Source of precomputed workspace boundaries.
pub trait WorkspaceBoundaryProvider {
    fn boundaries(
        &self,
        material: HsaMaterial,
        end_effector_attached: bool,
    ) -> RenderResult<WorkspaceBoundaries>;
}

/// In-memory boundary table keyed by material and end-effector attachment.
#[derive(Debug, Clone, Default)]
pub struct StaticWorkspaceBoundaries {
    table: HashMap<(HsaMaterial, bool), WorkspaceBoundaries>,
}

impl StaticWorkspaceBoundaries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        material: HsaMaterial,
        end_effector_attached: bool,
        boundaries: WorkspaceBoundaries,
    ) -> Self {
        self.table.insert((material, end_effector_attached), boundaries);
        self
    }
}

impl WorkspaceBoundaryProvider for StaticWorkspaceBoundaries {
    fn boundaries(
        &self,
        material: HsaMaterial,
        end_effector_attached: bool,
    ) -> RenderResult<WorkspaceBoundaries> {
        self.table
            .get(&(material, end_effector_attached))
            .cloned()
            .ok_or_else(|| {
                RenderError::WorkspaceBoundary(format!(
                    "no boundary for material {material} (end-effector attached: {end_effector_attached})"
                ))
            })
    }
}

/// The cached workspace polygon in both Cartesian and pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationalWorkspace {
    cartesian: Vec<DVec2>,
    pixels: Vec<IVec2>,
    ring: Vec<IVec2>,
}

impl OperationalWorkspace {
    /// Query the provider once, close the polygon and project it.
    pub fn build(
        provider: &dyn WorkspaceBoundaryProvider,
        material: HsaMaterial,
        end_effector_attached: bool,
        projector: &PixelProjector,
    ) -> RenderResult<Self> {
        let boundaries = provider.boundaries(material, end_effector_attached)?;
        let cartesian = boundaries.outline();

        if cartesian.iter().any(|p| !p.is_finite()) {
            return Err(RenderError::WorkspaceBoundary("boundary contains non-finite points".into()));
        }
        let mut distinct = cartesian.clone();
        distinct.dedup();
        // Closed outline repeats its first vertex, so a triangle needs four.
        if distinct.len() < 4 {
            return Err(RenderError::WorkspaceBoundary(format!(
                "polygon needs at least 3 distinct vertices, got {}",
                distinct.len().saturating_sub(1)
            )));
        }

        let pixels: Vec<IVec2> = cartesian.iter().map(|&p| projector.project_point(p)).collect();
        let ring = normalize_ring(&pixels);
        Ok(Self {
            cartesian,
            pixels,
            ring,
        })
    }

    pub fn cartesian(&self) -> &[DVec2] {
        &self.cartesian
    }

    /// Projected polygon; first and last vertices coincide.
    pub fn pixels(&self) -> &[IVec2] {
        &self.pixels
    }

    /// Projected polygon ready for filling, without the closing vertex.
    pub fn ring(&self) -> &[IVec2] {
        &self.ring
    }
}
