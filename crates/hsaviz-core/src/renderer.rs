//! Renderer construction.
//!
//! Everything that does not depend on the per-frame configuration is fixed
//! here, once:
//!
//! ```text
//! ppm     = H / (2 × Σ(L_pc + L + L_dc))
//! origin  = (W/2, H)   or (W/2, 0) when mounted inverted
//! samples = linspace(0, Σ L, num_points)
//! ```
//!
//! plus the palette and, when requested, the projected workspace polygon.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::kinematics::Kinematics;
use crate::palette::{ColorPalette, PaletteKind};
use crate::params::{GeometryParams, HsaMaterial};
use crate::projection::{PIXEL_LIMIT, PixelProjector};
use crate::sampling::ArcLengthSamples;
use crate::workspace::{OperationalWorkspace, WorkspaceBoundaryProvider};

/// Largest canvas side in pixels.
pub const MAX_CANVAS_SIDE: u32 = 1 << 16;
/// Largest stroke width, marker radius or arrow length in pixels.
pub const MAX_MARKER_PX: u32 = 1 << 12;

/// How wide the rods are stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RodThickness {
    /// Fixed width in pixels.
    Pixels(u32),
    /// Twice the projected rod outer radius.
    FromGeometry,
}

impl Default for RodThickness {
    fn default() -> Self {
        Self::Pixels(18)
    }
}

/// Pixel sizes of the strokes and markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub rod_thickness: RodThickness,
    pub setpoint_radius: u32,
    pub attractor_half_size: u32,
    pub end_effector_radius: u32,
    /// Pixel position both axis arrows start from.
    pub arrow_origin: [i32; 2],
    pub arrow_length: i32,
    pub arrow_thickness: u32,
    /// Barb length as a fraction of the arrow length.
    pub arrow_tip_ratio: f64,
    /// Stroke the workspace polygon on top of its fill.
    pub outline_workspace: bool,
    /// Stroke the virtual backbone beneath the rods.
    pub draw_backbone: bool,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            rod_thickness: RodThickness::default(),
            setpoint_radius: 16,
            attractor_half_size: 13,
            end_effector_radius: 11,
            arrow_origin: [25, 25],
            arrow_length: 15,
            arrow_thickness: 3,
            arrow_tip_ratio: 0.3,
            outline_workspace: false,
            draw_backbone: false,
        }
    }
}

/// Canvas and drawing options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
    pub width: u32,
    pub height: u32,
    /// Samples along the flexible length per curve.
    pub num_points: usize,
    /// Robot mounted tip-down: base at the top edge.
    pub inverted_coordinates: bool,
    pub invert_colors: bool,
    pub draw_operational_workspace: bool,
    pub hsa_material: HsaMaterial,
    pub style: MarkerStyle,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            num_points: 25,
            inverted_coordinates: false,
            invert_colors: false,
            draw_operational_workspace: false,
            hsa_material: HsaMaterial::default(),
            style: MarkerStyle::default(),
        }
    }
}

impl RendererOptions {
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidOptions(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_CANVAS_SIDE || self.height > MAX_CANVAS_SIDE {
            return Err(RenderError::InvalidOptions(format!(
                "canvas sides are limited to {MAX_CANVAS_SIDE} px, got {}x{}",
                self.width, self.height
            )));
        }
        if self.num_points < 2 {
            return Err(RenderError::InvalidOptions(format!(
                "num_points must be at least 2, got {}",
                self.num_points
            )));
        }
        self.style.validate()?;
        Ok(())
    }
}

impl MarkerStyle {
    pub fn validate(&self) -> RenderResult<()> {
        let rod = match self.rod_thickness {
            RodThickness::Pixels(px) => px,
            RodThickness::FromGeometry => 0,
        };
        let sizes = [
            ("rod_thickness", rod),
            ("setpoint_radius", self.setpoint_radius),
            ("attractor_half_size", self.attractor_half_size),
            ("end_effector_radius", self.end_effector_radius),
            ("arrow_thickness", self.arrow_thickness),
            ("arrow_length", self.arrow_length.unsigned_abs()),
        ];
        for (name, px) in sizes {
            if px > MAX_MARKER_PX {
                return Err(RenderError::InvalidOptions(format!(
                    "{name} of {px} px exceeds {MAX_MARKER_PX} px"
                )));
            }
        }
        if self.arrow_origin.iter().any(|c| f64::from(*c).abs() > PIXEL_LIMIT) {
            return Err(RenderError::InvalidOptions(format!(
                "arrow origin {:?} is out of pixel range",
                self.arrow_origin
            )));
        }
        let ratio = self.arrow_tip_ratio;
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(RenderError::InvalidOptions(format!("arrow tip ratio {ratio} is invalid")));
        }
        Ok(())
    }
}

/// An immutable bundle of kinematics, geometry and derived drawing constants.
///
/// Built by [`Renderer::new`]; frames are produced by [`Renderer::draw`].
#[derive(Debug, Clone)]
pub struct Renderer<K> {
    pub(crate) kinematics: K,
    pub(crate) params: GeometryParams,
    pub(crate) options: RendererOptions,
    pub(crate) projector: PixelProjector,
    pub(crate) samples: ArcLengthSamples,
    pub(crate) palette: ColorPalette,
    pub(crate) rod_thickness: u32,
    pub(crate) workspace: Option<OperationalWorkspace>,
}

impl<K: Kinematics> Renderer<K> {
    /// Validate inputs and precompute every frame-independent constant.
    ///
    /// `provider` is only consulted when `options.draw_operational_workspace`
    /// is set, and then exactly once.
    pub fn new(
        kinematics: K,
        params: GeometryParams,
        options: RendererOptions,
        provider: Option<&dyn WorkspaceBoundaryProvider>,
    ) -> RenderResult<Self> {
        params.validate()?;
        options.validate()?;

        let pixels_per_meter = f64::from(options.height) / (2.0 * params.total_length());
        let projector = PixelProjector::for_canvas(
            options.width,
            options.height,
            pixels_per_meter,
            options.inverted_coordinates,
        );
        let samples = ArcLengthSamples::evenly_spaced(params.flexible_length(), options.num_points);
        let palette = ColorPalette::of_kind(PaletteKind::from_inverted(options.invert_colors));

        let rod_thickness = match options.style.rod_thickness {
            RodThickness::Pixels(px) => px,
            RodThickness::FromGeometry => {
                let radius = projector.length_to_pixels(params.rod_outer_radius).max(0) as u32;
                (2 * radius).clamp(1, MAX_MARKER_PX)
            }
        };

        let workspace = if options.draw_operational_workspace {
            let provider = provider.ok_or_else(|| {
                RenderError::InvalidOptions(
                    "operational workspace requested without a boundary provider".into(),
                )
            })?;
            Some(OperationalWorkspace::build(
                provider,
                options.hsa_material,
                params.end_effector_attached(),
                &projector,
            )?)
        } else {
            None
        };

        tracing::debug!(
            pixels_per_meter,
            origin = ?projector.origin(),
            num_points = options.num_points,
            rod_thickness,
            workspace_vertices = workspace.as_ref().map_or(0, |w| w.pixels().len()),
            "renderer constructed"
        );

        Ok(Self {
            kinematics,
            params,
            options,
            projector,
            samples,
            palette,
            rod_thickness,
            workspace,
        })
    }
}

impl<K> Renderer<K> {
    pub fn kinematics(&self) -> &K {
        &self.kinematics
    }

    pub fn params(&self) -> &GeometryParams {
        &self.params
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    pub fn projector(&self) -> &PixelProjector {
        &self.projector
    }

    pub fn samples(&self) -> &ArcLengthSamples {
        &self.samples
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Resolved rod stroke width in pixels.
    pub fn rod_thickness(&self) -> u32 {
        self.rod_thickness
    }

    /// The cached workspace polygon, if the overlay is enabled.
    pub fn workspace(&self) -> Option<&OperationalWorkspace> {
        self.workspace.as_ref()
    }
}
