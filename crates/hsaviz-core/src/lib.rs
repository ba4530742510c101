//! HSA Viz Core — configuration-to-raster rendering of planar HSA robots.
//!
//! A [`Renderer`] is built once from a [`Kinematics`] implementation, the
//! robot's [`GeometryParams`] and [`RendererOptions`]. Each call to
//! [`Renderer::draw`] turns a [`Configuration`] plus optional
//! [`AnnotationSet`] into a fresh RGB frame. No I/O, no async.

pub mod configuration;
pub mod error;
pub mod extension;
pub mod kinematics;
pub mod palette;
pub mod params;
pub mod pose;
pub mod projection;
pub mod raster;
pub mod renderer;
pub mod sampling;
pub mod scene;
pub mod workspace;

// Re-exports for convenience.
pub use configuration::{AnnotationSet, AttractionAxis, Configuration, SegmentStrain};
pub use error::{RenderError, RenderResult};
pub use kinematics::{FnKinematics, Kinematics, PiecewiseConstantStrain, RodSide};
pub use palette::{ColorPalette, PaletteKind};
pub use params::{GeometryParams, HsaMaterial};
pub use pose::Pose;
pub use projection::{PIXEL_LIMIT, PixelProjector};
pub use renderer::{
    MAX_CANVAS_SIDE, MAX_MARKER_PX, MarkerStyle, RodThickness, Renderer, RendererOptions,
};
pub use workspace::{
    OperationalWorkspace, StaticWorkspaceBoundaries, WorkspaceBoundaries,
    WorkspaceBoundaryProvider,
};
