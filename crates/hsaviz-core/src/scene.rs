//! Per-frame scene composition.
//!
//! Shapes are painted back to front onto a fresh buffer:
//!
//! ```text
//! background → workspace → (backbone) → left rod → right rod → platforms
//!            → setpoint → attractor → end-effector → active-axis arrows
//! ```
//!
//! Inputs and kinematics are checked before the buffer is allocated, so a
//! failing call never produces a partially drawn frame.

use glam::{DVec2, IVec2};
use image::RgbImage;

use crate::configuration::{AnnotationSet, AttractionAxis, Configuration};
use crate::error::{RenderError, RenderResult};
use crate::extension::extend_with_caps;
use crate::kinematics::Kinematics;
use crate::palette::pixel;
use crate::pose::Pose;
use crate::raster::{
    arrowed_line, fill_circle, fill_polygon, fill_ring, fill_square, stroke_polyline,
};
use crate::renderer::Renderer;
use crate::sampling::RobotSamples;

const WORKSPACE_OUTLINE_THICKNESS: u32 = 2;
const BACKBONE_THICKNESS: u32 = 5;

/// Rectangle corners of a platform: lower-left, upper-left, upper-right,
/// lower-right, then lower-left again to close the polygon.
///
/// ```text
/// corner = p + R(θ) · (∓w/2, ∓h/2)
/// ```
pub fn platform_footprint(pose: &Pose, dims: [f64; 2]) -> [DVec2; 5] {
    let (hw, hh) = (dims[0] / 2.0, dims[1] / 2.0);
    let lower_left = pose.transform_point(DVec2::new(-hw, -hh));
    [
        lower_left,
        pose.transform_point(DVec2::new(-hw, hh)),
        pose.transform_point(DVec2::new(hw, hh)),
        pose.transform_point(DVec2::new(hw, -hh)),
        lower_left,
    ]
}

/// Everything projected to pixels for one frame.
struct FrameGeometry {
    backbone: Vec<IVec2>,
    left_rod: Vec<IVec2>,
    right_rod: Vec<IVec2>,
    platforms: Vec<[IVec2; 5]>,
    end_effector: Option<IVec2>,
}

impl<K: Kinematics> Renderer<K> {
    /// Render one frame for configuration `q` with optional annotations.
    ///
    /// Returns a `height × width` RGB image. On error nothing is drawn and the
    /// renderer is unaffected; the next call behaves as if this one never
    /// happened.
    pub fn draw(&self, q: &Configuration, annotations: &AnnotationSet) -> RenderResult<RgbImage> {
        q.validate(self.params.num_segments())?;
        annotations.validate()?;
        let geometry = self.evaluate(q, annotations)?;

        let style = &self.options.style;
        let palette = &self.palette;
        let mut img = RgbImage::from_pixel(
            self.options.width,
            self.options.height,
            pixel(palette.background),
        );

        if let Some(workspace) = &self.workspace {
            fill_ring(&mut img, workspace.ring(), pixel(palette.workspace_background));
            if style.outline_workspace {
                stroke_polyline(
                    &mut img,
                    workspace.pixels(),
                    WORKSPACE_OUTLINE_THICKNESS,
                    pixel(palette.workspace_boundary),
                );
            }
        }

        if style.draw_backbone {
            stroke_polyline(&mut img, &geometry.backbone, BACKBONE_THICKNESS, pixel(palette.backbone));
        }
        stroke_polyline(&mut img, &geometry.left_rod, self.rod_thickness, pixel(palette.rod));
        stroke_polyline(&mut img, &geometry.right_rod, self.rod_thickness, pixel(palette.rod));

        for footprint in &geometry.platforms {
            fill_polygon(&mut img, footprint, pixel(palette.platform));
        }

        if let Some(setpoint) = &annotations.setpoint {
            let center = self.projector.project(setpoint);
            fill_circle(&mut img, center, style.setpoint_radius, pixel(palette.setpoint));
        }
        if let Some(attractor) = &annotations.attractor {
            let center = self.projector.project(attractor);
            fill_square(&mut img, center, style.attractor_half_size, pixel(palette.attractor));
        }
        if let Some(center) = geometry.end_effector {
            fill_circle(&mut img, center, style.end_effector_radius, pixel(palette.end_effector));
        }

        if let Some(axis) = annotations.active_axis {
            let origin = IVec2::from(style.arrow_origin);
            let step = match axis {
                AttractionAxis::X => IVec2::new(style.arrow_length, 0),
                AttractionAxis::Y => IVec2::new(0, style.arrow_length),
            };
            for tip in [origin + step, origin - step] {
                arrowed_line(
                    &mut img,
                    origin,
                    tip,
                    style.arrow_thickness,
                    style.arrow_tip_ratio,
                    pixel(palette.active_axis),
                );
            }
        }

        tracing::trace!(
            segments = self.params.num_segments(),
            setpoint = annotations.setpoint.is_some(),
            attractor = annotations.attractor.is_some(),
            active_axis = ?annotations.active_axis,
            "frame drawn"
        );
        Ok(img)
    }

    /// Sample, extend and project all robot geometry for one frame.
    fn evaluate(&self, q: &Configuration, annotations: &AnnotationSet) -> RenderResult<FrameGeometry> {
        let samples = RobotSamples::evaluate(&self.kinematics, &self.params, q, &self.samples)?;
        let (base_cap, tip_cap) = (self.params.base_cap(), self.params.tip_cap());
        let project_curve = |curve: &[Pose]| {
            self.projector
                .project_all(&extend_with_caps(curve, base_cap, tip_cap))
        };

        let platforms = samples
            .platforms
            .iter()
            .zip(&self.params.platform_dims)
            .map(|(pose, &dims)| platform_footprint(pose, dims).map(|c| self.projector.project_point(c)))
            .collect();

        let end_effector = if annotations.marks_end_effector() {
            let pose = self.kinematics.end_effector(&self.params, q);
            if !pose.is_finite() {
                return Err(RenderError::NonFinitePose("end-effector"));
            }
            Some(self.projector.project(&pose))
        } else {
            None
        };

        Ok(FrameGeometry {
            backbone: project_curve(&samples.backbone),
            left_rod: project_curve(&samples.left_rod),
            right_rod: project_curve(&samples.right_rod),
            platforms,
            end_effector,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::PiecewiseConstantStrain;
    use crate::params::GeometryParams;
    use crate::renderer::RendererOptions;
    use image::Rgb;
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-12;

    fn renderer() -> Renderer<PiecewiseConstantStrain> {
        let params = GeometryParams::uniform(2, 0.01, 0.05, 0.02, [0.08, 0.01], 0.01);
        Renderer::new(PiecewiseConstantStrain::new(0.02), params, RendererOptions::default(), None)
            .unwrap()
    }

    #[test]
    fn test_footprint_is_closed_and_ordered() {
        let corners = platform_footprint(&Pose::new(0.0, 0.1, 0.0), [0.08, 0.01]);
        assert_eq!(corners[0], corners[4]);
        assert!((corners[0] - DVec2::new(-0.04, 0.095)).length() < EPSILON);
        assert!((corners[1] - DVec2::new(-0.04, 0.105)).length() < EPSILON);
        assert!((corners[2] - DVec2::new(0.04, 0.105)).length() < EPSILON);
        assert!((corners[3] - DVec2::new(0.04, 0.095)).length() < EPSILON);
    }

    #[test]
    fn test_footprint_rotates_with_platform() {
        let corners = platform_footprint(&Pose::new(0.0, 0.0, FRAC_PI_2), [0.08, 0.01]);
        // A quarter turn counter-clockwise maps (−w/2, −h/2) to (h/2, −w/2).
        assert!((corners[0] - DVec2::new(0.005, -0.04)).length() < EPSILON);
    }

    #[test]
    fn test_frame_has_canvas_shape() {
        let img = renderer().draw(&Configuration::rest(2), &AnnotationSet::NONE).unwrap();
        assert_eq!(img.dimensions(), (640, 480));
    }

    #[test]
    fn test_platforms_are_filled() {
        let r = renderer();
        let img = r.draw(&Configuration::rest(2), &AnnotationSet::NONE).unwrap();
        // First platform center sits at y = 0.01 + 0.05 + 0.01 = 0.07 m.
        let center = r.projector().project_point(DVec2::new(0.0, 0.07));
        assert_eq!(
            *img.get_pixel(center.x as u32, center.y as u32),
            pixel(r.palette().platform)
        );
    }

    #[test]
    fn test_rods_are_drawn_but_backbone_is_not() {
        let r = renderer();
        let img = r.draw(&Configuration::rest(2), &AnnotationSet::NONE).unwrap();
        let ppm = r.projector().pixels_per_meter();
        let v = r.projector().project_point(DVec2::new(0.0, 0.03)).y as u32;
        let left = (320.0 - 0.02 * ppm).round() as u32;
        assert_eq!(*img.get_pixel(left, v), pixel(r.palette().rod));
        assert_eq!(*img.get_pixel(320, v), pixel(r.palette().background));
    }

    #[test]
    fn test_backbone_toggle_strokes_center_line() {
        let mut options = RendererOptions::default();
        options.style.draw_backbone = true;
        let params = GeometryParams::uniform(2, 0.01, 0.05, 0.02, [0.08, 0.01], 0.01);
        let r = Renderer::new(PiecewiseConstantStrain::new(0.02), params, options, None).unwrap();
        let img = r.draw(&Configuration::rest(2), &AnnotationSet::NONE).unwrap();
        let v = r.projector().project_point(DVec2::new(0.0, 0.03)).y as u32;
        assert_eq!(*img.get_pixel(320, v), pixel(r.palette().backbone));
    }

    #[test]
    fn test_axis_arrows_follow_axis() {
        let r = renderer();
        let ink = pixel(r.palette().active_axis);
        let x = r
            .draw(&Configuration::rest(2), &AnnotationSet::NONE.with_active_axis(AttractionAxis::X))
            .unwrap();
        assert_eq!(*x.get_pixel(12, 25), ink);
        assert_eq!(*x.get_pixel(38, 25), ink);
        assert_ne!(*x.get_pixel(25, 38), ink);

        let y = r
            .draw(&Configuration::rest(2), &AnnotationSet::NONE.with_active_axis(AttractionAxis::Y))
            .unwrap();
        assert_eq!(*y.get_pixel(25, 12), ink);
        assert_eq!(*y.get_pixel(25, 38), ink);
        assert_ne!(*y.get_pixel(38, 25), ink);
    }

    #[test]
    fn test_wrong_length_configuration_fails() {
        let err = renderer()
            .draw(&Configuration(vec![0.0; 5]), &AnnotationSet::NONE)
            .unwrap_err();
        assert_eq!(err, RenderError::InvalidConfiguration { expected: 6, actual: 5 });
    }

    #[test]
    fn test_non_finite_annotation_fails() {
        let annotations = AnnotationSet::NONE.with_setpoint(Pose::new(f64::NAN, 0.0, 0.0));
        let err = renderer().draw(&Configuration::rest(2), &annotations).unwrap_err();
        assert_eq!(err, RenderError::NonFiniteInput("setpoint"));
    }

    #[test]
    fn test_far_markers_land_off_canvas() {
        let r = renderer();
        let annotations = AnnotationSet::NONE
            .with_setpoint(Pose::new(0.0, -1e12, 0.0))
            .with_attractor(Pose::new(1e12, 1e12, 0.0));
        let img = r.draw(&Configuration::rest(2), &annotations).unwrap();
        assert_eq!(img.dimensions(), (640, 480));
        assert!(!img.pixels().any(|p| *p == pixel(r.palette().setpoint)));
        assert!(!img.pixels().any(|p| *p == pixel(r.palette().attractor)));
    }

    #[test]
    fn test_markers_draw_in_palette_colors() {
        let r = renderer();
        let annotations = AnnotationSet::NONE
            .with_setpoint(Pose::new(0.05, 0.1, 0.0))
            .with_attractor(Pose::new(-0.05, 0.1, 0.0));
        let img = r.draw(&Configuration::rest(2), &annotations).unwrap();
        let at = |p: IVec2| -> Rgb<u8> { *img.get_pixel(p.x as u32, p.y as u32) };

        let setpoint = r.projector().project_point(DVec2::new(0.05, 0.1));
        let attractor = r.projector().project_point(DVec2::new(-0.05, 0.1));
        assert_eq!(at(setpoint), pixel(r.palette().setpoint));
        assert_eq!(at(attractor), pixel(r.palette().attractor));
        assert_eq!(at(attractor + IVec2::new(13, 13)), pixel(r.palette().attractor));

        let tip = r.projector().project(&r.kinematics().end_effector(r.params(), &Configuration::rest(2)));
        assert_eq!(at(tip), pixel(r.palette().end_effector));
    }
}
