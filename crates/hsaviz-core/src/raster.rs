//! Raster primitives on top of `imageproc`.
//!
//! These wrap the `imageproc` drawing functions with the semantics the scene
//! needs: closed or degenerate polygons are accepted, thick polylines get round
//! joins, and arrows use a tip proportional to their length. All shapes are
//! clipped to the canvas.

use glam::{DVec2, IVec2};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Fill a polygon. A repeated closing vertex is allowed; polygons that
/// collapse to a line or a point are drawn as such.
pub fn fill_polygon(img: &mut RgbImage, vertices: &[IVec2], color: Rgb<u8>) {
    fill_ring(img, &normalize_ring(vertices), color);
}

/// Drop consecutive duplicate vertices and any closing repeats of the first.
pub fn normalize_ring(vertices: &[IVec2]) -> Vec<IVec2> {
    let mut ring: Vec<IVec2> = vertices.to_vec();
    ring.dedup();
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Fill a ring already passed through [`normalize_ring`].
pub fn fill_ring(img: &mut RgbImage, ring: &[IVec2], color: Rgb<u8>) {
    match ring {
        [] => {}
        [p] => put_pixel_checked(img, *p, color),
        [a, b] => draw_line_segment_mut(img, to_f32(*a), to_f32(*b), color),
        [first, .., last] if first == last => fill_polygon(img, ring, color),
        _ => {
            let poly: Vec<Point<i32>> = ring.iter().map(|p| Point::new(p.x, p.y)).collect();
            draw_polygon_mut(img, &poly, color);
        }
    }
}

/// Stroke an open polyline with the given thickness in pixels.
///
/// Each segment becomes a filled quad and every vertex a filled disc, which
/// rounds both joins and end caps.
pub fn stroke_polyline(img: &mut RgbImage, points: &[IVec2], thickness: u32, color: Rgb<u8>) {
    if thickness <= 1 {
        for pair in points.windows(2) {
            draw_line_segment_mut(img, to_f32(pair[0]), to_f32(pair[1]), color);
        }
        if let [p] = points {
            put_pixel_checked(img, *p, color);
        }
        return;
    }

    let half = f64::from(thickness) / 2.0;
    for pair in points.windows(2) {
        let (a, b) = (pair[0].as_dvec2(), pair[1].as_dvec2());
        let dir = b - a;
        let length = dir.length();
        if length < f64::EPSILON {
            continue;
        }
        let normal = DVec2::new(-dir.y, dir.x) / length * half;
        let quad = [a + normal, b + normal, b - normal, a - normal].map(round_to_pixel);
        fill_polygon(img, &quad, color);
    }

    let radius = (half.round() as i32).max(1);
    for p in points {
        draw_filled_circle_mut(img, (p.x, p.y), radius, color);
    }
}

/// Filled disc centered on `center`.
pub fn fill_circle(img: &mut RgbImage, center: IVec2, radius: u32, color: Rgb<u8>) {
    draw_filled_circle_mut(img, (center.x, center.y), radius as i32, color);
}

/// Filled axis-aligned square spanning `center ± half_side`, both edges inclusive.
pub fn fill_square(img: &mut RgbImage, center: IVec2, half_side: u32, color: Rgb<u8>) {
    let side = 2 * half_side + 1;
    let half = half_side as i32;
    let rect = Rect::at(center.x - half, center.y - half).of_size(side, side);
    draw_filled_rect_mut(img, rect, color);
}

/// Arrow from `from` to `to` with two barbs at ±45° of length
/// `tip_ratio × |to − from|`.
pub fn arrowed_line(
    img: &mut RgbImage,
    from: IVec2,
    to: IVec2,
    thickness: u32,
    tip_ratio: f64,
    color: Rgb<u8>,
) {
    stroke_polyline(img, &[from, to], thickness, color);

    let back = (from - to).as_dvec2();
    let length = back.length();
    if length < f64::EPSILON {
        return;
    }
    let tip = tip_ratio * length;
    let angle = back.y.atan2(back.x);
    for barb in [angle + std::f64::consts::FRAC_PI_4, angle - std::f64::consts::FRAC_PI_4] {
        let end = to.as_dvec2() + DVec2::new(barb.cos(), barb.sin()) * tip;
        stroke_polyline(img, &[round_to_pixel(end), to], thickness, color);
    }
}

fn round_to_pixel(p: DVec2) -> IVec2 {
    let r = p.round();
    IVec2::new(r.x as i32, r.y as i32)
}

fn to_f32(p: IVec2) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

fn put_pixel_checked(img: &mut RgbImage, p: IVec2, color: Rgb<u8>) {
    if p.x >= 0 && p.y >= 0 && (p.x as u32) < img.width() && (p.y as u32) < img.height() {
        img.put_pixel(p.x as u32, p.y as u32, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const INK: Rgb<u8> = Rgb([10, 20, 30]);

    fn canvas() -> RgbImage {
        RgbImage::from_pixel(64, 48, WHITE)
    }

    fn count(img: &RgbImage, color: Rgb<u8>) -> usize {
        img.pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn test_closed_polygon_is_filled() {
        let mut img = canvas();
        let square = [
            IVec2::new(10, 10),
            IVec2::new(20, 10),
            IVec2::new(20, 20),
            IVec2::new(10, 20),
            IVec2::new(10, 10),
        ];
        fill_polygon(&mut img, &square, INK);
        assert_eq!(*img.get_pixel(15, 15), INK);
        assert_eq!(*img.get_pixel(25, 15), WHITE);
    }

    #[test]
    fn test_degenerate_polygon_does_not_panic() {
        let mut img = canvas();
        fill_polygon(&mut img, &[IVec2::new(5, 5); 5], INK);
        assert_eq!(*img.get_pixel(5, 5), INK);
        fill_polygon(&mut img, &[IVec2::new(1, 1), IVec2::new(8, 1), IVec2::new(1, 1)], INK);
        assert_eq!(*img.get_pixel(4, 1), INK);
        fill_polygon(&mut img, &[], INK);
    }

    #[test]
    fn test_normalized_ring_drops_duplicates_and_closure() {
        let closed = [
            IVec2::new(10, 10),
            IVec2::new(20, 10),
            IVec2::new(20, 10),
            IVec2::new(20, 20),
            IVec2::new(10, 10),
            IVec2::new(10, 10),
        ];
        let ring = normalize_ring(&closed);
        assert_eq!(ring, [IVec2::new(10, 10), IVec2::new(20, 10), IVec2::new(20, 20)]);

        let mut img = canvas();
        fill_ring(&mut img, &ring, INK);
        assert_eq!(*img.get_pixel(18, 12), INK);
        assert_eq!(*img.get_pixel(12, 18), WHITE);
    }

    #[test]
    fn test_unnormalized_closed_ring_still_fills() {
        let mut img = canvas();
        let closed = [IVec2::new(10, 10), IVec2::new(20, 10), IVec2::new(20, 20), IVec2::new(10, 10)];
        fill_ring(&mut img, &closed, INK);
        assert_eq!(*img.get_pixel(18, 12), INK);
    }

    #[test]
    fn test_thick_polyline_covers_its_width() {
        let mut img = canvas();
        stroke_polyline(&mut img, &[IVec2::new(32, 5), IVec2::new(32, 40)], 10, INK);
        for x in 28..=36 {
            assert_eq!(*img.get_pixel(x, 20), INK, "x = {x}");
        }
        assert_eq!(*img.get_pixel(20, 20), WHITE);
    }

    #[test]
    fn test_polyline_outside_canvas_is_clipped() {
        let mut img = canvas();
        stroke_polyline(&mut img, &[IVec2::new(-100, -100), IVec2::new(-50, 400)], 18, INK);
        assert_eq!(count(&img, INK), 0);
    }

    #[test]
    fn test_square_spans_both_edges() {
        let mut img = canvas();
        fill_square(&mut img, IVec2::new(30, 20), 3, INK);
        assert_eq!(count(&img, INK), 49);
        assert_eq!(*img.get_pixel(27, 17), INK);
        assert_eq!(*img.get_pixel(33, 23), INK);
    }

    #[test]
    fn test_horizontal_arrow_stays_flat() {
        let mut img = canvas();
        arrowed_line(&mut img, IVec2::new(25, 25), IVec2::new(40, 25), 3, 0.3, INK);
        let rows: Vec<u32> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == INK)
            .map(|(_, y, _)| y)
            .collect();
        let min = rows.iter().min().copied().unwrap_or_default();
        let max = rows.iter().max().copied().unwrap_or_default();
        assert!(max - min <= 10, "arrow spans rows {min}..={max}");
        assert_eq!(*img.get_pixel(40, 25), INK);
    }
}
