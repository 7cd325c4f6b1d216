//! Thick segments drawn as filled quadrilaterals
//!
//! Variable-width line primitives anti-alias poorly at pen sizes this small,
//! so each segment becomes a rectangle offset by the half-thickness on both
//! sides of the segment direction. Corners are rounded up to whole pixels and
//! the shape is filled solid; smoothing comes from downsampling afterwards.
//! Consecutive segments are not joined or capped.

use crate::config::Rgb;
use crate::trace::LineSegment;

use super::WorkingCanvas;

/// Corner points `p1..p4` of the quadrilateral covering `segment`
pub fn thick_segment_corners(segment: &LineSegment, half_thickness: f64) -> [(f64, f64); 4] {
    let (sx, sy, ex, ey) = (segment.lx, segment.ly, segment.mx, segment.my);
    let angle = (sy - ey).atan2(ex - sx);
    let dx = half_thickness * angle.sin();
    let dy = half_thickness * angle.cos();

    [
        ((sx + dx).ceil(), (sy + dy).ceil()),
        ((ex + dx).ceil(), (ey + dy).ceil()),
        ((ex - dx).ceil(), (ey - dy).ceil()),
        ((sx - dx).ceil(), (sy - dy).ceil()),
    ]
}

/// Twice the signed area of a polygon (shoelace)
fn doubled_area(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum()
}

/// The two corners furthest apart, spanning a collapsed outline
fn extent(points: &[(f64, f64); 4]) -> ((f64, f64), (f64, f64)) {
    let dist = |a: (f64, f64), b: (f64, f64)| (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2);
    let mut best = (points[0], points[0]);
    for (i, &a) in points.iter().enumerate() {
        for &b in &points[i + 1..] {
            if dist(a, b) > dist(best.0, best.1) {
                best = (a, b);
            }
        }
    }
    best
}

/// Stroke one already-scaled segment onto the working canvas
///
/// A quadrilateral with no area (a tap with `lx == mx` and `ly == my`, or a
/// zero pen width) still inks the one-pixel line or dot it collapses to.
pub fn stroke_thick_segment(
    canvas: &mut WorkingCanvas,
    segment: &LineSegment,
    half_thickness: f64,
    colour: Rgb,
) -> bool {
    let corners = thick_segment_corners(segment, half_thickness);
    if doubled_area(&corners) == 0.0 {
        let (a, b) = extent(&corners);
        log::debug!("degenerate segment {:?} drawn as line {:?}-{:?}", segment, a, b);
        return canvas.fill_line((a.0 as f32, a.1 as f32), (b.0 as f32, b.1 as f32), colour);
    }

    log::trace!("stroking {:?} as {:?}", segment, corners);
    let points = corners.map(|(x, y)| (x as f32, y as f32));
    canvas.fill_polygon(&points, colour)
}
