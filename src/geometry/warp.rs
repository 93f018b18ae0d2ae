//! Piecewise-affine quad warp.
//!
//! A general quad is not an affine image of a rectangle, so the source rectangle is split along
//! its `tr`-`bl` diagonal and each half is mapped by its own exact 3-point affine transform.

use crate::foundation::core::{Affine, BezPath, Point};
use crate::geometry::corners::Corners;

/// Determinant threshold below which a triangle is treated as collinear.
pub const DEGENERATE_EPSILON: f64 = 1e-6;

/// One source triangle and the destination triangle it maps onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrianglePair {
    /// Triangle in source image pixels.
    pub src: [Point; 3],
    /// Triangle in destination space.
    pub dst: [Point; 3],
}

impl TrianglePair {
    /// Affine transform taking `src` onto `dst`, or `None` when `src` is degenerate.
    pub fn affine(&self) -> Option<Affine> {
        triangle_affine(self.src, self.dst)
    }

    /// Closed path around the source triangle.
    pub fn src_path(&self) -> BezPath {
        triangle_path(self.src)
    }

    /// Closed path around the destination triangle.
    pub fn dst_path(&self) -> BezPath {
        triangle_path(self.dst)
    }
}

/// The two triangle correspondences for a `w` x `h` source placed at `corners`.
///
/// `{(0,0),(w,0),(0,h)} -> {tl,tr,bl}` and `{(w,0),(w,h),(0,h)} -> {tr,br,bl}`.
pub fn warp_triangles(w: f64, h: f64, corners: &Corners) -> [TrianglePair; 2] {
    let Corners { tl, tr, bl, br } = *corners;
    [
        TrianglePair {
            src: [Point::new(0.0, 0.0), Point::new(w, 0.0), Point::new(0.0, h)],
            dst: [tl, tr, bl],
        },
        TrianglePair {
            src: [Point::new(w, 0.0), Point::new(w, h), Point::new(0.0, h)],
            dst: [tr, br, bl],
        },
    ]
}

/// Solve the unique affine map with `src[i] -> dst[i]`.
///
/// Uses the closed form over `delta = (x0-x2)(y1-y2) - (x1-x2)(y0-y2)`; returns `None` when
/// `|delta| < 1e-6`.
pub fn triangle_affine(src: [Point; 3], dst: [Point; 3]) -> Option<Affine> {
    let [Point { x: x0, y: y0 }, Point { x: x1, y: y1 }, Point { x: x2, y: y2 }] = src;
    let [Point { x: u0, y: v0 }, Point { x: u1, y: v1 }, Point { x: u2, y: v2 }] = dst;

    let delta = (x0 - x2) * (y1 - y2) - (x1 - x2) * (y0 - y2);
    if delta.abs() < DEGENERATE_EPSILON {
        return None;
    }

    let a = ((u0 - u2) * (y1 - y2) - (u1 - u2) * (y0 - y2)) / delta;
    let b = ((v0 - v2) * (y1 - y2) - (v1 - v2) * (y0 - y2)) / delta;
    let c = ((u1 - u2) * (x0 - x2) - (u0 - u2) * (x1 - x2)) / delta;
    let d = ((v1 - v2) * (x0 - x2) - (v0 - v2) * (x1 - x2)) / delta;
    let e = u2 - a * x2 - c * y2;
    let f = v2 - b * x2 - d * y2;

    Some(Affine::new([a, b, c, d, e, f]))
}

fn triangle_path(t: [Point; 3]) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(t[0]);
    path.line_to(t[1]);
    path.line_to(t[2]);
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/warp.rs"]
mod tests;
