//! Quad placement of a rectangular layer and the edits a user can apply to it.
//!
//! Every edit is a pure function from an *initial* snapshot to a new value. Drag handlers always
//! pass the snapshot captured at drag start, never the previous frame's result, so deltas do not
//! accumulate rounding error.

use crate::foundation::core::{Canvas, Point, Vec2};
use crate::foundation::math::{dist, rotate_point};

/// Four corners of a (possibly warped) rectangular layer, in canvas coordinates.
///
/// No convexity is enforced. Self-intersecting quads render distorted but never fail.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Corners {
    /// Top-left.
    pub tl: Point,
    /// Top-right.
    pub tr: Point,
    /// Bottom-left.
    pub bl: Point,
    /// Bottom-right.
    pub br: Point,
}

/// Corner selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    /// Top-left.
    Tl,
    /// Top-right.
    Tr,
    /// Bottom-left.
    Bl,
    /// Bottom-right.
    Br,
}

impl Corner {
    /// Hit-test order.
    pub const ALL: [Corner; 4] = [Corner::Tl, Corner::Tr, Corner::Bl, Corner::Br];

    /// Diagonally opposite corner (the pivot for corner scaling).
    pub fn opposite(self) -> Corner {
        match self {
            Corner::Tl => Corner::Br,
            Corner::Tr => Corner::Bl,
            Corner::Bl => Corner::Tr,
            Corner::Br => Corner::Tl,
        }
    }
}

/// Edge-midpoint selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Top edge (`tl`-`tr`).
    Top,
    /// Bottom edge (`bl`-`br`).
    Bottom,
    /// Left edge (`tl`-`bl`).
    Left,
    /// Right edge (`tr`-`br`).
    Right,
}

impl Edge {
    /// Hit-test order.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];
}

/// Midpoints of the four edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Midpoints {
    /// Midpoint of the top edge.
    pub top: Point,
    /// Midpoint of the bottom edge.
    pub bottom: Point,
    /// Midpoint of the left edge.
    pub left: Point,
    /// Midpoint of the right edge.
    pub right: Point,
}

impl Midpoints {
    /// Midpoint for `edge`.
    pub fn get(&self, edge: Edge) -> Point {
        match edge {
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
            Edge::Right => self.right,
        }
    }
}

impl Corners {
    /// Axis-aligned quad covering `[x, x+w] x [y, y+h]`.
    pub fn from_rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            tl: Point::new(x, y),
            tr: Point::new(x + w, y),
            bl: Point::new(x, y + h),
            br: Point::new(x + w, y + h),
        }
    }

    /// Initial placement for a freshly loaded design of `design` pixels on `canvas`.
    ///
    /// The design's longer side becomes half of the canvas' lesser dimension, aspect preserved,
    /// centered on the canvas. Returns `None` for empty inputs.
    pub fn auto_place(canvas: Canvas, design: Canvas) -> Option<Self> {
        if canvas.is_empty() || design.is_empty() {
            return None;
        }
        let (cw, ch) = canvas.size_f64();
        let (dw, dh) = design.size_f64();
        let target = cw.min(ch) * 0.5;
        let s = target / dw.max(dh);
        let (w, h) = (dw * s, dh * s);
        Some(Self::from_rect(cw / 2.0 - w / 2.0, ch / 2.0 - h / 2.0, w, h))
    }

    /// Corner position.
    pub fn get(&self, c: Corner) -> Point {
        match c {
            Corner::Tl => self.tl,
            Corner::Tr => self.tr,
            Corner::Bl => self.bl,
            Corner::Br => self.br,
        }
    }

    /// Mutable corner position.
    pub fn get_mut(&mut self, c: Corner) -> &mut Point {
        match c {
            Corner::Tl => &mut self.tl,
            Corner::Tr => &mut self.tr,
            Corner::Bl => &mut self.bl,
            Corner::Br => &mut self.br,
        }
    }

    /// Corners in outline order `tl, tr, br, bl`.
    pub fn outline(&self) -> [Point; 4] {
        [self.tl, self.tr, self.br, self.bl]
    }

    /// Apply `f` to every corner.
    pub fn map(self, mut f: impl FnMut(Point) -> Point) -> Self {
        Self {
            tl: f(self.tl),
            tr: f(self.tr),
            bl: f(self.bl),
            br: f(self.br),
        }
    }

    /// Average of the four corners (the rotation pivot).
    pub fn centroid(&self) -> Point {
        Point::new(
            (self.tl.x + self.tr.x + self.bl.x + self.br.x) / 4.0,
            (self.tl.y + self.tr.y + self.bl.y + self.br.y) / 4.0,
        )
    }

    /// Edge midpoints.
    pub fn midpoints(&self) -> Midpoints {
        Midpoints {
            top: self.tl.midpoint(self.tr),
            bottom: self.bl.midpoint(self.br),
            left: self.tl.midpoint(self.bl),
            right: self.tr.midpoint(self.br),
        }
    }

    /// Whole-quad translation.
    pub fn translated(self, delta: Vec2) -> Self {
        self.map(|p| p + delta)
    }

    /// Uniform scale by `scale` around `pivot`.
    pub fn scaled_about(self, pivot: Point, scale: f64) -> Self {
        self.map(|p| pivot + (p - pivot) * scale)
    }

    /// Corner-handle scale: pivot is the corner opposite `handle` in `self`.
    ///
    /// `scale = |mouse - pivot| / |start - pivot|`. Returns `self` unchanged when the drag
    /// started within 1px of the pivot.
    pub fn corner_scaled(self, handle: Corner, start: Point, mouse: Point) -> Self {
        let pivot = self.get(handle.opposite());
        let original = dist(start, pivot);
        if original < 1.0 {
            return self;
        }
        self.scaled_about(pivot, dist(mouse, pivot) / original)
    }

    /// Rotate every corner by `angle` radians around `center`.
    pub fn rotated_about(self, center: Point, angle: f64) -> Self {
        self.map(|p| rotate_point(p, center, angle))
    }

    /// Rotation-handle drag around `center`: the angle swept from `start` to `mouse`.
    pub fn rotated_by_drag(self, center: Point, start: Point, mouse: Point) -> Self {
        let angle = (mouse - center).atan2() - (start - center).atan2();
        self.rotated_about(center, angle)
    }

    /// Edge-handle drag: the two corners on `edge` move along the edge's normal axis by the
    /// pointer delta, the opposite edge stays put.
    pub fn edge_scaled(self, edge: Edge, delta: Vec2) -> Self {
        let mut out = self;
        match edge {
            Edge::Top => {
                out.tl.y += delta.y;
                out.tr.y += delta.y;
            }
            Edge::Bottom => {
                out.bl.y += delta.y;
                out.br.y += delta.y;
            }
            Edge::Left => {
                out.tl.x += delta.x;
                out.bl.x += delta.x;
            }
            Edge::Right => {
                out.tr.x += delta.x;
                out.br.x += delta.x;
            }
        }
        out
    }

    /// Perspective drag: only `handle` moves.
    pub fn corner_moved(self, handle: Corner, delta: Vec2) -> Self {
        let mut out = self;
        *out.get_mut(handle) += delta;
        out
    }

    /// Mirror left/right by swapping `tl<->tr` and `bl<->br`.
    pub fn flipped_horizontal(self) -> Self {
        Self {
            tl: self.tr,
            tr: self.tl,
            bl: self.br,
            br: self.bl,
        }
    }

    /// Mirror top/bottom by swapping `tl<->bl` and `tr<->br`.
    pub fn flipped_vertical(self) -> Self {
        Self {
            tl: self.bl,
            tr: self.br,
            bl: self.tl,
            br: self.tr,
        }
    }

    /// Rescale from display canvas space to another resolution (e.g. the background's native
    /// pixels) with independent x/y factors.
    pub fn rescaled(self, sx: f64, sy: f64) -> Self {
        self.map(|p| Point::new(p.x * sx, p.y * sy))
    }

    /// Return `true` when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.outline().iter().all(|p| p.x.is_finite() && p.y.is_finite())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/corners.rs"]
mod tests;
