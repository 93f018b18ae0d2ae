//! Handle hit-testing and the per-gesture drag state machine.

use crate::compositor::editor::TransformMode;
use crate::foundation::core::Point;
use crate::foundation::math::{dist, point_in_polygon};
use crate::geometry::corners::{Corner, Corners, Edge};
use crate::view::transform::PanDrag;

/// Side of the square corner and edge handles, in screen pixels.
pub const HANDLE_SIZE_PX: f64 = 8.0;
/// Pick radius around every handle, in screen pixels.
pub const HIT_THRESHOLD_PX: f64 = 12.0;
/// Distance of the rotation knob above the top-edge midpoint, in screen pixels.
pub const ROTATION_OFFSET_PX: f64 = 30.0;

/// What a pointer-down landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    /// Rotation knob above the top edge.
    Rotate,
    /// Edge-midpoint handle.
    Edge(Edge),
    /// Corner handle.
    Corner(Corner),
    /// Inside the quad, away from any handle.
    Body,
}

/// Canvas position of the rotation knob at the given zoom.
pub fn rotation_handle(corners: &Corners, view_scale: f64) -> Point {
    let top = corners.midpoints().top;
    Point::new(top.x, top.y - ROTATION_OFFSET_PX / view_scale)
}

/// Find the handle under canvas point `p`.
///
/// Priority: rotation knob, edge midpoints (both transform mode only), corners, then the quad
/// interior by even-odd test. Thresholds are divided by `view_scale` so handles keep a constant
/// on-screen size.
pub fn hit_test(corners: &Corners, mode: TransformMode, p: Point, view_scale: f64) -> Option<Handle> {
    let threshold = HIT_THRESHOLD_PX / view_scale;
    if mode == TransformMode::Transform {
        if dist(p, rotation_handle(corners, view_scale)) < threshold {
            return Some(Handle::Rotate);
        }
        let mids = corners.midpoints();
        if let Some(edge) = Edge::ALL
            .into_iter()
            .find(|&e| dist(p, mids.get(e)) < threshold)
        {
            return Some(Handle::Edge(edge));
        }
    }
    if let Some(corner) = Corner::ALL
        .into_iter()
        .find(|&c| dist(p, corners.get(c)) < threshold)
    {
        return Some(Handle::Corner(corner));
    }
    point_in_polygon(p, &corners.outline()).then_some(Handle::Body)
}

/// The single active gesture. Every editing variant keeps the drag-start snapshot so each move
/// is computed from a stable origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    /// Viewport pan.
    Pan(PanDrag),
    /// Whole-quad translation.
    Image {
        /// Pointer at drag start, canvas space.
        start: Point,
        /// Corners at drag start.
        initial: Corners,
    },
    /// Free rotation around the drag-start centroid.
    Rotate {
        /// Pointer at drag start, canvas space.
        start: Point,
        /// Corners at drag start.
        initial: Corners,
        /// Rotation pivot.
        center: Point,
    },
    /// Uniform scale from the opposite corner.
    ScaleCorner {
        /// Dragged corner.
        handle: Corner,
        /// Fixed opposite corner.
        pivot: Point,
        /// Pointer at drag start, canvas space.
        start: Point,
        /// Corners at drag start.
        initial: Corners,
    },
    /// One-axis stretch of a single edge.
    ScaleEdge {
        /// Dragged edge.
        edge: Edge,
        /// Pointer at drag start, canvas space.
        start: Point,
        /// Corners at drag start.
        initial: Corners,
    },
    /// Free single-corner move.
    Perspective {
        /// Dragged corner.
        handle: Corner,
        /// Pointer at drag start, canvas space.
        start: Point,
        /// Corners at drag start.
        initial: Corners,
    },
}

impl DragState {
    /// Gesture for a hit `handle`; corners scale in transform mode and move freely in
    /// perspective mode.
    pub fn begin(handle: Handle, corners: Corners, mode: TransformMode, start: Point) -> Self {
        match handle {
            Handle::Rotate => Self::Rotate {
                start,
                initial: corners,
                center: corners.centroid(),
            },
            Handle::Edge(edge) => Self::ScaleEdge {
                edge,
                start,
                initial: corners,
            },
            Handle::Corner(handle) => match mode {
                TransformMode::Transform => Self::ScaleCorner {
                    handle,
                    pivot: corners.get(handle.opposite()),
                    start,
                    initial: corners,
                },
                TransformMode::Perspective => Self::Perspective {
                    handle,
                    start,
                    initial: corners,
                },
            },
            Handle::Body => Self::Image {
                start,
                initial: corners,
            },
        }
    }

    /// Corners for the pointer at canvas point `mouse`, or `None` for a pan.
    pub fn apply(&self, mouse: Point) -> Option<Corners> {
        match *self {
            Self::Pan(_) => None,
            Self::Image { start, initial } => Some(initial.translated(mouse - start)),
            Self::Rotate {
                start,
                initial,
                center,
            } => Some(initial.rotated_by_drag(center, start, mouse)),
            Self::ScaleCorner {
                handle,
                start,
                initial,
                ..
            } => Some(initial.corner_scaled(handle, start, mouse)),
            Self::ScaleEdge {
                edge,
                start,
                initial,
            } => Some(initial.edge_scaled(edge, mouse - start)),
            Self::Perspective {
                handle,
                start,
                initial,
            } => Some(initial.corner_moved(handle, mouse - start)),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pan(_) => "pan",
            Self::Image { .. } => "image",
            Self::Rotate { .. } => "rotate",
            Self::ScaleCorner { .. } => "scale-corner",
            Self::ScaleEdge { .. } => "scale-edge",
            Self::Perspective { .. } => "perspective",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/drag.rs"]
mod tests;
