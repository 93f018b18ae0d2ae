use kurbo::Shape;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
use crate::geometry::corners::Corners;

/// Flattening tolerance for circles and rounded shapes, in canvas units.
const SHAPE_TOLERANCE: f64 = 0.05;

/// Dash pattern for a stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dash {
    /// On/off lengths.
    pub pattern: [f64; 2],
    /// Phase offset along the path.
    pub offset: f64,
}

/// How a path outline is stroked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Line width in canvas units.
    pub width: f64,
    /// Round caps and joins; square otherwise.
    pub round: bool,
    /// Optional dash pattern.
    pub dash: Option<Dash>,
}

impl StrokeStyle {
    /// Plain stroke with square caps.
    pub fn solid(width: f64) -> Self {
        Self {
            width,
            round: false,
            dash: None,
        }
    }

    /// Round caps and joins.
    pub fn round(width: f64) -> Self {
        Self {
            width,
            round: true,
            dash: None,
        }
    }

    /// Square-capped dashed stroke.
    pub fn dashed(width: f64, pattern: [f64; 2], offset: f64) -> Self {
        Self {
            width,
            round: false,
            dash: Some(Dash { pattern, offset }),
        }
    }
}

/// One drawing command. Geometry is in canvas coordinates; the plan's `view` maps it to pixels.
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Draw `image` with its pixel grid mapped through `transform`.
    Image {
        /// Source pixels.
        image: PreparedImage,
        /// Image-pixel to canvas transform.
        transform: Affine,
        /// Layer opacity in `[0, 1]`.
        opacity: f32,
    },
    /// Draw `image` warped onto a quad with the two-triangle piecewise-affine mapping.
    WarpedImage {
        /// Source pixels.
        image: PreparedImage,
        /// Destination quad in canvas coordinates.
        corners: Corners,
        /// Layer opacity in `[0, 1]`.
        opacity: f32,
    },
    /// Fill a path with a solid color (nonzero winding).
    FillPath {
        /// Outline to fill.
        path: BezPath,
        /// Straight-alpha fill color.
        color: Rgba8,
    },
    /// Stroke a path with a solid color.
    StrokePath {
        /// Outline to stroke.
        path: BezPath,
        /// Straight-alpha stroke color.
        color: Rgba8,
        /// Width, caps and dashing.
        style: StrokeStyle,
    },
}

/// Everything a backend needs to produce one frame.
#[derive(Clone, Debug)]
pub struct ScenePlan {
    /// Output surface size in pixels.
    pub canvas: Canvas,
    /// Optional solid fill painted before any op.
    pub clear: Option<Rgba8>,
    /// Canvas-to-surface transform applied to every op.
    pub view: Affine,
    /// Commands in paint order.
    pub ops: Vec<DrawOp>,
}

impl ScenePlan {
    /// Empty plan with an identity view.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            clear: None,
            view: Affine::IDENTITY,
            ops: Vec::new(),
        }
    }

    /// Paint `color` over the whole surface first.
    pub fn with_clear(mut self, color: Rgba8) -> Self {
        self.clear = Some(color);
        self
    }

    /// Replace the canvas-to-surface transform.
    pub fn with_view(mut self, view: Affine) -> Self {
        self.view = view;
        self
    }

    /// Append a command.
    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}

/// Open polyline through `points`.
pub(crate) fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut it = points.iter();
    if let Some(&first) = it.next() {
        path.move_to(first);
        for &p in it {
            path.line_to(p);
        }
    }
    path
}

/// Closed polygon through `points`.
pub(crate) fn polygon(points: &[Point]) -> BezPath {
    let mut path = polyline(points);
    if !points.is_empty() {
        path.close_path();
    }
    path
}

pub(crate) fn circle(center: Point, radius: f64) -> BezPath {
    kurbo::Circle::new(center, radius).to_path(SHAPE_TOLERANCE)
}

/// Axis-aligned square of side `size` centered on `center`.
pub(crate) fn square(center: Point, size: f64) -> BezPath {
    let half = size / 2.0;
    Rect::new(center.x - half, center.y - half, center.x + half, center.y + half).to_path(SHAPE_TOLERANCE)
}

pub(crate) fn rect(r: Rect) -> BezPath {
    r.to_path(SHAPE_TOLERANCE)
}
