//! Compile editor snapshots into on-screen [`ScenePlan`]s.
//!
//! These functions are pure: the same snapshot always yields the same commands. Handle sizes
//! are given in screen pixels and divided by the view scale so they stay constant on screen.

use crate::assets::decode::PreparedImage;
use crate::compositor::drag::{HANDLE_SIZE_PX, rotation_handle};
use crate::compositor::editor::TransformMode;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
use crate::geometry::corners::{Corners, Edge};
use crate::mask::ants::{ANTS_DASH, MarchingAnts};
use crate::mask::path::{Path, Tool};
use crate::outpaint::editor::FrameRect;
use crate::render::scene::{DrawOp, ScenePlan, StrokeStyle, circle, polygon, polyline, rect, square};
use crate::view::transform::ViewTransform;

/// Editor backdrop behind every scene.
pub const BACKDROP: Rgba8 = Rgba8::new(17, 24, 39, 255);
const CHECKER_LIGHT: Rgba8 = Rgba8::new(55, 65, 81, 255);
const CHECKER_DARK: Rgba8 = Rgba8::new(75, 85, 99, 255);
const CHECKER_CELL: f64 = 10.0;
const CHECKER_MAX_CELLS: f64 = 40_000.0;

/// Everything the compositor scene reads.
#[derive(Clone, Copy, Debug)]
pub struct CompositorOverlay<'a> {
    /// Background layer, stretched over the display canvas.
    pub background: Option<&'a PreparedImage>,
    /// Design layer.
    pub design: Option<&'a PreparedImage>,
    /// Display canvas size.
    pub canvas: Option<Canvas>,
    /// Design quad in display-canvas space.
    pub corners: Option<Corners>,
    /// Design opacity.
    pub opacity: f32,
    /// Handle set.
    pub mode: TransformMode,
    /// Pan/zoom.
    pub view: ViewTransform,
}

/// Background, warped design and transform handles.
pub fn compositor_scene(viewport: Canvas, o: &CompositorOverlay<'_>) -> ScenePlan {
    let mut plan = ScenePlan::new(viewport)
        .with_clear(BACKDROP)
        .with_view(o.view.to_affine());
    let (Some(background), Some(canvas)) = (o.background, o.canvas) else {
        return plan;
    };
    let (cw, ch) = canvas.size_f64();
    plan.push(DrawOp::Image {
        image: background.clone(),
        transform: Affine::scale_non_uniform(
            cw / f64::from(background.width),
            ch / f64::from(background.height),
        ),
        opacity: 1.0,
    });
    let (Some(design), Some(corners)) = (o.design, o.corners) else {
        return plan;
    };
    plan.push(DrawOp::WarpedImage {
        image: design.clone(),
        corners,
        opacity: o.opacity,
    });

    let px = |v: f64| o.view.screen_len(v);
    let handle = px(HANDLE_SIZE_PX);
    if o.mode == TransformMode::Transform {
        let outline = StrokeStyle::solid(px(1.0));
        plan.push(DrawOp::StrokePath {
            path: polygon(&corners.outline()),
            color: Rgba8::ACCENT,
            style: outline,
        });
        let mids = corners.midpoints();
        for edge in Edge::ALL {
            plan.push(DrawOp::StrokePath {
                path: square(mids.get(edge), handle),
                color: Rgba8::ACCENT,
                style: outline,
            });
        }
        let knob = rotation_handle(&corners, o.view.scale);
        plan.push(DrawOp::StrokePath {
            path: polyline(&[mids.top, knob]),
            color: Rgba8::ACCENT,
            style: outline,
        });
        plan.push(DrawOp::FillPath {
            path: circle(knob, handle / 2.0),
            color: Rgba8::ACCENT,
        });
    }
    for corner in corners.outline() {
        let path = square(corner, handle);
        plan.push(DrawOp::FillPath {
            path: path.clone(),
            color: Rgba8::ACCENT,
        });
        plan.push(DrawOp::StrokePath {
            path,
            color: Rgba8::WHITE,
            style: StrokeStyle::solid(px(1.5)),
        });
    }
    plan
}

/// Everything the mask editor scene reads.
#[derive(Clone, Copy, Debug)]
pub struct MaskOverlay<'a> {
    /// Paths in drawing order.
    pub paths: &'a [Path],
    /// Rubber-band end point for the open lasso.
    pub preview: Option<Point>,
    /// The preview point would close the open lasso.
    pub close_hovered: bool,
    /// Pan/zoom.
    pub view: ViewTransform,
    /// Marching-ants phase.
    pub ants: MarchingAnts,
}

/// Masked image with brush strokes and lasso feedback on top.
pub fn mask_editor_scene(
    viewport: Canvas,
    image: Option<&PreparedImage>,
    o: &MaskOverlay<'_>,
) -> ScenePlan {
    let mut plan = ScenePlan::new(viewport)
        .with_clear(BACKDROP)
        .with_view(o.view.to_affine());
    if let Some(image) = image {
        plan.push(DrawOp::Image {
            image: image.clone(),
            transform: Affine::IDENTITY,
            opacity: 1.0,
        });
    }
    let px = |v: f64| o.view.screen_len(v);

    for path in o.paths {
        let Some(&first) = path.points.first() else {
            continue;
        };
        match path.tool {
            Tool::Brush if path.is_dot() => plan.push(DrawOp::FillPath {
                path: circle(first, path.brush_size / 2.0),
                color: path.color,
            }),
            Tool::Brush => plan.push(DrawOp::StrokePath {
                path: polyline(&path.points),
                color: path.color,
                style: StrokeStyle::round(path.brush_size),
            }),
            Tool::Lasso if path.is_closed => {
                let outline = polygon(&path.points);
                let (white, black) = o.ants.offsets();
                plan.push(DrawOp::FillPath {
                    path: outline.clone(),
                    color: Rgba8::ACCENT.with_alpha(0.3),
                });
                for (color, offset) in [(Rgba8::WHITE, white), (Rgba8::BLACK, black)] {
                    plan.push(DrawOp::StrokePath {
                        path: outline.clone(),
                        color,
                        style: StrokeStyle::dashed(1.0, [ANTS_DASH, ANTS_DASH], offset),
                    });
                }
            }
            Tool::Lasso => {
                let dashed = StrokeStyle::dashed(px(1.0), [4.0, 4.0], 0.0);
                let mut line = polyline(&path.points);
                if let (Some(p), Some(&last)) = (o.preview, path.points.last()) {
                    line.move_to(last);
                    line.line_to(p);
                }
                plan.push(DrawOp::StrokePath {
                    path: line,
                    color: Rgba8::WHITE,
                    style: dashed,
                });
                for (i, &v) in path.points.iter().enumerate() {
                    let (radius, color) = if i == 0 {
                        (px(5.0), Rgba8::ACCENT)
                    } else {
                        (px(3.0), Rgba8::WHITE)
                    };
                    plan.push(DrawOp::FillPath {
                        path: circle(v, radius),
                        color,
                    });
                }
                if o.close_hovered && path.points.len() >= 3 {
                    plan.push(DrawOp::StrokePath {
                        path: circle(first, px(10.0)),
                        color: Rgba8::ACCENT,
                        style: StrokeStyle::solid(px(2.0)),
                    });
                }
            }
        }
    }
    plan
}

/// Everything the outpaint scene reads.
#[derive(Clone, Copy, Debug)]
pub struct OutpaintOverlay<'a> {
    /// Image being extended.
    pub source: &'a PreparedImage,
    /// Output frame.
    pub frame: FrameRect,
    /// Source placement.
    pub image_pos: FrameRect,
    /// Pan/zoom.
    pub view: ViewTransform,
}

/// Checkerboard frame area, placed source, translucent outpaint region and frame handles.
pub fn outpaint_scene(viewport: Canvas, o: &OutpaintOverlay<'_>) -> ScenePlan {
    let mut plan = ScenePlan::new(viewport)
        .with_clear(BACKDROP)
        .with_view(o.view.to_affine());
    let px = |v: f64| o.view.screen_len(v);
    let frame = o.frame.to_rect();

    plan.push(DrawOp::FillPath {
        path: rect(frame),
        color: CHECKER_LIGHT,
    });
    if let Some(cells) = checker_cells(frame) {
        plan.push(DrawOp::FillPath {
            path: cells,
            color: CHECKER_DARK,
        });
    }

    let (sw, sh) = o.source.canvas().size_f64();
    let img = o.image_pos;
    plan.push(DrawOp::Image {
        image: o.source.clone(),
        transform: Affine::translate((img.x, img.y))
            * Affine::scale_non_uniform(img.width / sw, img.height / sh),
        opacity: 1.0,
    });

    // Frame minus the image, the hole wound the other way round.
    let mut veil = rect(frame);
    let hole = o.image_pos.to_rect();
    veil.move_to((hole.x0, hole.y0));
    veil.line_to((hole.x0, hole.y1));
    veil.line_to((hole.x1, hole.y1));
    veil.line_to((hole.x1, hole.y0));
    veil.close_path();
    plan.push(DrawOp::FillPath {
        path: veil,
        color: Rgba8::WHITE.with_alpha(0.5),
    });

    plan.push(DrawOp::StrokePath {
        path: rect(frame),
        color: Rgba8::ACCENT,
        style: StrokeStyle::solid(px(2.0)),
    });
    let handle = px(10.0);
    for p in o.frame.corners().into_iter().chain(o.frame.edge_centers()) {
        plan.push(DrawOp::FillPath {
            path: square(p, handle),
            color: Rgba8::ACCENT,
        });
    }
    plan
}

/// Dark cells of a 10-unit checkerboard clipped to `area`, or `None` when the area is too large
/// to pattern.
fn checker_cells(area: Rect) -> Option<BezPath> {
    let cols = (area.width() / CHECKER_CELL).ceil();
    let rows = (area.height() / CHECKER_CELL).ceil();
    let count = cols * rows;
    if !count.is_finite() || count > CHECKER_MAX_CELLS {
        return None;
    }
    let x0 = (area.x0 / CHECKER_CELL).floor() as i64;
    let y0 = (area.y0 / CHECKER_CELL).floor() as i64;
    let x1 = (area.x1 / CHECKER_CELL).ceil() as i64;
    let y1 = (area.y1 / CHECKER_CELL).ceil() as i64;
    let mut path = BezPath::new();
    for j in y0..y1 {
        for i in x0..x1 {
            if (i + j).rem_euclid(2) == 0 {
                continue;
            }
            let cell = Rect::new(
                i as f64 * CHECKER_CELL,
                j as f64 * CHECKER_CELL,
                (i + 1) as f64 * CHECKER_CELL,
                (j + 1) as f64 * CHECKER_CELL,
            )
            .intersect(area);
            if cell.area() > 0.0 {
                path.extend(rect(cell).elements().iter().copied());
            }
        }
    }
    Some(path)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compile.rs"]
mod tests;
