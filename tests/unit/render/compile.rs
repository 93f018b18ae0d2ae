use kurbo::{PathEl, Shape};

use super::*;
use crate::render::cpu::CpuBackend;

fn red(w: u32, h: u32) -> PreparedImage {
    PreparedImage::solid(w, h, [255, 0, 0, 255]).unwrap()
}

fn compositor_overlay<'a>(
    background: &'a PreparedImage,
    design: &'a PreparedImage,
    mode: TransformMode,
    view: ViewTransform,
) -> CompositorOverlay<'a> {
    CompositorOverlay {
        background: Some(background),
        design: Some(design),
        canvas: Some(Canvas::new(100, 100)),
        corners: Some(Corners::from_rect(25.0, 25.0, 50.0, 50.0)),
        opacity: 1.0,
        mode,
        view,
    }
}

fn subpaths(path: &BezPath) -> usize {
    path.elements()
        .iter()
        .filter(|el| matches!(el, PathEl::MoveTo(_)))
        .count()
}

#[test]
fn compositor_without_background_only_clears() {
    let view = ViewTransform {
        scale: 2.0,
        offset_x: 5.0,
        offset_y: 0.0,
    };
    let plan = compositor_scene(
        Canvas::new(50, 50),
        &CompositorOverlay {
            background: None,
            design: None,
            canvas: None,
            corners: None,
            opacity: 1.0,
            mode: TransformMode::Transform,
            view,
        },
    );
    assert!(plan.ops.is_empty());
    assert_eq!(plan.clear, Some(BACKDROP));
    assert_eq!(plan.view, view.to_affine());
}

#[test]
fn transform_mode_draws_full_handle_set() {
    let (bg, design) = (red(200, 200), red(10, 10));
    let view = ViewTransform::default();
    let transform = compositor_scene(
        Canvas::new(100, 100),
        &compositor_overlay(&bg, &design, TransformMode::Transform, view),
    );
    // background, design, outline, 4 edges, stalk, knob, 4 filled + 4 stroked corners
    assert_eq!(transform.ops.len(), 17);

    let perspective = compositor_scene(
        Canvas::new(100, 100),
        &compositor_overlay(&bg, &design, TransformMode::Perspective, view),
    );
    assert_eq!(perspective.ops.len(), 10);

    let DrawOp::Image { transform: bg_xf, .. } = &perspective.ops[0] else {
        panic!("background first");
    };
    assert_eq!(*bg_xf, Affine::scale(0.5));
    assert!(matches!(perspective.ops[1], DrawOp::WarpedImage { .. }));
}

#[test]
fn handles_keep_screen_size_under_zoom() {
    let (bg, design) = (red(100, 100), red(10, 10));
    let view = ViewTransform {
        scale: 2.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };
    let plan = compositor_scene(
        Canvas::new(200, 200),
        &compositor_overlay(&bg, &design, TransformMode::Perspective, view),
    );
    let DrawOp::FillPath { path, color } = &plan.ops[2] else {
        panic!("corner handle expected");
    };
    assert_eq!(*color, Rgba8::ACCENT);
    let bbox = path.bounding_box();
    assert!((bbox.width() - 4.0).abs() < 1e-9);
    assert!((bbox.center().x - 25.0).abs() < 1e-9);
    let DrawOp::StrokePath { style, .. } = &plan.ops[3] else {
        panic!("corner outline expected");
    };
    assert!((style.width - 0.75).abs() < 1e-9);
}

#[test]
fn closed_lasso_gets_fill_and_marching_ants() {
    let mut lasso = Path::lasso(Point::new(10.0, 10.0));
    lasso.points.extend([Point::new(40.0, 10.0), Point::new(40.0, 40.0)]);
    lasso.is_closed = true;
    let mut ants = MarchingAnts::default();
    ants.tick();

    let paths = [lasso];
    let plan = mask_editor_scene(
        Canvas::new(50, 50),
        None,
        &MaskOverlay {
            paths: &paths,
            preview: None,
            close_hovered: false,
            view: ViewTransform::default(),
            ants,
        },
    );
    assert_eq!(plan.ops.len(), 3);
    let DrawOp::FillPath { color, .. } = &plan.ops[0] else {
        panic!("fill first");
    };
    assert!((76..=77).contains(&color.a), "{color:?}");

    let offsets: Vec<(Rgba8, f64)> = plan.ops[1..]
        .iter()
        .map(|op| match op {
            DrawOp::StrokePath { color, style, .. } => {
                let dash = style.dash.expect("ants are dashed");
                assert_eq!(dash.pattern, [5.0, 5.0]);
                (*color, dash.offset)
            }
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(offsets, vec![(Rgba8::WHITE, -0.5), (Rgba8::BLACK, 4.5)]);
}

#[test]
fn open_lasso_draws_rubber_band_vertices_and_close_ring() {
    let mut lasso = Path::lasso(Point::new(10.0, 10.0));
    lasso.points.extend([Point::new(40.0, 10.0), Point::new(40.0, 40.0)]);
    let paths = [lasso];
    let overlay = |close_hovered| MaskOverlay {
        paths: &paths,
        preview: Some(Point::new(12.0, 11.0)),
        close_hovered,
        view: ViewTransform::default(),
        ants: MarchingAnts::default(),
    };

    let hovered = mask_editor_scene(Canvas::new(50, 50), None, &overlay(true));
    // dashed outline, 3 vertices, ring
    assert_eq!(hovered.ops.len(), 5);
    let DrawOp::StrokePath { path, style, .. } = &hovered.ops[0] else {
        panic!("outline first");
    };
    assert_eq!(subpaths(path), 2);
    assert_eq!(style.dash.map(|d| d.pattern), Some([4.0, 4.0]));
    let DrawOp::FillPath { color, .. } = &hovered.ops[1] else {
        panic!("first vertex");
    };
    assert_eq!(*color, Rgba8::ACCENT);
    assert!(matches!(hovered.ops[4], DrawOp::StrokePath { color: Rgba8::ACCENT, .. }));

    let idle = mask_editor_scene(Canvas::new(50, 50), None, &overlay(false));
    assert_eq!(idle.ops.len(), 4);
}

#[test]
fn brush_dot_and_stroke_use_their_own_color() {
    let color = Rgba8::new(0, 200, 0, 128);
    let dot = Path::brush(Point::new(5.0, 5.0), 10.0, color);
    let mut stroke = Path::brush(Point::new(5.0, 5.0), 6.0, color);
    stroke.points.push(Point::new(30.0, 5.0));
    let paths = [dot, stroke];
    let image = red(50, 50);

    let plan = mask_editor_scene(
        Canvas::new(50, 50),
        Some(&image),
        &MaskOverlay {
            paths: &paths,
            preview: None,
            close_hovered: false,
            view: ViewTransform::default(),
            ants: MarchingAnts::default(),
        },
    );
    assert_eq!(plan.ops.len(), 3);
    assert!(matches!(plan.ops[0], DrawOp::Image { .. }));
    let DrawOp::FillPath { path, color: c } = &plan.ops[1] else {
        panic!("dot is a disc");
    };
    assert_eq!(*c, color);
    assert!((path.bounding_box().width() - 10.0).abs() < 0.1);
    let DrawOp::StrokePath { style, .. } = &plan.ops[2] else {
        panic!("stroke");
    };
    assert_eq!(*style, StrokeStyle::round(6.0));
}

#[test]
fn checkerboard_alternates_and_caps() {
    let cells = checker_cells(Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
    assert_eq!(subpaths(&cells), 2);
    let partial = checker_cells(Rect::new(0.0, 0.0, 15.0, 10.0)).unwrap();
    assert_eq!(partial.bounding_box(), Rect::new(10.0, 0.0, 15.0, 10.0));
    assert!(checker_cells(Rect::new(0.0, 0.0, 10_000.0, 10_000.0)).is_none());
}

#[test]
fn outpaint_scene_veils_only_the_extension() {
    let source = red(10, 10);
    let overlay = OutpaintOverlay {
        source: &source,
        frame: FrameRect::new(0.0, 0.0, 40.0, 40.0),
        image_pos: FrameRect::new(10.0, 10.0, 20.0, 20.0),
        view: ViewTransform::default(),
    };
    let plan = outpaint_scene(Canvas::new(60, 60), &overlay);
    // light fill, dark cells, image, veil, frame stroke, 8 handles
    assert_eq!(plan.ops.len(), 13);

    let frame = CpuBackend::new().render(&plan).unwrap();
    assert_eq!(frame.pixel(20, 20), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(50, 50), Some([17, 24, 39, 255]));
    let veiled = frame.pixel(7, 30).unwrap();
    assert!(veiled[0] > 120 && veiled[2] > 120, "{veiled:?}");
}
