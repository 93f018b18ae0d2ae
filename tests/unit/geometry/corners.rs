use super::*;

fn sample() -> Corners {
    Corners {
        tl: Point::new(12.0, 8.0),
        tr: Point::new(71.5, 14.0),
        bl: Point::new(9.0, 60.25),
        br: Point::new(80.0, 66.0),
    }
}

fn assert_close(a: Corners, b: Corners) {
    for (p, q) in a.outline().iter().zip(b.outline().iter()) {
        assert!((p.x - q.x).abs() < 1e-9, "{p:?} vs {q:?}");
        assert!((p.y - q.y).abs() < 1e-9, "{p:?} vs {q:?}");
    }
}

#[test]
fn auto_place_centers_square_design_at_half_canvas() {
    let c = Corners::auto_place(Canvas::new(100, 100), Canvas::new(50, 50)).unwrap();
    assert_eq!(c.tl, Point::new(25.0, 25.0));
    assert_eq!(c.tr, Point::new(75.0, 25.0));
    assert_eq!(c.bl, Point::new(25.0, 75.0));
    assert_eq!(c.br, Point::new(75.0, 75.0));
}

#[test]
fn auto_place_preserves_aspect_on_wide_canvas() {
    let c = Corners::auto_place(Canvas::new(400, 200), Canvas::new(300, 150)).unwrap();
    // lesser dimension 200 -> longer design side 100, height 50
    assert!((c.tr.x - c.tl.x - 100.0).abs() < 1e-9);
    assert!((c.bl.y - c.tl.y - 50.0).abs() < 1e-9);
    assert_eq!(c.centroid(), Point::new(200.0, 100.0));
    assert!(Corners::auto_place(Canvas::new(0, 10), Canvas::new(5, 5)).is_none());
}

#[test]
fn corner_scale_keeps_pivot_and_scales_others() {
    let c = sample();
    for handle in Corner::ALL {
        let pivot = c.get(handle.opposite());
        let start = c.get(handle);
        let mouse = pivot + (start - pivot) * 1.75;
        let out = c.corner_scaled(handle, start, mouse);
        assert_eq!(out.get(handle.opposite()), pivot);
        for corner in Corner::ALL {
            let expected = pivot + (c.get(corner) - pivot) * 1.75;
            let got = out.get(corner);
            assert!((got.x - expected.x).abs() < 1e-9);
            assert!((got.y - expected.y).abs() < 1e-9);
        }
    }
}

#[test]
fn corner_scale_near_pivot_is_noop() {
    let c = sample();
    let start = c.br + Vec2::new(0.4, 0.4);
    let out = c.corner_scaled(Corner::Tl, start, Point::new(500.0, 500.0));
    assert_eq!(out, c);
}

#[test]
fn flips_are_involutions() {
    let c = sample();
    assert_eq!(c.flipped_horizontal().flipped_horizontal(), c);
    assert_eq!(c.flipped_vertical().flipped_vertical(), c);
    let h = c.flipped_horizontal();
    assert_eq!(h.tl, c.tr);
    assert_eq!(h.bl, c.br);
    let v = c.flipped_vertical();
    assert_eq!(v.tl, c.bl);
    assert_eq!(v.tr, c.br);
}

#[test]
fn rotate_then_unrotate_is_identity() {
    let c = sample();
    let center = c.centroid();
    for theta in [0.1, 1.0, -2.5, std::f64::consts::PI] {
        assert_close(c.rotated_about(center, theta).rotated_about(center, -theta), c);
    }
}

#[test]
fn rotate_by_drag_uses_swept_angle() {
    let c = Corners::from_rect(0.0, 0.0, 10.0, 10.0);
    let center = c.centroid();
    let start = Point::new(5.0, -20.0);
    let mouse = Point::new(30.0, 5.0);
    let out = c.rotated_by_drag(center, start, mouse);
    assert_close(out, c.rotated_about(center, std::f64::consts::FRAC_PI_2));
}

#[test]
fn edge_scale_moves_only_that_edge_along_its_axis() {
    let c = sample();
    let d = Vec2::new(7.0, -3.0);
    let top = c.edge_scaled(Edge::Top, d);
    assert_eq!(top.tl, Point::new(c.tl.x, c.tl.y - 3.0));
    assert_eq!(top.tr, Point::new(c.tr.x, c.tr.y - 3.0));
    assert_eq!((top.bl, top.br), (c.bl, c.br));

    let right = c.edge_scaled(Edge::Right, d);
    assert_eq!(right.tr, Point::new(c.tr.x + 7.0, c.tr.y));
    assert_eq!(right.br, Point::new(c.br.x + 7.0, c.br.y));
    assert_eq!((right.tl, right.bl), (c.tl, c.bl));
}

#[test]
fn perspective_moves_single_corner() {
    let c = sample();
    let out = c.corner_moved(Corner::Bl, Vec2::new(-4.0, 9.0));
    assert_eq!(out.bl, c.bl + Vec2::new(-4.0, 9.0));
    assert_eq!((out.tl, out.tr, out.br), (c.tl, c.tr, c.br));
}

#[test]
fn midpoints_and_rescale() {
    let c = Corners::from_rect(0.0, 0.0, 10.0, 20.0);
    let m = c.midpoints();
    assert_eq!(m.get(Edge::Top), Point::new(5.0, 0.0));
    assert_eq!(m.get(Edge::Right), Point::new(10.0, 10.0));
    let r = c.rescaled(2.0, 0.5);
    assert_eq!(r.br, Point::new(20.0, 10.0));
}
