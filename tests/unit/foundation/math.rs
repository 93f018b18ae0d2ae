use super::*;

#[test]
fn rotate_quarter_turn_about_center() {
    let p = rotate_point(Point::new(2.0, 1.0), Point::new(1.0, 1.0), std::f64::consts::FRAC_PI_2);
    assert!((p.x - 1.0).abs() < 1e-12);
    assert!((p.y - 2.0).abs() < 1e-12);
}

#[test]
fn point_in_polygon_square_and_concave() {
    let square = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ];
    assert!(point_in_polygon(Point::new(5.0, 5.0), &square));
    assert!(!point_in_polygon(Point::new(15.0, 5.0), &square));

    // L-shape: the notch at (7,7) is outside.
    let l_shape = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 4.0),
        Point::new(4.0, 4.0),
        Point::new(4.0, 10.0),
        Point::new(0.0, 10.0),
    ];
    assert!(point_in_polygon(Point::new(2.0, 8.0), &l_shape));
    assert!(!point_in_polygon(Point::new(7.0, 7.0), &l_shape));
}

#[test]
fn degenerate_polygon_contains_nothing() {
    let line = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
    assert!(!point_in_polygon(Point::new(5.0, 5.0), &line));
}

#[test]
fn premultiply_then_unpremultiply_opaque_and_clear() {
    let mut px = vec![10u8, 20, 30, 255, 200, 200, 200, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255, 0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255, 0, 0, 0, 0]);
}

#[test]
fn unpremultiply_half_alpha() {
    let mut px = vec![64u8, 0, 128, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px[3], 128);
    assert!((i32::from(px[0]) - 127).abs() <= 1);
    assert!((i32::from(px[2]) - 255).abs() <= 1);
}
