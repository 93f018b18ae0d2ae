use super::*;
use crate::geometry::corners::Corners;

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn affine_maps_each_vertex() {
    let src = [
        Point::new(0.0, 0.0),
        Point::new(40.0, 0.0),
        Point::new(0.0, 30.0),
    ];
    let dst = [
        Point::new(10.0, 12.0),
        Point::new(60.0, 5.0),
        Point::new(3.0, 50.0),
    ];
    let a = triangle_affine(src, dst).unwrap();
    for (s, d) in src.iter().zip(dst.iter()) {
        assert!(close(a * *s, *d));
    }
}

#[test]
fn collinear_source_is_skipped() {
    let src = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(2.0, 2.0),
    ];
    assert!(triangle_affine(src, src).is_none());
}

#[test]
fn identity_quad_gives_identity_transforms() {
    let corners = Corners::from_rect(0.0, 0.0, 64.0, 32.0);
    for tri in warp_triangles(64.0, 32.0, &corners) {
        let a = tri.affine().unwrap();
        for (c, e) in a.as_coeffs().iter().zip(Affine::IDENTITY.as_coeffs().iter()) {
            assert!((c - e).abs() < 1e-12);
        }
    }
}

#[test]
fn triangles_share_the_diagonal() {
    let corners = Corners {
        tl: Point::new(5.0, 5.0),
        tr: Point::new(90.0, 20.0),
        bl: Point::new(0.0, 70.0),
        br: Point::new(95.0, 99.0),
    };
    let [upper, lower] = warp_triangles(20.0, 10.0, &corners);
    let (a, b) = (upper.affine().unwrap(), lower.affine().unwrap());
    // Both halves agree on the shared source edge (w,0)-(0,h).
    for t in [0.0, 0.25, 0.5, 1.0] {
        let p = Point::new(20.0 * (1.0 - t), 10.0 * t);
        assert!(close(a * p, b * p));
    }
    assert!(close(b * Point::new(20.0, 10.0), corners.br));
}
