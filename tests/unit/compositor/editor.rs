use std::time::Duration;

use super::*;
use crate::events::InMemorySink;
use crate::foundation::core::Point;
use crate::foundation::error::WarpmaskError;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> PreparedImage {
    PreparedImage::solid(w, h, rgba).unwrap()
}

fn loaded() -> Compositor<InMemorySink> {
    let mut c = Compositor::new(InMemorySink::new());
    c.set_background(solid(100, 100, [0, 0, 0, 255]));
    c.set_design(solid(50, 50, [255, 255, 255, 255]));
    c
}

fn later() -> Instant {
    Instant::now() + Duration::from_secs(5)
}

#[test]
fn design_on_background_is_auto_centered() {
    let c = loaded();
    let corners = c.corners().unwrap();
    assert_eq!(corners, Corners::from_rect(25.0, 25.0, 50.0, 50.0));
    assert_eq!(c.sink().last_corners(), Some(Some(corners)));
}

#[test]
fn design_before_background_waits_for_canvas() {
    let mut c = Compositor::new(InMemorySink::new());
    c.set_design(solid(50, 50, [255, 255, 255, 255]));
    assert_eq!(c.corners(), None);
    c.set_background(solid(100, 100, [0, 0, 0, 255]));
    assert_eq!(c.corners(), Some(Corners::from_rect(25.0, 25.0, 50.0, 50.0)));
}

#[test]
fn replacing_design_resets_quad_but_background_keeps_it() {
    let mut c = loaded();
    c.flip_horizontal();
    c.set_corners(Some(Corners::from_rect(0.0, 0.0, 10.0, 10.0)));

    c.set_background(solid(100, 100, [9, 9, 9, 255]));
    assert_eq!(c.corners(), Some(Corners::from_rect(0.0, 0.0, 10.0, 10.0)));

    c.set_design(solid(20, 10, [1, 2, 3, 255]));
    assert_eq!(c.corners(), Some(Corners::from_rect(25.0, 37.5, 50.0, 25.0)));
}

#[test]
fn design_swap_mid_drag_keeps_new_placement() {
    let mut c = loaded();
    assert!(c.pointer_down(PointerEvent::primary(50.0, 50.0)));
    c.set_design(solid(50, 10, [1, 2, 3, 255]));
    let placed = Corners::from_rect(25.0, 45.0, 50.0, 10.0);
    assert_eq!(c.corners(), Some(placed));
    assert!(c.drag().is_none());

    c.pointer_move(PointerEvent::primary(51.0, 50.0));
    c.pointer_up(PointerEvent::primary(51.0, 50.0));
    assert_eq!(c.corners(), Some(placed));
}

#[test]
fn replacing_corners_mid_drag_ends_the_gesture() {
    let mut c = loaded();
    // Bottom-right corner handle.
    assert!(c.pointer_down(PointerEvent::primary(75.0, 75.0)));
    let restored = Corners::from_rect(5.0, 5.0, 10.0, 10.0);
    c.restore(Some(restored));
    c.pointer_move(PointerEvent::primary(90.0, 90.0));
    assert_eq!(c.corners(), Some(restored));

    c.pointer_down(PointerEvent::primary(10.0, 10.0));
    c.set_corners(Some(Corners::from_rect(0.0, 0.0, 4.0, 4.0)));
    c.pointer_move(PointerEvent::primary(30.0, 30.0));
    assert_eq!(c.corners(), Some(Corners::from_rect(0.0, 0.0, 4.0, 4.0)));
}

#[test]
fn pan_survives_quad_replacement() {
    let mut c = loaded();
    c.pointer_down(PointerEvent::primary(50.0, 50.0).with_alt());
    c.set_corners(Some(Corners::from_rect(0.0, 0.0, 4.0, 4.0)));
    c.pointer_move(PointerEvent::primary(60.0, 50.0));
    assert_eq!(c.view().offset_x, 10.0);
    assert_eq!(c.corners(), Some(Corners::from_rect(0.0, 0.0, 4.0, 4.0)));
}

#[test]
fn body_drag_translates_through_view() {
    let mut c = loaded();
    c.set_view(ViewTransform {
        scale: 2.0,
        offset_x: 10.0,
        offset_y: 20.0,
    });
    // Canvas (50,50) is screen (110,120).
    assert!(c.pointer_down(PointerEvent::primary(110.0, 120.0)));
    assert_eq!(c.drag().map(DragState::kind), Some("image"));
    c.pointer_move(PointerEvent::primary(130.0, 120.0));
    c.pointer_move(PointerEvent::primary(150.0, 140.0));
    c.pointer_up(PointerEvent::primary(150.0, 140.0));
    assert_eq!(c.corners(), Some(Corners::from_rect(45.0, 35.0, 50.0, 50.0)));
    assert!(c.drag().is_none());
}

#[test]
fn click_outside_starts_nothing() {
    let mut c = loaded();
    assert!(!c.pointer_down(PointerEvent::primary(2.0, 2.0)));
    c.pointer_move(PointerEvent::primary(50.0, 50.0));
    assert_eq!(c.corners(), Some(Corners::from_rect(25.0, 25.0, 50.0, 50.0)));
}

#[test]
fn alt_drag_pans_without_editing() {
    let mut c = loaded();
    c.pointer_down(PointerEvent::primary(50.0, 50.0).with_alt());
    c.pointer_move(PointerEvent::primary(70.0, 65.0));
    assert_eq!(c.view().offset_x, 20.0);
    assert_eq!(c.view().offset_y, 15.0);
    assert_eq!(c.corners(), Some(Corners::from_rect(25.0, 25.0, 50.0, 50.0)));
}

#[test]
fn perspective_mode_moves_single_corner() {
    let mut c = loaded();
    c.set_mode(TransformMode::Perspective);
    c.pointer_down(PointerEvent::primary(25.0, 25.0));
    c.pointer_move(PointerEvent::primary(10.0, 5.0));
    let corners = c.corners().unwrap();
    assert_eq!(corners.tl, Point::new(10.0, 5.0));
    assert_eq!(corners.br, Point::new(75.0, 75.0));
}

#[test]
fn double_flip_is_identity() {
    let mut c = loaded();
    let start = c.corners();
    c.flip_vertical();
    assert_ne!(c.corners(), start);
    c.flip_vertical();
    assert_eq!(c.corners(), start);
}

#[test]
fn regeneration_is_debounced() {
    let mut c = loaded();
    let emitted = c.sink().composites.len();
    c.pointer_down(PointerEvent::primary(50.0, 50.0));
    for x in 51..60 {
        c.pointer_move(PointerEvent::primary(f64::from(x), 50.0));
    }
    assert!(c.is_regeneration_pending());
    assert!(!c.poll(Instant::now()).unwrap());
    assert_eq!(c.sink().composites.len(), emitted);

    assert!(c.poll(later()).unwrap());
    assert_eq!(c.sink().composites.len(), emitted + 1);
    assert!(!c.poll(later()).unwrap());

    let png = c.sink().last_composite().unwrap().clone().unwrap();
    let decoded = image::load_from_memory(&png.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 100));
}

#[test]
fn composite_warps_design_at_native_resolution() {
    let mut c = loaded();
    c.set_canvas_size(Canvas::new(50, 50));
    c.set_corners(Some(Corners::from_rect(5.0, 5.0, 20.0, 20.0)));
    let frame = c.composite().unwrap().unwrap();
    assert_eq!((frame.width, frame.height), (100, 100));
    // Display (5..25) maps to native (10..50).
    for (x, y) in [(20, 20), (45, 44)] {
        let px = frame.pixel(x, y).unwrap();
        assert!(px[0] > 250 && px[3] == 255, "({x},{y}) {px:?}");
    }
    assert_eq!(frame.pixel(60, 60), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(5, 5), Some([0, 0, 0, 255]));
}

#[test]
fn opacity_blends_design() {
    let mut c = loaded();
    c.set_opacity(0.5);
    let px = c.composite().unwrap().unwrap().pixel(50, 40).unwrap();
    assert!((120..=135).contains(&px[0]), "{px:?}");
    c.set_opacity(7.0);
    assert_eq!(c.opacity(), 1.0);
}

#[test]
fn composite_falls_back_to_background() {
    let mut c = loaded();
    c.clear_design();
    assert_eq!(c.corners(), None);
    assert_eq!(c.sink().last_corners(), Some(None));
    let frame = c.composite().unwrap().unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    assert!(c.flush().unwrap());
    assert!(c.sink().last_composite().unwrap().is_some());
}

#[test]
fn removing_background_reports_no_composite() {
    let mut c = loaded();
    c.clear_background();
    assert!(!c.is_regeneration_pending());
    assert_eq!(c.sink().last_composite(), Some(&None));
    assert!(c.composite().unwrap().is_none());
}

#[test]
fn rejected_load_leaves_state_untouched() {
    let mut c = loaded();
    let before = c.corners();
    let err = c.load_design(b"plain text", "text/plain").unwrap_err();
    assert!(matches!(err, WarpmaskError::UnsupportedImage(_)));
    assert_eq!(c.corners(), before);
    assert_eq!(c.design().map(|d| d.width), Some(50));
}

#[test]
fn restore_none_recenters() {
    let mut c = loaded();
    c.restore(Some(Corners::from_rect(1.0, 1.0, 2.0, 2.0)));
    assert_eq!(c.corners(), Some(Corners::from_rect(1.0, 1.0, 2.0, 2.0)));
    c.restore(None);
    assert_eq!(c.corners(), Some(Corners::from_rect(25.0, 25.0, 50.0, 50.0)));
}

#[test]
fn config_seeds_mode_and_corners() {
    let cfg = EditorConfig {
        initial_corners: Some(Corners::from_rect(0.0, 0.0, 4.0, 4.0)),
        transform_mode: TransformMode::Perspective,
        ..EditorConfig::default()
    };
    let mut c = Compositor::from_config(&cfg, InMemorySink::new());
    c.set_background(solid(10, 10, [0, 0, 0, 255]));
    c.set_mode(cfg.transform_mode);
    assert_eq!(c.mode(), TransformMode::Perspective);
    assert_eq!(c.corners(), cfg.initial_corners);
}
