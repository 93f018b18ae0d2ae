use super::*;
use crate::foundation::core::Point;

#[test]
fn empty_json_yields_defaults() {
    let cfg = EditorConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, EditorConfig::default());
    assert_eq!(cfg.brush_size, 30.0);
    assert_eq!(cfg.debounce_ms, 200);
    assert_eq!(cfg.max_image_bytes, 5 * 1024 * 1024);
    assert_eq!(cfg.transform_mode, TransformMode::Transform);
    assert_eq!(cfg.brush_color, Rgba8::new(249, 115, 22, 128));
}

#[test]
fn camel_case_fields_parse() {
    let cfg = EditorConfig::from_json_str(
        r#"{
            "initialCorners": {"tl":{"x":0,"y":0},"tr":{"x":4,"y":0},"bl":{"x":0,"y":3},"br":{"x":4,"y":3}},
            "brushSize": 12.5,
            "transformMode": "perspective",
            "debounceMs": 50,
            "opacity": 0.25
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.initial_corners.unwrap().br, Point::new(4.0, 3.0));
    assert_eq!(cfg.brush_size, 12.5);
    assert_eq!(cfg.transform_mode, TransformMode::Perspective);
    assert_eq!(cfg.debounce().as_millis(), 50);
    assert_eq!(cfg.opacity, 0.25);
}

#[test]
fn invalid_values_are_rejected() {
    for json in [
        r#"{"brushSize": 0}"#,
        r#"{"opacity": 1.5}"#,
        r#"{"maxImageBytes": 0}"#,
    ] {
        let err = EditorConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, WarpmaskError::Validation(_)), "{json}: {err}");
    }
    let err = EditorConfig::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, WarpmaskError::Serde(_)));
}

#[test]
fn env_overrides_ignore_garbage() {
    let cfg = EditorConfig::default().with_overrides_from(|key| match key {
        ENV_DEBOUNCE_MS => Some(" 75 ".to_string()),
        ENV_MAX_IMAGE_BYTES => Some("lots".to_string()),
        _ => None,
    });
    assert_eq!(cfg.debounce_ms, 75);
    assert_eq!(cfg.max_image_bytes, DEFAULT_MAX_IMAGE_BYTES);

    let cfg = EditorConfig::default().with_overrides_from(|key| {
        (key == ENV_DEBOUNCE_MS).then(|| "0".to_string())
    });
    assert_eq!(cfg.debounce_ms, DEFAULT_DEBOUNCE_MS);
}

#[test]
fn missing_file_reports_path() {
    let err = EditorConfig::from_path(FsPath::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("not/here.json"), "{err}");
}
