use std::io::Cursor;

use super::*;

fn png_bytes(rgba: Vec<u8>, w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn load_png_dimensions_and_premul() {
    let buf = png_bytes(vec![100u8, 50u8, 200u8, 128u8], 1, 1);
    let prepared = load_image(&buf, "image/png", DEFAULT_MAX_IMAGE_BYTES).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn rejects_non_image_mime() {
    let buf = png_bytes(vec![0, 0, 0, 255], 1, 1);
    let err = load_image(&buf, "application/pdf", DEFAULT_MAX_IMAGE_BYTES).unwrap_err();
    assert!(matches!(err, WarpmaskError::UnsupportedImage(_)));
}

#[test]
fn rejects_oversized_payload() {
    let buf = png_bytes(vec![0, 0, 0, 255], 1, 1);
    let err = load_image(&buf, "image/png", buf.len() - 1).unwrap_err();
    assert!(err.to_string().contains("limit"));
}

#[test]
fn rejects_garbage_bytes() {
    let err = load_image(b"definitely not a png", "image/png", DEFAULT_MAX_IMAGE_BYTES).unwrap_err();
    assert!(matches!(err, WarpmaskError::UnsupportedImage(_)));
}

#[test]
fn ids_are_unique() {
    let a = PreparedImage::solid(1, 1, [1, 2, 3, 255]).unwrap();
    let b = PreparedImage::solid(1, 1, [1, 2, 3, 255]).unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn solid_rejects_bad_dimensions_before_allocating() {
    // Allocating this buffer first would abort the process.
    let err = PreparedImage::solid(u32::MAX, u32::MAX, [0, 0, 0, 255]).unwrap_err();
    assert!(matches!(err, WarpmaskError::Validation(_)), "{err:?}");
    let err = PreparedImage::solid(0, 5, [0, 0, 0, 255]).unwrap_err();
    assert!(matches!(err, WarpmaskError::Validation(_)), "{err:?}");
}

#[test]
fn encode_png_premul_roundtrips_opaque_pixels() {
    let premul = vec![10u8, 20, 30, 255, 200, 100, 50, 255];
    let encoded = encode_png_premul(2, 1, &premul).unwrap();
    assert_eq!(encoded.mime_type, PNG_MIME);
    let back = image::load_from_memory(&encoded.bytes).unwrap().to_rgba8();
    assert_eq!(back.into_raw(), premul);
}

#[test]
fn encode_luma_rejects_bad_length() {
    assert!(encode_png_luma(2, 2, &[0, 0, 0]).is_err());
}
