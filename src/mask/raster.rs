use crate::assets::decode::{EncodedImage, encode_png_luma};
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::WarpmaskResult;
use crate::mask::path::{Path, Tool};
use crate::render::FrameRGBA;
use crate::render::cpu::CpuBackend;
use crate::render::scene::{DrawOp, ScenePlan, StrokeStyle, circle, polygon, polyline};

/// Binary mask raster: 0 keeps a pixel, 255 marks it for editing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// One byte per pixel, row-major, each 0 or 255.
    pub data: Vec<u8>,
}

impl MaskImage {
    /// Threshold a grayscale frame into a binary mask. Any coverage at all marks a pixel, so
    /// marks thinner than a pixel still reach the mask.
    pub fn from_coverage(frame: &FrameRGBA) -> Self {
        // Frames are opaque grays, so the red channel is the coverage.
        let data = frame
            .data
            .chunks_exact(4)
            .map(|px| if px[0] > 0 { 255 } else { 0 })
            .collect();
        Self {
            width: frame.width,
            height: frame.height,
            data,
        }
    }

    /// Value at `(x, y)`.
    pub fn value(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Number of white pixels.
    pub fn white_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == 255).count()
    }

    /// Encode as an 8-bit grayscale PNG.
    pub fn to_png(&self) -> WarpmaskResult<EncodedImage> {
        encode_png_luma(self.width, self.height, &self.data)
    }
}

/// Draw commands for the mask of `paths` on a black `surface`.
///
/// Brush strokes are white, round-capped and `brush_size` wide; a stroke whose points all
/// coincide becomes a disc of the same diameter. Closed lassos are filled white. Open lassos
/// contribute nothing.
pub fn mask_scene(paths: &[Path], surface: Canvas) -> ScenePlan {
    let mut plan = ScenePlan::new(surface).with_clear(Rgba8::BLACK);
    for path in paths {
        let Some(&first) = path.points.first() else {
            continue;
        };
        match path.tool {
            Tool::Brush if path.is_dot() => plan.push(DrawOp::FillPath {
                path: circle(first, path.brush_size / 2.0),
                color: Rgba8::WHITE,
            }),
            Tool::Brush => plan.push(DrawOp::StrokePath {
                path: polyline(&path.points),
                color: Rgba8::WHITE,
                style: StrokeStyle::round(path.brush_size),
            }),
            Tool::Lasso if path.is_closed => plan.push(DrawOp::FillPath {
                path: polygon(&path.points),
                color: Rgba8::WHITE,
            }),
            Tool::Lasso => {}
        }
    }
    plan
}

/// Rasterize `paths` into a binary mask the size of `surface`.
///
/// Returns `Ok(None)` for an empty collection.
#[tracing::instrument(skip(paths), fields(paths = paths.len()))]
pub fn rasterize_mask(paths: &[Path], surface: Canvas) -> WarpmaskResult<Option<MaskImage>> {
    if paths.is_empty() {
        return Ok(None);
    }
    let frame = CpuBackend::new().render(&mask_scene(paths, surface))?;
    Ok(Some(MaskImage::from_coverage(&frame)))
}

#[cfg(test)]
#[path = "../../tests/unit/mask/raster.rs"]
mod tests;
