use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::{ImageId, PreparedImage};
use crate::foundation::core::{Affine, BezPath, Rgba8};
use crate::foundation::error::{WarpmaskError, WarpmaskResult};
use crate::geometry::warp::{DEGENERATE_EPSILON, warp_triangles};
use crate::render::FrameRGBA;
use crate::render::scene::{DrawOp, ScenePlan, StrokeStyle};

/// Executes [`ScenePlan`]s on the CPU with `vello_cpu`.
///
/// Decoded images are uploaded once per [`ImageId`] and reused across frames, so an editor that
/// redraws every animation frame only pays for rasterization.
#[derive(Default)]
pub struct CpuBackend {
    image_cache: HashMap<ImageId, vello_cpu::Image>,
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("cached_images", &self.image_cache.len())
            .finish()
    }
}

impl CpuBackend {
    /// Backend with an empty image cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached image upload.
    pub fn clear_cache(&mut self) {
        self.image_cache.clear();
    }

    /// Forget a single image, typically after its layer was replaced.
    pub fn evict(&mut self, id: ImageId) {
        self.image_cache.remove(&id);
    }

    /// Rasterize `plan` into a premultiplied RGBA8 frame.
    #[tracing::instrument(skip(self, plan), fields(width = plan.canvas.width, height = plan.canvas.height, ops = plan.ops.len()))]
    pub fn render(&mut self, plan: &ScenePlan) -> WarpmaskResult<FrameRGBA> {
        let w: u16 = plan
            .canvas
            .width
            .try_into()
            .map_err(|_| WarpmaskError::render("surface width exceeds u16"))?;
        let h: u16 = plan
            .canvas
            .height
            .try_into()
            .map_err(|_| WarpmaskError::render("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(WarpmaskError::render("surface must be non-empty"));
        }

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        let out = self.draw_plan(&mut ctx, plan);
        let frame = out.map(|()| {
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            FrameRGBA {
                width: u32::from(w),
                height: u32::from(h),
                data: pixmap.data_as_u8_slice().to_vec(),
                premultiplied: true,
            }
        });
        self.ctx = Some(ctx);
        frame
    }

    fn draw_plan(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        plan: &ScenePlan,
    ) -> WarpmaskResult<()> {
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if let Some(c) = plan.clear {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(solid(c));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(plan.canvas.width),
                f64::from(plan.canvas.height),
            ));
        }

        for op in &plan.ops {
            match op {
                DrawOp::Image {
                    image,
                    transform,
                    opacity,
                } => {
                    let paint = self.image_paint(image)?;
                    ctx.set_transform(affine_to_cpu(plan.view * *transform));
                    ctx.set_paint(paint);
                    with_opacity(ctx, *opacity, |ctx| {
                        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                            0.0,
                            0.0,
                            f64::from(image.width),
                            f64::from(image.height),
                        ));
                    });
                }
                DrawOp::WarpedImage {
                    image,
                    corners,
                    opacity,
                } => {
                    let paint = self.image_paint(image)?;
                    let pairs =
                        warp_triangles(f64::from(image.width), f64::from(image.height), corners);
                    with_opacity(ctx, *opacity, |ctx| {
                        for pair in &pairs {
                            // Collinear source or destination triangles are skipped.
                            let Some(affine) = pair.affine() else {
                                continue;
                            };
                            let affine = plan.view * affine;
                            if affine.determinant().abs() < DEGENERATE_EPSILON {
                                continue;
                            }
                            ctx.set_transform(affine_to_cpu(affine));
                            ctx.set_paint(paint.clone());
                            ctx.fill_path(&bezpath_to_cpu(&pair.src_path()));
                        }
                    });
                }
                DrawOp::FillPath { path, color } => {
                    ctx.set_transform(affine_to_cpu(plan.view));
                    ctx.set_paint(solid(*color));
                    ctx.fill_path(&bezpath_to_cpu(path));
                }
                DrawOp::StrokePath { path, color, style } => {
                    ctx.set_transform(affine_to_cpu(plan.view));
                    ctx.set_paint(solid(*color));
                    ctx.set_stroke(stroke_to_cpu(style));
                    ctx.stroke_path(&bezpath_to_cpu(path));
                }
            }
        }
        Ok(())
    }

    fn image_paint(&mut self, image: &PreparedImage) -> WarpmaskResult<vello_cpu::Image> {
        if let Some(paint) = self.image_cache.get(&image.id) {
            return Ok(paint.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache.insert(image.id, paint.clone());
        Ok(paint)
    }
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    opacity: f32,
    f: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
        f(ctx);
        ctx.pop_layer();
    } else {
        f(ctx);
    }
}

fn solid(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn stroke_to_cpu(style: &StrokeStyle) -> vello_cpu::kurbo::Stroke {
    use vello_cpu::kurbo::{Cap, Join, Stroke};

    let mut stroke = Stroke::new(style.width);
    if style.round {
        stroke = stroke.with_caps(Cap::Round).with_join(Join::Round);
    } else {
        stroke = stroke.with_caps(Cap::Butt).with_join(Join::Miter);
    }
    if let Some(dash) = style.dash {
        stroke = stroke.with_dashes(dash.offset, dash.pattern);
    }
    stroke
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> WarpmaskResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| WarpmaskError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| WarpmaskError::render("image height exceeds u16"))?;
    if bytes.len() != (width as usize) * (height as usize) * 4 {
        return Err(WarpmaskError::render("image byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
