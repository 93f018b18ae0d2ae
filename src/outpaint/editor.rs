use serde::{Deserialize, Serialize};

use crate::assets::decode::{EncodedImage, PreparedImage};
use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8, Vec2};
use crate::foundation::error::{WarpmaskError, WarpmaskResult};
use crate::mask::raster::MaskImage;
use crate::render::FrameRGBA;
use crate::render::compile::{OutpaintOverlay, outpaint_scene};
use crate::render::cpu::CpuBackend;
use crate::render::scene::{DrawOp, ScenePlan, rect};
use crate::view::input::{PointerButton, PointerEvent};
use crate::view::transform::{PanDrag, ViewTransform};

/// Handle pick distance in screen pixels.
pub const FRAME_HIT_THRESHOLD_PX: f64 = 15.0;
/// Share of the container the source image initially occupies.
pub const INITIAL_FILL: f64 = 0.8;

/// Axis-aligned rectangle as `{x, y, width, height}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent; may go negative mid-drag.
    pub width: f64,
    /// Vertical extent; may go negative mid-drag.
    pub height: f64,
}

impl FrameRect {
    /// Rectangle from origin and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict containment; points on the border are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }

    /// Same size, shifted by `delta`.
    pub fn translated(self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..self
        }
    }

    /// Normalized `kurbo` rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    /// Edge-handle anchor points `[t, b, l, r]`.
    pub fn edge_centers(&self) -> [Point; 4] {
        let cx = self.x + self.width / 2.0;
        let cy = self.y + self.height / 2.0;
        [
            Point::new(cx, self.y),
            Point::new(cx, self.y + self.height),
            Point::new(self.x, cy),
            Point::new(self.x + self.width, cy),
        ]
    }

    /// Corner points `[tl, tr, bl, br]`.
    pub fn corners(&self) -> [Point; 4] {
        let (r, b) = (self.x + self.width, self.y + self.height);
        [
            Point::new(self.x, self.y),
            Point::new(r, self.y),
            Point::new(self.x, b),
            Point::new(r, b),
        ]
    }
}

/// Aspect-ratio lock for frame resizing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// No constraint.
    #[serde(rename = "free")]
    Free,
    /// The source image's own ratio.
    #[default]
    #[serde(rename = "original")]
    Original,
    /// 1:1.
    #[serde(rename = "1:1")]
    Square,
    /// 16:9.
    #[serde(rename = "16:9")]
    Wide,
    /// 9:16.
    #[serde(rename = "9:16")]
    Tall,
    /// 4:3.
    #[serde(rename = "4:3")]
    Standard,
    /// 3:4.
    #[serde(rename = "3:4")]
    Portrait,
}

impl AspectRatio {
    /// Every option in toolbar order.
    pub const ALL: [AspectRatio; 7] = [
        Self::Free,
        Self::Original,
        Self::Square,
        Self::Wide,
        Self::Tall,
        Self::Standard,
        Self::Portrait,
    ];

    /// Width over height, if locked. `source` is the source image's width over height.
    pub fn ratio(self, source: f64) -> Option<f64> {
        match self {
            Self::Free => None,
            Self::Original => (source.is_finite() && source > 0.0).then_some(source),
            Self::Square => Some(1.0),
            Self::Wide => Some(16.0 / 9.0),
            Self::Tall => Some(9.0 / 16.0),
            Self::Standard => Some(4.0 / 3.0),
            Self::Portrait => Some(3.0 / 4.0),
        }
    }
}

/// Draggable part of the outpaint layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameHandle {
    /// Top-left frame corner.
    Tl,
    /// Top-right frame corner.
    Tr,
    /// Bottom-left frame corner.
    Bl,
    /// Bottom-right frame corner.
    Br,
    /// Top frame edge.
    Top,
    /// Bottom frame edge.
    Bottom,
    /// Left frame edge.
    Left,
    /// Right frame edge.
    Right,
    /// The placed source image.
    Image,
}

impl FrameHandle {
    /// Hit-test priority.
    pub const ORDER: [FrameHandle; 9] = [
        Self::Tl,
        Self::Tr,
        Self::Bl,
        Self::Br,
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::Image,
    ];

    fn moves_left(self) -> bool {
        matches!(self, Self::Tl | Self::Bl | Self::Left)
    }

    fn moves_right(self) -> bool {
        matches!(self, Self::Tr | Self::Br | Self::Right)
    }

    fn moves_top(self) -> bool {
        matches!(self, Self::Tl | Self::Tr | Self::Top)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::Bl | Self::Br | Self::Bottom)
    }

    fn is_corner(self) -> bool {
        matches!(self, Self::Tl | Self::Tr | Self::Bl | Self::Br)
    }

    /// Pick region around this handle for `frame`/`image` with half-size `t`.
    fn zone(self, frame: &FrameRect, image: &FrameRect, t: f64) -> FrameRect {
        let FrameRect {
            x,
            y,
            width: w,
            height: h,
        } = *frame;
        let box_at = |cx: f64, cy: f64| FrameRect::new(cx - t, cy - t, 2.0 * t, 2.0 * t);
        match self {
            Self::Tl => box_at(x, y),
            Self::Tr => box_at(x + w, y),
            Self::Bl => box_at(x, y + h),
            Self::Br => box_at(x + w, y + h),
            Self::Top => FrameRect::new(x + t, y - t, w - 2.0 * t, 2.0 * t),
            Self::Bottom => FrameRect::new(x + t, y + h - t, w - 2.0 * t, 2.0 * t),
            Self::Left => FrameRect::new(x - t, y + t, 2.0 * t, h - 2.0 * t),
            Self::Right => FrameRect::new(x + w - t, y + t, 2.0 * t, h - 2.0 * t),
            Self::Image => *image,
        }
    }
}

/// First handle (in [`FrameHandle::ORDER`]) whose pick region strictly contains `p`.
pub fn hit_test_frame(frame: &FrameRect, image: &FrameRect, p: Point, threshold: f64) -> Option<FrameHandle> {
    FrameHandle::ORDER
        .into_iter()
        .find(|h| h.zone(frame, image, threshold).contains(p))
}

/// Frame after dragging `handle` by `delta` from `initial`, honoring an optional aspect lock.
///
/// Edge drags recenter the perpendicular axis; corner drags derive the height from the width,
/// keeping the bottom edge anchored when a top corner is dragged.
pub fn resize_frame(handle: FrameHandle, initial: FrameRect, delta: Vec2, ratio: Option<f64>) -> FrameRect {
    let mut f = initial;
    if handle.moves_left() {
        f.x += delta.x;
        f.width -= delta.x;
    }
    if handle.moves_right() {
        f.width += delta.x;
    }
    if handle.moves_top() {
        f.y += delta.y;
        f.height -= delta.y;
    }
    if handle.moves_bottom() {
        f.height += delta.y;
    }
    let Some(ar) = ratio else {
        return f;
    };
    match handle {
        FrameHandle::Top | FrameHandle::Bottom => {
            let w = f.height * ar;
            f.x = initial.x + (initial.width - w) / 2.0;
            f.width = w;
        }
        FrameHandle::Left | FrameHandle::Right => {
            let h = f.width / ar;
            f.y = initial.y + (initial.height - h) / 2.0;
            f.height = h;
        }
        h if h.is_corner() => {
            let new_h = f.width / ar;
            if h.moves_top() {
                f.y += f.height - new_h;
            }
            f.height = new_h;
        }
        _ => {}
    }
    f
}

/// Rectangle of `content` fitted at [`INITIAL_FILL`] of `container`, centered.
pub fn initial_layout(container: Vec2, content: Canvas) -> FrameRect {
    let (cw, ch) = content.size_f64();
    let aspect = cw / ch;
    let (w, h) = if container.x / container.y > aspect {
        let h = container.y * INITIAL_FILL;
        (h * aspect, h)
    } else {
        let w = container.x * INITIAL_FILL;
        (w, w / aspect)
    };
    FrameRect::new(container.x / 2.0 - w / 2.0, container.y / 2.0 - h / 2.0, w, h)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum OutpaintDrag {
    Pan(PanDrag),
    Handle {
        handle: FrameHandle,
        start: Point,
        initial_frame: FrameRect,
        initial_image: FrameRect,
    },
}

/// Result of [`OutpaintEditor::export`].
#[derive(Clone, Debug)]
pub struct OutpaintExport {
    /// Frame-sized RGBA frame with the source at its relative offset, transparent elsewhere.
    pub source: FrameRGBA,
    /// White where the generator should paint, black over the source image.
    pub mask: MaskImage,
    /// Frame used for the export.
    pub frame: FrameRect,
    /// Image placement used for the export.
    pub image_pos: FrameRect,
}

impl OutpaintExport {
    /// PNG payloads `(source, mask)`.
    pub fn encode(&self) -> WarpmaskResult<(EncodedImage, EncodedImage)> {
        Ok((self.source.to_png()?, self.mask.to_png()?))
    }
}

/// Frame editor for outpainting: places a source image inside a resizable frame whose extra
/// area the generator fills.
#[derive(Debug)]
pub struct OutpaintEditor {
    source: PreparedImage,
    frame: FrameRect,
    image_pos: FrameRect,
    aspect: AspectRatio,
    view: ViewTransform,
    drag: Option<OutpaintDrag>,
    backend: CpuBackend,
}

impl OutpaintEditor {
    /// Place `source` at 80% of `container`; the frame starts equal to the image rectangle.
    pub fn new(source: PreparedImage, container: Vec2) -> WarpmaskResult<Self> {
        if !(container.x > 0.0 && container.y > 0.0) {
            return Err(WarpmaskError::validation("container must be non-empty"));
        }
        let layout = initial_layout(container, source.canvas());
        Ok(Self {
            source,
            frame: layout,
            image_pos: layout,
            aspect: AspectRatio::default(),
            view: ViewTransform::default(),
            drag: None,
            backend: CpuBackend::new(),
        })
    }

    /// Editor with an explicit layout, e.g. restored from history.
    pub fn with_layout(source: PreparedImage, frame: FrameRect, image_pos: FrameRect) -> Self {
        Self {
            source,
            frame,
            image_pos,
            aspect: AspectRatio::default(),
            view: ViewTransform::default(),
            drag: None,
            backend: CpuBackend::new(),
        }
    }

    /// The image being extended.
    pub fn source(&self) -> &PreparedImage {
        &self.source
    }

    /// Output frame in layout space.
    pub fn frame(&self) -> FrameRect {
        self.frame
    }

    /// Source placement in layout space.
    pub fn image_pos(&self) -> FrameRect {
        self.image_pos
    }

    /// Current aspect lock.
    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    /// Change the aspect lock; applies to subsequent drags.
    pub fn set_aspect(&mut self, aspect: AspectRatio) {
        self.aspect = aspect;
    }

    /// Current pan/zoom.
    pub fn view(&self) -> ViewTransform {
        self.view
    }

    /// Replace the pan/zoom. A view failing `ViewTransform::is_valid` is ignored.
    pub fn set_view(&mut self, view: ViewTransform) {
        if view.is_valid() {
            self.view = view;
        }
    }

    /// Reinstate a saved layout.
    pub fn restore(&mut self, frame: FrameRect, image_pos: FrameRect) {
        self.frame = frame;
        self.image_pos = image_pos;
        self.drag = None;
    }

    /// Swap the source image and lay it out afresh in `container`.
    pub fn replace_source(&mut self, source: PreparedImage, container: Vec2) {
        self.backend.evict(self.source.id);
        self.source = source;
        self.reset_layout(container);
    }

    /// Re-run the initial placement and reset the view.
    pub fn reset_layout(&mut self, container: Vec2) {
        if container.x > 0.0 && container.y > 0.0 {
            let layout = initial_layout(container, self.source.canvas());
            self.frame = layout;
            self.image_pos = layout;
        }
        self.view = ViewTransform::default();
        self.drag = None;
    }

    /// Source width over height.
    fn source_aspect(&self) -> f64 {
        let (w, h) = self.source.canvas().size_f64();
        w / h
    }

    /// Start a frame/image drag or a pan. Returns whether something was grabbed.
    pub fn pointer_down(&mut self, ev: PointerEvent) -> bool {
        if ev.starts_pan() {
            self.drag = Some(OutpaintDrag::Pan(PanDrag::begin(&self.view, ev.pos)));
            return true;
        }
        if ev.button != PointerButton::Primary {
            return false;
        }
        let p = self.view.screen_to_canvas(ev.pos);
        let threshold = self.view.screen_len(FRAME_HIT_THRESHOLD_PX);
        self.drag = hit_test_frame(&self.frame, &self.image_pos, p, threshold).map(|handle| {
            OutpaintDrag::Handle {
                handle,
                start: p,
                initial_frame: self.frame,
                initial_image: self.image_pos,
            }
        });
        self.drag.is_some()
    }

    /// Continue the active drag.
    pub fn pointer_move(&mut self, ev: PointerEvent) {
        match self.drag {
            None => {}
            Some(OutpaintDrag::Pan(pan)) => pan.update(&mut self.view, ev.pos),
            Some(OutpaintDrag::Handle {
                handle,
                start,
                initial_frame,
                initial_image,
            }) => {
                let delta = self.view.screen_to_canvas(ev.pos) - start;
                if handle == FrameHandle::Image {
                    self.image_pos = initial_image.translated(delta);
                } else {
                    let ratio = self.aspect.ratio(self.source_aspect());
                    self.frame = resize_frame(handle, initial_frame, delta, ratio);
                }
            }
        }
    }

    /// End the active drag.
    pub fn pointer_up(&mut self, _ev: PointerEvent) {
        self.drag = None;
    }

    /// Zoom by a wheel delta around the cursor.
    pub fn wheel(&mut self, cursor: Point, delta_y: f64) {
        self.view.wheel(cursor, delta_y);
    }

    /// On-screen scene for a `viewport`-sized container.
    pub fn scene(&self, viewport: Canvas) -> ScenePlan {
        outpaint_scene(
            viewport,
            &OutpaintOverlay {
                source: &self.source,
                frame: self.frame,
                image_pos: self.image_pos,
                view: self.view,
            },
        )
    }

    /// Render the generator inputs at frame size.
    #[tracing::instrument(skip(self))]
    pub fn export(&mut self) -> WarpmaskResult<OutpaintExport> {
        let (source_plan, mask_plan) = export_plans(&self.source, self.frame, self.image_pos)?;
        let source = self.backend.render(&source_plan)?;
        let mask = MaskImage::from_coverage(&self.backend.render(&mask_plan)?);
        Ok(OutpaintExport {
            source,
            mask,
            frame: self.frame,
            image_pos: self.image_pos,
        })
    }
}

/// Draw commands for the exported source and mask.
///
/// Output size is the frame size truncated to whole pixels; the image lands at its offset
/// relative to the frame's top-left corner.
pub fn export_plans(
    source: &PreparedImage,
    frame: FrameRect,
    image_pos: FrameRect,
) -> WarpmaskResult<(ScenePlan, ScenePlan)> {
    let (w, h) = (frame.width.floor(), frame.height.floor());
    if !(w >= 1.0 && h >= 1.0 && w <= f64::from(u16::MAX) && h <= f64::from(u16::MAX)) {
        return Err(WarpmaskError::validation(format!(
            "frame {}x{} cannot be exported",
            frame.width, frame.height
        )));
    }
    let canvas = Canvas::new(w as u32, h as u32);
    let rel = Vec2::new(image_pos.x - frame.x, image_pos.y - frame.y);
    let (sw, sh) = source.canvas().size_f64();

    let mut source_plan = ScenePlan::new(canvas);
    source_plan.push(DrawOp::Image {
        image: source.clone(),
        transform: Affine::translate(rel)
            * Affine::scale_non_uniform(image_pos.width / sw, image_pos.height / sh),
        opacity: 1.0,
    });

    let mut mask_plan = ScenePlan::new(canvas).with_clear(Rgba8::WHITE);
    mask_plan.push(DrawOp::FillPath {
        path: rect(image_pos.translated(-Vec2::new(frame.x, frame.y)).to_rect()),
        color: Rgba8::BLACK,
    });
    Ok((source_plan, mask_plan))
}

#[cfg(test)]
#[path = "../../tests/unit/outpaint/editor.rs"]
mod tests;
