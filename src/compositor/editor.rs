use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::assets::decode::{PreparedImage, load_image};
use crate::compositor::debounce::Debounce;
use crate::compositor::drag::{DragState, hit_test};
use crate::config::EditorConfig;
use crate::events::EditorSink;
use crate::foundation::core::{Affine, Canvas, Point, Vec2};
use crate::foundation::error::WarpmaskResult;
use crate::geometry::corners::Corners;
use crate::render::FrameRGBA;
use crate::render::compile::{CompositorOverlay, compositor_scene};
use crate::render::cpu::CpuBackend;
use crate::render::scene::{DrawOp, ScenePlan};
use crate::view::input::{PointerButton, PointerEvent};
use crate::view::transform::{PanDrag, ViewTransform};

/// Which handle set the compositor exposes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    /// Rotation knob, edge stretch and uniform corner scale.
    #[default]
    Transform,
    /// Corners move independently.
    Perspective,
}

/// Background + warped design layer compositor.
///
/// Corners live in display-canvas space. The display canvas defaults to the background's
/// natural size and can be overridden with [`Compositor::set_canvas_size`]; the composite is
/// always produced at the background's natural resolution.
#[derive(Debug)]
pub struct Compositor<S: EditorSink> {
    background: Option<PreparedImage>,
    design: Option<PreparedImage>,
    canvas_override: Option<Canvas>,
    corners: Option<Corners>,
    mode: TransformMode,
    opacity: f32,
    view: ViewTransform,
    drag: Option<DragState>,
    regen: Debounce,
    max_image_bytes: usize,
    backend: CpuBackend,
    sink: S,
}

impl<S: EditorSink> Compositor<S> {
    /// Empty compositor with default settings.
    pub fn new(sink: S) -> Self {
        Self::from_config(&EditorConfig::default(), sink)
    }

    /// Compositor seeded from `config`.
    pub fn from_config(config: &EditorConfig, sink: S) -> Self {
        Self {
            background: None,
            design: None,
            canvas_override: None,
            corners: config.initial_corners,
            mode: config.transform_mode,
            opacity: config.opacity.clamp(0.0, 1.0),
            view: ViewTransform::default(),
            drag: None,
            regen: Debounce::new(config.debounce()),
            max_image_bytes: config.max_image_bytes,
            backend: CpuBackend::new(),
            sink,
        }
    }

    /// Background layer.
    pub fn background(&self) -> Option<&PreparedImage> {
        self.background.as_ref()
    }

    /// Design layer.
    pub fn design(&self) -> Option<&PreparedImage> {
        self.design.as_ref()
    }

    /// Design quad in display-canvas space.
    pub fn corners(&self) -> Option<Corners> {
        self.corners
    }

    /// Active handle set.
    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    /// Design opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
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

    /// Active gesture, if any.
    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// A composite regeneration is scheduled but has not run yet.
    pub fn is_regeneration_pending(&self) -> bool {
        self.regen.is_pending()
    }

    /// Notification sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable notification sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the editor, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Display canvas size: the override, else the background's natural size.
    pub fn canvas(&self) -> Option<Canvas> {
        self.canvas_override
            .or_else(|| self.background.as_ref().map(PreparedImage::canvas))
    }

    /// Use a display canvas different from the background's natural size.
    pub fn set_canvas_size(&mut self, canvas: Canvas) {
        self.canvas_override = (!canvas.is_empty()).then_some(canvas);
        self.ensure_placement();
        self.schedule();
    }

    /// Decode and install a background. On error nothing changes.
    pub fn load_background(&mut self, bytes: &[u8], mime_type: &str) -> WarpmaskResult<()> {
        let image = load_image(bytes, mime_type, self.max_image_bytes)?;
        self.set_background(image);
        Ok(())
    }

    /// Install an already decoded background. Existing corners are kept.
    pub fn set_background(&mut self, image: PreparedImage) {
        if let Some(old) = self.background.replace(image) {
            self.backend.evict(old.id);
        }
        self.ensure_placement();
        self.schedule();
    }

    /// Remove the background. The host is told there is no composite.
    pub fn clear_background(&mut self) {
        if let Some(old) = self.background.take() {
            self.backend.evict(old.id);
        }
        self.regen.take();
        self.sink.composite_updated(None);
    }

    /// Decode and install a design layer. On error nothing changes.
    pub fn load_design(&mut self, bytes: &[u8], mime_type: &str) -> WarpmaskResult<()> {
        let image = load_image(bytes, mime_type, self.max_image_bytes)?;
        self.set_design(image);
        Ok(())
    }

    /// Install an already decoded design. The quad is reset and re-placed.
    pub fn set_design(&mut self, image: PreparedImage) {
        if let Some(old) = self.design.replace(image) {
            self.backend.evict(old.id);
        }
        self.corners = None;
        self.drop_quad_drag();
        if !self.ensure_placement() {
            self.sink.corners_changed(None);
        }
        self.schedule();
    }

    /// Drop the design layer and its quad.
    pub fn clear_design(&mut self) {
        if let Some(old) = self.design.take() {
            self.backend.evict(old.id);
        }
        self.drag = None;
        self.set_corners(None);
    }

    /// Replace the quad, e.g. when restoring a history record.
    pub fn set_corners(&mut self, corners: Option<Corners>) {
        self.corners = corners.filter(Corners::is_finite);
        self.drop_quad_drag();
        self.sink.corners_changed(self.corners);
        self.schedule();
    }

    /// Restore a prior session's quad verbatim; `None` re-centers the design.
    pub fn restore(&mut self, corners: Option<Corners>) {
        self.set_corners(corners);
        self.ensure_placement();
    }

    /// Switch between transform and perspective handles. Corners are kept.
    pub fn set_mode(&mut self, mode: TransformMode) {
        self.mode = mode;
    }

    /// Design opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) {
        if !opacity.is_finite() {
            return;
        }
        self.opacity = opacity.clamp(0.0, 1.0);
        self.schedule();
    }

    /// Mirror the quad left/right.
    pub fn flip_horizontal(&mut self) {
        if let Some(c) = self.corners {
            self.update_corners(c.flipped_horizontal());
        }
    }

    /// Mirror the quad top/bottom.
    pub fn flip_vertical(&mut self) {
        if let Some(c) = self.corners {
            self.update_corners(c.flipped_vertical());
        }
    }

    /// A replaced quad invalidates the snapshot of any geometry drag. Pans keep going.
    fn drop_quad_drag(&mut self) {
        if !matches!(self.drag, Some(DragState::Pan(_))) {
            self.drag = None;
        }
    }

    /// Hit-test and start a gesture. Returns whether a drag began.
    pub fn pointer_down(&mut self, ev: PointerEvent) -> bool {
        if ev.starts_pan() {
            self.drag = Some(DragState::Pan(PanDrag::begin(&self.view, ev.pos)));
            return true;
        }
        if ev.button != PointerButton::Primary {
            return false;
        }
        let Some(corners) = self.corners else {
            return false;
        };
        let p = self.view.screen_to_canvas(ev.pos);
        self.drag = hit_test(&corners, self.mode, p, self.view.scale)
            .map(|handle| DragState::begin(handle, corners, self.mode, p));
        if let Some(drag) = &self.drag {
            tracing::debug!(kind = drag.kind(), x = p.x, y = p.y, "compositor drag start");
        }
        self.drag.is_some()
    }

    /// Continue the active gesture.
    pub fn pointer_move(&mut self, ev: PointerEvent) {
        match self.drag {
            None => {}
            Some(DragState::Pan(pan)) => pan.update(&mut self.view, ev.pos),
            Some(drag) => {
                if let Some(next) = drag.apply(self.view.screen_to_canvas(ev.pos)) {
                    self.update_corners(next);
                }
            }
        }
    }

    /// Finish the active gesture.
    pub fn pointer_up(&mut self, _ev: PointerEvent) {
        if let Some(drag) = self.drag.take() {
            tracing::debug!(kind = drag.kind(), "compositor drag end");
        }
    }

    /// Zoom by a wheel delta around the cursor.
    pub fn wheel(&mut self, cursor: Point, delta_y: f64) {
        self.view.wheel(cursor, delta_y);
    }

    /// Zoom-button step around the viewport center.
    pub fn zoom_step(&mut self, viewport_center: Point, direction: f64) {
        self.view.step(viewport_center, direction);
    }

    /// Fit the display canvas into `container`.
    pub fn reset_view(&mut self, container: Vec2) {
        if let Some(canvas) = self.canvas() {
            let (w, h) = canvas.size_f64();
            self.view = ViewTransform::fit(container, Vec2::new(w, h));
        }
    }

    /// Run a due regeneration. Returns whether one ran.
    pub fn poll(&mut self, now: Instant) -> WarpmaskResult<bool> {
        if !self.regen.ready(now) {
            return Ok(false);
        }
        self.regenerate()?;
        Ok(true)
    }

    /// Run any pending regeneration immediately.
    pub fn flush(&mut self) -> WarpmaskResult<bool> {
        if !self.regen.take() {
            return Ok(false);
        }
        self.regenerate()?;
        Ok(true)
    }

    /// Render the composite at the background's natural resolution.
    ///
    /// Without a placed design the composite is the background alone. `None` without a
    /// background.
    pub fn composite(&mut self) -> WarpmaskResult<Option<FrameRGBA>> {
        let Some(plan) = self.composite_plan() else {
            return Ok(None);
        };
        self.backend.render(&plan).map(Some)
    }

    /// Draw commands for the native-resolution composite.
    pub fn composite_plan(&self) -> Option<ScenePlan> {
        let background = self.background.as_ref()?;
        let native = background.canvas();
        let mut plan = ScenePlan::new(native);
        plan.push(DrawOp::Image {
            image: background.clone(),
            transform: Affine::IDENTITY,
            opacity: 1.0,
        });
        if let (Some(design), Some(corners), Some(canvas)) =
            (&self.design, self.corners, self.canvas())
        {
            let (nw, nh) = native.size_f64();
            let (cw, ch) = canvas.size_f64();
            plan.push(DrawOp::WarpedImage {
                image: design.clone(),
                corners: corners.rescaled(nw / cw, nh / ch),
                opacity: self.opacity,
            });
        }
        Some(plan)
    }

    /// On-screen scene for a `viewport`-sized container.
    pub fn scene(&self, viewport: Canvas) -> ScenePlan {
        compositor_scene(
            viewport,
            &CompositorOverlay {
                background: self.background.as_ref(),
                design: self.design.as_ref(),
                canvas: self.canvas(),
                corners: self.corners,
                opacity: self.opacity,
                mode: self.mode,
                view: self.view,
            },
        )
    }

    #[tracing::instrument(skip(self))]
    fn regenerate(&mut self) -> WarpmaskResult<()> {
        let payload = match self.composite()? {
            Some(frame) => Some(frame.to_png()?),
            None => None,
        };
        self.sink.composite_updated(payload);
        Ok(())
    }

    fn update_corners(&mut self, corners: Corners) {
        self.corners = Some(corners);
        self.sink.corners_changed(self.corners);
        self.schedule();
    }

    /// Auto-center the design when both layers exist and no quad is set. Returns whether a
    /// placement happened.
    fn ensure_placement(&mut self) -> bool {
        if self.corners.is_some() || self.background.is_none() {
            return false;
        }
        let (Some(design), Some(canvas)) = (&self.design, self.canvas()) else {
            return false;
        };
        let Some(placed) = Corners::auto_place(canvas, design.canvas()) else {
            return false;
        };
        tracing::debug!(?placed, "design auto-placed");
        self.corners = Some(placed);
        self.sink.corners_changed(self.corners);
        true
    }

    fn schedule(&mut self) {
        if self.background.is_some() {
            self.regen.touch();
        }
    }
}

impl Default for Compositor<crate::events::NullSink> {
    fn default() -> Self {
        Self::new(crate::events::NullSink)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/editor.rs"]
mod tests;
