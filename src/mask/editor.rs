use crate::assets::decode::{PreparedImage, check_dimensions};
use crate::config::EditorConfig;
use crate::events::EditorSink;
use crate::foundation::core::{Canvas, Point, Rgba8, Vec2};
use crate::foundation::error::WarpmaskResult;
use crate::foundation::math::dist;
use crate::mask::ants::MarchingAnts;
use crate::mask::path::{Path, Tool};
use crate::mask::raster::{MaskImage, rasterize_mask};
use crate::render::compile::{MaskOverlay, mask_editor_scene};
use crate::render::scene::ScenePlan;
use crate::view::input::{Key, PointerButton, PointerEvent};
use crate::view::transform::{PanDrag, ViewTransform};

/// Lasso closing distance in screen pixels.
pub const LASSO_CLOSE_THRESHOLD_PX: f64 = 10.0;
/// Default brush width in surface pixels.
pub const DEFAULT_BRUSH_SIZE: f64 = 30.0;

/// Brush and polygon-lasso mask editor over a fixed drawing surface.
///
/// Points are captured in surface coordinates (the natural resolution of the image being
/// masked). Every change to the committed path collection is reported synchronously to the sink
/// together with a fresh mask raster.
#[derive(Debug)]
pub struct MaskEditor<S: EditorSink> {
    surface: Canvas,
    tool: Tool,
    brush_size: f64,
    brush_color: Rgba8,
    paths: Vec<Path>,
    redo: Vec<Path>,
    drawing: bool,
    preview: Option<Point>,
    close_hovered: bool,
    view: ViewTransform,
    pan: Option<PanDrag>,
    ants: MarchingAnts,
    sink: S,
}

impl<S: EditorSink> MaskEditor<S> {
    /// Editor for a `surface`-sized mask with default brush settings.
    pub fn new(surface: Canvas, sink: S) -> WarpmaskResult<Self> {
        check_dimensions(surface.width, surface.height)?;
        Ok(Self {
            surface,
            tool: Tool::Brush,
            brush_size: DEFAULT_BRUSH_SIZE,
            brush_color: default_brush_color(),
            paths: Vec::new(),
            redo: Vec::new(),
            drawing: false,
            preview: None,
            close_hovered: false,
            view: ViewTransform::default(),
            pan: None,
            ants: MarchingAnts::default(),
            sink,
        })
    }

    /// Editor seeded from `config`: brush defaults and initial paths.
    ///
    /// Initial paths are installed without notifying the sink; the host already holds them.
    pub fn from_config(surface: Canvas, config: &EditorConfig, sink: S) -> WarpmaskResult<Self> {
        let mut editor = Self::new(surface, sink)?;
        editor.brush_size = config.brush_size;
        editor.brush_color = config.brush_color;
        editor.paths = single_open_lasso(config.initial_paths.clone());
        Ok(editor)
    }

    /// Mask resolution.
    pub fn surface(&self) -> Canvas {
        self.surface
    }

    /// Active tool.
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Committed and in-progress paths in drawing order.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Number of paths available to redo.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// There is a path to undo.
    pub fn can_undo(&self) -> bool {
        !self.paths.is_empty()
    }

    /// There is a path to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// A polygon or stroke is being captured.
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Width for new strokes.
    pub fn brush_size(&self) -> f64 {
        self.brush_size
    }

    /// Width for subsequent strokes. Existing strokes keep theirs.
    pub fn set_brush_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.brush_size = size;
        }
    }

    /// Color for new strokes.
    pub fn brush_color(&self) -> Rgba8 {
        self.brush_color
    }

    /// Color for subsequent strokes.
    pub fn set_brush_color(&mut self, color: Rgba8) {
        self.brush_color = color;
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

    /// Switch tools. Destructive: every path and the redo buffer are discarded.
    pub fn set_tool(&mut self, tool: Tool) {
        tracing::debug!(from = ?self.tool, to = ?tool, dropped = self.paths.len(), "mask tool switch");
        self.tool = tool;
        self.paths.clear();
        self.redo.clear();
        self.reset_drawing();
        self.commit();
    }

    /// Start a pan, a brush stroke, or place a lasso vertex.
    pub fn pointer_down(&mut self, ev: PointerEvent) {
        if ev.starts_pan() {
            self.pan = Some(PanDrag::begin(&self.view, ev.pos));
            return;
        }
        if ev.button != PointerButton::Primary {
            return;
        }
        let p = self.view.screen_to_canvas(ev.pos);
        match self.tool {
            Tool::Brush => {
                self.drawing = true;
                self.paths
                    .push(Path::brush(p, self.brush_size, self.brush_color));
                self.redo.clear();
                self.commit();
            }
            Tool::Lasso => self.lasso_click(p),
        }
    }

    fn lasso_click(&mut self, p: Point) {
        let threshold = self.view.screen_len(LASSO_CLOSE_THRESHOLD_PX);
        self.redo.clear();
        let Some(open) = self.paths.iter_mut().find(|path| path.is_open_lasso()) else {
            self.paths.push(Path::lasso(p));
            self.drawing = true;
            self.commit();
            return;
        };
        if closes_lasso(&open.points, p, threshold) {
            open.is_closed = true;
            tracing::debug!(vertices = open.points.len(), "lasso closed");
            self.reset_drawing();
        } else {
            open.points.push(p);
        }
        self.commit();
    }

    /// Pan, extend the active stroke, or track the lasso rubber band.
    pub fn pointer_move(&mut self, ev: PointerEvent) {
        if let Some(pan) = self.pan {
            pan.update(&mut self.view, ev.pos);
            return;
        }
        if !self.drawing {
            return;
        }
        let p = self.view.screen_to_canvas(ev.pos);
        match self.tool {
            Tool::Brush => {
                if let Some(path) = self.paths.last_mut().filter(|path| path.tool == Tool::Brush) {
                    path.points.push(p);
                    self.commit();
                }
            }
            Tool::Lasso => {
                let threshold = self.view.screen_len(LASSO_CLOSE_THRESHOLD_PX);
                self.preview = Some(p);
                self.close_hovered = self
                    .open_lasso()
                    .is_some_and(|open| closes_lasso(&open.points, p, threshold));
            }
        }
    }

    /// End a pan or finish the active brush stroke. Lassos stay open across releases.
    pub fn pointer_up(&mut self, _ev: PointerEvent) {
        self.pan = None;
        if self.tool == Tool::Brush {
            self.drawing = false;
        }
    }

    /// Keyboard shortcuts: Escape cancels an open lasso, Undo/Redo walk the history.
    pub fn key(&mut self, key: Key) {
        match key {
            Key::Escape => self.cancel_lasso(),
            Key::Undo => {
                self.undo();
            }
            Key::Redo => {
                self.redo();
            }
        }
    }

    /// Discard every unclosed lasso. Closed lassos and brush strokes are kept.
    pub fn cancel_lasso(&mut self) {
        let before = self.paths.len();
        self.paths.retain(|path| !path.is_open_lasso());
        if self.tool == Tool::Lasso {
            self.reset_drawing();
        }
        if self.paths.len() != before {
            self.commit();
        }
    }

    /// Undo one step. Returns whether anything changed.
    ///
    /// With the lasso tool and an open lasso, this pops the last vertex instead of the whole
    /// path and invalidates redo; a lasso emptied this way is removed.
    pub fn undo(&mut self) -> bool {
        if self.paths.is_empty() {
            return false;
        }
        if self.tool == Tool::Lasso
            && let Some(idx) = self
                .paths
                .iter()
                .position(|path| path.is_open_lasso() && !path.points.is_empty())
        {
            self.paths[idx].points.pop();
            self.redo.clear();
            if self.paths[idx].points.is_empty() {
                self.paths.remove(idx);
                self.reset_drawing();
            }
            self.commit();
            return true;
        }
        if let Some(last) = self.paths.pop() {
            self.redo.push(last);
            self.drawing = false;
        }
        self.commit();
        true
    }

    /// Restore the most recently undone path. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        let Some(path) = self.redo.pop() else {
            return false;
        };
        self.paths.push(path);
        self.commit();
        true
    }

    /// Remove every path and the redo buffer.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.redo.clear();
        self.reset_drawing();
        self.commit();
    }

    /// Replace the path collection, e.g. from a history record. Of several unfinished lassos
    /// only the last is kept.
    pub fn restore(&mut self, paths: Vec<Path>) {
        self.paths = single_open_lasso(paths);
        self.redo.clear();
        self.reset_drawing();
        self.commit();
    }

    /// Current mask raster, `None` when there are no paths.
    pub fn mask(&self) -> WarpmaskResult<Option<MaskImage>> {
        rasterize_mask(&self.paths, self.surface)
    }

    /// Zoom by a wheel delta around the cursor.
    pub fn wheel(&mut self, cursor: Point, delta_y: f64) {
        self.view.wheel(cursor, delta_y);
    }

    /// Zoom-button step (`+1` in, `-1` out) around the viewport center.
    pub fn zoom_step(&mut self, viewport_center: Point, direction: f64) {
        self.view.step(viewport_center, direction);
    }

    /// Fit the surface into `container`, centered.
    pub fn reset_view(&mut self, container: Vec2) {
        let (w, h) = self.surface.size_f64();
        self.view = ViewTransform::fit(container, Vec2::new(w, h));
    }

    /// Advance presentation-only animation by one frame.
    pub fn tick(&mut self) {
        self.ants.tick();
    }

    /// On-screen scene for a `viewport`-sized container, optionally over the masked image.
    pub fn scene(&self, viewport: Canvas, image: Option<&PreparedImage>) -> ScenePlan {
        mask_editor_scene(
            viewport,
            image,
            &MaskOverlay {
                paths: &self.paths,
                preview: self.preview,
                close_hovered: self.close_hovered,
                view: self.view,
                ants: self.ants,
            },
        )
    }

    fn open_lasso(&self) -> Option<&Path> {
        self.paths.iter().find(|path| path.is_open_lasso())
    }

    fn reset_drawing(&mut self) {
        self.drawing = false;
        self.preview = None;
        self.close_hovered = false;
    }

    fn commit(&mut self) {
        self.sink.paths_changed(&self.paths);
        match rasterize_mask(&self.paths, self.surface) {
            Ok(mask) => self.sink.mask_changed(mask),
            Err(err) => tracing::warn!(error = %err, "mask rasterization failed"),
        }
    }
}

/// Only the most recent unfinished lasso survives; earlier ones are discarded.
fn single_open_lasso(mut paths: Vec<Path>) -> Vec<Path> {
    if let Some(last) = paths.iter().rposition(Path::is_open_lasso) {
        let mut index = 0;
        paths.retain(|path| {
            let keep = index == last || !path.is_open_lasso();
            index += 1;
            keep
        });
    }
    paths
}

/// A click at `p` closes a lasso with these `points` only once it has three vertices.
fn closes_lasso(points: &[Point], p: Point, threshold: f64) -> bool {
    match points.first() {
        Some(&first) => points.len() >= 3 && dist(p, first) < threshold,
        None => false,
    }
}

fn default_brush_color() -> Rgba8 {
    Rgba8::ACCENT.with_alpha(0.5)
}

#[cfg(test)]
#[path = "../../tests/unit/mask/editor.rs"]
mod tests;
