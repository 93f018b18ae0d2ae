use crate::foundation::core::{Affine, Point, Vec2};

/// Lower zoom bound.
pub const MIN_SCALE: f64 = 0.1;
/// Upper zoom bound.
pub const MAX_SCALE: f64 = 10.0;
/// Additive step used by zoom buttons.
pub const ZOOM_STEP: f64 = 0.2;
/// Wheel sensitivity: `scale * (1 - delta_y * WHEEL_ZOOM_INTENSITY)`.
pub const WHEEL_ZOOM_INTENSITY: f64 = 0.01;

/// Pan/zoom mapping from canvas coordinates to container pixels:
/// `screen = canvas * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    /// Uniform zoom factor.
    pub scale: f64,
    /// Horizontal offset in container pixels.
    pub offset_x: f64,
    /// Vertical offset in container pixels.
    pub offset_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ViewTransform {
    /// Positive finite scale and finite offsets. Editors refuse any other view.
    pub fn is_valid(self) -> bool {
        self.scale.is_finite()
            && self.scale > 0.0
            && self.offset_x.is_finite()
            && self.offset_y.is_finite()
    }

    /// Canvas-to-screen affine.
    pub fn to_affine(self) -> Affine {
        Affine::translate(Vec2::new(self.offset_x, self.offset_y)) * Affine::scale(self.scale)
    }

    /// Map a container position into canvas coordinates.
    pub fn screen_to_canvas(self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        )
    }

    /// Map a canvas position into container pixels.
    pub fn canvas_to_screen(self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.scale + self.offset_x,
            canvas.y * self.scale + self.offset_y,
        )
    }

    /// Convert a constant screen-space length into canvas units at the current zoom.
    pub fn screen_len(self, px: f64) -> f64 {
        px / self.scale
    }

    /// Zoom to `new_scale` (clamped) keeping the canvas point under `anchor` fixed on screen.
    /// Non-finite targets or anchors leave the view unchanged.
    pub fn zoom_to(&mut self, anchor: Point, new_scale: f64) {
        if !new_scale.is_finite() || !anchor.is_finite() {
            return;
        }
        let clamped = new_scale.clamp(MIN_SCALE, MAX_SCALE);
        let ratio = clamped / self.scale;
        self.offset_x = anchor.x - (anchor.x - self.offset_x) * ratio;
        self.offset_y = anchor.y - (anchor.y - self.offset_y) * ratio;
        self.scale = clamped;
    }

    /// Wheel zoom anchored at the cursor.
    pub fn wheel(&mut self, cursor: Point, delta_y: f64) {
        let target = self.scale * (1.0 - delta_y * WHEEL_ZOOM_INTENSITY);
        self.zoom_to(cursor, target);
    }

    /// Button zoom by one step (`direction` is +1 or -1) anchored at the viewport center.
    pub fn step(&mut self, viewport_center: Point, direction: f64) {
        let target = self.scale + direction.signum() * ZOOM_STEP;
        self.zoom_to(viewport_center, target);
    }

    /// Fit `content` (canvas pixels) letterboxed and centered inside `container`.
    pub fn fit(container: Vec2, content: Vec2) -> Self {
        if container.x <= 0.0 || container.y <= 0.0 || content.x <= 0.0 || content.y <= 0.0 {
            return Self::default();
        }
        let content_aspect = content.x / content.y;
        let (w, h) = if content_aspect > container.x / container.y {
            (container.x, container.x / content_aspect)
        } else {
            (container.y * content_aspect, container.y)
        };
        Self {
            scale: w / content.x,
            offset_x: (container.x - w) / 2.0,
            offset_y: (container.y - h) / 2.0,
        }
    }
}

/// In-progress pan gesture: remembers where the offset was grabbed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanDrag {
    grab: Vec2,
}

impl PanDrag {
    /// Start panning at `screen`.
    pub fn begin(view: &ViewTransform, screen: Point) -> Self {
        Self {
            grab: Vec2::new(screen.x - view.offset_x, screen.y - view.offset_y),
        }
    }

    /// Move the view so the grabbed point follows the pointer.
    pub fn update(&self, view: &mut ViewTransform, screen: Point) {
        if !screen.is_finite() {
            return;
        }
        view.offset_x = screen.x - self.grab.x;
        view.offset_y = screen.y - self.grab.y;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/transform.rs"]
mod tests;
