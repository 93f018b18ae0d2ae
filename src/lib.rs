//! Warpmask is the interaction and rendering core of an image-editing composer.
//!
//! It provides three host-neutral editors that share a pan/zoom viewport:
//!
//! - [`Compositor`]: place a design image on a background through a draggable four-corner quad
//!   (move, rotate, scale, free perspective) and regenerate a flattened composite on a debounce
//! - [`MaskEditor`]: paint brush strokes and polygon lassos, emitting a binary mask raster on
//!   every change
//! - [`OutpaintEditor`]: frame a source image inside a larger canvas and export the source/mask
//!   pair
//!
//! Editors report state changes through an [`EditorSink`]. Every view is compiled into a
//! [`ScenePlan`] and rasterized by [`CpuBackend`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod compositor;
/// Editor configuration.
pub mod config;
/// Output notifications.
pub mod events;
pub(crate) mod geometry;
/// History snapshots.
pub mod history;
pub(crate) mod mask;
pub(crate) mod outpaint;
pub(crate) mod render;
pub(crate) mod view;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{WarpmaskError, WarpmaskResult};

pub use crate::assets::decode::{
    DEFAULT_MAX_IMAGE_BYTES, EncodedImage, ImageId, PNG_MIME, PreparedImage, encode_png_luma,
    encode_png_premul, load_image,
};
pub use crate::compositor::debounce::Debounce;
pub use crate::compositor::drag::{
    DragState, HANDLE_SIZE_PX, HIT_THRESHOLD_PX, Handle, ROTATION_OFFSET_PX, hit_test,
    rotation_handle,
};
pub use crate::compositor::editor::{Compositor, TransformMode};
pub use crate::config::EditorConfig;
pub use crate::events::{EditorSink, InMemorySink, NullSink};
pub use crate::geometry::corners::{Corner, Corners, Edge, Midpoints};
pub use crate::geometry::warp::{DEGENERATE_EPSILON, TrianglePair, triangle_affine, warp_triangles};
pub use crate::history::HistoryRecord;
pub use crate::mask::ants::MarchingAnts;
pub use crate::mask::editor::{DEFAULT_BRUSH_SIZE, LASSO_CLOSE_THRESHOLD_PX, MaskEditor};
pub use crate::mask::path::{Path, Tool};
pub use crate::mask::raster::{MaskImage, mask_scene, rasterize_mask};
pub use crate::outpaint::editor::{
    AspectRatio, FRAME_HIT_THRESHOLD_PX, FrameHandle, FrameRect, OutpaintEditor, OutpaintExport,
    export_plans, hit_test_frame, initial_layout, resize_frame,
};
pub use crate::render::FrameRGBA;
pub use crate::render::compile::{
    BACKDROP, CompositorOverlay, MaskOverlay, OutpaintOverlay, compositor_scene,
    mask_editor_scene, outpaint_scene,
};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::scene::{Dash, DrawOp, ScenePlan, StrokeStyle};
pub use crate::view::input::{Key, Modifiers, PointerButton, PointerEvent};
pub use crate::view::transform::{
    MAX_SCALE, MIN_SCALE, PanDrag, ViewTransform, WHEEL_ZOOM_INTENSITY, ZOOM_STEP,
};
