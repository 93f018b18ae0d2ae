//! Serializable editing snapshot for an external history store.

use std::path::Path as FsPath;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::compositor::editor::Compositor;
use crate::events::EditorSink;
use crate::foundation::error::{WarpmaskError, WarpmaskResult};
use crate::geometry::corners::Corners;
use crate::mask::editor::MaskEditor;
use crate::mask::path::Path;
use crate::outpaint::editor::{FrameRect, OutpaintEditor};

/// Geometric state of one editing session.
///
/// Holds exactly what the editors report through their sinks, so restoring a record reproduces
/// the quad, the strokes and the outpaint layout verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryRecord {
    /// Design quad in display-canvas space.
    pub corners: Option<Corners>,
    /// Mask paths in drawing order.
    pub paths: Vec<Path>,
    /// Outpaint output frame.
    pub outpaint_frame: Option<FrameRect>,
    /// Source placement inside the outpaint frame.
    pub image_pos: Option<FrameRect>,
}

impl HistoryRecord {
    /// Record with only the compositor quad.
    pub fn with_corners(mut self, corners: Option<Corners>) -> Self {
        self.corners = corners;
        self
    }

    /// Record with the given mask paths.
    pub fn with_paths(mut self, paths: Vec<Path>) -> Self {
        self.paths = paths;
        self
    }

    /// Record with an outpaint layout.
    pub fn with_outpaint(mut self, frame: FrameRect, image_pos: FrameRect) -> Self {
        self.outpaint_frame = Some(frame);
        self.image_pos = Some(image_pos);
        self
    }

    /// Snapshot of whichever editors are present.
    pub fn capture<A: EditorSink, B: EditorSink>(
        compositor: Option<&Compositor<A>>,
        mask: Option<&MaskEditor<B>>,
        outpaint: Option<&OutpaintEditor>,
    ) -> Self {
        let mut record = Self {
            corners: compositor.and_then(Compositor::corners),
            paths: mask.map(|m| m.paths().to_vec()).unwrap_or_default(),
            ..Self::default()
        };
        if let Some(o) = outpaint {
            record = record.with_outpaint(o.frame(), o.image_pos());
        }
        record
    }

    /// Both halves of the outpaint layout, when recorded.
    pub fn outpaint_layout(&self) -> Option<(FrameRect, FrameRect)> {
        Some((self.outpaint_frame?, self.image_pos?))
    }

    /// Push the recorded state back into the editors.
    ///
    /// Missing outpaint halves leave the outpaint editor untouched.
    pub fn restore_into<A: EditorSink, B: EditorSink>(
        &self,
        compositor: Option<&mut Compositor<A>>,
        mask: Option<&mut MaskEditor<B>>,
        outpaint: Option<&mut OutpaintEditor>,
    ) {
        if let Some(c) = compositor {
            c.restore(self.corners);
        }
        if let Some(m) = mask {
            m.restore(self.paths.clone());
        }
        if let (Some(o), Some((frame, image_pos))) = (outpaint, self.outpaint_layout()) {
            o.restore(frame, image_pos);
        }
    }

    /// Parse a record from JSON.
    pub fn from_json_str(s: &str) -> WarpmaskResult<Self> {
        serde_json::from_str(s).map_err(|e| WarpmaskError::serde(format!("history record: {e}")))
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: &FsPath) -> WarpmaskResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read history record '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Serialize to compact JSON.
    pub fn to_json_string(&self) -> WarpmaskResult<String> {
        serde_json::to_string(self).map_err(|e| WarpmaskError::serde(format!("history record: {e}")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/history.rs"]
mod tests;
