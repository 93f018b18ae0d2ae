use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Rgba8};

/// Drawing tool that produced a [`Path`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand round-capped stroke.
    #[default]
    Brush,
    /// Polygon-by-click region.
    Lasso,
}

/// One brush stroke or lasso region in drawing-surface coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    /// Vertices in drawing order.
    pub points: Vec<Point>,
    /// Stroke width; unused for lassos.
    pub brush_size: f64,
    /// Stroke color on screen. The mask always uses white.
    pub color: Rgba8,
    /// Producing tool.
    pub tool: Tool,
    /// Lasso only: the region was closed on its first vertex.
    #[serde(default)]
    pub is_closed: bool,
}

impl Path {
    /// New single-point brush stroke.
    pub fn brush(start: Point, brush_size: f64, color: Rgba8) -> Self {
        Self {
            points: vec![start],
            brush_size,
            color,
            tool: Tool::Brush,
            is_closed: false,
        }
    }

    /// New open lasso with its first vertex.
    pub fn lasso(start: Point) -> Self {
        Self {
            points: vec![start],
            brush_size: 0.0,
            color: Rgba8::TRANSPARENT,
            tool: Tool::Lasso,
            is_closed: false,
        }
    }

    /// Lasso still accepting vertices.
    pub fn is_open_lasso(&self) -> bool {
        self.tool == Tool::Lasso && !self.is_closed
    }

    /// A lasso whose polygon has been closed.
    pub fn is_closed_lasso(&self) -> bool {
        self.tool == Tool::Lasso && self.is_closed
    }

    /// Every point coincides with the first, so a stroke would have no length.
    pub fn is_dot(&self) -> bool {
        match self.points.split_first() {
            Some((first, rest)) => rest.iter().all(|p| p == first),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/path.rs"]
mod tests;
