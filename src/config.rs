//! Editor configuration consumed at construction time.

use std::path::Path as FsPath;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::decode::DEFAULT_MAX_IMAGE_BYTES;
use crate::compositor::editor::TransformMode;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{WarpmaskError, WarpmaskResult};
use crate::geometry::corners::Corners;
use crate::mask::editor::DEFAULT_BRUSH_SIZE;
use crate::mask::path::Path;

/// Overrides [`EditorConfig::debounce_ms`].
pub const ENV_DEBOUNCE_MS: &str = "WARPMASK_DEBOUNCE_MS";
/// Overrides [`EditorConfig::max_image_bytes`].
pub const ENV_MAX_IMAGE_BYTES: &str = "WARPMASK_MAX_IMAGE_BYTES";

/// Default composite regeneration delay.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Settings shared by the compositor and the mask editor.
///
/// JSON uses camelCase keys; every field is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Quad to start from. `None` auto-centers the design once both layers are loaded.
    pub initial_corners: Option<Corners>,
    /// Paths to start the mask editor with.
    pub initial_paths: Vec<Path>,
    /// Default brush width.
    pub brush_size: f64,
    /// Default brush color.
    pub brush_color: Rgba8,
    /// Compositor handle set.
    pub transform_mode: TransformMode,
    /// Composite regeneration delay in milliseconds.
    pub debounce_ms: u64,
    /// Upper bound for encoded image payloads.
    pub max_image_bytes: usize,
    /// Design layer opacity in `[0, 1]`.
    pub opacity: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_corners: None,
            initial_paths: Vec::new(),
            brush_size: DEFAULT_BRUSH_SIZE,
            brush_color: Rgba8::ACCENT.with_alpha(0.5),
            transform_mode: TransformMode::Transform,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            opacity: 1.0,
        }
    }
}

impl EditorConfig {
    /// Parse from JSON and validate.
    pub fn from_json_str(s: &str) -> WarpmaskResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| WarpmaskError::serde(format!("editor config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: &FsPath) -> WarpmaskResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read editor config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Apply environment overrides. Unset, unparsable or zero values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(ms) = var(ENV_DEBOUNCE_MS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&v| v > 0)
        {
            self.debounce_ms = ms;
        }
        if let Some(bytes) = var(ENV_MAX_IMAGE_BYTES)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&v| v > 0)
        {
            self.max_image_bytes = bytes;
        }
        self
    }

    /// Regeneration delay as a [`std::time::Duration`].
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }

    /// Reject values no editor can work with.
    pub fn validate(&self) -> WarpmaskResult<()> {
        if !self.brush_size.is_finite() || self.brush_size <= 0.0 {
            return Err(WarpmaskError::validation("brushSize must be finite and > 0"));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(WarpmaskError::validation("opacity must be in [0, 1]"));
        }
        if self.max_image_bytes == 0 {
            return Err(WarpmaskError::validation("maxImageBytes must be > 0"));
        }
        if let Some(c) = &self.initial_corners
            && !c.is_finite()
        {
            return Err(WarpmaskError::validation("initialCorners must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
