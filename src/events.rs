//! Outbound notifications from the editors to their host.

use crate::assets::decode::EncodedImage;
use crate::geometry::corners::Corners;
use crate::mask::path::Path;
use crate::mask::raster::MaskImage;

/// Receiver for editor output.
///
/// Payloads are handed over by value; no buffer is shared with the editor afterwards. Every
/// method has a no-op default so hosts only implement what they consume.
pub trait EditorSink {
    /// The rasterized composite changed. `None` means there is no background to composite onto.
    fn composite_updated(&mut self, _composite: Option<EncodedImage>) {}
    /// The quad placement changed. `None` means no design layer is placed.
    fn corners_changed(&mut self, _corners: Option<Corners>) {}
    /// The mask raster changed. `None` means no active mask.
    fn mask_changed(&mut self, _mask: Option<MaskImage>) {}
    /// The committed path collection changed.
    fn paths_changed(&mut self, _paths: &[Path]) {}
}

/// Sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EditorSink for NullSink {}

/// Sink that records every notification, for tests and headless use.
#[derive(Debug, Default)]
pub struct InMemorySink {
    /// Composite payloads in emission order.
    pub composites: Vec<Option<EncodedImage>>,
    /// Corner updates in emission order.
    pub corners: Vec<Option<Corners>>,
    /// Mask payloads in emission order.
    pub masks: Vec<Option<MaskImage>>,
    /// Path-collection snapshots in emission order.
    pub paths: Vec<Vec<Path>>,
}

impl InMemorySink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent composite notification, if any was emitted.
    pub fn last_composite(&self) -> Option<&Option<EncodedImage>> {
        self.composites.last()
    }

    /// Most recent corners notification, if any was emitted.
    pub fn last_corners(&self) -> Option<Option<Corners>> {
        self.corners.last().copied()
    }

    /// Most recent mask notification, if any was emitted.
    pub fn last_mask(&self) -> Option<&Option<MaskImage>> {
        self.masks.last()
    }

    /// Most recent path snapshot, if any was emitted.
    pub fn last_paths(&self) -> Option<&[Path]> {
        self.paths.last().map(Vec::as_slice)
    }
}

impl EditorSink for InMemorySink {
    fn composite_updated(&mut self, composite: Option<EncodedImage>) {
        self.composites.push(composite);
    }

    fn corners_changed(&mut self, corners: Option<Corners>) {
        self.corners.push(corners);
    }

    fn mask_changed(&mut self, mask: Option<MaskImage>) {
        self.masks.push(mask);
    }

    fn paths_changed(&mut self, paths: &[Path]) {
        self.paths.push(paths.to_vec());
    }
}

impl<S: EditorSink + ?Sized> EditorSink for &mut S {
    fn composite_updated(&mut self, composite: Option<EncodedImage>) {
        (**self).composite_updated(composite);
    }

    fn corners_changed(&mut self, corners: Option<Corners>) {
        (**self).corners_changed(corners);
    }

    fn mask_changed(&mut self, mask: Option<MaskImage>) {
        (**self).mask_changed(mask);
    }

    fn paths_changed(&mut self, paths: &[Path]) {
        (**self).paths_changed(paths);
    }
}
