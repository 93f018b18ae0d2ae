//! Draw-command scenes and their CPU execution.
//!
//! Editors never touch pixels directly: they compile an immutable snapshot of their model into a
//! [`ScenePlan`] and hand it to a [`CpuBackend`]. The same path produces the on-screen frame, the
//! native-resolution composite and the binary mask.

pub(crate) mod compile;
pub(crate) mod cpu;
pub(crate) mod scene;

use crate::assets::decode::{EncodedImage, encode_png_premul};
use crate::foundation::error::WarpmaskResult;

/// A rendered RGBA8 frame.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Premultiplied RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> WarpmaskResult<EncodedImage> {
        if self.premultiplied {
            encode_png_premul(self.width, self.height, &self.data)
        } else {
            let mut premul = self.data.clone();
            crate::foundation::math::premultiply_rgba8_in_place(&mut premul);
            encode_png_premul(self.width, self.height, &premul)
        }
    }
}
