//! Mixing canvas description.

use serde::{Deserialize, Serialize};

/// The fixed-size output frame of a mixed recording.
///
/// Configured once per session and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: u32,
    /// Background color as `0xRRGGBB`.
    #[serde(default)]
    pub background_color: u32,
    /// Optional background image (path or URL understood by the recorder).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fps: u32) -> Self {
        Self {
            width,
            height,
            fps,
            background_color: 0,
            background_image: None,
        }
    }

    pub fn with_background_color(mut self, rgb: u32) -> Self {
        self.background_color = rgb & 0x00FF_FFFF;
        self
    }

    pub fn with_background_image(mut self, image: impl Into<String>) -> Self {
        self.background_image = Some(image.into());
        self
    }

    /// Whether a non-default background has been configured.
    pub fn has_background(&self) -> bool {
        self.background_color != 0 || self.background_image.is_some()
    }

    /// Both dimensions and the frame rate are non-zero.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.fps > 0
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(1920, 1080, 15)
    }
}
