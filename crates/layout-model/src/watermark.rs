//! Overlays the recorder burns into the video.

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::region::Rect;

/// What a watermark draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WatermarkKind {
    /// Fixed text.
    #[serde(alias = "litera")]
    Literal {
        #[serde(alias = "litera")]
        text: String,
        #[serde(alias = "fontFilePath")]
        font_file_path: String,
        #[serde(alias = "fontSize")]
        font_size: u32,
    },
    /// The current wall-clock time, redrawn every frame.
    Time {
        #[serde(alias = "fontFilePath")]
        font_file_path: String,
        #[serde(alias = "fontSize")]
        font_size: u32,
    },
    /// A still image.
    Picture {
        #[serde(alias = "imgUrl")]
        image_url: String,
    },
}

/// One watermark and where it sits on the frame.
///
/// Watermarks are applied in list order; the recorder numbers them from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    #[serde(flatten)]
    pub kind: WatermarkKind,
    #[serde(default)]
    pub x: u32,
    #[serde(default)]
    pub y: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default, alias = "zorder")]
    pub z_order: u32,
}

impl Watermark {
    pub fn new(kind: WatermarkKind, rect: Rect, z_order: u32) -> Self {
        Self {
            kind,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            z_order,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Non-empty and inside `canvas`.
    pub fn fits(&self, canvas: &Canvas) -> bool {
        self.width > 0 && self.height > 0 && self.rect().fits_within(canvas.width, canvas.height)
    }
}
