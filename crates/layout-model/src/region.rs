//! Region assignments: where each participant lands on the canvas.

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::participant::ParticipantId;

/// Clockwise rotation applied to a participant's video inside its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

/// A rotation value that is not a multiple of 90 in `[0, 270]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid rotation {0}, expected one of 0, 90, 180, 270")]
pub struct InvalidRotation(pub u32);

impl Rotation {
    pub fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

impl TryFrom<u32> for Rotation {
    type Error = InvalidRotation;

    fn try_from(degrees: u32) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(InvalidRotation(other)),
        }
    }
}

impl From<Rotation> for u32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Whether the rectangle fits entirely inside a `width x height` area
    /// anchored at the origin.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }

    /// Whether two rectangles share any area. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        (self.x as u64) < other.right()
            && (other.x as u64) < self.right()
            && (self.y as u64) < other.bottom()
            && (other.y as u64) < self.bottom()
    }
}

/// One participant's placement within the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAssignment {
    pub participant_id: ParticipantId,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Stacking order; higher values are drawn on top.
    pub z_order: u32,
    /// Opacity in `[0.0, 1.0]`.
    pub alpha: f32,
    pub rotation: Rotation,
}

impl RegionAssignment {
    /// Opaque, unrotated region covering `rect`.
    pub fn new(participant_id: impl Into<ParticipantId>, rect: Rect, z_order: u32) -> Self {
        Self {
            participant_id: participant_id.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            z_order,
            alpha: 1.0,
            rotation: Rotation::Deg0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_within(&self, canvas: &Canvas) -> bool {
        self.rect().fits_within(canvas.width, canvas.height)
    }
}

/// A complete layout submitted to the recorder in a single call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixingLayout {
    pub canvas: Canvas,
    pub regions: Vec<RegionAssignment>,
}

impl MixingLayout {
    /// A layout that only paints the canvas background.
    pub fn background_only(canvas: Canvas) -> Self {
        Self {
            canvas,
            regions: Vec::new(),
        }
    }

    /// Region assigned to `participant_id`, if any.
    pub fn region_for(&self, participant_id: &str) -> Option<&RegionAssignment> {
        self.regions
            .iter()
            .find(|r| r.participant_id == participant_id)
    }

    /// Whether every region lies inside the canvas.
    pub fn all_within_canvas(&self) -> bool {
        self.regions.iter().all(|r| r.is_within(&self.canvas))
    }
}
