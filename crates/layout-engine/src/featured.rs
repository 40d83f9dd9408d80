//! Vertical presentation: one featured participant on the left, everyone
//! else stacked in a strip on the right.
//!
//! The tier is chosen once from the participant count, then a single pass
//! lays out the featured region and the strip cells. Strip cells are used
//! as-is; videos are not aspect-fit into them.

use serde::Serialize;
use stagemix_common::error::{StagemixError, StagemixResult};
use stagemix_layout_model::{Canvas, Rect, RegionAssignment};

use crate::ReadyParticipant;

/// Largest membership the featured layout can place, featured included.
pub const MAX_FEATURED_PARTICIPANTS: usize = 17;

/// Capacity bracket selecting the featured layout arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturedTier {
    Five,
    Seven,
    Nine,
    Seventeen,
}

impl FeaturedTier {
    pub const ALL: [FeaturedTier; 4] = [Self::Five, Self::Seven, Self::Nine, Self::Seventeen];

    /// Total slots, featured region included.
    pub fn slots(self) -> usize {
        match self {
            Self::Five => 5,
            Self::Seven => 7,
            Self::Nine => 9,
            Self::Seventeen => 17,
        }
    }

    /// Rows in each strip column.
    pub fn strip_rows(self) -> u32 {
        match self {
            Self::Five => 4,
            Self::Seven => 6,
            Self::Nine | Self::Seventeen => 8,
        }
    }

    /// Strip columns to the right of the featured region.
    pub fn strip_columns(self) -> u32 {
        match self {
            Self::Seventeen => 2,
            _ => 1,
        }
    }

    /// Participants the strip can hold.
    pub fn strip_capacity(self) -> usize {
        (self.strip_rows() * self.strip_columns()) as usize
    }

    /// The canvas width is divided into this many equal columns.
    fn width_divisions(self) -> u64 {
        match self {
            Self::Five => 5,
            Self::Seven => 7,
            Self::Nine => 9,
            Self::Seventeen => 10,
        }
    }

    /// Width divisions occupied by the featured region.
    fn featured_divisions(self) -> u64 {
        self.width_divisions() - self.strip_columns() as u64
    }

    /// Full-height region on the left for the featured participant.
    pub fn featured_rect(self, canvas: &Canvas) -> Rect {
        let width = self.featured_divisions() * canvas.width as u64 / self.width_divisions();
        Rect::new(0, 0, width as u32, canvas.height)
    }

    /// Cell for the `index`-th strip participant, filled top to bottom and
    /// then left to right.
    pub fn strip_cell(self, canvas: &Canvas, index: usize) -> Rect {
        let (w, h) = (canvas.width as u64, canvas.height as u64);
        let divisions = self.width_divisions();
        let rows = self.strip_rows() as u64;
        let col = index as u64 / rows;
        let row = index as u64 % rows;

        Rect::new(
            ((self.featured_divisions() + col) * w / divisions) as u32,
            (row * h / rows) as u32,
            (w / divisions) as u32,
            (h / rows) as u32,
        )
    }
}

/// Pick the smallest tier whose strip holds everyone but the featured
/// participant. Without a featured participant present the strip has to
/// hold the whole membership.
pub fn select_tier(count: usize, featured_present: bool) -> StagemixResult<FeaturedTier> {
    let strip = count.saturating_sub(usize::from(featured_present));
    FeaturedTier::ALL
        .into_iter()
        .find(|tier| strip <= tier.strip_capacity())
        .ok_or_else(|| {
            let limit = FeaturedTier::Seventeen.strip_capacity() + usize::from(featured_present);
            StagemixError::capacity_exceeded(count, limit)
        })
}

/// Lay out `participants` (ascending ID) with `featured` in the large slot.
///
/// When `featured` is `None` or not a current participant the featured
/// slot stays empty for this pass.
pub fn featured_layout(
    canvas: &Canvas,
    participants: &[ReadyParticipant<'_>],
    featured: Option<&str>,
) -> StagemixResult<Vec<RegionAssignment>> {
    let featured = featured.filter(|id| participants.iter().any(|p| p.id == *id));
    if featured.is_none() {
        tracing::debug!(
            count = participants.len(),
            "Featured participant absent, laying out strip only"
        );
    }

    let tier = select_tier(participants.len(), featured.is_some())?;
    let mut regions = Vec::with_capacity(participants.len());
    let mut strip_index = 0;

    for participant in participants {
        if Some(participant.id) == featured {
            regions.push(RegionAssignment::new(
                participant.id,
                tier.featured_rect(canvas),
                0,
            ));
        } else {
            regions.push(RegionAssignment::new(
                participant.id,
                tier.strip_cell(canvas, strip_index),
                0,
            ));
            strip_index += 1;
        }
    }

    Ok(regions)
}
