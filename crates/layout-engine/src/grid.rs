//! Grid tiling: default (presenter + thumbnails) and best-fit (equal cells).

use serde::Serialize;
use stagemix_common::error::{StagemixError, StagemixResult};
use stagemix_layout_model::{Canvas, Rect, RegionAssignment};

use crate::geometry::place_in_cell;
use crate::ReadyParticipant;

/// Largest membership either grid family can lay out.
pub const MAX_GRID_PARTICIPANTS: usize = 17;

/// Thumbnail columns in the default layout strip.
pub const THUMBNAIL_COLUMNS: u32 = 4;

/// Thumbnail rows that fit on the canvas in the default layout strip.
pub const THUMBNAIL_ROWS: u32 = 4;

// Thumbnail geometry in thousandths of the canvas: 23.5% cells, 1.2% gaps.
const THUMB_SIZE_PERMILLE: u64 = 235;
const THUMB_GAP_PERMILLE: u64 = 12;
const THUMB_PITCH_PERMILLE: u64 = THUMB_SIZE_PERMILLE + THUMB_GAP_PERMILLE;

/// Cell arrangement chosen by best-fit tiling for a participant count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BestFitTier {
    /// `n x n` equal cells.
    Square(u32),
    /// Two full-height halves side by side.
    Halves,
    /// Four inset columns of four rows, plus one centered cell below.
    Seventeen,
}

/// Pick the best-fit arrangement for `count` participants.
pub fn best_fit_tier(count: usize) -> StagemixResult<BestFitTier> {
    match count {
        0 | 1 => Ok(BestFitTier::Square(1)),
        2 => Ok(BestFitTier::Halves),
        3..=4 => Ok(BestFitTier::Square(2)),
        5..=9 => Ok(BestFitTier::Square(3)),
        10..=16 => Ok(BestFitTier::Square(4)),
        17 => Ok(BestFitTier::Seventeen),
        n => Err(StagemixError::capacity_exceeded(n, MAX_GRID_PARTICIPANTS)),
    }
}

impl BestFitTier {
    /// Cell for the participant at `index` within this arrangement.
    pub fn cell(&self, canvas: &Canvas, index: usize) -> Rect {
        let (w, h) = (canvas.width as u64, canvas.height as u64);
        let i = index as u64;
        match *self {
            BestFitTier::Square(n) => {
                let n = n as u64;
                let (col, row) = (i % n, i / n);
                Rect::new(
                    (col * w / n) as u32,
                    (row * h / n) as u32,
                    (w / n) as u32,
                    (h / n) as u32,
                )
            }
            BestFitTier::Halves => Rect::new((i * w / 2) as u32, 0, (w / 2) as u32, h as u32),
            BestFitTier::Seventeen => {
                let (cell_w, cell_h) = (w / 5, h / 5);
                if i == 16 {
                    Rect::new((2 * w / 5) as u32, (4 * h / 5) as u32, cell_w as u32, cell_h as u32)
                } else {
                    let (col, row) = (i % 4, i / 4);
                    // Columns start half a cell in: x = (2 * col + 1) / 10 of the width.
                    Rect::new(
                        ((2 * col + 1) * w / 10) as u32,
                        (row * h / 5) as u32,
                        cell_w as u32,
                        cell_h as u32,
                    )
                }
            }
        }
    }
}

/// Best-fit tiling: every participant gets an equal cell and its video is
/// aspect-fit and centered inside it.
///
/// `participants` must already be in cell order (ascending ID). A
/// participant whose video cannot be fitted is left out of the layout.
pub fn best_fit_layout(
    canvas: &Canvas,
    participants: &[ReadyParticipant<'_>],
) -> StagemixResult<Vec<RegionAssignment>> {
    let tier = best_fit_tier(participants.len())?;
    let mut regions = Vec::with_capacity(participants.len());

    for (index, participant) in participants.iter().enumerate() {
        let cell = tier.cell(canvas, index);
        match place_in_cell(cell, participant.resolution) {
            Ok(rect) => regions.push(RegionAssignment::new(participant.id, rect, 0)),
            Err(e) => {
                tracing::warn!(
                    participant = participant.id,
                    resolution = %participant.resolution,
                    error = %e,
                    "Skipping participant that cannot be fitted"
                );
            }
        }
    }

    Ok(regions)
}

/// Default tiling: the first participant covers the canvas and the rest
/// sit in a bottom-left thumbnail strip, four per row, growing upward.
///
/// `participants` must be in join order. Thumbnails keep their fixed
/// proportions and are not aspect-fit.
pub fn default_layout(
    canvas: &Canvas,
    participants: &[ReadyParticipant<'_>],
) -> StagemixResult<Vec<RegionAssignment>> {
    let Some((presenter, thumbnails)) = participants.split_first() else {
        return Ok(Vec::new());
    };

    let thumbnail_capacity = (THUMBNAIL_COLUMNS * THUMBNAIL_ROWS) as usize;
    if thumbnails.len() > thumbnail_capacity {
        return Err(StagemixError::capacity_exceeded(
            participants.len(),
            thumbnail_capacity + 1,
        ));
    }

    let mut regions = Vec::with_capacity(participants.len());
    regions.push(RegionAssignment::new(
        presenter.id,
        Rect::new(0, 0, canvas.width, canvas.height),
        0,
    ));

    for (index, participant) in thumbnails.iter().enumerate() {
        regions.push(RegionAssignment::new(
            participant.id,
            thumbnail_cell(canvas, index),
            1,
        ));
    }

    Ok(regions)
}

/// Cell of the `index`-th thumbnail (0-based, excluding the presenter).
pub fn thumbnail_cell(canvas: &Canvas, index: usize) -> Rect {
    let (w, h) = (canvas.width as u64, canvas.height as u64);
    let col = index as u64 % THUMBNAIL_COLUMNS as u64;
    let row = index as u64 / THUMBNAIL_COLUMNS as u64;

    let x = (col * THUMB_PITCH_PERMILLE + THUMB_GAP_PERMILLE) * w / 1000;
    let y = 1000u64.saturating_sub((row + 1) * THUMB_PITCH_PERMILLE) * h / 1000;

    Rect::new(
        x as u32,
        y as u32,
        (THUMB_SIZE_PERMILLE * w / 1000) as u32,
        (THUMB_SIZE_PERMILLE * h / 1000) as u32,
    )
}
