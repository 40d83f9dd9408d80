//! Aspect-preserving fit of a source video into a layout cell.
//!
//! Results are truncated toward zero so every scaled size lands on the
//! pixel grid and never exceeds its cell.

use stagemix_common::error::{StagemixError, StagemixResult};
use stagemix_layout_model::{Rect, Resolution};

/// Scale `source` to the largest size that fits entirely inside a
/// `cell_width x cell_height` cell without cropping.
///
/// A source relatively wider than the cell is clamped to the cell width;
/// otherwise it is clamped to the cell height. The ratio comparison uses
/// exact integer cross-multiplication, so equal aspect ratios take the
/// height-clamped branch.
pub fn fit(source: Resolution, cell_width: u32, cell_height: u32) -> StagemixResult<Resolution> {
    if !source.is_valid() {
        return Err(StagemixError::invalid_dimension(source.width, source.height));
    }
    if cell_width == 0 || cell_height == 0 {
        return Err(StagemixError::invalid_dimension(cell_width, cell_height));
    }

    let (sw, sh) = (source.width as u64, source.height as u64);
    let (cw, ch) = (cell_width as u64, cell_height as u64);

    // sw / sh > cw / ch
    if sw * ch > cw * sh {
        Ok(Resolution::new(cell_width, (cw * sh / sw) as u32))
    } else {
        Ok(Resolution::new((ch * sw / sh) as u32, cell_height))
    }
}

/// Fit `source` into `cell` and center the result on both axes.
pub fn place_in_cell(cell: Rect, source: Resolution) -> StagemixResult<Rect> {
    let scaled = fit(source, cell.width, cell.height)?;
    Ok(Rect::new(
        cell.x + (cell.width - scaled.width) / 2,
        cell.y + (cell.height - scaled.height) / 2,
        scaled.width,
        scaled.height,
    ))
}
