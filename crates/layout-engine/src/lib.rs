//! Stagemix Layout Engine
//!
//! Turns a membership snapshot into a mixing layout:
//! - **Geometry:** Aspect-preserving fit of a source video into a cell
//! - **Grid:** Default (presenter + thumbnails) and best-fit (equal cells) tiling
//! - **Featured:** Vertical presentation with one large featured participant
//! - **Selector:** Dispatches to a strategy by mode and participant count
//!
//! This crate is pure computation with no I/O, locking or sink calls.
//! Inputs and outputs are plain data.

pub mod featured;
pub mod geometry;
pub mod grid;
pub mod selector;

pub use selector::LayoutSelector;

use stagemix_layout_model::Resolution;

/// A participant whose first video frame has been decoded, borrowed from a
/// membership snapshot for the duration of one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyParticipant<'a> {
    pub id: &'a str,
    pub resolution: Resolution,
}
