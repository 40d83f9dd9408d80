//! Stagemix Layout Model
//!
//! Defines the data contracts shared by the layout engine and the session:
//! - **Canvas:** The fixed-size frame every participant feed is composited into
//! - **Participant:** Identity plus last known source resolution
//! - **Regions:** Pixel rectangles assigned to participants, with stacking and rotation
//! - **Modes:** Which tiling family a session uses, and what to do at capacity
//! - **Watermarks:** Text, clock and image overlays burned into recordings
//!
//! All coordinates are integer pixels with the origin at the top-left of
//! the canvas.

pub mod canvas;
pub mod mode;
pub mod participant;
pub mod region;
pub mod watermark;

pub use canvas::*;
pub use mode::*;
pub use participant::*;
pub use region::*;
pub use watermark::*;
