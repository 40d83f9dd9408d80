//! Stagemix Session
//!
//! The stateful half of the mixer. Receives participant events from the
//! RTC layer, keeps the membership, and submits a fresh layout to the
//! recorder whenever the mix changes:
//!
//! ```text
//! on_user_joined ─────────┐
//! on_first_video_decoded ─┼── MembershipTracker ── LayoutSelector ── RecordingSink
//! on_user_left ───────────┘        (mutex)             (pure)        set_video_mixing_layout
//! ```
//!
//! Mixed sessions start the recorder in `start()` and stop it in
//! `shutdown()`. In non-mixed sessions each admitted participant is recorded
//! to its own file instead, started on join and stopped on leave or
//! shutdown. Configured watermarks are applied to whichever recording is
//! being started.

pub mod config;
pub mod event;
pub mod handler;
pub mod membership;
pub mod sink;
pub mod subscription;

pub use config::{RecorderOutput, SessionConfig};
pub use event::{parse_events, serialize_events, SessionEvent, SessionEventKind};
pub use handler::SessionEventHandler;
pub use membership::MembershipTracker;
pub use sink::{MemorySink, RecordingConfig, RecordingSink, SinkCommand};
pub use subscription::{StreamType, SubscriptionConfig};
