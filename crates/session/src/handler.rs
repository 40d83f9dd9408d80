//! Session event handling.
//!
//! The RTC layer calls the `on_*` methods from its callback thread. Each
//! call updates the membership and, in mixed sessions, recomputes the
//! layout and hands it to the recorder. Nothing here returns an error to
//! the caller: failures are logged and the previous layout stays active.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use stagemix_common::clock::{file_stamp, SessionClock};
use stagemix_common::error::{StagemixError, StagemixResult};
use stagemix_layout_engine::LayoutSelector;
use stagemix_layout_model::{CapacityPolicy, MixingLayout, ParticipantId};

use crate::config::SessionConfig;
use crate::membership::MembershipTracker;
use crate::sink::{RecordingConfig, RecordingSink};

/// Drives one recording session from participant events.
pub struct SessionEventHandler {
    config: SessionConfig,
    selector: LayoutSelector,
    sink: Arc<dyn RecordingSink>,
    tracker: MembershipTracker,
    /// Last layout the recorder accepted. Held for the whole
    /// mutate-compute-submit sequence so submissions follow event order.
    current: Mutex<Option<MixingLayout>>,
    clock: SessionClock,
    stopped: AtomicBool,
}

impl SessionEventHandler {
    pub fn new(config: SessionConfig, sink: Arc<dyn RecordingSink>) -> Self {
        let selector = LayoutSelector::new(config.layout_mode)
            .with_featured(config.featured_participant.clone())
            .with_rotations(config.rotations.clone());

        Self {
            config,
            selector,
            sink,
            tracker: MembershipTracker::new(),
            current: Mutex::new(None),
            clock: SessionClock::start(),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Begin the session.
    ///
    /// Mixed sessions apply the watermarks and start the recorder here, then
    /// show the configured background, if any, before anyone has joined.
    /// Non-mixed sessions start nothing until a participant joins.
    pub fn start(&self) {
        tracing::info!(
            mode = %self.selector.mode(),
            mix = self.config.mix,
            width = self.config.canvas.width,
            height = self.config.canvas.height,
            started_at = self.clock.epoch_wall(),
            "Recording session started"
        );

        if !self.config.mix {
            return;
        }

        let mut current = self.current.lock();
        if !self.config.watermarks.is_empty() {
            if let Err(e) = self.sink.set_watermarks(&self.config.watermarks) {
                tracing::warn!(error = %e, "Failed to apply watermarks");
            }
        }
        let recording = self.recording_config(self.config.recorder.path.clone());
        if let Err(e) = self.sink.start_recording(&recording) {
            tracing::warn!(error = %e, "Failed to start mixed recording");
        }

        if !self.config.canvas.has_background() {
            return;
        }
        let layout = MixingLayout::background_only(self.config.canvas.clone());
        match self.sink.set_video_mixing_layout(&layout) {
            Ok(()) => *current = Some(layout),
            Err(e) => tracing::warn!(error = %e, "Failed to submit background layout"),
        }
    }

    pub fn on_user_joined(&self, uid: &str) {
        if !self.config.subscription.admits(uid) {
            tracing::debug!(
                uid,
                stream_type = ?self.config.subscription.stream_type,
                "Not subscribed, ignoring join"
            );
            return;
        }

        let mut current = self.current.lock();
        if !self.tracker.add(uid) {
            tracing::debug!(uid, "Duplicate join ignored");
            return;
        }
        tracing::info!(
            uid,
            members = self.tracker.len(),
            ready = self.tracker.ready_count(),
            "Participant joined"
        );

        if self.config.mix {
            self.recompute(&mut current);
        } else {
            if !self.config.watermarks.is_empty() {
                if let Err(e) = self.sink.set_watermarks_for(uid, &self.config.watermarks) {
                    tracing::warn!(uid, error = %e, "Failed to apply watermarks");
                }
            }
            let recording = self.single_recording_config(uid);
            if let Err(e) = self.sink.start_single_recording(uid, &recording) {
                tracing::warn!(uid, error = %e, "Failed to start individual recording");
            }
        }
    }

    pub fn on_user_left(&self, uid: &str) {
        let mut current = self.current.lock();
        if !self.tracker.remove(uid) {
            tracing::debug!(uid, "Leave for unknown participant ignored");
            return;
        }
        tracing::info!(
            uid,
            members = self.tracker.len(),
            ready = self.tracker.ready_count(),
            "Participant left"
        );

        if self.config.mix {
            self.recompute(&mut current);
        } else if let Err(e) = self.sink.stop_single_recording(uid) {
            tracing::warn!(uid, error = %e, "Failed to stop individual recording");
        }
    }

    pub fn on_first_video_decoded(&self, uid: &str, width: u32, height: u32) {
        let mut current = self.current.lock();
        match self.tracker.set_resolution(uid, width, height) {
            Ok(true) => {
                tracing::debug!(uid, width, height, "First video frame decoded");
                if self.config.mix {
                    self.recompute(&mut current);
                }
            }
            Ok(false) => {
                tracing::debug!(uid, "Resolution for non-member ignored");
            }
            Err(e) => {
                tracing::warn!(uid, error = %e, "Rejected decoded resolution");
            }
        }
    }

    /// IDs of everyone currently in the session, sorted.
    pub fn active_participant_ids(&self) -> BTreeSet<ParticipantId> {
        self.tracker.ids()
    }

    /// The last layout the recorder accepted, if any.
    ///
    /// This stays in place when nobody is left to mix, since nothing is
    /// submitted to replace it.
    pub fn current_layout(&self) -> Option<MixingLayout> {
        self.current.lock().clone()
    }

    /// Layout for the current membership, without submitting it.
    pub fn preview_layout(&self) -> StagemixResult<Option<MixingLayout>> {
        self.selector
            .compute(&self.config.canvas, &self.tracker.snapshot())
    }

    /// End the session. Stops the mixed recording, or the individual
    /// recordings of remaining members. Calling this more than once has no
    /// further effect.
    pub fn shutdown(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }

        let _current = self.current.lock();
        let remaining = self.active_participant_ids();
        if self.config.mix {
            if let Err(e) = self.sink.stop_recording() {
                tracing::warn!(error = %e, "Failed to stop mixed recording");
            }
        } else {
            for uid in &remaining {
                if let Err(e) = self.sink.stop_single_recording(uid) {
                    tracing::warn!(uid = %uid, error = %e, "Failed to stop individual recording");
                }
            }
        }

        tracing::info!(
            elapsed_ms = self.clock.elapsed_ms(),
            remaining = remaining.len(),
            "Recording session stopped"
        );
    }

    /// Recompute from the current membership and submit if it changed.
    /// The caller holds the layout lock.
    fn recompute(&self, current: &mut Option<MixingLayout>) {
        let snapshot = self.tracker.snapshot();
        match self.selector.compute(&self.config.canvas, &snapshot) {
            Ok(Some(layout)) => {
                if current.as_ref() == Some(&layout) {
                    tracing::trace!("Layout unchanged, nothing to submit");
                    return;
                }
                self.submit(current, layout);
            }
            Ok(None) => {
                // Nothing is submitted, so the recorder keeps showing `current`.
                tracing::debug!(members = snapshot.len(), "No participant ready to mix");
            }
            Err(e) => self.on_layout_error(current, e),
        }
    }

    fn on_layout_error(&self, current: &mut Option<MixingLayout>, error: StagemixError) {
        if !error.is_recoverable() {
            tracing::error!(error = %error, "Layout computation failed");
            return;
        }

        match (&error, self.config.capacity_policy) {
            (StagemixError::CapacityExceeded { .. }, CapacityPolicy::Clear) => {
                tracing::warn!(error = %error, "Capacity exceeded, clearing layout");
                let layout = MixingLayout::background_only(self.config.canvas.clone());
                if current.as_ref() != Some(&layout) {
                    self.submit(current, layout);
                }
            }
            _ => {
                tracing::warn!(error = %error, "Keeping previous layout");
            }
        }
    }

    fn submit(&self, current: &mut Option<MixingLayout>, layout: MixingLayout) {
        match self.sink.set_video_mixing_layout(&layout) {
            Ok(()) => {
                tracing::debug!(regions = layout.regions.len(), "Submitted mixing layout");
                *current = Some(layout);
            }
            Err(e) => tracing::warn!(error = %e, "Recorder rejected mixing layout"),
        }
    }

    fn single_recording_config(&self, uid: &str) -> RecordingConfig {
        let file_name = format!("{uid}_{}.mp4", file_stamp());
        self.recording_config(self.config.recorder.path.join(file_name))
    }

    fn recording_config(&self, storage_path: PathBuf) -> RecordingConfig {
        let canvas = &self.config.canvas;
        let recorder = &self.config.recorder;
        RecordingConfig {
            width: canvas.width,
            height: canvas.height,
            fps: canvas.fps,
            sample_rate: recorder.audio_sample_rate,
            channels: recorder.audio_channels,
            storage_path,
            stream_type: self.config.subscription.stream_type,
            max_duration_ms: u64::from(recorder.max_duration_secs) * 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemorySink, SinkCommand};
    use crate::subscription::{StreamType, SubscriptionConfig};
    use stagemix_layout_model::{Canvas, LayoutMode, Rect, Watermark, WatermarkKind};

    fn session_with(config: SessionConfig) -> (SessionEventHandler, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let handler = SessionEventHandler::new(config, sink.clone());
        (handler, sink)
    }

    fn best_fit() -> SessionConfig {
        SessionConfig {
            layout_mode: LayoutMode::BestFit,
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_join_without_video_submits_nothing() {
        let (handler, sink) = session_with(best_fit());
        handler.on_user_joined("a");
        assert_eq!(sink.layout_calls(), 0);
        assert!(handler.current_layout().is_none());
        assert_eq!(handler.active_participant_ids().len(), 1);
    }

    #[test]
    fn test_decode_submits_full_canvas_layout() {
        let (handler, sink) = session_with(best_fit());
        handler.on_user_joined("a");
        handler.on_first_video_decoded("a", 1920, 1080);

        assert_eq!(sink.layout_calls(), 1);
        let layout = sink.last_layout().unwrap();
        assert_eq!(layout.region_for("a").unwrap().rect(), Rect::new(0, 0, 1920, 1080));
        assert_eq!(handler.current_layout(), Some(layout));
    }

    #[test]
    fn test_unchanged_layout_is_not_resubmitted() {
        let (handler, sink) = session_with(best_fit());
        handler.on_user_joined("a");
        handler.on_first_video_decoded("a", 1280, 720);
        handler.on_user_joined("b");
        handler.on_user_joined("a");
        assert_eq!(sink.layout_calls(), 1);
    }

    #[test]
    fn test_eighteenth_participant_keeps_previous_layout() {
        let (handler, sink) = session_with(best_fit());
        for i in 0..17 {
            let uid = format!("p{i:02}");
            handler.on_user_joined(&uid);
            handler.on_first_video_decoded(&uid, 1280, 720);
        }
        let calls = sink.layout_calls();
        let before = handler.current_layout().unwrap();
        assert_eq!(before.regions.len(), 17);

        handler.on_user_joined("p17");
        handler.on_first_video_decoded("p17", 1280, 720);

        assert_eq!(sink.layout_calls(), calls);
        assert_eq!(handler.current_layout(), Some(before));
        assert_eq!(handler.active_participant_ids().len(), 18);

        // once someone leaves, the 17 remaining fit again
        handler.on_user_left("p00");
        let layout = sink.last_layout().unwrap();
        assert_eq!(layout.regions.len(), 17);
        assert!(layout.region_for("p17").is_some());
    }

    #[test]
    fn test_clear_policy_submits_background_on_overflow() {
        let config = SessionConfig {
            capacity_policy: CapacityPolicy::Clear,
            ..best_fit()
        };
        let (handler, sink) = session_with(config);
        for i in 0..18 {
            let uid = format!("p{i:02}");
            handler.on_user_joined(&uid);
            handler.on_first_video_decoded(&uid, 640, 360);
        }

        let layout = sink.last_layout().unwrap();
        assert!(layout.regions.is_empty());
        assert_eq!(handler.current_layout(), Some(layout));
    }

    #[test]
    fn test_leave_recomputes_and_forgets_resolution() {
        let (handler, sink) = session_with(best_fit());
        for uid in ["a", "b"] {
            handler.on_user_joined(uid);
            handler.on_first_video_decoded(uid, 1280, 720);
        }
        handler.on_user_left("b");

        let layout = sink.last_layout().unwrap();
        assert_eq!(layout.regions.len(), 1);
        assert_eq!(layout.region_for("a").unwrap().rect(), Rect::new(0, 0, 1920, 1080));

        handler.on_user_joined("b");
        assert_eq!(sink.layout_calls(), 3);
        assert!(handler.preview_layout().unwrap().unwrap().region_for("b").is_none());
    }

    #[test]
    fn test_unknown_leave_and_zero_resolution_are_ignored() {
        let (handler, sink) = session_with(best_fit());
        handler.on_user_left("ghost");
        handler.on_user_joined("a");
        handler.on_first_video_decoded("a", 0, 720);
        handler.on_first_video_decoded("ghost", 640, 360);
        assert_eq!(sink.layout_calls(), 0);
        assert_eq!(
            handler.active_participant_ids().into_iter().collect::<Vec<_>>(),
            ["a"]
        );
    }

    #[test]
    fn test_subscription_filter_excludes_participant() {
        let config = SessionConfig {
            subscription: SubscriptionConfig {
                sub_all_video: false,
                video_users: vec!["cam".to_string()],
                stream_type: StreamType::VideoOnly,
                ..SubscriptionConfig::default()
            },
            ..best_fit()
        };
        let (handler, sink) = session_with(config);
        for uid in ["cam", "lurker"] {
            handler.on_user_joined(uid);
            handler.on_first_video_decoded(uid, 1280, 720);
        }

        assert_eq!(
            handler.active_participant_ids().into_iter().collect::<Vec<_>>(),
            ["cam"]
        );
        let layout = sink.last_layout().unwrap();
        assert_eq!(layout.regions.len(), 1);
        assert!(layout.region_for("lurker").is_none());
    }

    #[test]
    fn test_start_submits_background_when_configured() {
        let config = SessionConfig {
            canvas: Canvas::new(1280, 720, 15).with_background_color(0x202020),
            ..best_fit()
        };
        let (handler, sink) = session_with(config);
        handler.start();
        let layout = sink.last_layout().unwrap();
        assert!(layout.regions.is_empty());
        assert_eq!(layout.canvas.background_color, 0x202020);
        assert!(matches!(sink.commands()[0], SinkCommand::StartRecording { .. }));

        let (plain, plain_sink) = session_with(best_fit());
        plain.start();
        assert_eq!(plain_sink.layout_calls(), 0);
    }

    fn clock_watermark() -> Watermark {
        Watermark::new(
            WatermarkKind::Time {
                font_file_path: "/fonts/mono.ttf".to_string(),
                font_size: 20,
            },
            Rect::new(20, 20, 240, 40),
            1,
        )
    }

    #[test]
    fn test_mixed_recording_lifecycle() {
        let mut config = SessionConfig {
            canvas: Canvas::new(1280, 720, 24).with_background_color(0x101010),
            watermarks: vec![clock_watermark()],
            ..best_fit()
        };
        config.recorder.path = "/data/mixed".into();
        config.recorder.max_duration_secs = 30;
        let (handler, sink) = session_with(config);

        handler.start();
        handler.on_user_joined("a");
        handler.on_first_video_decoded("a", 1280, 720);
        handler.on_user_left("a");
        handler.shutdown();
        handler.shutdown();

        let commands = sink.commands();
        assert_eq!(
            commands[0],
            SinkCommand::SetWatermarks {
                watermarks: vec![clock_watermark()]
            }
        );
        match &commands[1] {
            SinkCommand::StartRecording { config } => {
                assert_eq!(config.storage_path, PathBuf::from("/data/mixed"));
                assert_eq!((config.width, config.height, config.fps), (1280, 720, 24));
                assert_eq!(config.max_duration_ms, 30_000);
                assert_eq!(config.stream_type, StreamType::Both);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(matches!(&commands[2], SinkCommand::SetLayout { layout } if layout.regions.is_empty()));
        assert_eq!(commands.last(), Some(&SinkCommand::StopRecording));
        let stops = commands
            .iter()
            .filter(|c| matches!(c, SinkCommand::StopRecording))
            .count();
        assert_eq!(stops, 1);
        assert!(!commands
            .iter()
            .any(|c| matches!(c, SinkCommand::StartSingle { .. } | SinkCommand::SetWatermarksFor { .. })));
    }

    #[test]
    fn test_individual_recordings_get_watermarks_first() {
        let config = SessionConfig {
            mix: false,
            watermarks: vec![clock_watermark()],
            ..SessionConfig::default()
        };
        let (handler, sink) = session_with(config);
        handler.start();
        handler.on_user_joined("a");
        handler.shutdown();

        let commands = sink.commands();
        assert_eq!(commands.len(), 3, "{commands:?}");
        assert_eq!(
            commands[0],
            SinkCommand::SetWatermarksFor {
                participant_id: "a".to_string(),
                watermarks: vec![clock_watermark()],
            }
        );
        assert!(matches!(&commands[1], SinkCommand::StartSingle { participant_id, .. } if participant_id == "a"));
        assert!(matches!(&commands[2], SinkCommand::StopSingle { participant_id } if participant_id == "a"));
    }

    #[test]
    fn test_empty_room_keeps_last_submitted_layout() {
        let (handler, sink) = session_with(best_fit());
        handler.on_user_joined("a");
        handler.on_first_video_decoded("a", 1280, 720);
        let shown = sink.last_layout().unwrap();

        handler.on_user_left("a");
        assert_eq!(sink.layout_calls(), 1);
        assert_eq!(handler.current_layout(), Some(shown));

        // the recorder still shows this exact layout
        handler.on_user_joined("a");
        handler.on_first_video_decoded("a", 1280, 720);
        assert_eq!(sink.layout_calls(), 1);

        handler.on_first_video_decoded("a", 640, 480);
        assert_eq!(sink.layout_calls(), 2);
    }

    #[test]
    fn test_individual_recording_lifecycle() {
        let mut config = SessionConfig {
            mix: false,
            ..SessionConfig::default()
        };
        config.recorder.path = "/data/rec".into();
        let (handler, sink) = session_with(config);

        handler.start();
        handler.on_user_joined("a");
        handler.on_user_joined("b");
        handler.on_first_video_decoded("a", 1280, 720);
        handler.on_user_left("a");
        handler.shutdown();
        handler.shutdown();

        let commands = sink.commands();
        assert_eq!(commands.len(), 4, "{commands:?}");
        match &commands[0] {
            SinkCommand::StartSingle {
                participant_id,
                config,
            } => {
                assert_eq!(participant_id, "a");
                assert!(config.storage_path.starts_with("/data/rec"));
                let name = config.storage_path.file_name().unwrap().to_string_lossy();
                assert!(name.starts_with("a_") && name.ends_with(".mp4"), "{name}");
                assert_eq!(config.max_duration_ms, 120_000);
                assert_eq!((config.width, config.height, config.fps), (1920, 1080, 15));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(matches!(&commands[1], SinkCommand::StartSingle { participant_id, .. } if participant_id == "b"));
        assert!(matches!(&commands[2], SinkCommand::StopSingle { participant_id } if participant_id == "a"));
        assert!(matches!(&commands[3], SinkCommand::StopSingle { participant_id } if participant_id == "b"));
    }

    #[test]
    fn test_sink_failure_leaves_current_unset() {
        let sink = Arc::new(MemorySink::failing());
        let handler = SessionEventHandler::new(best_fit(), sink.clone());
        handler.on_user_joined("a");
        handler.on_first_video_decoded("a", 1280, 720);
        assert_eq!(sink.layout_calls(), 1);
        assert!(handler.current_layout().is_none());

        // the next event retries the same layout
        handler.on_first_video_decoded("a", 1280, 720);
        assert_eq!(sink.layout_calls(), 2);
    }

    #[test]
    fn test_default_mode_presenter_is_first_ready_joiner() {
        let config = SessionConfig {
            layout_mode: LayoutMode::Default,
            ..SessionConfig::default()
        };
        let (handler, sink) = session_with(config);
        for uid in ["zed", "amy"] {
            handler.on_user_joined(uid);
        }
        handler.on_first_video_decoded("amy", 1280, 720);
        handler.on_first_video_decoded("zed", 1280, 720);

        let layout = sink.last_layout().unwrap();
        let presenter = layout.region_for("zed").unwrap();
        assert_eq!(presenter.rect(), Rect::new(0, 0, 1920, 1080));
        assert_eq!(presenter.z_order, 0);
        assert_eq!(layout.region_for("amy").unwrap().z_order, 1);
    }

    #[test]
    fn test_ids_readable_from_another_thread() {
        let (handler, _sink) = session_with(best_fit());
        let handler = Arc::new(handler);
        let reader = {
            let handler = Arc::clone(&handler);
            std::thread::spawn(move || {
                let mut max = 0;
                for _ in 0..100 {
                    max = max.max(handler.active_participant_ids().len());
                }
                max
            })
        };
        for i in 0..10 {
            handler.on_user_joined(&format!("p{i}"));
        }
        assert!(reader.join().unwrap() <= 10);
        assert_eq!(handler.active_participant_ids().len(), 10);
    }
}
