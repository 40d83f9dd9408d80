//! The recorder seam.
//!
//! A [`RecordingSink`] is whatever actually composes and writes media. The
//! session only ever talks to it through this trait, so tests and the CLI
//! replay can substitute [`MemorySink`].

use std::path::PathBuf;

use parking_lot::Mutex;
use serde::Serialize;
use stagemix_common::error::{StagemixError, StagemixResult};
use stagemix_layout_model::{MixingLayout, Watermark};

use crate::subscription::StreamType;

/// Output settings for a recording, mixed or per participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordingConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub sample_rate: u32,
    pub channels: u32,
    pub storage_path: PathBuf,
    pub stream_type: StreamType,
    pub max_duration_ms: u64,
}

/// Abstract interface to the underlying recorder.
pub trait RecordingSink: Send + Sync {
    /// Configure and begin the mixed recording.
    fn start_recording(&self, config: &RecordingConfig) -> StagemixResult<()>;

    /// Finish the mixed recording.
    fn stop_recording(&self) -> StagemixResult<()>;

    /// Replace the watermarks drawn on the mixed recording.
    fn set_watermarks(&self, watermarks: &[Watermark]) -> StagemixResult<()>;

    /// Replace the watermarks drawn on `participant_id`'s own recording.
    fn set_watermarks_for(
        &self,
        participant_id: &str,
        watermarks: &[Watermark],
    ) -> StagemixResult<()>;

    /// Replace the active mixed-video layout.
    fn set_video_mixing_layout(&self, layout: &MixingLayout) -> StagemixResult<()>;

    /// Begin recording `participant_id` on its own.
    fn start_single_recording(
        &self,
        participant_id: &str,
        config: &RecordingConfig,
    ) -> StagemixResult<()>;

    /// Stop the individual recording of `participant_id`.
    fn stop_single_recording(&self, participant_id: &str) -> StagemixResult<()>;
}

/// One call received by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SinkCommand {
    StartRecording {
        config: RecordingConfig,
    },
    StopRecording,
    SetWatermarks {
        watermarks: Vec<Watermark>,
    },
    SetWatermarksFor {
        participant_id: String,
        watermarks: Vec<Watermark>,
    },
    SetLayout {
        layout: MixingLayout,
    },
    StartSingle {
        participant_id: String,
        config: RecordingConfig,
    },
    StopSingle {
        participant_id: String,
    },
}

/// Sink that records every call in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    commands: Mutex<Vec<SinkCommand>>,
    fail_layouts: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose layout submissions always fail. Calls are still logged.
    pub fn failing() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            fail_layouts: true,
        }
    }

    pub fn commands(&self) -> Vec<SinkCommand> {
        self.commands.lock().clone()
    }

    /// Every layout submitted so far, oldest first.
    pub fn layouts(&self) -> Vec<MixingLayout> {
        self.commands
            .lock()
            .iter()
            .filter_map(|c| match c {
                SinkCommand::SetLayout { layout } => Some(layout.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_layout(&self) -> Option<MixingLayout> {
        self.layouts().pop()
    }

    pub fn layout_calls(&self) -> usize {
        self.commands
            .lock()
            .iter()
            .filter(|c| matches!(c, SinkCommand::SetLayout { .. }))
            .count()
    }
}

impl RecordingSink for MemorySink {
    fn start_recording(&self, config: &RecordingConfig) -> StagemixResult<()> {
        self.commands.lock().push(SinkCommand::StartRecording {
            config: config.clone(),
        });
        Ok(())
    }

    fn stop_recording(&self) -> StagemixResult<()> {
        self.commands.lock().push(SinkCommand::StopRecording);
        Ok(())
    }

    fn set_watermarks(&self, watermarks: &[Watermark]) -> StagemixResult<()> {
        self.commands.lock().push(SinkCommand::SetWatermarks {
            watermarks: watermarks.to_vec(),
        });
        Ok(())
    }

    fn set_watermarks_for(
        &self,
        participant_id: &str,
        watermarks: &[Watermark],
    ) -> StagemixResult<()> {
        self.commands.lock().push(SinkCommand::SetWatermarksFor {
            participant_id: participant_id.to_string(),
            watermarks: watermarks.to_vec(),
        });
        Ok(())
    }

    fn set_video_mixing_layout(&self, layout: &MixingLayout) -> StagemixResult<()> {
        self.commands.lock().push(SinkCommand::SetLayout {
            layout: layout.clone(),
        });
        if self.fail_layouts {
            return Err(StagemixError::sink("layout rejected"));
        }
        Ok(())
    }

    fn start_single_recording(
        &self,
        participant_id: &str,
        config: &RecordingConfig,
    ) -> StagemixResult<()> {
        self.commands.lock().push(SinkCommand::StartSingle {
            participant_id: participant_id.to_string(),
            config: config.clone(),
        });
        Ok(())
    }

    fn stop_single_recording(&self, participant_id: &str) -> StagemixResult<()> {
        self.commands.lock().push(SinkCommand::StopSingle {
            participant_id: participant_id.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagemix_layout_model::{Canvas, Rect, WatermarkKind};

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        let layout = MixingLayout::background_only(Canvas::default());
        sink.set_video_mixing_layout(&layout).unwrap();
        sink.stop_single_recording("a").unwrap();
        sink.set_video_mixing_layout(&layout).unwrap();

        assert_eq!(sink.commands().len(), 3);
        assert_eq!(sink.layout_calls(), 2);
        assert_eq!(sink.last_layout(), Some(layout));
        assert!(matches!(
            &sink.commands()[1],
            SinkCommand::StopSingle { participant_id } if participant_id == "a"
        ));
    }

    #[test]
    fn test_failing_sink_still_logs_call() {
        let sink = MemorySink::failing();
        let layout = MixingLayout::background_only(Canvas::default());
        let err = sink.set_video_mixing_layout(&layout).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(sink.layout_calls(), 1);
    }

    #[test]
    fn test_command_serializes_with_tag() {
        let command = SinkCommand::StopSingle {
            participant_id: "bob".to_string(),
        };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["command"], "stop_single");
        assert_eq!(json["participant_id"], "bob");

        let json = serde_json::to_value(SinkCommand::StopRecording).unwrap();
        assert_eq!(json, serde_json::json!({ "command": "stop_recording" }));
    }

    #[test]
    fn test_watermarks_are_recorded_per_target() {
        let sink = MemorySink::new();
        let mark = Watermark::new(
            WatermarkKind::Time {
                font_file_path: "clock.ttf".to_string(),
                font_size: 16,
            },
            Rect::new(0, 0, 120, 24),
            1,
        );
        sink.set_watermarks(std::slice::from_ref(&mark)).unwrap();
        sink.set_watermarks_for("a", &[]).unwrap();

        let commands = sink.commands();
        assert_eq!(
            commands[0],
            SinkCommand::SetWatermarks {
                watermarks: vec![mark]
            }
        );
        assert!(matches!(
            &commands[1],
            SinkCommand::SetWatermarksFor { participant_id, watermarks }
                if participant_id == "a" && watermarks.is_empty()
        ));
    }
}
