//! Per-session configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stagemix_common::config::RecordingDefaults;
use stagemix_common::error::{StagemixError, StagemixResult};
use stagemix_layout_model::{
    CapacityPolicy, Canvas, LayoutMode, ParticipantId, Rotation, Watermark,
};

use crate::subscription::SubscriptionConfig;

/// Everything a recording session needs to know up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub canvas: Canvas,
    pub layout_mode: LayoutMode,
    /// Participant shown large in vertical presentation mode.
    pub featured_participant: Option<ParticipantId>,
    /// Clockwise rotation applied to a participant's region.
    pub rotations: HashMap<ParticipantId, Rotation>,
    pub capacity_policy: CapacityPolicy,
    /// Mix everyone onto one canvas; when `false` each participant is
    /// recorded individually.
    pub mix: bool,
    pub subscription: SubscriptionConfig,
    pub recorder: RecorderOutput,
    /// Overlays drawn on every recording this session starts.
    #[serde(alias = "waterMark")]
    pub watermarks: Vec<Watermark>,
}

/// Where and how the recorder writes its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderOutput {
    pub path: PathBuf,
    pub max_duration_secs: u32,
    pub audio_sample_rate: u32,
    pub audio_channels: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_defaults(&RecordingDefaults::default())
    }
}

impl Default for RecorderOutput {
    fn default() -> Self {
        let defaults = RecordingDefaults::default();
        Self {
            path: defaults.recorder_path,
            max_duration_secs: defaults.max_duration_secs,
            audio_sample_rate: defaults.audio_sample_rate,
            audio_channels: defaults.audio_channels,
        }
    }
}

impl SessionConfig {
    /// Session config seeded from the application-wide recording defaults.
    pub fn from_defaults(defaults: &RecordingDefaults) -> Self {
        Self {
            canvas: Canvas::new(defaults.canvas_width, defaults.canvas_height, defaults.fps),
            layout_mode: LayoutMode::default(),
            featured_participant: None,
            rotations: HashMap::new(),
            capacity_policy: CapacityPolicy::default(),
            mix: true,
            subscription: SubscriptionConfig::default(),
            recorder: RecorderOutput {
                path: defaults.recorder_path.clone(),
                max_duration_secs: defaults.max_duration_secs,
                audio_sample_rate: defaults.audio_sample_rate,
                audio_channels: defaults.audio_channels,
            },
            watermarks: Vec::new(),
        }
    }

    /// Load and validate a session config from a JSON file.
    pub fn from_path(path: &Path) -> StagemixResult<Self> {
        if !path.exists() {
            return Err(StagemixError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> StagemixResult<()> {
        if !self.canvas.is_valid() {
            return Err(StagemixError::config(format!(
                "canvas must have non-zero size and fps, got {}x{}@{}",
                self.canvas.width, self.canvas.height, self.canvas.fps
            )));
        }
        if self.layout_mode.uses_featured()
            && self.featured_participant.as_deref().map_or(true, str::is_empty)
        {
            tracing::warn!(
                mode = %self.layout_mode,
                "No featured participant configured, featured slot will stay empty"
            );
        }
        for (index, watermark) in self.watermarks.iter().enumerate() {
            if !watermark.fits(&self.canvas) {
                let rect = watermark.rect();
                return Err(StagemixError::config(format!(
                    "watermark {} at {}x{}+{}+{} does not fit the {}x{} canvas",
                    index + 1,
                    rect.width,
                    rect.height,
                    rect.x,
                    rect.y,
                    self.canvas.width,
                    self.canvas.height
                )));
            }
        }
        if self.recorder.path.as_os_str().is_empty() {
            return Err(StagemixError::config("recorder.path is required"));
        }
        if self.recorder.audio_sample_rate == 0 || self.recorder.audio_channels == 0 {
            return Err(StagemixError::config(
                "recorder audio settings must be non-zero",
            ));
        }
        Ok(())
    }
}
