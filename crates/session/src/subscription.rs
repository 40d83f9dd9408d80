//! Which participants the recorder subscribes to.

use serde::{Deserialize, Serialize};

/// Media the recorder captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    AudioOnly,
    VideoOnly,
    #[default]
    Both,
}

impl StreamType {
    pub fn has_audio(self) -> bool {
        matches!(self, Self::AudioOnly | Self::Both)
    }

    pub fn has_video(self) -> bool {
        matches!(self, Self::VideoOnly | Self::Both)
    }
}

/// Subscription lists applied to join events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionConfig {
    /// Subscribe to every participant's audio.
    pub sub_all_audio: bool,
    /// Audio subscriptions when `sub_all_audio` is off.
    pub audio_users: Vec<String>,
    /// Subscribe to every participant's video.
    pub sub_all_video: bool,
    /// Video subscriptions when `sub_all_video` is off.
    pub video_users: Vec<String>,
    /// Media the recorder captures.
    pub stream_type: StreamType,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            sub_all_audio: true,
            audio_users: Vec::new(),
            sub_all_video: true,
            video_users: Vec::new(),
            stream_type: StreamType::Both,
        }
    }
}

impl SubscriptionConfig {
    pub fn subscribes_audio(&self, id: &str) -> bool {
        self.sub_all_audio || self.audio_users.iter().any(|u| u == id)
    }

    pub fn subscribes_video(&self, id: &str) -> bool {
        self.sub_all_video || self.video_users.iter().any(|u| u == id)
    }

    /// Whether a joining participant should be tracked at all.
    ///
    /// For audio+video recording a participant is admitted when either of
    /// its streams is subscribed.
    pub fn admits(&self, id: &str) -> bool {
        let stream_type = self.stream_type;
        (stream_type.has_audio() && self.subscribes_audio(id))
            || (stream_type.has_video() && self.subscribes_video(id))
    }
}
