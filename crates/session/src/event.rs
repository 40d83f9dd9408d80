//! Recorded participant events in JSONL form.
//!
//! One event per line, e.g.
//!
//! ```text
//! {"t":0,"type":"user_joined","uid":"alice"}
//! {"t":412,"type":"first_video_decoded","uid":"alice","width":1280,"height":720}
//! {"t":9000,"type":"user_left","uid":"alice"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use serde::{Deserialize, Serialize};
use stagemix_common::error::{StagemixError, StagemixResult};

use crate::handler::SessionEventHandler;

/// A participant event with its offset from session start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Milliseconds since session start.
    #[serde(rename = "t", default)]
    pub at_ms: u64,
    #[serde(flatten)]
    pub kind: SessionEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEventKind {
    UserJoined { uid: String },
    UserLeft { uid: String },
    FirstVideoDecoded { uid: String, width: u32, height: u32 },
}

impl SessionEvent {
    pub fn joined(at_ms: u64, uid: impl Into<String>) -> Self {
        Self {
            at_ms,
            kind: SessionEventKind::UserJoined { uid: uid.into() },
        }
    }

    pub fn left(at_ms: u64, uid: impl Into<String>) -> Self {
        Self {
            at_ms,
            kind: SessionEventKind::UserLeft { uid: uid.into() },
        }
    }

    pub fn decoded(at_ms: u64, uid: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            at_ms,
            kind: SessionEventKind::FirstVideoDecoded {
                uid: uid.into(),
                width,
                height,
            },
        }
    }

    pub fn uid(&self) -> &str {
        match &self.kind {
            SessionEventKind::UserJoined { uid }
            | SessionEventKind::UserLeft { uid }
            | SessionEventKind::FirstVideoDecoded { uid, .. } => uid,
        }
    }

    /// Feed this event to a session handler.
    pub fn dispatch(&self, handler: &SessionEventHandler) {
        match &self.kind {
            SessionEventKind::UserJoined { uid } => handler.on_user_joined(uid),
            SessionEventKind::UserLeft { uid } => handler.on_user_left(uid),
            SessionEventKind::FirstVideoDecoded { uid, width, height } => {
                handler.on_first_video_decoded(uid, *width, *height)
            }
        }
    }
}

/// Parse a JSONL event stream.
pub fn parse_events(jsonl: &str) -> StagemixResult<Vec<SessionEvent>> {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            serde_json::from_str(line)
                .map_err(|e| StagemixError::event(format!("line {number}: {e}")))
        })
        .collect()
}

/// Serialize events to JSONL.
pub fn serialize_events(events: &[SessionEvent]) -> StagemixResult<String> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
