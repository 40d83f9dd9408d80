//! Wall-clock helpers for naming recorded files and timing sessions.

use std::time::Instant;

use chrono::{DateTime, Local, TimeZone};

/// Format used to stamp individually recorded files.
pub const FILE_STAMP_FORMAT: &str = "%Y_%m_%d_%H:%M:%S";

/// Stamp for a file created now, in local time.
pub fn file_stamp() -> String {
    file_stamp_at(&Local::now())
}

/// Stamp for a file created at `at`.
pub fn file_stamp_at<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(FILE_STAMP_FORMAT).to_string()
}

/// Monotonic session clock anchored at the moment the session started.
#[derive(Debug, Clone)]
pub struct SessionClock {
    epoch: Instant,
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since session start.
    pub fn elapsed_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Wall-clock time at session start (RFC 3339).
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_file_stamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(file_stamp_at(&at), "2024_03_07_09:05:02");
    }

    #[test]
    fn test_session_clock_elapsed() {
        let clock = SessionClock::start();
        assert!(clock.elapsed_ms() < 1_000);
        assert!(!clock.epoch_wall().is_empty());
    }
}
