//! Participant identity and source resolution.

use serde::{Deserialize, Serialize};

/// Opaque participant identifier, unique within a session.
pub type ParticipantId = String;

/// Source video resolution as reported by the first decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are non-zero.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Resolution {
    type Err = String;

    /// Parse `WIDTHxHEIGHT`, e.g. `1280x720`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
        let width = w
            .trim()
            .parse()
            .map_err(|e| format!("invalid width {w:?}: {e}"))?;
        let height = h
            .trim()
            .parse()
            .map_err(|e| format!("invalid height {h:?}: {e}"))?;
        Ok(Self { width, height })
    }
}

/// A session member as seen by the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Absent until the first video frame has been decoded.
    pub resolution: Option<Resolution>,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>) -> Self {
        Self {
            id: id.into(),
            resolution: None,
        }
    }

    pub fn with_resolution(id: impl Into<ParticipantId>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            resolution: Some(Resolution::new(width, height)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_parse() {
        assert_eq!(
            "1280x720".parse::<Resolution>().unwrap(),
            Resolution::new(1280, 720)
        );
        assert_eq!(
            "640X480".parse::<Resolution>().unwrap(),
            Resolution::new(640, 480)
        );
        assert!("1280".parse::<Resolution>().is_err());
        assert!("axb".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::new(1920, 1080).to_string(), "1920x1080");
    }

    #[test]
    fn test_participant_starts_without_resolution() {
        assert_eq!(Participant::new("a").resolution, None);
        assert_eq!(
            Participant::with_resolution("a", 640, 360).resolution,
            Some(Resolution::new(640, 360))
        );
    }
}
