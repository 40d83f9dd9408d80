//! Error types shared across Stagemix crates.

use std::path::PathBuf;

/// Top-level error type for Stagemix operations.
#[derive(Debug, thiserror::Error)]
pub enum StagemixError {
    #[error("Invalid dimension: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("Capacity exceeded: {count} participants, at most {limit} supported")]
    CapacityExceeded { count: usize, limit: usize },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Recording sink error: {message}")]
    Sink { message: String },

    #[error("Event stream error: {message}")]
    Event { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using StagemixError.
pub type StagemixResult<T> = Result<T, StagemixError>;

impl StagemixError {
    pub fn invalid_dimension(width: u32, height: u32) -> Self {
        Self::InvalidDimension { width, height }
    }

    pub fn capacity_exceeded(count: usize, limit: usize) -> Self {
        Self::CapacityExceeded { count, limit }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink {
            message: msg.into(),
        }
    }

    pub fn event(msg: impl Into<String>) -> Self {
        Self::Event {
            message: msg.into(),
        }
    }

    /// Whether this error leaves the previously submitted layout in effect
    /// rather than signalling a broken session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimension { .. } | Self::CapacityExceeded { .. } | Self::Sink { .. }
        )
    }
}
