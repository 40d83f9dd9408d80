//! Stagemix Common Utilities
//!
//! Shared infrastructure for all Stagemix crates:
//! - Error types and result aliases
//! - Wall-clock helpers for recorded file names
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
