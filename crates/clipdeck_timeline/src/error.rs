// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the timeline engine.

use crate::clip::ClipId;
use crate::track::TrackId;
use thiserror::Error;

/// Timeline errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    /// Clip data rejected on creation
    #[error("Invalid clip: {0}")]
    InvalidClip(String),

    /// No clip with this ID is registered
    #[error("Clip not found: {0}")]
    NotFound(ClipId),

    /// No track with this ID is registered
    #[error("Track not found: {0:?}")]
    TrackNotFound(TrackId),

    /// Pixels-per-second must be finite and positive
    #[error("Invalid scale: {0} pixels per second")]
    InvalidScale(f64),

    /// Time value is not a finite number
    #[error("Invalid time: {0}")]
    InvalidTime(f64),

    /// Frame rate must be finite and positive
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// A gesture is already in progress
    #[error("A gesture is already active on clip {0}")]
    GestureActive(ClipId),

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Per-clip failure of the audio pipeline.
///
/// These never abort sibling clips; the scheduler collects them into its report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// Source bytes could not be loaded
    #[error("Failed to fetch {source_ref}: {reason}")]
    Fetch {
        /// Locator that failed to load
        source_ref: String,
        /// Loader message
        reason: String,
    },

    /// Bytes could not be decoded into samples
    #[error("Failed to decode audio: {0}")]
    Decode(String),
}
