// SPDX-License-Identifier: MIT OR Apache-2.0
//! Clip definitions for the timeline.

use crate::track::TrackId;
use crate::transition::Transition;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a clip
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(pub String);

impl ClipId {
    /// Create a new random clip ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClipId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ClipId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of media a clip places on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    /// Video media
    Video,
    /// Audio media
    Audio,
    /// Still image
    Image,
}

impl ClipKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Image => "Image",
        }
    }

    /// Get the clip fill color
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Video => [0xf5, 0x62, 0x42],
            Self::Audio => [0x42, 0xa7, 0xf5],
            Self::Image => [0x42, 0xf5, 0x54],
        }
    }

    /// Guess the kind from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" | "mp3" | "ogg" | "flac" | "m4a" | "aac" => Some(Self::Audio),
            "mp4" | "webm" | "mov" | "mkv" | "avi" => Some(Self::Video),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Opaque locator for the media behind a clip.
///
/// Only the loader collaborator interprets it (file path, URL, asset key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef(pub String);

impl SourceRef {
    /// Create a source reference
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// The raw locator
    pub fn locator(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A clip placed on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,
    /// Track holding this clip
    pub track: TrackId,
    /// Media kind
    pub kind: ClipKind,
    /// Start time in seconds (always >= 0)
    pub start_time: f64,
    /// Duration in seconds (always > 0)
    pub duration: f64,
    /// Display label
    pub label: String,
    /// Transition played at the clip start
    pub transition: Transition,
    /// Media locator
    pub source: SourceRef,
}

impl Clip {
    /// End time (exclusive)
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether the clip is active at `time`, using `[start, end)`
    pub fn is_active_at(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time()
    }
}

/// Data used to create a clip
#[derive(Debug, Clone, PartialEq)]
pub struct ClipData {
    /// Explicit ID; a random one is generated when `None`
    pub id: Option<ClipId>,
    /// Target track
    pub track: TrackId,
    /// Media kind
    pub kind: ClipKind,
    /// Start time in seconds
    pub start_time: f64,
    /// Duration in seconds
    pub duration: f64,
    /// Display label; falls back to the ID when empty
    pub label: String,
    /// Transition
    pub transition: Transition,
    /// Media locator
    pub source: SourceRef,
}

impl ClipData {
    /// Clip data with no label and no transition
    pub fn new(
        track: TrackId,
        kind: ClipKind,
        start_time: f64,
        duration: f64,
        source: SourceRef,
    ) -> Self {
        Self {
            id: None,
            track,
            kind,
            start_time,
            duration,
            label: String::new(),
            transition: Transition::none(),
            source,
        }
    }

    /// Set an explicit ID
    pub fn with_id(mut self, id: impl Into<ClipId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the transition
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(start: f64, duration: f64) -> Clip {
        Clip {
            id: ClipId::from("c"),
            track: TrackId::new(),
            kind: ClipKind::Video,
            start_time: start,
            duration,
            label: "c".into(),
            transition: Transition::none(),
            source: SourceRef::new("c.mp4"),
        }
    }

    #[test]
    fn test_half_open_activity() {
        let c = clip(2.0, 3.0);
        assert!(!c.is_active_at(1.999));
        assert!(c.is_active_at(2.0));
        assert!(c.is_active_at(4.999));
        assert!(!c.is_active_at(5.0));
        assert_eq!(c.end_time(), 5.0);
    }

    #[test]
    fn test_kind_detection() {
        assert_eq!(ClipKind::from_extension("png"), Some(ClipKind::Image));
        assert_eq!(ClipKind::from_extension("txt"), None);
        assert_eq!(ClipKind::from_extension("WAV"), Some(ClipKind::Audio));
        assert_eq!(ClipKind::from_extension("mov"), Some(ClipKind::Video));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ClipId::new(), ClipId::new());
    }
}
