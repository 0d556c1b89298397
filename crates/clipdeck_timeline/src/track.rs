// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track definitions for the timeline.

use crate::clip::ClipId;
use crate::coords::TimeScale;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// A track on the timeline.
///
/// Clips on a track share its scale. They may overlap; ordering is the order
/// in which they were placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: TrackId,
    /// Track name
    pub name: String,
    /// Horizontal scale shared by all clips on this track
    pub scale: TimeScale,
    /// Clips on this track
    clips: Vec<ClipId>,
}

impl Track {
    /// Create a new empty track
    pub fn new(name: impl Into<String>, scale: TimeScale) -> Self {
        Self {
            id: TrackId::new(),
            name: name.into(),
            scale,
            clips: Vec::new(),
        }
    }

    /// Clip IDs in placement order
    pub fn clip_ids(&self) -> &[ClipId] {
        &self.clips
    }

    /// Get clip count
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Whether the clip sits on this track
    pub fn contains(&self, clip_id: &ClipId) -> bool {
        self.clips.contains(clip_id)
    }

    pub(crate) fn push_clip(&mut self, clip_id: ClipId) {
        self.clips.push(clip_id);
    }

    pub(crate) fn remove_clip(&mut self, clip_id: &ClipId) {
        self.clips.retain(|c| c != clip_id);
    }
}
