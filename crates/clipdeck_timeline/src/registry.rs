// SPDX-License-Identifier: MIT OR Apache-2.0
//! The clip registry: authoritative store of tracks and clips.

use crate::clip::{Clip, ClipData, ClipId, ClipKind};
use crate::coords::TimeScale;
use crate::error::{Result, TimelineError};
use crate::track::{Track, TrackId};
use indexmap::IndexMap;

/// Default minimum clip width in pixels
pub const DEFAULT_MIN_CLIP_WIDTH: f64 = 20.0;

/// Registry of tracks and the clips placed on them
#[derive(Debug, Clone)]
pub struct ClipRegistry {
    /// Tracks in display order
    tracks: IndexMap<TrackId, Track>,
    /// Clips in insertion order
    clips: IndexMap<ClipId, Clip>,
    /// Narrowest a clip may become on screen, in pixels
    min_clip_width: f64,
}

impl ClipRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::with_min_clip_width(DEFAULT_MIN_CLIP_WIDTH)
    }

    /// Create an empty registry with a custom minimum clip width
    pub fn with_min_clip_width(min_clip_width: f64) -> Self {
        Self {
            tracks: IndexMap::new(),
            clips: IndexMap::new(),
            min_clip_width: min_clip_width.max(0.0),
        }
    }

    /// Minimum clip width in pixels
    pub fn min_clip_width(&self) -> f64 {
        self.min_clip_width
    }

    /// Add a track
    pub fn add_track(&mut self, name: impl Into<String>, scale: TimeScale) -> TrackId {
        let track = Track::new(name, scale);
        let id = track.id;
        self.tracks.insert(id, track);
        id
    }

    /// Get a track
    pub fn track(&self, track_id: TrackId) -> Result<&Track> {
        self.tracks
            .get(&track_id)
            .ok_or(TimelineError::TrackNotFound(track_id))
    }

    /// Get all tracks
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Display row of a track
    pub fn track_index(&self, track_id: TrackId) -> Option<usize> {
        self.tracks.get_index_of(&track_id)
    }

    /// Add a clip.
    ///
    /// Rejects non-positive durations, non-finite times and duplicate IDs.
    /// A negative start is clamped to zero.
    pub fn add_clip(&mut self, data: ClipData) -> Result<ClipId> {
        if !data.duration.is_finite() || data.duration <= 0.0 {
            return Err(TimelineError::InvalidClip(format!(
                "duration must be positive, got {}",
                data.duration
            )));
        }
        if !data.start_time.is_finite() {
            return Err(TimelineError::InvalidClip(format!(
                "start time must be finite, got {}",
                data.start_time
            )));
        }
        let id = data.id.unwrap_or_default();
        if self.clips.contains_key(&id) {
            return Err(TimelineError::InvalidClip(format!("duplicate clip id {id}")));
        }
        let track = self
            .tracks
            .get_mut(&data.track)
            .ok_or(TimelineError::TrackNotFound(data.track))?;
        track.push_clip(id.clone());

        let label = if data.label.is_empty() {
            id.to_string()
        } else {
            data.label
        };
        let clip = Clip {
            id: id.clone(),
            track: data.track,
            kind: data.kind,
            start_time: data.start_time.max(0.0),
            duration: data.duration,
            label,
            transition: data.transition,
            source: data.source,
        };
        tracing::debug!(clip = %id, kind = clip.kind.name(), start = clip.start_time, duration = clip.duration, "Clip added");
        self.clips.insert(id.clone(), clip);
        Ok(id)
    }

    /// Remove a clip
    pub fn remove_clip(&mut self, clip_id: &ClipId) -> Result<Clip> {
        let clip = self
            .clips
            .shift_remove(clip_id)
            .ok_or_else(|| TimelineError::NotFound(clip_id.clone()))?;
        if let Some(track) = self.tracks.get_mut(&clip.track) {
            track.remove_clip(clip_id);
        }
        tracing::debug!(clip = %clip_id, "Clip removed");
        Ok(clip)
    }

    /// Get a clip
    pub fn clip(&self, clip_id: &ClipId) -> Result<&Clip> {
        self.clips
            .get(clip_id)
            .ok_or_else(|| TimelineError::NotFound(clip_id.clone()))
    }

    /// Get all clips in insertion order
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.clips.values()
    }

    /// Get clip count
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Whether no clips are registered
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Scale of the track holding the clip
    pub fn scale_of(&self, clip_id: &ClipId) -> Result<TimeScale> {
        let clip = self.clip(clip_id)?;
        Ok(self.track(clip.track)?.scale)
    }

    /// Shortest duration allowed for the clip on its track
    pub fn min_duration_of(&self, clip_id: &ClipId) -> Result<f64> {
        Ok(self.scale_of(clip_id)?.min_duration(self.min_clip_width))
    }

    /// Move and/or resize a clip.
    ///
    /// The start is clamped to >= 0 and the duration to at least the minimum
    /// clip width on the clip's track. Both fields change together. Non-finite
    /// values are rejected and leave the clip untouched.
    pub fn update_geometry(
        &mut self,
        clip_id: &ClipId,
        new_start: f64,
        new_duration: f64,
    ) -> Result<&Clip> {
        let min_duration = self.min_duration_of(clip_id)?;
        let start = finite_time(new_start)?.max(0.0);
        let new_duration = finite_time(new_duration)?;
        let duration = new_duration.max(min_duration);
        let clip = self
            .clips
            .get_mut(clip_id)
            .ok_or_else(|| TimelineError::NotFound(clip_id.clone()))?;
        clip.start_time = start;
        clip.duration = duration;
        Ok(&*clip)
    }

    /// Shift a clip to a new start, keeping its duration.
    ///
    /// The start is clamped to >= 0. Clips shorter than the minimum width stay
    /// as short as they are.
    pub fn move_clip(&mut self, clip_id: &ClipId, new_start: f64) -> Result<&Clip> {
        let start = finite_time(new_start)?.max(0.0);
        let clip = self
            .clips
            .get_mut(clip_id)
            .ok_or_else(|| TimelineError::NotFound(clip_id.clone()))?;
        clip.start_time = start;
        Ok(&*clip)
    }

    /// Clips active at `time`, in insertion order.
    ///
    /// A clip is active over `[start, start + duration)`.
    pub fn query_at(&self, time: f64) -> Vec<ClipId> {
        self.clips
            .values()
            .filter(|c| c.is_active_at(time))
            .map(|c| c.id.clone())
            .collect()
    }

    /// Latest clip end, or 0 when empty
    pub fn max_end_time(&self) -> f64 {
        self.clips
            .values()
            .map(Clip::end_time)
            .fold(0.0, f64::max)
    }

    /// All audio clips
    pub fn audio_clips(&self) -> impl Iterator<Item = &Clip> {
        self.clips.values().filter(|c| c.kind == ClipKind::Audio)
    }
}

impl Default for ClipRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn finite_time(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TimelineError::InvalidTime(value))
    }
}
