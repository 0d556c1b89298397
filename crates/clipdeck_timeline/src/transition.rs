// SPDX-License-Identifier: MIT OR Apache-2.0
//! Clip entry transitions.
//!
//! A transition runs over `[start, start + duration)` of its clip. Outside that
//! window the clip is drawn unmodified.

use crate::clip::Clip;
use serde::{Deserialize, Serialize};

/// Default transition length in seconds
pub const DEFAULT_TRANSITION_SECONDS: f64 = 1.0;

/// Horizontal travel of a slide transition, in pixels
pub const SLIDE_DISTANCE_PX: f64 = 50.0;

/// Transition type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// No transition
    #[default]
    None,
    /// Opacity ramps from 0 to 1
    Fade,
    /// Slides in from the left
    Slide,
    /// Width grows from 0 to full
    Wipe,
}

/// Transition settings of a clip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Transition type
    pub kind: TransitionKind,
    /// Length in seconds (>= 0)
    pub duration_seconds: f64,
}

impl Transition {
    /// Create a transition; negative or NaN lengths become 0
    pub fn new(kind: TransitionKind, duration_seconds: f64) -> Self {
        Self {
            kind,
            duration_seconds: duration_seconds.max(0.0),
        }
    }

    /// No transition
    pub fn none() -> Self {
        Self::new(TransitionKind::None, 0.0)
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::none()
    }
}

/// Visual modification applied to a clip while its transition runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionEffect {
    /// Opacity multiplier in [0, 1]
    pub opacity: f64,
    /// Horizontal offset in pixels
    pub offset_x: f64,
    /// Visible fraction of the clip width in [0, 1]
    pub width_fraction: f64,
}

impl TransitionEffect {
    /// No modification
    pub const IDENTITY: Self = Self {
        opacity: 1.0,
        offset_x: 0.0,
        width_fraction: 1.0,
    };

    /// Effect of `kind` at progress `p` in [0, 1]
    pub fn at_progress(kind: TransitionKind, progress: f64) -> Self {
        let p = progress.clamp(0.0, 1.0);
        match kind {
            TransitionKind::None => Self::IDENTITY,
            TransitionKind::Fade => Self { opacity: p, ..Self::IDENTITY },
            TransitionKind::Slide => Self {
                offset_x: -SLIDE_DISTANCE_PX * (1.0 - p),
                ..Self::IDENTITY
            },
            TransitionKind::Wipe => Self { width_fraction: p, ..Self::IDENTITY },
        }
    }
}

/// Progress of the clip's transition at `time`, or `None` outside its window
pub fn progress_at(clip: &Clip, time: f64) -> Option<f64> {
    let transition = clip.transition;
    if transition.kind == TransitionKind::None || transition.duration_seconds <= 0.0 {
        return None;
    }
    let elapsed = time - clip.start_time;
    if elapsed < 0.0 || elapsed >= transition.duration_seconds || !clip.is_active_at(time) {
        return None;
    }
    Some(elapsed / transition.duration_seconds)
}

/// Effect of the clip's transition at `time`
pub fn effect_at(clip: &Clip, time: f64) -> TransitionEffect {
    progress_at(clip, time)
        .map(|p| TransitionEffect::at_progress(clip.transition.kind, p))
        .unwrap_or(TransitionEffect::IDENTITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{ClipId, ClipKind, SourceRef};
    use crate::track::TrackId;

    fn clip_with(transition: Transition) -> Clip {
        Clip {
            id: ClipId::from("t"),
            track: TrackId::new(),
            kind: ClipKind::Image,
            start_time: 4.0,
            duration: 6.0,
            label: "t".into(),
            transition,
            source: SourceRef::new("t.png"),
        }
    }

    #[test]
    fn test_fade_ramps_opacity() {
        let clip = clip_with(Transition::new(TransitionKind::Fade, 2.0));
        assert_eq!(effect_at(&clip, 4.0).opacity, 0.0);
        assert_eq!(effect_at(&clip, 5.0).opacity, 0.5);
        assert_eq!(effect_at(&clip, 6.0), TransitionEffect::IDENTITY);
        assert_eq!(effect_at(&clip, 3.0), TransitionEffect::IDENTITY);
    }

    #[test]
    fn test_slide_and_wipe() {
        let slide = clip_with(Transition::new(TransitionKind::Slide, 1.0));
        assert_eq!(effect_at(&slide, 4.0).offset_x, -SLIDE_DISTANCE_PX);
        assert_eq!(effect_at(&slide, 4.5).offset_x, -25.0);

        let wipe = clip_with(Transition::new(TransitionKind::Wipe, 1.0));
        assert_eq!(effect_at(&wipe, 4.25).width_fraction, 0.25);
    }

    #[test]
    fn test_none_and_zero_length() {
        let none = clip_with(Transition::new(TransitionKind::None, DEFAULT_TRANSITION_SECONDS));
        assert_eq!(progress_at(&none, 4.5), None);
        let zero = clip_with(Transition::new(TransitionKind::Fade, -1.0));
        assert_eq!(zero.transition.duration_seconds, 0.0);
        assert_eq!(progress_at(&zero, 4.0), None);
    }
}
