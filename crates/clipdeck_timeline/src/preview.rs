// SPDX-License-Identifier: MIT OR Apache-2.0
//! Preview synchronization.
//!
//! Pushes a timeline time to the preview collaborator and highlights the
//! clips active at that time.

use crate::clip::ClipId;
use crate::coords::TimeScale;
use crate::error::{Result, TimelineError};
use crate::registry::ClipRegistry;
use crate::ruler::format_timestamp;

/// Receiver of preview updates
pub trait PreviewTarget {
    /// Mark the clips active at the current time
    fn highlight_clips(&mut self, active: &[ClipId]);

    /// Show the preview for a time
    fn update_preview(&mut self, frame: &PreviewFrame);
}

/// What the preview shows for one time
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFrame {
    /// Timeline time in seconds
    pub time: f64,
    /// Playback cursor offset in pixels
    pub cursor_offset: f64,
    /// Clips active at `time`
    pub active: Vec<ClipId>,
    /// `mm:ss` label
    pub label: String,
}

/// Frame step direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    /// One frame later
    Forward,
    /// One frame earlier
    Backward,
}

/// Time one frame away from `current`, clamped at zero
pub fn step_time(direction: FrameStep, current: f64, frame_rate: f64) -> Result<f64> {
    if !frame_rate.is_finite() || frame_rate <= 0.0 {
        return Err(TimelineError::InvalidFrameRate(frame_rate));
    }
    if !current.is_finite() {
        return Err(TimelineError::InvalidTime(current));
    }
    let frame = 1.0 / frame_rate;
    let next = match direction {
        FrameStep::Forward => current + frame,
        FrameStep::Backward => current - frame,
    };
    Ok(next.max(0.0))
}

/// Keeps the preview and clip highlighting in step with a time
#[derive(Debug, Clone, Default)]
pub struct PreviewSynchronizer {
    scale: TimeScale,
    cursor: f64,
}

impl PreviewSynchronizer {
    /// Create a synchronizer drawing the cursor at `scale`
    pub fn new(scale: TimeScale) -> Self {
        Self { scale, cursor: 0.0 }
    }

    /// Last synced time
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Highlight the clips active at `time`, then update the preview
    pub fn sync_to(
        &mut self,
        registry: &ClipRegistry,
        target: &mut impl PreviewTarget,
        time: f64,
    ) -> PreviewFrame {
        let active = registry.query_at(time);
        target.highlight_clips(&active);

        let frame = PreviewFrame {
            time,
            cursor_offset: self.scale.time_to_offset(time),
            active,
            label: format_timestamp(time),
        };
        target.update_preview(&frame);
        self.cursor = time;
        frame
    }

    /// Move one frame from `current` and sync to the result
    pub fn step_frame(
        &mut self,
        registry: &ClipRegistry,
        target: &mut impl PreviewTarget,
        direction: FrameStep,
        current: f64,
        frame_rate: f64,
    ) -> Result<PreviewFrame> {
        let time = step_time(direction, current, frame_rate)?;
        Ok(self.sync_to(registry, target, time))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clip::{ClipData, ClipKind, SourceRef};

    /// Records every call it receives
    #[derive(Debug, Default)]
    pub(crate) struct RecordingTarget {
        pub highlights: Vec<Vec<ClipId>>,
        pub frames: Vec<PreviewFrame>,
    }

    impl PreviewTarget for RecordingTarget {
        fn highlight_clips(&mut self, active: &[ClipId]) {
            self.highlights.push(active.to_vec());
        }

        fn update_preview(&mut self, frame: &PreviewFrame) {
            self.frames.push(frame.clone());
        }
    }

    fn registry() -> ClipRegistry {
        let mut registry = ClipRegistry::new();
        let track = registry.add_track("V1", TimeScale::default());
        registry
            .add_clip(ClipData::new(track, ClipKind::Video, 2.0, 3.0, SourceRef::new("a")).with_id("a"))
            .unwrap();
        registry
            .add_clip(ClipData::new(track, ClipKind::Image, 4.0, 2.0, SourceRef::new("b")).with_id("b"))
            .unwrap();
        registry
    }

    #[test]
    fn test_sync_highlights_then_updates() {
        let registry = registry();
        let mut sync = PreviewSynchronizer::new(TimeScale::default());
        let mut target = RecordingTarget::default();

        let frame = sync.sync_to(&registry, &mut target, 4.5);
        assert_eq!(frame.active, vec![ClipId::from("a"), ClipId::from("b")]);
        assert_eq!(frame.cursor_offset, 45.0);
        assert_eq!(frame.label, "00:04");
        assert_eq!(target.highlights, vec![frame.active.clone()]);
        assert_eq!(target.frames, vec![frame]);
        assert_eq!(sync.cursor(), 4.5);

        sync.sync_to(&registry, &mut target, 5.0);
        assert_eq!(target.highlights[1], vec![ClipId::from("b")]);
    }

    #[test]
    fn test_step_frame() {
        let registry = registry();
        let mut sync = PreviewSynchronizer::new(TimeScale::default());
        let mut target = RecordingTarget::default();

        let frame = sync
            .step_frame(&registry, &mut target, FrameStep::Forward, 1.0, 4.0)
            .unwrap();
        assert_eq!(frame.time, 1.25);

        let frame = sync
            .step_frame(&registry, &mut target, FrameStep::Backward, 0.01, 30.0)
            .unwrap();
        assert_eq!(frame.time, 0.0);
    }

    #[test]
    fn test_step_rejects_bad_frame_rate() {
        assert_eq!(
            step_time(FrameStep::Forward, 1.0, 0.0),
            Err(TimelineError::InvalidFrameRate(0.0))
        );
        assert_eq!(
            step_time(FrameStep::Backward, 1.0, -24.0),
            Err(TimelineError::InvalidFrameRate(-24.0))
        );
    }
}
