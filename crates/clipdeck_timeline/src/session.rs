// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline session: the single owner of editing and playback state.
//!
//! ## Frame loop
//!
//! `play()` asks the [`FrameScheduler`] for a frame. Each [`TimelineSession::tick`]
//! syncs the preview and asks for the next frame, until playback is paused or
//! reaches the end of the last clip. A tick that arrives after pausing is
//! stale and does nothing.

use crate::clip::{ClipData, ClipId, ClipKind, SourceRef};
use crate::clock::{PlaybackClock, TimeSource};
use crate::config::EditorConfig;
use crate::error::Result;
use crate::gesture::{GestureController, ResizeEdge};
use crate::preview::{step_time, FrameStep, PreviewFrame, PreviewSynchronizer, PreviewTarget};
use crate::registry::ClipRegistry;
use crate::scheduler::{schedule_all, AudioDecoder, AudioOutput, ScheduleReport, SourceLoader};
use crate::track::TrackId;
use std::future::Future;

/// Host hook for per-frame callbacks
pub trait FrameScheduler {
    /// Ask for one more call to [`TimelineSession::tick`]
    fn request_frame(&mut self);
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Preview synced to this time; next frame requested
    Continue(f64),
    /// End reached; playback paused at this time
    Finished(f64),
    /// Clock not running; nothing done
    Idle,
}

/// Editing and playback state for one timeline
pub struct TimelineSession<T: TimeSource, F: FrameScheduler> {
    config: EditorConfig,
    registry: ClipRegistry,
    gestures: GestureController,
    clock: PlaybackClock<T>,
    preview: PreviewSynchronizer,
    frames: F,
}

impl<T: TimeSource, F: FrameScheduler> TimelineSession<T, F> {
    /// Create an empty session
    pub fn new(config: EditorConfig, time: T, frames: F) -> Result<Self> {
        config.validate()?;
        let scale = config.scale()?;
        Ok(Self {
            registry: ClipRegistry::with_min_clip_width(config.min_clip_width),
            gestures: GestureController::new(),
            clock: PlaybackClock::new(time),
            preview: PreviewSynchronizer::new(scale),
            frames,
            config,
        })
    }

    /// Configuration in effect
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Clip registry
    pub fn registry(&self) -> &ClipRegistry {
        &self.registry
    }

    /// Playback clock
    pub fn clock(&self) -> &PlaybackClock<T> {
        &self.clock
    }

    /// Gesture slot
    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    /// Frame scheduler
    pub fn frames(&self) -> &F {
        &self.frames
    }

    /// Last time pushed to the preview
    pub fn cursor(&self) -> f64 {
        self.preview.cursor()
    }

    // ---- Editing ----

    /// Add a track at the configured zoom
    pub fn add_track(&mut self, name: impl Into<String>) -> Result<TrackId> {
        Ok(self.registry.add_track(name, self.config.scale()?))
    }

    /// Clip data carrying the configured default transition
    pub fn clip_data(
        &self,
        track: TrackId,
        kind: ClipKind,
        start_time: f64,
        duration: f64,
        source: SourceRef,
    ) -> ClipData {
        ClipData::new(track, kind, start_time, duration, source)
            .with_transition(self.config.default_transition())
    }

    /// Add a clip
    pub fn add_clip(&mut self, data: ClipData) -> Result<ClipId> {
        self.registry.add_clip(data)
    }

    /// Remove a clip, dropping any gesture on it
    pub fn remove_clip(&mut self, clip_id: &ClipId) -> Result<()> {
        if self.gestures.active().is_some_and(|g| g.clip_id() == clip_id) {
            self.gestures.abort();
        }
        self.registry.remove_clip(clip_id).map(|_| ())
    }

    // ---- Gestures ----

    /// Pointer down on a clip body
    pub fn begin_move(&mut self, clip_id: &ClipId, pointer_x: f64) -> Result<()> {
        self.gestures.begin_move(&self.registry, clip_id, pointer_x)
    }

    /// Pointer down on a clip edge
    pub fn begin_resize(&mut self, clip_id: &ClipId, pointer_x: f64, edge: ResizeEdge) -> Result<()> {
        self.gestures
            .begin_resize(&self.registry, clip_id, pointer_x, edge)
    }

    /// Pointer moved; returns the updated `(start, duration)` if a gesture is active
    pub fn pointer_move(&mut self, pointer_x: f64) -> Option<(f64, f64)> {
        self.gestures.pointer_move(&mut self.registry, pointer_x)
    }

    /// Pointer released
    pub fn end_gesture(&mut self) -> Option<ClipId> {
        self.gestures.end()
    }

    /// Gesture cancelled by the host
    pub fn abort_gesture(&mut self) -> Option<ClipId> {
        self.gestures.abort()
    }

    // ---- Playback ----

    /// Start playback from the current playhead
    pub fn play(&mut self) {
        if self.clock.is_running() {
            return;
        }
        self.clock.play();
        tracing::info!(time = self.clock.current_time(), "Playback started");
        self.frames.request_frame();
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.clock.is_running() {
            self.clock.pause();
            tracing::info!(time = self.clock.current_time(), "Playback paused");
        }
    }

    /// Stop and rewind, syncing the preview to zero
    pub fn reset(&mut self, target: &mut impl PreviewTarget) -> PreviewFrame {
        self.clock.reset();
        tracing::info!("Playback reset");
        self.preview.sync_to(&self.registry, target, 0.0)
    }

    /// Move the playhead and sync the preview there
    pub fn seek(&mut self, time: f64, target: &mut impl PreviewTarget) -> Result<PreviewFrame> {
        self.clock.seek(time)?;
        Ok(self
            .preview
            .sync_to(&self.registry, target, self.clock.current_time()))
    }

    /// Step one frame at the configured frame rate
    pub fn step_frame(
        &mut self,
        direction: FrameStep,
        target: &mut impl PreviewTarget,
    ) -> Result<PreviewFrame> {
        let time = step_time(direction, self.clock.current_time(), self.config.frame_rate)?;
        self.seek(time, target)
    }

    /// One frame of playback
    pub fn tick(&mut self, target: &mut impl PreviewTarget) -> Result<TickOutcome> {
        if !self.clock.is_running() {
            return Ok(TickOutcome::Idle);
        }

        let time = self.clock.current_time();
        let end = self.registry.max_end_time();
        if time >= end {
            self.clock.pause();
            self.clock.seek(end)?;
            self.preview.sync_to(&self.registry, target, end);
            tracing::info!(end, "Playback reached the end");
            return Ok(TickOutcome::Finished(end));
        }

        self.preview.sync_to(&self.registry, target, time);
        self.frames.request_frame();
        Ok(TickOutcome::Continue(time))
    }

    /// Schedule every audio clip from the current playhead.
    ///
    /// The registry is read before this returns.
    pub fn schedule_audio<'a, L, D, O>(
        &self,
        loader: &'a L,
        decoder: &'a D,
        output: &'a O,
    ) -> impl Future<Output = ScheduleReport<O::Handle>> + 'a
    where
        L: SourceLoader,
        D: AudioDecoder,
        O: AudioOutput,
    {
        schedule_all(
            &self.registry,
            self.clock.current_time(),
            loader,
            decoder,
            output,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualTimeSource;
    use crate::preview::tests::RecordingTarget;
    use crate::transition::TransitionKind;

    #[derive(Debug, Default)]
    struct CountingFrames(usize);

    impl FrameScheduler for CountingFrames {
        fn request_frame(&mut self) {
            self.0 += 1;
        }
    }

    fn session() -> (TimelineSession<ManualTimeSource, CountingFrames>, ManualTimeSource) {
        let time = ManualTimeSource::new();
        let mut session =
            TimelineSession::new(EditorConfig::default(), time.clone(), CountingFrames::default())
                .unwrap();
        let track = session.add_track("V1").unwrap();
        let a = session.clip_data(track, ClipKind::Video, 0.0, 5.0, SourceRef::new("a"));
        let b = session.clip_data(track, ClipKind::Video, 3.0, 7.0, SourceRef::new("b"));
        session.add_clip(a.with_id("a")).unwrap();
        session.add_clip(b.with_id("b")).unwrap();
        (session, time)
    }

    #[test]
    fn test_playback_auto_pauses_once() {
        let (mut session, time) = session();
        let mut target = RecordingTarget::default();

        session.play();
        assert_eq!(session.frames().0, 1);

        time.advance_secs(4.0);
        assert_eq!(session.tick(&mut target).unwrap(), TickOutcome::Continue(4.0));
        assert_eq!(session.frames().0, 2);
        assert_eq!(target.highlights.last().unwrap().len(), 2);

        time.advance_secs(7.0);
        assert_eq!(session.tick(&mut target).unwrap(), TickOutcome::Finished(10.0));
        assert_eq!(session.frames().0, 2);
        assert!(!session.clock().is_running());
        assert_eq!(session.clock().current_time(), 10.0);
        assert_eq!(target.frames.last().unwrap().time, 10.0);

        // Stale frame after the end
        assert_eq!(session.tick(&mut target).unwrap(), TickOutcome::Idle);
        assert_eq!(session.frames().0, 2);
        assert_eq!(target.frames.len(), 2);
    }

    #[test]
    fn test_pause_makes_ticks_stale() {
        let (mut session, time) = session();
        let mut target = RecordingTarget::default();
        session.play();
        time.advance_secs(1.0);
        session.pause();
        assert_eq!(session.tick(&mut target).unwrap(), TickOutcome::Idle);
        assert!(target.frames.is_empty());

        session.play();
        time.advance_secs(1.0);
        assert_eq!(session.tick(&mut target).unwrap(), TickOutcome::Continue(2.0));
    }

    #[test]
    fn test_reset_syncs_to_zero() {
        let (mut session, time) = session();
        let mut target = RecordingTarget::default();
        session.play();
        time.advance_secs(6.0);
        let frame = session.reset(&mut target);
        assert_eq!(frame.time, 0.0);
        assert_eq!(frame.active, vec![ClipId::from("a")]);
        assert_eq!(session.cursor(), 0.0);
        assert!(!session.clock().is_running());
    }

    #[test]
    fn test_step_frame_moves_playhead() {
        let (mut session, _) = session();
        let mut target = RecordingTarget::default();
        session.seek(1.0, &mut target).unwrap();
        let frame = session.step_frame(FrameStep::Forward, &mut target).unwrap();
        assert!((frame.time - (1.0 + 1.0 / 30.0)).abs() < 1e-12);
        assert_eq!(session.clock().current_time(), frame.time);

        session.seek(0.0, &mut target).unwrap();
        let frame = session.step_frame(FrameStep::Backward, &mut target).unwrap();
        assert_eq!(frame.time, 0.0);
    }

    #[test]
    fn test_gestures_and_default_transition() {
        let (mut session, _) = session();
        let a = ClipId::from("a");
        assert_eq!(
            session.registry().clip(&a).unwrap().transition.kind,
            TransitionKind::Fade
        );

        session.begin_move(&a, 10.0).unwrap();
        assert!(session.begin_resize(&a, 10.0, ResizeEdge::Right).is_err());
        assert_eq!(session.pointer_move(30.0), Some((2.0, 5.0)));
        assert_eq!(session.end_gesture(), Some(a.clone()));
        assert_eq!(session.pointer_move(90.0), None);

        session.begin_resize(&a, 0.0, ResizeEdge::Right).unwrap();
        session.remove_clip(&a).unwrap();
        assert!(!session.gestures().is_active());
    }
}
