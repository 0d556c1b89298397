// SPDX-License-Identifier: MIT OR Apache-2.0
//! Audio scheduling.
//!
//! Every audio clip goes through load -> decode -> schedule on its own
//! future. The futures are joined without ordering; a failure in one clip is
//! recorded in the [`ScheduleReport`] and never affects its siblings.
//!
//! [`schedule_all`] copies what it needs out of the registry before returning
//! its future, so the registry stays free for gestures while loads are in
//! flight.

use crate::clip::{Clip, ClipId, SourceRef};
use crate::error::ScheduleError;
use crate::registry::ClipRegistry;
use futures::future::join_all;
use std::future::Future;

/// Decoded audio
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleBuffer {
    /// Frames per second
    pub sample_rate: u32,
    /// One sample vector per channel, all the same length
    pub channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Create a buffer
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Build a buffer from interleaved samples
    pub fn from_interleaved(sample_rate: u32, channel_count: u16, samples: &[f32]) -> Self {
        let count = usize::from(channel_count.max(1));
        let mut channels = vec![Vec::with_capacity(samples.len() / count); count];
        for frame in samples.chunks_exact(count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(sample_rate, channels)
    }

    /// Frames per channel
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Length in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// First channel, used for waveform display
    pub fn first_channel(&self) -> &[f32] {
        self.channels.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Samples interleaved frame by frame
    pub fn interleaved(&self) -> Vec<f32> {
        let frames = self.frames();
        let mut out = Vec::with_capacity(frames * self.channels.len());
        for i in 0..frames {
            out.extend(self.channels.iter().map(|c| c.get(i).copied().unwrap_or(0.0)));
        }
        out
    }
}

/// When and how much of a decoded source to play, relative to playback start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onset {
    /// Seconds to wait before starting
    pub delay: f64,
    /// Seconds of the source to skip
    pub skip: f64,
    /// Seconds to play
    pub length: f64,
}

impl Onset {
    /// Onset of `clip` when playback starts at `playhead`.
    ///
    /// Returns `None` when the clip ended at or before the playhead.
    pub fn for_clip(clip: &Clip, playhead: f64) -> Option<Self> {
        if clip.end_time() <= playhead {
            return None;
        }
        let delay = clip.start_time - playhead;
        Some(if delay >= 0.0 {
            Self {
                delay,
                skip: 0.0,
                length: clip.duration,
            }
        } else {
            Self {
                delay: 0.0,
                skip: -delay,
                length: clip.duration + delay,
            }
        })
    }
}

/// Loads raw source bytes
pub trait SourceLoader {
    /// Fetch the bytes behind `source`
    fn load(&self, source: &SourceRef) -> impl Future<Output = Result<Vec<u8>, ScheduleError>>;
}

/// Turns encoded bytes into samples
pub trait AudioDecoder {
    /// Decode a complete encoded asset
    fn decode(&self, bytes: Vec<u8>) -> impl Future<Output = Result<SampleBuffer, ScheduleError>>;
}

/// Plays decoded samples
pub trait AudioOutput {
    /// Whatever keeps a scheduled source alive
    type Handle;

    /// Queue `samples` for playback at `onset`
    fn schedule_source(&self, samples: SampleBuffer, onset: Onset) -> Self::Handle;
}

/// Outcome of one [`schedule_all`] run
#[derive(Debug)]
pub struct ScheduleReport<H> {
    /// Clips handed to the output, with their handles
    pub scheduled: Vec<(ClipId, H)>,
    /// Clips that failed to load or decode
    pub failed: Vec<(ClipId, ScheduleError)>,
    /// Clips that had already ended at the playhead
    pub skipped: Vec<ClipId>,
}

impl<H> Default for ScheduleReport<H> {
    fn default() -> Self {
        Self {
            scheduled: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct PlannedClip {
    clip_id: ClipId,
    source: SourceRef,
    onset: Onset,
}

/// Load and decode one source
pub async fn load_samples<L, D>(
    loader: &L,
    decoder: &D,
    source: &SourceRef,
) -> Result<SampleBuffer, ScheduleError>
where
    L: SourceLoader,
    D: AudioDecoder,
{
    let bytes = loader.load(source).await?;
    decoder.decode(bytes).await
}

/// Schedule every audio clip relative to `playhead`.
///
/// The registry is only read before this returns; the future borrows the
/// collaborators alone.
pub fn schedule_all<'a, L, D, O>(
    registry: &ClipRegistry,
    playhead: f64,
    loader: &'a L,
    decoder: &'a D,
    output: &'a O,
) -> impl Future<Output = ScheduleReport<O::Handle>> + 'a
where
    L: SourceLoader,
    D: AudioDecoder,
    O: AudioOutput,
{
    let mut report = ScheduleReport::default();
    let mut planned = Vec::new();
    for clip in registry.audio_clips() {
        match Onset::for_clip(clip, playhead) {
            Some(onset) => planned.push(PlannedClip {
                clip_id: clip.id.clone(),
                source: clip.source.clone(),
                onset,
            }),
            None => report.skipped.push(clip.id.clone()),
        }
    }

    async move {
        let results = join_all(planned.into_iter().map(move |plan| async move {
            let result = load_samples(loader, decoder, &plan.source)
                .await
                .map(|samples| output.schedule_source(samples, plan.onset));
            (plan, result)
        }))
        .await;

        for (plan, result) in results {
            match result {
                Ok(handle) => {
                    tracing::debug!(
                        clip = %plan.clip_id,
                        delay = plan.onset.delay,
                        skip = plan.onset.skip,
                        "Audio clip scheduled"
                    );
                    report.scheduled.push((plan.clip_id, handle));
                }
                Err(e) => {
                    tracing::warn!(clip = %plan.clip_id, source = %plan.source, "Audio clip failed: {e}");
                    report.failed.push((plan.clip_id, e));
                }
            }
        }

        tracing::info!(
            scheduled = report.scheduled.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            playhead,
            "Audio scheduling finished"
        );
        report
    }
}
