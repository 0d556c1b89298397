// SPDX-License-Identifier: MIT OR Apache-2.0
//! Audio decoding and output for the preview.
//!
//! This module provides:
//! - `MediaDecoder`, turning encoded files into sample buffers
//! - `Speaker`, queueing decoded clips on the default output device
//!
//! When the "audio" feature is not enabled, a stub implementation is provided
//! that logs warnings but does not decode or play audio.

use clipdeck_timeline::{AudioDecoder, AudioOutput, Onset, SampleBuffer, ScheduleError};
use std::future::Future;

// ============================================================================
// Audio Engine Implementation (with rodio)
// ============================================================================

#[cfg(feature = "audio")]
mod engine {
    use super::*;
    use rodio::buffer::SamplesBuffer;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
    use std::io::Cursor;
    use std::time::Duration;

    fn decode_bytes(bytes: Vec<u8>) -> Result<SampleBuffer, ScheduleError> {
        let decoder =
            Decoder::new(Cursor::new(bytes)).map_err(|e| ScheduleError::Decode(e.to_string()))?;
        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<f32> = decoder.convert_samples().collect();
        Ok(SampleBuffer::from_interleaved(sample_rate, channels, &samples))
    }

    /// Decodes with rodio on the blocking pool
    #[derive(Debug, Default)]
    pub struct MediaDecoder;

    impl MediaDecoder {
        /// Create a decoder
        pub fn new() -> Self {
            Self
        }
    }

    impl AudioDecoder for MediaDecoder {
        fn decode(&self, bytes: Vec<u8>) -> impl Future<Output = Result<SampleBuffer, ScheduleError>> {
            async move {
                tokio::task::spawn_blocking(move || decode_bytes(bytes))
                    .await
                    .map_err(|e| ScheduleError::Decode(e.to_string()))?
            }
        }
    }

    /// Plays scheduled clips on the default output device
    pub struct Speaker {
        /// Output stream (must be kept alive)
        _stream: Option<OutputStream>,
        /// Stream handle for creating sinks
        stream_handle: Option<OutputStreamHandle>,
        /// Linear gain applied to every sink
        volume: f32,
    }

    impl Speaker {
        /// Open the default output device; audio is disabled if that fails
        pub fn new(volume: f32) -> Self {
            let (stream, stream_handle) = match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    tracing::info!("Audio output initialized");
                    (Some(stream), Some(handle))
                }
                Err(e) => {
                    tracing::warn!("Failed to initialize audio: {}. Audio will be disabled.", e);
                    (None, None)
                }
            };
            Self {
                _stream: stream,
                stream_handle,
                volume: volume.clamp(0.0, 1.0),
            }
        }

        /// Check if an output device is open
        pub fn is_available(&self) -> bool {
            self.stream_handle.is_some()
        }
    }

    impl AudioOutput for Speaker {
        /// The sink playing the clip; dropping it stops playback
        type Handle = Option<Sink>;

        fn schedule_source(&self, samples: SampleBuffer, onset: Onset) -> Option<Sink> {
            let stream_handle = self.stream_handle.as_ref()?;
            let channels = u16::try_from(samples.channels.len()).unwrap_or(0);
            if channels == 0 || samples.sample_rate == 0 {
                tracing::warn!("Refusing to play an empty sample buffer");
                return None;
            }

            let sink = match Sink::try_new(stream_handle) {
                Ok(sink) => sink,
                Err(e) => {
                    tracing::warn!("Failed to create audio sink: {}", e);
                    return None;
                }
            };

            let source = SamplesBuffer::new(channels, samples.sample_rate, samples.interleaved())
                .skip_duration(Duration::from_secs_f64(onset.skip.max(0.0)))
                .take_duration(Duration::from_secs_f64(onset.length.max(0.0)))
                .delay(Duration::from_secs_f64(onset.delay.max(0.0)));
            sink.set_volume(self.volume);
            sink.append(source);
            Some(sink)
        }
    }
}

// ============================================================================
// Stub Audio Engine Implementation (without rodio)
// ============================================================================

#[cfg(not(feature = "audio"))]
mod engine {
    use super::*;
    use std::cell::Cell;

    /// Decoder stub (no audio support)
    #[derive(Debug, Default)]
    pub struct MediaDecoder {
        /// Log warning once
        warned: Cell<bool>,
    }

    impl MediaDecoder {
        /// Create a decoder
        pub fn new() -> Self {
            tracing::info!("Audio decoder: stub implementation (audio feature not enabled)");
            Self::default()
        }
    }

    impl AudioDecoder for MediaDecoder {
        fn decode(&self, _bytes: Vec<u8>) -> impl Future<Output = Result<SampleBuffer, ScheduleError>> {
            if !self.warned.replace(true) {
                tracing::warn!("Audio decoding not available: compile with --features audio");
            }
            std::future::ready(Err(ScheduleError::Decode(
                "audio feature not enabled".to_string(),
            )))
        }
    }

    /// Output stub: logs what would have been played
    #[derive(Debug, Default)]
    pub struct Speaker;

    impl Speaker {
        /// Create the stub output
        pub fn new(_volume: f32) -> Self {
            Self
        }

        /// Check if an output device is open
        pub fn is_available(&self) -> bool {
            false
        }
    }

    impl AudioOutput for Speaker {
        type Handle = ();

        fn schedule_source(&self, samples: SampleBuffer, onset: Onset) {
            tracing::debug!(
                frames = samples.frames(),
                delay = onset.delay,
                skip = onset.skip,
                length = onset.length,
                "Audio output stub: source not played"
            );
        }
    }
}

// Re-export from the appropriate module
pub use engine::{MediaDecoder, Speaker};
