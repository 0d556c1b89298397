// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline engine for ClipDeck.
//!
//! This crate provides the core of a non-linear media timeline:
//! - Time/pixel coordinate conversion
//! - Clip and track registry
//! - Move and resize gestures
//! - Playback clock and frame loop
//! - Audio scheduling against the playhead
//! - Waveform envelopes
//! - Preview synchronization
//!
//! ## Architecture
//!
//! The engine is built on:
//! - A [`TimelineSession`] owning all editing and playback state
//! - Narrow traits for the host side ([`RenderSurface`], [`PreviewTarget`],
//!   [`FrameScheduler`], [`SourceLoader`], [`AudioDecoder`], [`AudioOutput`],
//!   [`TimeSource`])
//! - Per-clip futures for loading and decoding audio

pub mod clip;
pub mod clock;
pub mod config;
pub mod coords;
pub mod error;
pub mod gesture;
pub mod preview;
pub mod registry;
pub mod render;
pub mod ruler;
pub mod scheduler;
pub mod session;
pub mod surface;
pub mod track;
pub mod transition;
pub mod waveform;

pub use clip::{Clip, ClipData, ClipId, ClipKind, SourceRef};
pub use clock::{ClockState, ManualTimeSource, PlaybackClock, SystemTimeSource, TimeSource};
pub use config::EditorConfig;
pub use coords::{offset_to_time, time_to_offset, TimeScale};
pub use error::{Result, ScheduleError, TimelineError};
pub use gesture::{Gesture, GestureController, MoveGesture, ResizeEdge, ResizeGesture};
pub use preview::{FrameStep, PreviewFrame, PreviewSynchronizer, PreviewTarget};
pub use registry::ClipRegistry;
pub use render::{
    render_ruler, render_timeline, waveform_columns, ClipGeometry, Region, RenderSurface,
    TimelineLayout, WaveformColumn,
};
pub use ruler::{format_timecode, format_timestamp, RulerLayout, Tick};
pub use scheduler::{
    load_samples, schedule_all, AudioDecoder, AudioOutput, Onset, SampleBuffer, ScheduleReport,
    SourceLoader,
};
pub use session::{FrameScheduler, TickOutcome, TimelineSession};
pub use surface::EguiSurface;
pub use track::{Track, TrackId};
pub use transition::{Transition, TransitionEffect, TransitionKind};
pub use waveform::{summarize, EnvelopePoint, WaveformEnvelope};
