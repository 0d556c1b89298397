// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback clock.
//!
//! The clock is a two-state machine over a monotonic [`TimeSource`]. While
//! stopped, `accumulated` is the playhead; while running, the playhead is
//! `accumulated + (now - origin)`.

use crate::error::{Result, TimelineError};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time reading
pub trait TimeSource {
    /// Time elapsed since an arbitrary fixed epoch
    fn now(&self) -> Duration;
}

/// Wall-clock time source backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    epoch: Instant,
}

impl SystemTimeSource {
    /// Start measuring from now
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Hand-driven time source.
///
/// Clones share the same reading, so a driver can keep one handle and pass
/// another to the clock.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<Duration>>,
}

impl ManualTimeSource {
    /// Start at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Move time forward by fractional seconds
    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs.max(0.0)));
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Clock state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockState {
    /// Paused at `accumulated` seconds
    Stopped {
        /// Playhead in seconds
        accumulated: f64,
    },
    /// Playing since `origin`
    Running {
        /// Playhead in seconds at the moment playback started
        accumulated: f64,
        /// Time source reading when playback started
        origin: Duration,
    },
}

impl Default for ClockState {
    fn default() -> Self {
        Self::Stopped { accumulated: 0.0 }
    }
}

/// Play/pause/seek clock over a [`TimeSource`]
#[derive(Debug)]
pub struct PlaybackClock<T: TimeSource> {
    source: T,
    state: ClockState,
}

impl<T: TimeSource> PlaybackClock<T> {
    /// Create a stopped clock at zero
    pub fn new(source: T) -> Self {
        Self {
            source,
            state: ClockState::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Whether the clock is running
    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    /// The time source
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Start running from the current playhead; no-op when already running
    pub fn play(&mut self) {
        if let ClockState::Stopped { accumulated } = self.state {
            self.state = ClockState::Running {
                accumulated,
                origin: self.source.now(),
            };
        }
    }

    /// Freeze the playhead; no-op when already stopped
    pub fn pause(&mut self) {
        if self.is_running() {
            self.state = ClockState::Stopped {
                accumulated: self.current_time(),
            };
        }
    }

    /// Stop and rewind to zero
    pub fn reset(&mut self) {
        self.state = ClockState::default();
    }

    /// Move the playhead, keeping the running/stopped state.
    ///
    /// Negative times clamp to zero.
    pub fn seek(&mut self, time: f64) -> Result<()> {
        if !time.is_finite() {
            return Err(TimelineError::InvalidTime(time));
        }
        let accumulated = time.max(0.0);
        self.state = match self.state {
            ClockState::Stopped { .. } => ClockState::Stopped { accumulated },
            ClockState::Running { .. } => ClockState::Running {
                accumulated,
                origin: self.source.now(),
            },
        };
        Ok(())
    }

    /// Playhead in seconds
    pub fn current_time(&self) -> f64 {
        match self.state {
            ClockState::Stopped { accumulated } => accumulated,
            ClockState::Running {
                accumulated,
                origin,
            } => accumulated + self.source.now().saturating_sub(origin).as_secs_f64(),
        }
    }
}
