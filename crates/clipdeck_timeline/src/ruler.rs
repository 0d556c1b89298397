// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time ruler layout and timestamp formatting.

use crate::coords::TimeScale;

/// Seconds between major (labelled) ticks by default
pub const DEFAULT_MAJOR_INTERVAL: u32 = 5;

/// Height fraction of a major tick
pub const MAJOR_TICK_HEIGHT: f64 = 0.8;

/// Height fraction of a minor tick
pub const MINOR_TICK_HEIGHT: f64 = 0.5;

/// One tick on the ruler
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Second the tick marks
    pub second: u32,
    /// Horizontal offset in pixels
    pub x: f64,
    /// Tick height in pixels
    pub height: f64,
    /// `mm:ss` label on major ticks
    pub label: Option<String>,
}

impl Tick {
    /// Whether this is a major tick
    pub fn is_major(&self) -> bool {
        self.label.is_some()
    }
}

/// Ruler geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerLayout {
    /// Horizontal scale
    pub scale: TimeScale,
    /// Visible width in pixels
    pub width: f64,
    /// Ruler height in pixels
    pub height: f64,
    /// Timeline length in seconds
    pub duration_seconds: f64,
    /// Seconds between major ticks
    pub major_interval: u32,
}

impl RulerLayout {
    /// Layout with the default major interval
    pub fn new(scale: TimeScale, width: f64, height: f64, duration_seconds: f64) -> Self {
        Self {
            scale,
            width,
            height,
            duration_seconds,
            major_interval: DEFAULT_MAJOR_INTERVAL,
        }
    }

    /// Ticks once per second up to the timeline end, stopping past the visible width
    pub fn ticks(&self) -> Vec<Tick> {
        let last = if self.duration_seconds.is_finite() && self.duration_seconds > 0.0 {
            self.duration_seconds.floor() as u32
        } else {
            0
        };
        let major = self.major_interval.max(1);

        (0..=last)
            .map(|second| (second, self.scale.time_to_offset(f64::from(second))))
            .take_while(|&(_, x)| x <= self.width)
            .map(|(second, x)| {
                if second % major == 0 {
                    Tick {
                        second,
                        x,
                        height: self.height * MAJOR_TICK_HEIGHT,
                        label: Some(format_timestamp(f64::from(second))),
                    }
                } else {
                    Tick {
                        second,
                        x,
                        height: self.height * MINOR_TICK_HEIGHT,
                        label: None,
                    }
                }
            })
            .collect()
    }
}

/// Format seconds as `mm:ss`; negative or non-finite input reads as zero
pub fn format_timestamp(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Format seconds as `mm:ss:ff` at `frame_rate` frames per second
pub fn format_timecode(seconds: f64, frame_rate: f64) -> String {
    let total = whole_seconds(seconds);
    let frame = if frame_rate.is_finite() && frame_rate > 0.0 && seconds.is_finite() {
        (seconds.max(0.0).fract() * frame_rate).floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}:{:02}", total / 60, total % 60, frame)
}

fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    }
}
