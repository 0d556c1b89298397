// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversion between timeline time (seconds) and horizontal offset (pixels).
//!
//! No snapping or quantization happens here; callers that want grid
//! alignment apply it on top.

use crate::error::{Result, TimelineError};
use serde::{Deserialize, Serialize};

/// Default horizontal zoom (pixels per second)
pub const DEFAULT_PIXELS_PER_SECOND: f64 = 10.0;

/// Convert a time in seconds to a horizontal offset in pixels.
pub fn time_to_offset(time: f64, pixels_per_second: f64) -> Result<f64> {
    Ok(TimeScale::new(pixels_per_second)?.time_to_offset(time))
}

/// Convert a horizontal offset in pixels to a time in seconds.
pub fn offset_to_time(offset: f64, pixels_per_second: f64) -> Result<f64> {
    Ok(TimeScale::new(pixels_per_second)?.offset_to_time(offset))
}

/// A validated pixels-per-second factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TimeScale(f64);

impl TimeScale {
    /// Create a scale, rejecting non-finite or non-positive factors
    pub fn new(pixels_per_second: f64) -> Result<Self> {
        if pixels_per_second.is_finite() && pixels_per_second > 0.0 {
            Ok(Self(pixels_per_second))
        } else {
            Err(TimelineError::InvalidScale(pixels_per_second))
        }
    }

    /// Pixels per second
    pub fn pixels_per_second(&self) -> f64 {
        self.0
    }

    /// Time (seconds) to offset (pixels)
    pub fn time_to_offset(&self, time: f64) -> f64 {
        time * self.0
    }

    /// Offset (pixels) to time (seconds)
    pub fn offset_to_time(&self, offset: f64) -> f64 {
        offset / self.0
    }

    /// Shortest duration that still spans `min_width` pixels
    pub fn min_duration(&self, min_width: f64) -> f64 {
        self.offset_to_time(min_width)
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self(DEFAULT_PIXELS_PER_SECOND)
    }
}

impl TryFrom<f64> for TimeScale {
    type Error = TimelineError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TimeScale> for f64 {
    fn from(scale: TimeScale) -> Self {
        scale.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for pps in [0.5, 1.0, 10.0, 37.5, 480.0] {
            for t in [0.0, 0.001, 1.0, 2.5, 59.99, 3600.0] {
                let x = time_to_offset(t, pps).unwrap();
                let back = offset_to_time(x, pps).unwrap();
                assert!((back - t).abs() <= f64::EPSILON * t.max(1.0) * 4.0, "{t} @ {pps}");
            }
        }
    }

    #[test]
    fn test_rejects_bad_scale() {
        assert_eq!(time_to_offset(1.0, 0.0), Err(TimelineError::InvalidScale(0.0)));
        assert_eq!(offset_to_time(1.0, -3.0), Err(TimelineError::InvalidScale(-3.0)));
        assert!(TimeScale::new(f64::NAN).is_err());
        assert!(TimeScale::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_min_duration() {
        let scale = TimeScale::new(10.0).unwrap();
        assert_eq!(scale.min_duration(20.0), 2.0);
        assert_eq!(scale.time_to_offset(1.5), 15.0);
    }

    #[test]
    fn test_deserialize_validates() {
        let scale: TimeScale = serde_json::from_str("25.0").unwrap();
        assert_eq!(scale.pixels_per_second(), 25.0);
        assert!(serde_json::from_str::<TimeScale>("0.0").is_err());
    }
}
