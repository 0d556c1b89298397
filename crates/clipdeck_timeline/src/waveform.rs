// SPDX-License-Identifier: MIT OR Apache-2.0
//! Waveform envelopes for audio clip visualization.
//!
//! Samples are reduced to one `(min, max)` pair per output column. The result
//! is computed once per decoded asset and is immutable afterwards.

use serde::{Deserialize, Serialize};

/// Min/max amplitude of one column, both in `[-1, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePoint {
    /// Lowest sample in the column
    pub min: f32,
    /// Highest sample in the column
    pub max: f32,
}

impl EnvelopePoint {
    /// Silent column
    pub const SILENT: Self = Self { min: 0.0, max: 0.0 };
}

/// Per-column amplitude envelope of an audio asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveformEnvelope {
    points: Vec<EnvelopePoint>,
}

impl WaveformEnvelope {
    /// Column values in order
    pub fn points(&self) -> &[EnvelopePoint] {
        &self.points
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no columns
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Vertical line `(y_min, y_max)` per column for a canvas `height` pixels tall.
    ///
    /// `+1` maps to the top edge and `-1` to the bottom.
    pub fn column_lines(&self, height: f32) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.points
            .iter()
            .map(move |p| (amplitude_to_y(p.min, height), amplitude_to_y(p.max, height)))
    }
}

/// Vertical pixel position of an amplitude on a canvas `height` pixels tall
pub fn amplitude_to_y(value: f32, height: f32) -> f32 {
    (1.0 - (value + 1.0) / 2.0) * height
}

/// Summarize `samples` into `columns` min/max pairs.
///
/// Column `i` covers `[i * step, i * step + step)` with
/// `step = samples.len() / columns`. When there are more columns than samples
/// each column takes the single sample at `i * len / columns`. Samples are
/// clamped to `[-1, 1]` first.
pub fn summarize(samples: &[f32], columns: usize) -> WaveformEnvelope {
    if columns == 0 {
        return WaveformEnvelope::default();
    }
    if samples.is_empty() {
        return WaveformEnvelope {
            points: vec![EnvelopePoint::SILENT; columns],
        };
    }

    let len = samples.len();
    let step = len / columns;
    let points = if step == 0 {
        (0..columns)
            .map(|i| {
                let v = clamp_sample(samples[i * len / columns]);
                EnvelopePoint { min: v, max: v }
            })
            .collect()
    } else {
        samples
            .chunks_exact(step)
            .take(columns)
            .map(|chunk| {
                chunk.iter().fold(EnvelopePoint { min: 1.0, max: -1.0 }, |acc, &s| {
                    let s = clamp_sample(s);
                    EnvelopePoint {
                        min: acc.min.min(s),
                        max: acc.max.max(s),
                    }
                })
            })
            .collect()
    };
    WaveformEnvelope { points }
}

/// Limit a decoded sample to `[-1, 1]`; NaN reads as silence
fn clamp_sample(sample: f32) -> f32 {
    if sample.is_nan() {
        0.0
    } else {
        sample.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_signal() {
        let envelope = summarize(&[1.0; 1000], 10);
        assert_eq!(envelope.len(), 10);
        assert!(envelope
            .points()
            .iter()
            .all(|p| *p == EnvelopePoint { min: 1.0, max: 1.0 }));
    }

    #[test]
    fn test_out_of_range_samples_clamped() {
        let envelope = summarize(&[1.5; 100], 4);
        assert!(envelope
            .points()
            .iter()
            .all(|p| *p == EnvelopePoint { min: 1.0, max: 1.0 }));

        let envelope = summarize(&[-3.0, 2.0, f32::NAN, 0.25], 2);
        assert_eq!(
            envelope.points(),
            &[
                EnvelopePoint { min: -1.0, max: 1.0 },
                EnvelopePoint { min: 0.0, max: 0.25 },
            ]
        );

        // One sample per column
        let envelope = summarize(&[-2.0], 3);
        assert!(envelope.points().iter().all(|p| p.min == -1.0 && p.max == -1.0));
    }

    #[test]
    fn test_min_max_per_column() {
        let samples = [0.5, -0.25, 0.1, 0.9, -1.0, 0.0, 0.3];
        let envelope = summarize(&samples, 3);
        assert_eq!(
            envelope.points(),
            &[
                EnvelopePoint { min: -0.25, max: 0.5 },
                EnvelopePoint { min: 0.1, max: 0.9 },
                EnvelopePoint { min: -1.0, max: 0.0 },
            ]
        );
    }

    #[test]
    fn test_more_columns_than_samples() {
        let envelope = summarize(&[0.2, -0.4], 4);
        let mins: Vec<f32> = envelope.points().iter().map(|p| p.min).collect();
        assert_eq!(mins, vec![0.2, 0.2, -0.4, -0.4]);
        assert!(envelope.points().iter().all(|p| p.min == p.max));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(summarize(&[0.5; 8], 0).is_empty());
        let silent = summarize(&[], 5);
        assert_eq!(silent.points(), &[EnvelopePoint::SILENT; 5]);
    }

    #[test]
    fn test_vertical_mapping() {
        assert_eq!(amplitude_to_y(1.0, 100.0), 0.0);
        assert_eq!(amplitude_to_y(-1.0, 100.0), 100.0);
        assert_eq!(amplitude_to_y(0.0, 100.0), 50.0);
        let envelope = summarize(&[-1.0, 1.0], 1);
        assert_eq!(envelope.column_lines(40.0).collect::<Vec<_>>(), vec![(40.0, 0.0)]);
    }
}
