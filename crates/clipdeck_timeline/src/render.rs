// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline render layout.
//!
//! Computes where and how each clip is drawn and hands the result to a
//! [`RenderSurface`]. Nothing here knows about a concrete graphics backend.

use crate::clip::{Clip, ClipId};
use crate::coords::TimeScale;
use crate::registry::ClipRegistry;
use crate::ruler::RulerLayout;
use crate::transition::effect_at;
use crate::waveform::WaveformEnvelope;
use std::collections::HashMap;

/// Default height of one track row in pixels
pub const DEFAULT_TRACK_HEIGHT: f64 = 50.0;

/// Default height of the time ruler in pixels
pub const DEFAULT_RULER_HEIGHT: f64 = 30.0;

/// Axis-aligned area in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Region {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// Where and how a clip is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipGeometry {
    /// Left edge in pixels, including any slide offset
    pub left: f64,
    /// Visible width in pixels, after any wipe
    pub width: f64,
    /// Top edge in pixels
    pub top: f64,
    /// Row height in pixels
    pub height: f64,
    /// Opacity in [0, 1]
    pub opacity: f64,
    /// Whether the clip is under the playback cursor
    pub active: bool,
}

/// One vertical waveform line in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformColumn {
    /// Horizontal position
    pub x: f64,
    /// Upper end, from the column's peak
    pub top: f64,
    /// Lower end, from the column's trough
    pub bottom: f64,
}

/// Backend that draws the timeline
pub trait RenderSurface {
    /// Erase a region
    fn clear(&mut self, region: Region);

    /// Draw one clip as a filled box with a label
    fn draw_clip(&mut self, geometry: &ClipGeometry, color: [u8; 3], label: &str);

    /// Draw an audio waveform over a clip already drawn with `geometry`
    fn draw_waveform(&mut self, geometry: &ClipGeometry, columns: &[WaveformColumn]);

    /// Draw one ruler tick; major ticks carry a label
    fn draw_tick(&mut self, x: f64, height: f64, label: Option<&str>);
}

/// Row layout of the timeline view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineLayout {
    /// Height of one track row
    pub track_height: f64,
    /// Space above the first track, taken by the ruler
    pub ruler_height: f64,
    /// Visible width
    pub width: f64,
}

impl Default for TimelineLayout {
    fn default() -> Self {
        Self {
            track_height: DEFAULT_TRACK_HEIGHT,
            ruler_height: DEFAULT_RULER_HEIGHT,
            width: 800.0,
        }
    }
}

impl TimelineLayout {
    /// Full drawing area for `tracks` rows
    pub fn bounds(&self, tracks: usize) -> Region {
        Region {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.ruler_height + self.track_height * tracks as f64,
        }
    }

    /// Geometry of `clip` in row `track_index` at playback time `time`
    pub fn clip_geometry(
        &self,
        clip: &Clip,
        scale: TimeScale,
        track_index: usize,
        time: f64,
    ) -> ClipGeometry {
        let effect = effect_at(clip, time);
        ClipGeometry {
            left: scale.time_to_offset(clip.start_time) + effect.offset_x,
            width: scale.time_to_offset(clip.duration) * effect.width_fraction,
            top: self.ruler_height + self.track_height * track_index as f64,
            height: self.track_height,
            opacity: effect.opacity,
            active: clip.is_active_at(time),
        }
    }
}

/// Place an envelope's columns inside a drawn clip.
///
/// Columns are spread over `full_width`, the clip's unwiped width, and those
/// past the visible width are dropped.
pub fn waveform_columns(
    envelope: &WaveformEnvelope,
    geometry: &ClipGeometry,
    full_width: f64,
) -> Vec<WaveformColumn> {
    if envelope.is_empty() || full_width <= 0.0 {
        return Vec::new();
    }
    let spacing = full_width / envelope.len() as f64;
    let visible_right = geometry.left + geometry.width;
    envelope
        .column_lines(geometry.height as f32)
        .enumerate()
        .map(|(i, (y_min, y_max))| WaveformColumn {
            x: geometry.left + (i as f64 + 0.5) * spacing,
            top: geometry.top + f64::from(y_max),
            bottom: geometry.top + f64::from(y_min),
        })
        .take_while(|column| column.x < visible_right)
        .collect()
}

/// Clear the surface and draw every clip at playback time `time`.
///
/// Clips with an entry in `waveforms` get their envelope drawn on top.
/// Returns the number of clips drawn.
pub fn render_timeline(
    registry: &ClipRegistry,
    layout: &TimelineLayout,
    waveforms: &HashMap<ClipId, WaveformEnvelope>,
    surface: &mut impl RenderSurface,
    time: f64,
) -> usize {
    surface.clear(layout.bounds(registry.tracks().count()));

    let mut drawn = 0;
    for (row, track) in registry.tracks().enumerate() {
        for clip in track.clip_ids().iter().filter_map(|id| registry.clip(id).ok()) {
            let geometry = layout.clip_geometry(clip, track.scale, row, time);
            surface.draw_clip(&geometry, clip.kind.color(), &clip.label);
            if let Some(envelope) = waveforms.get(&clip.id) {
                let full_width = track.scale.time_to_offset(clip.duration);
                let columns = waveform_columns(envelope, &geometry, full_width);
                if !columns.is_empty() {
                    surface.draw_waveform(&geometry, &columns);
                }
            }
            drawn += 1;
        }
    }
    drawn
}

/// Draw the ruler ticks
pub fn render_ruler(ruler: &RulerLayout, surface: &mut impl RenderSurface) -> usize {
    let ticks = ruler.ticks();
    for tick in &ticks {
        surface.draw_tick(tick.x, tick.height, tick.label.as_deref());
    }
    ticks.len()
}
