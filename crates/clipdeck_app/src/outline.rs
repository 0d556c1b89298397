// SPDX-License-Identifier: MIT OR Apache-2.0
//! Text rendering surface for the headless preview.

use clipdeck_timeline::{ClipGeometry, Region, RenderSurface, WaveformColumn};

/// Collects draw calls as text lines
#[derive(Debug, Default)]
pub struct OutlineSurface {
    clips: Vec<String>,
    labels: Vec<String>,
}

impl OutlineSurface {
    /// Create an empty outline
    pub fn new() -> Self {
        Self::default()
    }

    /// One line per drawn clip
    pub fn clip_lines(&self) -> &[String] {
        &self.clips
    }

    /// Ruler labels joined into one line
    pub fn ruler_line(&self) -> String {
        self.labels.join(" | ")
    }

    /// Write the outline to the log
    pub fn log(&self) {
        tracing::info!("Ruler: {}", self.ruler_line());
        for line in &self.clips {
            tracing::info!("{line}");
        }
    }
}

impl RenderSurface for OutlineSurface {
    fn clear(&mut self, _region: Region) {
        self.clips.clear();
        self.labels.clear();
    }

    fn draw_clip(&mut self, geometry: &ClipGeometry, color: [u8; 3], label: &str) {
        let marker = if geometry.active { '*' } else { ' ' };
        self.clips.push(format!(
            "{marker} #{:02x}{:02x}{:02x} {label:<20} x={:>8.1} w={:>8.1} y={:>6.1}",
            color[0], color[1], color[2], geometry.left, geometry.width, geometry.top
        ));
    }

    fn draw_waveform(&mut self, geometry: &ClipGeometry, columns: &[WaveformColumn]) {
        let span = columns
            .iter()
            .map(|c| c.bottom - c.top)
            .fold(0.0, f64::max);
        self.clips.push(format!(
            "  ~ waveform {} columns, peak {:.0}% of {:.0}px",
            columns.len(),
            span / geometry.height.max(1.0) * 100.0,
            geometry.height
        ));
    }

    fn draw_tick(&mut self, _x: f64, _height: f64, label: Option<&str>) {
        if let Some(label) = label {
            self.labels.push(label.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_lines() {
        let mut surface = OutlineSurface::new();
        surface.draw_tick(0.0, 10.0, Some("00:00"));
        surface.draw_tick(10.0, 5.0, None);
        surface.draw_tick(50.0, 10.0, Some("00:05"));
        surface.draw_clip(
            &ClipGeometry {
                left: 10.0,
                width: 40.0,
                top: 30.0,
                height: 50.0,
                opacity: 1.0,
                active: true,
            },
            [0xf5, 0x62, 0x42],
            "Intro",
        );

        let geometry = ClipGeometry {
            left: 60.0,
            width: 20.0,
            top: 80.0,
            height: 50.0,
            opacity: 1.0,
            active: false,
        };
        surface.draw_clip(&geometry, [0x42, 0xa7, 0xf5], "Music");
        surface.draw_waveform(
            &geometry,
            &[
                WaveformColumn { x: 65.0, top: 92.5, bottom: 117.5 },
                WaveformColumn { x: 75.0, top: 100.0, bottom: 110.0 },
            ],
        );

        assert_eq!(surface.ruler_line(), "00:00 | 00:05");
        assert_eq!(surface.clip_lines().len(), 3);
        assert!(surface.clip_lines()[0].starts_with("* #f56242 Intro"));
        assert!(surface.clip_lines()[1].starts_with("  #42a7f5 Music"));
        assert_eq!(surface.clip_lines()[2], "  ~ waveform 2 columns, peak 50% of 50px");

        surface.clear(Region::default());
        assert!(surface.clip_lines().is_empty());
    }
}
