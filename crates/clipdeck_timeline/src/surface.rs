// SPDX-License-Identifier: MIT OR Apache-2.0
//! [`RenderSurface`] over an egui painter.

use crate::render::{ClipGeometry, Region, RenderSurface, WaveformColumn};
use egui::{Align2, Color32, Painter, Pos2, Rect, Stroke, Vec2};

/// Background fill of cleared regions
const BACKGROUND: Color32 = Color32::from_gray(30);

/// Draws timeline primitives with an [`egui::Painter`].
///
/// Coordinates from the layout are offset by `origin`, normally the top-left
/// corner of the widget's rect.
pub struct EguiSurface {
    painter: Painter,
    origin: Pos2,
    shapes: usize,
}

impl EguiSurface {
    /// Wrap a painter
    pub fn new(painter: Painter, origin: Pos2) -> Self {
        Self {
            painter,
            origin,
            shapes: 0,
        }
    }

    /// Number of primitives drawn so far
    pub fn shapes(&self) -> usize {
        self.shapes
    }

    fn rect(&self, x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect::from_min_size(
            self.origin + Vec2::new(x as f32, y as f32),
            Vec2::new(width.max(0.0) as f32, height.max(0.0) as f32),
        )
    }
}

impl RenderSurface for EguiSurface {
    fn clear(&mut self, region: Region) {
        let rect = self.rect(region.x, region.y, region.width, region.height);
        self.painter.rect_filled(rect, 0.0, BACKGROUND);
        self.shapes += 1;
    }

    fn draw_clip(&mut self, geometry: &ClipGeometry, color: [u8; 3], label: &str) {
        let rect = self.rect(geometry.left, geometry.top + 2.0, geometry.width, geometry.height - 4.0);
        let alpha = (geometry.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.painter.rect_filled(
            rect,
            3.0,
            Color32::from_rgba_unmultiplied(color[0], color[1], color[2], alpha),
        );

        let outline = if geometry.active {
            Stroke::new(2.0, Color32::WHITE)
        } else {
            Stroke::new(1.0, Color32::from_gray(80))
        };
        self.painter.rect_stroke(rect, 3.0, outline);

        self.painter.text(
            rect.left_center() + Vec2::new(4.0, 0.0),
            Align2::LEFT_CENTER,
            label,
            egui::FontId::proportional(12.0),
            Color32::from_gray(230),
        );
        self.shapes += 3;
    }

    fn draw_waveform(&mut self, geometry: &ClipGeometry, columns: &[WaveformColumn]) {
        let alpha = (geometry.opacity.clamp(0.0, 1.0) * 200.0).round() as u8;
        let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(20, 20, 20, alpha));
        for column in columns {
            let top = self.origin + Vec2::new(column.x as f32, column.top as f32);
            let bottom = self.origin + Vec2::new(column.x as f32, column.bottom as f32);
            self.painter.line_segment([top, bottom], stroke);
        }
        self.shapes += columns.len();
    }

    fn draw_tick(&mut self, x: f64, height: f64, label: Option<&str>) {
        let top = self.origin + Vec2::new(x as f32, 0.0);
        let tick_color = if label.is_some() {
            Color32::from_gray(180)
        } else {
            Color32::from_gray(100)
        };
        self.painter
            .line_segment([top, top + Vec2::new(0.0, height as f32)], Stroke::new(1.0, tick_color));
        self.shapes += 1;

        if let Some(label) = label {
            self.painter.text(
                top + Vec2::new(2.0, height as f32),
                Align2::LEFT_TOP,
                label,
                egui::FontId::monospace(10.0),
                Color32::from_gray(180),
            );
            self.shapes += 1;
        }
    }
}
