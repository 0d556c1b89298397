// SPDX-License-Identifier: MIT OR Apache-2.0
//! Preview target that reports to the log.

use clipdeck_timeline::{ClipId, PreviewFrame, PreviewTarget};

/// Logs highlight changes and preview frames
#[derive(Debug, Default)]
pub struct LogPreview {
    highlighted: Vec<ClipId>,
    frames: usize,
}

impl LogPreview {
    /// Create an empty preview
    pub fn new() -> Self {
        Self::default()
    }

    /// Clips currently highlighted
    pub fn highlighted(&self) -> &[ClipId] {
        &self.highlighted
    }

    /// Number of preview updates received
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl PreviewTarget for LogPreview {
    fn highlight_clips(&mut self, active: &[ClipId]) {
        if self.highlighted != active {
            let names: Vec<&str> = active.iter().map(ClipId::as_str).collect();
            tracing::info!(active = ?names, "Active clips changed");
            self.highlighted = active.to_vec();
        }
    }

    fn update_preview(&mut self, frame: &PreviewFrame) {
        self.frames += 1;
        tracing::debug!(
            time = frame.time,
            cursor = frame.cursor_offset,
            label = %frame.label,
            "Preview"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_highlight_and_frames() {
        let mut preview = LogPreview::new();
        let active = vec![ClipId::from("a")];
        preview.highlight_clips(&active);
        preview.highlight_clips(&active);
        preview.update_preview(&PreviewFrame {
            time: 1.0,
            cursor_offset: 10.0,
            active: active.clone(),
            label: "00:01".into(),
        });
        assert_eq!(preview.highlighted(), active.as_slice());
        assert_eq!(preview.frames(), 1);

        preview.highlight_clips(&[]);
        assert!(preview.highlighted().is_empty());
    }
}
