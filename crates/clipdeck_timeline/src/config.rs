// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration.
//!
//! Read once at startup from a RON or JSON file; missing keys take their
//! defaults.

use crate::coords::{TimeScale, DEFAULT_PIXELS_PER_SECOND};
use crate::error::{Result, TimelineError};
use crate::registry::DEFAULT_MIN_CLIP_WIDTH;
use crate::transition::{Transition, TransitionKind, DEFAULT_TRANSITION_SECONDS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Timeline length in seconds
    pub timeline_duration_seconds: f64,
    /// Frames per second used for frame stepping and timecodes
    pub frame_rate: f64,
    /// Transition given to new clips
    pub default_transition: TransitionKind,
    /// Length of new transitions in seconds
    pub transition_duration_seconds: f64,
    /// Output volume, 0 to 100
    pub default_volume: u8,
    /// Horizontal zoom
    pub pixels_per_second: f64,
    /// Narrowest a clip may be resized to, in pixels
    pub min_clip_width: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            timeline_duration_seconds: 300.0,
            frame_rate: 30.0,
            default_transition: TransitionKind::Fade,
            transition_duration_seconds: DEFAULT_TRANSITION_SECONDS,
            default_volume: 50,
            pixels_per_second: DEFAULT_PIXELS_PER_SECOND,
            min_clip_width: DEFAULT_MIN_CLIP_WIDTH,
        }
    }
}

impl EditorConfig {
    /// Load from a file; `.json` is read as JSON, anything else as RON
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TimelineError::Config(format!("{}: {e}", path.display())))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_ron_str(&content)?
        };
        tracing::info!(path = %path.display(), "Loaded editor config");
        Ok(config)
    }

    /// Parse RON and validate
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let config: Self =
            ron::from_str(content).map_err(|e| TimelineError::Config(e.to_string()))?;
        config.validated()
    }

    /// Parse JSON and validate
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| TimelineError::Config(e.to_string()))?;
        config.validated()
    }

    /// Pretty RON text
    pub fn to_ron_string(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::default().struct_names(true);
        ron::ser::to_string_pretty(self, pretty).map_err(|e| TimelineError::Config(e.to_string()))
    }

    /// Compact JSON text
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| TimelineError::Config(e.to_string()))
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(TimelineError::InvalidFrameRate(self.frame_rate));
        }
        TimeScale::new(self.pixels_per_second)?;
        if !self.timeline_duration_seconds.is_finite() || self.timeline_duration_seconds <= 0.0 {
            return Err(TimelineError::Config(format!(
                "timeline duration must be positive, got {}",
                self.timeline_duration_seconds
            )));
        }
        if !self.min_clip_width.is_finite() || self.min_clip_width < 0.0 {
            return Err(TimelineError::Config(format!(
                "minimum clip width must not be negative, got {}",
                self.min_clip_width
            )));
        }
        Ok(())
    }

    fn validated(mut self) -> Result<Self> {
        self.validate()?;
        if self.default_volume > 100 {
            tracing::warn!(volume = self.default_volume, "Volume above 100, clamping");
            self.default_volume = 100;
        }
        Ok(self)
    }

    /// Horizontal scale
    pub fn scale(&self) -> Result<TimeScale> {
        TimeScale::new(self.pixels_per_second)
    }

    /// Transition for newly placed clips
    pub fn default_transition(&self) -> Transition {
        Transition::new(self.default_transition, self.transition_duration_seconds)
    }

    /// Volume as a linear gain in [0, 1]
    pub fn volume_gain(&self) -> f32 {
        f32::from(self.default_volume.min(100)) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.timeline_duration_seconds, 300.0);
        assert_eq!(config.frame_rate, 30.0);
        assert_eq!(config.default_transition, TransitionKind::Fade);
        assert_eq!(config.default_volume, 50);
        assert_eq!(config.volume_gain(), 0.5);
        assert_eq!(config.scale().unwrap().pixels_per_second(), 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let config = EditorConfig::from_ron_str("(frame_rate: 24.0, default_transition: slide)").unwrap();
        assert_eq!(config.frame_rate, 24.0);
        assert_eq!(config.default_transition, TransitionKind::Slide);
        assert_eq!(config.min_clip_width, 20.0);
    }

    #[test]
    fn test_json_and_volume_clamp() {
        let config =
            EditorConfig::from_json_str(r#"{"default_volume": 180, "default_transition": "wipe"}"#).unwrap();
        assert_eq!(config.default_volume, 100);
        assert_eq!(config.default_transition, TransitionKind::Wipe);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            EditorConfig::from_json_str(r#"{"frame_rate": 0}"#),
            Err(TimelineError::InvalidFrameRate(0.0))
        );
        assert_eq!(
            EditorConfig::from_json_str(r#"{"pixels_per_second": -2}"#),
            Err(TimelineError::InvalidScale(-2.0))
        );
        assert!(matches!(
            EditorConfig::from_ron_str("(timeline_duration_seconds: 0.0)"),
            Err(TimelineError::Config(_))
        ));
        assert!(matches!(EditorConfig::from_ron_str("not ron"), Err(TimelineError::Config(_))));
    }

    #[test]
    fn test_text_round_trip() {
        let config = EditorConfig {
            frame_rate: 25.0,
            ..Default::default()
        };
        let ron_text = config.to_ron_string().unwrap();
        assert_eq!(EditorConfig::from_ron_str(&ron_text).unwrap(), config);
        let json_text = config.to_json_string().unwrap();
        assert_eq!(EditorConfig::from_json_str(&json_text).unwrap(), config);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = std::env::temp_dir().join(format!("clipdeck-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let json = dir.join("editor.json");
        std::fs::write(&json, r#"{"frame_rate": 60}"#).unwrap();
        let ron_path = dir.join("editor.ron");
        std::fs::write(&ron_path, "(frame_rate: 12.0)").unwrap();

        assert_eq!(EditorConfig::load(&json).unwrap().frame_rate, 60.0);
        assert_eq!(EditorConfig::load(&ron_path).unwrap().frame_rate, 12.0);
        assert!(matches!(
            EditorConfig::load(&dir.join("missing.ron")),
            Err(TimelineError::Config(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
