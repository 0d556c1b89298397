// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer-driven move and resize gestures.
//!
//! At most one gesture is active at a time. Starting a second one while the
//! slot is taken is rejected; stray move/end events with no active gesture are
//! ignored. Geometry is computed by pure functions over the captured origin
//! state and written back through [`ClipRegistry::move_clip`] or
//! [`ClipRegistry::update_geometry`].

use crate::clip::{Clip, ClipId};
use crate::coords::TimeScale;
use crate::error::{Result, TimelineError};
use crate::registry::ClipRegistry;

/// Edge being dragged during a resize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeEdge {
    /// Left edge: start and width change together, right edge stays put
    Left,
    /// Right edge: only the width changes
    #[default]
    Right,
}

/// State captured when a move gesture starts
#[derive(Debug, Clone, PartialEq)]
pub struct MoveGesture {
    /// Clip being moved
    pub clip_id: ClipId,
    /// Pointer X when the gesture started
    pub origin_mouse_x: f64,
    /// Clip left offset (pixels) when the gesture started
    pub origin_left: f64,
    /// Track scale at gesture start
    pub scale: TimeScale,
}

impl MoveGesture {
    /// New left offset (pixels) for a pointer position
    pub fn left_at(&self, pointer_x: f64) -> f64 {
        let delta = pointer_x - self.origin_mouse_x;
        (self.origin_left + delta).max(0.0)
    }
}

/// State captured when a resize gesture starts
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeGesture {
    /// Clip being resized
    pub clip_id: ClipId,
    /// Pointer X when the gesture started
    pub origin_mouse_x: f64,
    /// Clip width (pixels) when the gesture started
    pub origin_width: f64,
    /// Edge being dragged
    pub edge: ResizeEdge,
    /// Clip left offset (pixels) when the gesture started
    pub origin_left: f64,
    /// Narrowest allowed width in pixels
    pub min_width: f64,
    /// Track scale at gesture start
    pub scale: TimeScale,
}

impl ResizeGesture {
    /// New `(left, width)` in pixels for a pointer position.
    ///
    /// Dragging the left edge keeps the right edge where it was, including
    /// when the width hits `min_width` or the left edge hits zero.
    pub fn geometry_at(&self, pointer_x: f64) -> (f64, f64) {
        let delta = pointer_x - self.origin_mouse_x;
        match self.edge {
            ResizeEdge::Right => (self.origin_left, (self.origin_width + delta).max(self.min_width)),
            ResizeEdge::Left => {
                let right = self.origin_left + self.origin_width;
                let width = (self.origin_width - delta).max(self.min_width);
                let left = right - width;
                if left < 0.0 {
                    (0.0, right)
                } else {
                    (left, width)
                }
            }
        }
    }
}

/// The gesture occupying the slot
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Drag-to-move
    Move(MoveGesture),
    /// Drag-to-resize
    Resize(ResizeGesture),
}

impl Gesture {
    /// Clip targeted by the gesture
    pub fn clip_id(&self) -> &ClipId {
        match self {
            Self::Move(g) => &g.clip_id,
            Self::Resize(g) => &g.clip_id,
        }
    }

    /// Write the geometry for a pointer position back to the registry.
    ///
    /// Moves only shift the start; resizes set start and duration together.
    fn apply<'r>(&self, registry: &'r mut ClipRegistry, pointer_x: f64) -> Result<&'r Clip> {
        match self {
            Self::Move(g) => registry.move_clip(&g.clip_id, g.scale.offset_to_time(g.left_at(pointer_x))),
            Self::Resize(g) => {
                let (left, width) = g.geometry_at(pointer_x);
                registry.update_geometry(
                    &g.clip_id,
                    g.scale.offset_to_time(left),
                    g.scale.offset_to_time(width),
                )
            }
        }
    }
}

/// Owner of the single gesture slot
#[derive(Debug, Default)]
pub struct GestureController {
    active: Option<Gesture>,
}

impl GestureController {
    /// Create an idle controller
    pub fn new() -> Self {
        Self::default()
    }

    /// The gesture in progress, if any
    pub fn active(&self) -> Option<&Gesture> {
        self.active.as_ref()
    }

    /// Whether a gesture is in progress
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    fn ensure_idle(&self) -> Result<()> {
        match &self.active {
            Some(current) => Err(TimelineError::GestureActive(current.clip_id().clone())),
            None => Ok(()),
        }
    }

    /// Start dragging a clip
    pub fn begin_move(
        &mut self,
        registry: &ClipRegistry,
        clip_id: &ClipId,
        pointer_x: f64,
    ) -> Result<()> {
        self.ensure_idle()?;
        let clip = registry.clip(clip_id)?;
        let scale = registry.scale_of(clip_id)?;
        self.active = Some(Gesture::Move(MoveGesture {
            clip_id: clip_id.clone(),
            origin_mouse_x: pointer_x,
            origin_left: scale.time_to_offset(clip.start_time),
            scale,
        }));
        tracing::debug!(clip = %clip_id, pointer_x, "Move started");
        Ok(())
    }

    /// Start resizing a clip from one of its edges
    pub fn begin_resize(
        &mut self,
        registry: &ClipRegistry,
        clip_id: &ClipId,
        pointer_x: f64,
        edge: ResizeEdge,
    ) -> Result<()> {
        self.ensure_idle()?;
        let clip = registry.clip(clip_id)?;
        let scale = registry.scale_of(clip_id)?;
        self.active = Some(Gesture::Resize(ResizeGesture {
            clip_id: clip_id.clone(),
            origin_mouse_x: pointer_x,
            origin_width: scale.time_to_offset(clip.duration),
            edge,
            origin_left: scale.time_to_offset(clip.start_time),
            min_width: registry.min_clip_width(),
            scale,
        }));
        tracing::debug!(clip = %clip_id, pointer_x, ?edge, "Resize started");
        Ok(())
    }

    /// Apply a pointer move to the active gesture.
    ///
    /// Returns the clip's new `(start, duration)`, or `None` when no gesture is
    /// active. If the clip vanished mid-gesture the gesture is dropped.
    pub fn pointer_move(&mut self, registry: &mut ClipRegistry, pointer_x: f64) -> Option<(f64, f64)> {
        let gesture = self.active.as_ref()?;
        let clip_id = gesture.clip_id().clone();
        match gesture.apply(registry, pointer_x) {
            Ok(clip) => Some((clip.start_time, clip.duration)),
            Err(TimelineError::NotFound(_)) => {
                tracing::warn!(clip = %clip_id, "Gesture target disappeared, cancelling");
                self.active = None;
                None
            }
            Err(e) => {
                tracing::warn!(clip = %clip_id, "Gesture update failed, cancelling: {e}");
                self.active = None;
                None
            }
        }
    }

    /// Finish the active gesture, keeping the last computed geometry
    pub fn end(&mut self) -> Option<ClipId> {
        let gesture = self.active.take()?;
        tracing::debug!(clip = %gesture.clip_id(), "Gesture ended");
        Some(gesture.clip_id().clone())
    }

    /// Drop the active gesture without further updates
    pub fn abort(&mut self) -> Option<ClipId> {
        let gesture = self.active.take()?;
        tracing::debug!(clip = %gesture.clip_id(), "Gesture aborted");
        Some(gesture.clip_id().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{ClipData, ClipKind, SourceRef};

    fn setup(start: f64, duration: f64) -> (ClipRegistry, ClipId) {
        let mut registry = ClipRegistry::new();
        let track = registry.add_track("V1", TimeScale::new(10.0).unwrap());
        let id = registry
            .add_clip(ClipData::new(track, ClipKind::Video, start, duration, SourceRef::new("v.mp4")))
            .unwrap();
        (registry, id)
    }

    fn resize(edge: ResizeEdge, origin_left: f64, origin_width: f64) -> ResizeGesture {
        ResizeGesture {
            clip_id: ClipId::from("r"),
            origin_mouse_x: 0.0,
            origin_width,
            edge,
            origin_left,
            min_width: 20.0,
            scale: TimeScale::new(10.0).unwrap(),
        }
    }

    #[test]
    fn test_left_resize_pins_right_edge() {
        let g = resize(ResizeEdge::Left, 50.0, 100.0);
        assert_eq!(g.geometry_at(20.0), (70.0, 80.0));
        // Clamped at min width: left edge stops, right edge still at 150
        assert_eq!(g.geometry_at(95.0), (130.0, 20.0));
        // Past zero: left edge stops at 0
        assert_eq!(g.geometry_at(-80.0), (0.0, 150.0));
    }

    #[test]
    fn test_right_resize() {
        let g = resize(ResizeEdge::Right, 50.0, 100.0);
        assert_eq!(g.geometry_at(30.0), (50.0, 130.0));
        assert_eq!(g.geometry_at(-500.0), (50.0, 20.0));
    }

    #[test]
    fn test_move_gesture() {
        let (mut registry, id) = setup(2.0, 3.0);
        let mut gestures = GestureController::new();
        gestures.begin_move(&registry, &id, 100.0).unwrap();

        assert_eq!(gestures.pointer_move(&mut registry, 150.0), Some((7.0, 3.0)));
        // Clamped at the timeline start
        assert_eq!(gestures.pointer_move(&mut registry, 0.0), Some((0.0, 3.0)));
        assert_eq!(gestures.pointer_move(&mut registry, 110.0), Some((3.0, 3.0)));

        assert_eq!(gestures.end(), Some(id.clone()));
        assert!(!gestures.is_active());
        assert_eq!(registry.clip(&id).unwrap().start_time, 3.0);
    }

    #[test]
    fn test_move_keeps_short_clip_duration() {
        // 0.5s is below the 2s minimum width at 10px/s
        let (mut registry, id) = setup(1.0, 0.5);
        let mut gestures = GestureController::new();
        gestures.begin_move(&registry, &id, 10.0).unwrap();

        assert_eq!(gestures.pointer_move(&mut registry, 30.0), Some((3.0, 0.5)));
        assert_eq!(gestures.pointer_move(&mut registry, -100.0), Some((0.0, 0.5)));
        gestures.end();
        assert_eq!(registry.clip(&id).unwrap().duration, 0.5);
    }

    #[test]
    fn test_non_finite_pointer_cancels_gesture() {
        let (mut registry, id) = setup(1.0, 4.0);
        let mut gestures = GestureController::new();
        gestures.begin_move(&registry, &id, 0.0).unwrap();
        assert_eq!(gestures.pointer_move(&mut registry, f64::INFINITY), None);
        assert!(!gestures.is_active());
        assert_eq!(registry.clip(&id).unwrap().start_time, 1.0);
    }

    #[test]
    fn test_resize_gesture_updates_registry() {
        let (mut registry, id) = setup(5.0, 10.0);
        let mut gestures = GestureController::new();
        gestures.begin_resize(&registry, &id, 200.0, ResizeEdge::Left).unwrap();

        let (start, duration) = gestures.pointer_move(&mut registry, 220.0).unwrap();
        assert!((start - 7.0).abs() < 1e-9);
        assert!((duration - 8.0).abs() < 1e-9);
        assert!((start + duration - 15.0).abs() < 1e-9);
        gestures.end();

        gestures.begin_resize(&registry, &id, 0.0, ResizeEdge::Right).unwrap();
        let (_, duration) = gestures.pointer_move(&mut registry, -1000.0).unwrap();
        assert_eq!(duration, 2.0);
    }

    #[test]
    fn test_second_gesture_rejected() {
        let (registry, id) = setup(0.0, 4.0);
        let mut gestures = GestureController::new();
        gestures.begin_move(&registry, &id, 0.0).unwrap();

        assert_eq!(
            gestures.begin_resize(&registry, &id, 0.0, ResizeEdge::Right),
            Err(TimelineError::GestureActive(id.clone()))
        );
        assert_eq!(
            gestures.begin_move(&registry, &id, 5.0),
            Err(TimelineError::GestureActive(id.clone()))
        );
        // First gesture untouched
        assert!(matches!(gestures.active(), Some(Gesture::Move(g)) if g.origin_mouse_x == 0.0));
    }

    #[test]
    fn test_stray_events_are_ignored() {
        let (mut registry, id) = setup(1.0, 4.0);
        let mut gestures = GestureController::new();
        assert_eq!(gestures.pointer_move(&mut registry, 40.0), None);
        assert_eq!(gestures.end(), None);
        assert_eq!(gestures.abort(), None);
        assert_eq!(registry.clip(&id).unwrap().start_time, 1.0);
    }

    #[test]
    fn test_unknown_clip_rejected() {
        let (registry, _) = setup(0.0, 1.0);
        let mut gestures = GestureController::new();
        let missing = ClipId::from("nope");
        assert_eq!(
            gestures.begin_move(&registry, &missing, 0.0),
            Err(TimelineError::NotFound(missing))
        );
        assert!(!gestures.is_active());
    }

    #[test]
    fn test_removed_clip_cancels_gesture() {
        let (mut registry, id) = setup(1.0, 4.0);
        let mut gestures = GestureController::new();
        gestures.begin_move(&registry, &id, 0.0).unwrap();
        registry.remove_clip(&id).unwrap();
        assert_eq!(gestures.pointer_move(&mut registry, 10.0), None);
        assert!(!gestures.is_active());
    }
}
