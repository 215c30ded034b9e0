//! Move/resize gestures on the selected shape.
//!
//! The controller never owns geometry. While a gesture runs it keeps a live
//! position or box, snapped against the other shapes, and writes it back to the
//! [`Scene`] once when the gesture ends. The attached shape is referenced by id and
//! looked up again on every step, so a shape replaced or removed mid-gesture is
//! noticed instead of edited through a stale handle.

use egui::{Pos2, Rect, Vec2};
use log::{debug, info, warn};

mod handles;

pub use handles::{Corner, anchor_size_for, clamp_to_floor, corner_at, dragged_rect, handle_rect};

use crate::config::{ANCHOR_SIZE, SNAP_THRESHOLD};
use crate::error::TransitionError;
use crate::id_generator::ShapeId;
use crate::scene::Scene;
use crate::shape::{Element, ShapePatch};
use crate::snapping::{
    self, Guide, GuideLine, Orientation, SnapEdge, SnapResult, collect_guide_stops,
};

#[derive(Debug, Clone, PartialEq)]
pub enum TransformState {
    Idle,
    Attached {
        id: ShapeId,
    },
    Dragging {
        id: ShapeId,
        /// Pointer minus anchor at gesture start
        grab: Vec2,
        origin: Pos2,
        live: Pos2,
        /// Live geometry was already written to the scene mid-gesture
        committed: bool,
    },
    Resizing {
        id: ShapeId,
        corner: Corner,
        original: Rect,
        start_pointer: Pos2,
        live: Rect,
        committed: bool,
    },
}

impl TransformState {
    pub fn name(&self) -> &'static str {
        match self {
            TransformState::Idle => "idle",
            TransformState::Attached { .. } => "attached",
            TransformState::Dragging { .. } => "drag",
            TransformState::Resizing { .. } => "resize",
        }
    }

    pub fn id(&self) -> Option<ShapeId> {
        match self {
            TransformState::Idle => None,
            TransformState::Attached { id }
            | TransformState::Dragging { id, .. }
            | TransformState::Resizing { id, .. } => Some(*id),
        }
    }
}

/// What the pointer went down on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The empty canvas itself
    Stage,
    Shape(ShapeId),
    Handle(Corner),
}

#[derive(Debug, Clone)]
pub struct TransformController {
    state: TransformState,
    guides: Vec<Guide>,
    threshold: f32,
    anchor_size: f32,
    handles_visible: bool,
}

impl Default for TransformController {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformController {
    pub fn new() -> Self {
        Self {
            state: TransformState::Idle,
            guides: Vec::new(),
            threshold: SNAP_THRESHOLD,
            anchor_size: ANCHOR_SIZE,
            handles_visible: true,
        }
    }

    pub fn state(&self) -> &TransformState {
        &self.state
    }

    pub fn attached_id(&self) -> Option<ShapeId> {
        self.state.id()
    }

    pub fn is_gesture_active(&self) -> bool {
        matches!(
            self.state,
            TransformState::Dragging { .. } | TransformState::Resizing { .. }
        )
    }

    /// Guides found on the last gesture step. Empty outside gestures.
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn guide_lines(&self, view_scale: f32) -> Vec<GuideLine> {
        snapping::guide_lines(&self.guides, view_scale)
    }

    pub fn anchor_size(&self) -> f32 {
        self.anchor_size
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.anchor_size = anchor_size_for(width);
    }

    pub fn handles_visible(&self) -> bool {
        self.handles_visible
    }

    pub fn set_handles_visible(&mut self, visible: bool) {
        self.handles_visible = visible;
    }

    /// Follows the selection: attach to the selected shape, detach when it's gone.
    ///
    /// A running gesture on the same shape is kept.
    pub fn sync_selection(&mut self, selected: Option<ShapeId>, scene: &Scene) {
        let selected = selected.filter(|id| scene.find(*id).is_some());
        if selected == self.attached_id() {
            return;
        }
        self.guides.clear();
        self.state = match selected {
            Some(id) => {
                debug!("Transform attached to {}", id);
                TransformState::Attached { id }
            }
            None => TransformState::Idle,
        };
    }

    pub fn detach(&mut self) {
        self.state = TransformState::Idle;
        self.guides.clear();
    }

    /// Drops the running gesture.
    ///
    /// Geometry already written mid-gesture is put back to where the gesture started.
    /// Returns the shape if the scene had to be restored.
    pub fn cancel_gesture(&mut self, scene: &mut Scene) -> Option<ShapeId> {
        self.guides.clear();
        let (id, restore) = match self.state {
            TransformState::Idle | TransformState::Attached { .. } => return None,
            TransformState::Dragging {
                id, origin, committed, ..
            } => (id, committed.then(|| ShapePatch::moved_to(origin))),
            TransformState::Resizing {
                id,
                original,
                committed,
                ..
            } => (id, committed.then(|| ShapePatch::resized_to(original))),
        };
        debug!("Cancelled {} on {}", self.state.name(), id);
        self.state = TransformState::Attached { id };

        let patch = restore?;
        if scene.update(id, patch) {
            info!("Restored {} after cancelled gesture", id);
            Some(id)
        } else {
            self.detach();
            None
        }
    }

    fn attached_for(&self, gesture: &'static str) -> Result<ShapeId, TransitionError> {
        match &self.state {
            TransformState::Idle => Err(TransitionError::NotAttached { gesture }),
            TransformState::Attached { id } => Ok(*id),
            active => Err(TransitionError::GestureInProgress {
                active: active.name(),
                requested: gesture,
            }),
        }
    }

    /// Re-resolves the attached id. Detaches if the shape disappeared.
    fn rebind(&mut self, scene: &Scene) -> Option<ShapeId> {
        let id = self.attached_id()?;
        if scene.find(id).is_some() {
            Some(id)
        } else {
            warn!("Shape {} vanished during {}, detaching", id, self.state.name());
            self.detach();
            None
        }
    }

    pub fn begin_drag(&mut self, pointer: Pos2, scene: &Scene) -> Result<(), TransitionError> {
        let id = self.attached_for("drag")?;
        let shape = scene.find(id).ok_or(TransitionError::UnknownShape(id))?;
        let origin = shape.geometry().position;
        self.state = TransformState::Dragging {
            id,
            grab: pointer - origin,
            origin,
            live: origin,
            committed: false,
        };
        Ok(())
    }

    /// Moves the live anchor under the pointer and snaps it.
    pub fn drag_to(&mut self, pointer: Pos2, scene: &Scene) -> Option<SnapResult> {
        let id = self.rebind(scene)?;
        let TransformState::Dragging { grab, .. } = self.state else {
            return None;
        };
        let shape = scene.find(id)?;
        let rect = shape.rect();
        let raw = pointer - grab;
        // Bounding box relative to the anchor stays the same while moving
        let bounds = rect.translate(raw - shape.geometry().position);

        let result = snapping::snap(
            scene.resolution().as_vec2(),
            &scene.bounds_except(id),
            bounds,
            raw,
            self.threshold,
        );
        if let TransformState::Dragging { live, .. } = &mut self.state {
            *live = result.position;
        }
        self.guides = result.guides.clone();
        Some(result)
    }

    pub fn end_drag(&mut self, scene: &mut Scene) -> Option<ShapeId> {
        let TransformState::Dragging {
            id,
            origin,
            live,
            committed,
            ..
        } = self.state
        else {
            return None;
        };
        self.state = TransformState::Attached { id };
        self.guides.clear();
        // A mid-gesture write means the scene may no longer sit at `origin`
        if live == origin && !committed {
            return None;
        }
        if scene.update(id, ShapePatch::moved_to(live)) {
            info!("Moved {} to {:?}", id, live);
            Some(id)
        } else {
            self.detach();
            None
        }
    }

    pub fn begin_resize(
        &mut self,
        corner: Corner,
        pointer: Pos2,
        scene: &Scene,
    ) -> Result<(), TransitionError> {
        let id = self.attached_for("resize")?;
        let shape = scene.find(id).ok_or(TransitionError::UnknownShape(id))?;
        let original = shape.rect();
        self.state = TransformState::Resizing {
            id,
            corner,
            original,
            start_pointer: pointer,
            live: original,
            committed: false,
        };
        Ok(())
    }

    /// Drags the corner, snaps only the edges that corner moves, then applies the size floor.
    pub fn resize_to(&mut self, pointer: Pos2, scene: &Scene) -> Option<Rect> {
        let id = self.rebind(scene)?;
        let TransformState::Resizing {
            corner,
            original,
            start_pointer,
            ..
        } = self.state
        else {
            return None;
        };

        let mut rect = dragged_rect(original, corner, pointer - start_pointer);
        let stops = collect_guide_stops(scene.resolution().as_vec2(), &scene.bounds_except(id));

        let mut guides = Vec::new();
        for (orientation, kind, stops) in [
            (Orientation::Vertical, corner.moving_x_edge(), &stops.vertical),
            (Orientation::Horizontal, corner.moving_y_edge(), &stops.horizontal),
        ] {
            let edge = SnapEdge {
                position: kind.edge_of(rect, orientation),
                offset: 0.0,
                kind,
            };
            if let Some(guide) = snapping::match_axis(stops, &[edge], orientation, self.threshold) {
                set_edge(&mut rect, orientation, kind, guide.position);
                guides.push(guide);
            }
        }

        let rect = clamp_to_floor(rect, corner);
        if let TransformState::Resizing { live, .. } = &mut self.state {
            *live = rect;
        }
        self.guides = guides;
        Some(rect)
    }

    pub fn end_resize(&mut self, scene: &mut Scene) -> Option<ShapeId> {
        let TransformState::Resizing {
            id,
            original,
            live,
            committed,
            ..
        } = self.state
        else {
            return None;
        };
        self.state = TransformState::Attached { id };
        self.guides.clear();
        if live == original && !committed {
            return None;
        }
        if scene.update(id, ShapePatch::resized_to(live)) {
            info!("Resized {} to {:?}", id, live);
            Some(id)
        } else {
            self.detach();
            None
        }
    }

    /// Ends whatever gesture is running. Returns the shape whose geometry changed.
    pub fn end_gesture(&mut self, scene: &mut Scene) -> Option<ShapeId> {
        match self.state {
            TransformState::Dragging { .. } => self.end_drag(scene),
            TransformState::Resizing { .. } => self.end_resize(scene),
            _ => None,
        }
    }

    /// Writes the live geometry into the scene without ending the gesture.
    pub fn commit_live(&mut self, scene: &mut Scene) -> Option<ShapeId> {
        let (id, patch, committed) = match &mut self.state {
            TransformState::Dragging {
                id, live, committed, ..
            } => (*id, ShapePatch::moved_to(*live), committed),
            TransformState::Resizing {
                id, live, committed, ..
            } => (*id, ShapePatch::resized_to(*live), committed),
            _ => return None,
        };
        if !scene.update(id, patch) {
            return None;
        }
        *committed = true;
        Some(id)
    }

    /// Box to draw for `id`: the live one during a gesture, otherwise the stored one.
    pub fn live_bounds(&self, id: ShapeId, scene: &Scene) -> Option<Rect> {
        let shape = scene.find(id)?;
        let rect = shape.rect();
        match self.state {
            TransformState::Dragging { id: active, live, .. } if active == id => {
                Some(rect.translate(live - shape.geometry().position))
            }
            TransformState::Resizing { id: active, live, .. } if active == id => Some(live),
            _ => Some(rect),
        }
    }

    /// Handle under `pos` on the attached shape, if handles are shown.
    pub fn handle_at(&self, pos: Pos2, scene: &Scene, view_scale: f32) -> Option<Corner> {
        if !self.handles_visible {
            return None;
        }
        let id = self.attached_id()?;
        let bounds = self.live_bounds(id, scene)?;
        corner_at(pos, bounds, self.anchor_size, view_scale)
    }

    /// Handle squares for the attached shape, in canvas units
    pub fn handle_rects(&self, scene: &Scene, view_scale: f32) -> Vec<(Corner, Rect)> {
        if !self.handles_visible {
            return Vec::new();
        }
        let Some(bounds) = self
            .attached_id()
            .and_then(|id| self.live_bounds(id, scene))
        else {
            return Vec::new();
        };
        Corner::ALL
            .into_iter()
            .map(|corner| (corner, handle_rect(corner, bounds, self.anchor_size, view_scale)))
            .collect()
    }
}

fn set_edge(rect: &mut Rect, orientation: Orientation, kind: snapping::SnapKind, value: f32) {
    use snapping::SnapKind;
    match (orientation, kind) {
        (Orientation::Vertical, SnapKind::Start) => rect.min.x = value,
        (Orientation::Vertical, _) => rect.max.x = value,
        (Orientation::Horizontal, SnapKind::Start) => rect.min.y = value,
        (Orientation::Horizontal, _) => rect.max.y = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Geometry, Shape, TextShape, TextStyle};
    use crate::id_generator::generate_id;

    fn text_at(scene: &mut Scene, x: f32, y: f32, w: f32, h: f32) -> ShapeId {
        let shape = TextShape::new(
            generate_id(),
            Geometry::new(Pos2::new(x, y), Vec2::new(w, h)),
            TextStyle::with_text("hi"),
        );
        scene.add(Shape::Text(shape))
    }

    #[test]
    fn test_gesture_requires_attachment() {
        let scene = Scene::default();
        let mut controller = TransformController::new();
        assert_eq!(
            controller.begin_drag(Pos2::ZERO, &scene),
            Err(TransitionError::NotAttached { gesture: "drag" })
        );
    }

    #[test]
    fn test_second_gesture_is_rejected() {
        let mut scene = Scene::default();
        let id = text_at(&mut scene, 1000.0, 500.0, 100.0, 50.0);
        let mut controller = TransformController::new();
        controller.sync_selection(Some(id), &scene);

        controller.begin_drag(Pos2::new(1010.0, 510.0), &scene).unwrap();
        let err = controller
            .begin_resize(Corner::TopLeft, Pos2::new(1000.0, 500.0), &scene)
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::GestureInProgress {
                active: "drag",
                requested: "resize"
            }
        );
    }

    #[test]
    fn test_drag_snaps_and_commits_once() {
        let mut scene = Scene::default();
        text_at(&mut scene, 300.0, 100.0, 50.0, 50.0);
        let id = text_at(&mut scene, 1000.0, 500.0, 50.0, 50.0);
        let mut controller = TransformController::new();
        controller.sync_selection(Some(id), &scene);

        controller.begin_drag(Pos2::new(1010.0, 510.0), &scene).unwrap();
        let result = controller.drag_to(Pos2::new(308.0, 109.0), &scene).unwrap();
        assert_eq!(result.position, Pos2::new(300.0, 100.0));
        assert_eq!(controller.guides().len(), 2);
        // Scene untouched mid-gesture
        assert_eq!(scene.find(id).unwrap().geometry().position, Pos2::new(1000.0, 500.0));

        assert_eq!(controller.end_drag(&mut scene), Some(id));
        assert_eq!(scene.find(id).unwrap().geometry().position, Pos2::new(300.0, 100.0));
        assert!(controller.guides().is_empty());
        assert_eq!(controller.end_drag(&mut scene), None);
    }

    #[test]
    fn test_resize_snaps_moving_edge_only() {
        let mut scene = Scene::default();
        text_at(&mut scene, 600.0, 900.0, 10.0, 10.0);
        let id = text_at(&mut scene, 400.0, 400.0, 100.0, 100.0);
        let mut controller = TransformController::new();
        controller.sync_selection(Some(id), &scene);

        controller
            .begin_resize(Corner::BottomRight, Pos2::new(500.0, 500.0), &scene)
            .unwrap();
        let rect = controller.resize_to(Pos2::new(597.0, 540.0), &scene).unwrap();
        assert_eq!(rect.min, Pos2::new(400.0, 400.0));
        assert_eq!(rect.max, Pos2::new(600.0, 540.0));

        controller.end_resize(&mut scene);
        let geometry = *scene.find(id).unwrap().geometry();
        assert_eq!(geometry.size, Vec2::new(200.0, 140.0));
        assert_eq!(geometry.scale, Vec2::splat(1.0));
    }

    #[test]
    fn test_vanished_shape_detaches() {
        let mut scene = Scene::default();
        let id = text_at(&mut scene, 1000.0, 500.0, 50.0, 50.0);
        let mut controller = TransformController::new();
        controller.sync_selection(Some(id), &scene);
        controller.begin_drag(Pos2::new(1000.0, 500.0), &scene).unwrap();

        scene.remove(id);
        assert!(controller.drag_to(Pos2::new(1200.0, 600.0), &scene).is_none());
        assert_eq!(controller.state(), &TransformState::Idle);
    }
}
