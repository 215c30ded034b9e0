use egui::{Pos2, Rect};
use log::{debug, info};

use crate::config::{RESOLUTION, Resolution};
use crate::id_generator::ShapeId;
use crate::shape::{Element, Shape, ShapeKind, ShapePatch};

/// Owns every shape on the canvas.
///
/// Shapes are kept per kind. Within a kind, later entries are drawn on top;
/// images are drawn below texts. This is the only place geometry is stored.
#[derive(Debug, Clone)]
pub struct Scene {
    resolution: Resolution,
    images: Vec<Shape>,
    texts: Vec<Shape>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(RESOLUTION)
    }
}

impl Scene {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            images: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.texts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len() + self.texts.len()
    }

    fn layer(&self, kind: ShapeKind) -> &Vec<Shape> {
        match kind {
            ShapeKind::Image => &self.images,
            ShapeKind::Text => &self.texts,
        }
    }

    fn layer_mut(&mut self, kind: ShapeKind) -> &mut Vec<Shape> {
        match kind {
            ShapeKind::Image => &mut self.images,
            ShapeKind::Text => &mut self.texts,
        }
    }

    /// Adds a shape on top of its kind and returns its id
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        info!("➕ Adding {} {} at {:?}", shape.kind().as_str(), id, shape.rect());
        self.layer_mut(shape.kind()).push(shape);
        id
    }

    pub fn find(&self, id: ShapeId) -> Option<&Shape> {
        self.draw_order().find(|shape| shape.id() == id)
    }

    fn find_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.images
            .iter_mut()
            .chain(self.texts.iter_mut())
            .find(|shape| shape.id() == id)
    }

    pub fn kind_of(&self, id: ShapeId) -> Option<ShapeKind> {
        self.find(id).map(|shape| shape.kind())
    }

    /// Merges `patch` into the shape. Unknown ids are ignored and return `false`.
    pub fn update(&mut self, id: ShapeId, patch: ShapePatch) -> bool {
        match self.find_mut(id) {
            Some(shape) => {
                shape.apply(patch);
                true
            }
            None => {
                debug!("Ignoring update for unknown shape {}", id);
                false
            }
        }
    }

    /// Deletes the shape. Unknown ids are ignored and return `false`.
    pub fn remove(&mut self, id: ShapeId) -> bool {
        for layer in [&mut self.images, &mut self.texts] {
            if let Some(index) = layer.iter().position(|shape| shape.id() == id) {
                layer.remove(index);
                info!("🗑️ Removed shape {}", id);
                return true;
            }
        }
        debug!("Ignoring removal of unknown shape {}", id);
        false
    }

    /// Moves the shape to the top of its kind, keeping the order of the others.
    pub fn bring_to_front(&mut self, id: ShapeId) -> bool {
        let Some(kind) = self.kind_of(id) else {
            return false;
        };
        let layer = self.layer_mut(kind);
        if let Some(index) = layer.iter().position(|shape| shape.id() == id) {
            let shape = layer.remove(index);
            layer.push(shape);
        }
        true
    }

    /// Shapes bottom to top
    pub fn draw_order(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.images.iter().chain(self.texts.iter())
    }

    /// Shapes of one kind, bottom to top
    pub fn shapes_of(&self, kind: ShapeKind) -> &[Shape] {
        self.layer(kind)
    }

    /// Top-most shape under `pos`
    pub fn shape_at(&self, pos: Pos2) -> Option<&Shape> {
        self.draw_order().rev().find(|shape| shape.hit_test(pos))
    }

    /// Bounding boxes of every shape except `excluded`, in draw order
    pub fn bounds_except(&self, excluded: ShapeId) -> Vec<Rect> {
        self.draw_order()
            .filter(|shape| shape.id() != excluded)
            .map(|shape| shape.rect())
            .collect()
    }
}
