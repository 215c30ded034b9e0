use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

mod common;
pub(crate) mod image;
pub(crate) mod text;

pub use common::{Geometry, centered_position, fit_to_resolution};
pub use image::{ImageShape, ImageSource};
pub use text::{DEFAULT_TEXT, TEXT_PADDING, TextAlign, TextShape, TextStyle, TextStylePatch};

use crate::id_generator::ShapeId;

/// Discriminator for the two shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Image,
    Text,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Image => "image",
            ShapeKind::Text => "text",
        }
    }
}

/// Common trait that all shape kinds implement
pub trait Element {
    /// Get the unique identifier for this shape
    fn id(&self) -> ShapeId;

    fn kind(&self) -> ShapeKind;

    fn geometry(&self) -> &Geometry;

    fn geometry_mut(&mut self) -> &mut Geometry;

    /// Bounding box in canvas units, scale applied
    fn rect(&self) -> Rect;

    /// Test if the shape contains the given canvas position
    fn hit_test(&self, pos: Pos2) -> bool;
}

/// A placed scene object
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Image(ImageShape),
    Text(TextShape),
}

impl Element for Shape {
    fn id(&self) -> ShapeId {
        match self {
            Shape::Image(i) => i.id(),
            Shape::Text(t) => t.id(),
        }
    }

    fn kind(&self) -> ShapeKind {
        match self {
            Shape::Image(_) => ShapeKind::Image,
            Shape::Text(_) => ShapeKind::Text,
        }
    }

    fn geometry(&self) -> &Geometry {
        match self {
            Shape::Image(i) => i.geometry(),
            Shape::Text(t) => t.geometry(),
        }
    }

    fn geometry_mut(&mut self) -> &mut Geometry {
        match self {
            Shape::Image(i) => i.geometry_mut(),
            Shape::Text(t) => t.geometry_mut(),
        }
    }

    fn rect(&self) -> Rect {
        match self {
            Shape::Image(i) => i.rect(),
            Shape::Text(t) => t.rect(),
        }
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        match self {
            Shape::Image(i) => i.hit_test(pos),
            Shape::Text(t) => t.hit_test(pos),
        }
    }
}

impl Shape {
    pub fn as_text(&self) -> Option<&TextShape> {
        match self {
            Shape::Text(t) => Some(t),
            Shape::Image(_) => None,
        }
    }

    /// Merges `patch` into this shape. Style fields only apply to text shapes.
    pub fn apply(&mut self, patch: ShapePatch) {
        let geometry = self.geometry_mut();
        if let Some(position) = patch.position {
            geometry.position = position;
        }
        if let Some(size) = patch.size {
            geometry.size = size.max(Vec2::ZERO);
        }
        if let Some(scale) = patch.scale {
            geometry.scale = scale;
        }

        match (self, patch.style) {
            (_, None) => {}
            (Shape::Text(text), Some(style)) => style.apply(&mut text.style),
            (Shape::Image(image), Some(_)) => {
                log::debug!("Ignoring text style update for image {}", image.id());
            }
        }
    }
}

/// Partial update for [`Shape::apply`]. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePatch {
    pub position: Option<Pos2>,
    pub size: Option<Vec2>,
    pub scale: Option<Vec2>,
    pub style: Option<TextStylePatch>,
}

impl ShapePatch {
    pub fn moved_to(position: Pos2) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    /// Final geometry of a resize: the visual box becomes the stored size and scale resets to 1.
    pub fn resized_to(rect: Rect) -> Self {
        let mut geometry = Geometry::new(rect.min, rect.size());
        geometry.fold_into(rect);
        Self {
            position: Some(geometry.position),
            size: Some(geometry.size),
            scale: Some(geometry.scale),
            style: None,
        }
    }

    pub fn style(style: TextStylePatch) -> Self {
        Self {
            style: Some(style),
            ..Default::default()
        }
    }

    /// True if applying the patch changes what gets rasterized
    pub fn affects_content(&self) -> bool {
        self.position.is_some()
            || self.size.is_some()
            || self.scale.is_some()
            || self.style.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// What a new shape is built from
#[derive(Debug, Clone)]
pub enum ShapeInit {
    Image(ImageSource),
    Text(String),
}

/// Factory functions for creating shapes
pub mod factory {
    use rand::Rng;

    use super::*;
    use crate::config::Resolution;
    use crate::id_generator::generate_id;

    /// Builds a shape with a fresh id and kind-specific defaults
    pub fn create<R: Rng + ?Sized>(init: ShapeInit, resolution: Resolution, rng: &mut R) -> Shape {
        match init {
            ShapeInit::Image(source) => create_image(source, resolution),
            ShapeInit::Text(text) => create_text(text, rng),
        }
    }

    /// Image scaled down to fit the canvas if needed, then centered
    pub fn create_image(source: ImageSource, resolution: Resolution) -> Shape {
        Shape::Image(ImageShape::centered(generate_id(), source, resolution))
    }

    pub fn create_text<R: Rng + ?Sized>(text: impl Into<String>, rng: &mut R) -> Shape {
        Shape::Text(TextShape::placed(generate_id(), text, rng))
    }
}
