use std::sync::Arc;

use egui::{Pos2, Rect};
use image::RgbaImage;

use super::{Element, ShapeKind};
use crate::config::Resolution;
use crate::id_generator::ShapeId;
use crate::shape::common::{self, Geometry};

/// A decoded bitmap plus the name it was loaded from.
#[derive(Clone)]
pub struct ImageSource {
    uri: String,
    pixels: Arc<RgbaImage>,
}

// Custom Debug implementation so the pixel buffer is not dumped into logs
impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSource")
            .field("uri", &self.uri)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

impl PartialEq for ImageSource {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl ImageSource {
    pub fn new(uri: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            uri: uri.into(),
            pixels: Arc::new(pixels),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn pixels(&self) -> &Arc<RgbaImage> {
        &self.pixels
    }

    pub fn natural_size(&self) -> egui::Vec2 {
        egui::vec2(self.pixels.width() as f32, self.pixels.height() as f32)
    }
}

/// Image placed on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct ImageShape {
    id: ShapeId,
    pub(crate) geometry: Geometry,
    source: ImageSource,
}

impl ImageShape {
    pub fn new(id: ShapeId, geometry: Geometry, source: ImageSource) -> Self {
        Self { id, geometry, source }
    }

    /// Fits the source inside the canvas and centers it.
    pub fn centered(id: ShapeId, source: ImageSource, resolution: Resolution) -> Self {
        let size = common::fit_to_resolution(source.natural_size(), resolution);
        let position = common::centered_position(size, resolution);
        Self::new(id, Geometry::new(position, size), source)
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }
}

impl Element for ImageShape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Image
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    fn rect(&self) -> Rect {
        self.geometry.bounds()
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.rect().contains(pos)
    }
}
