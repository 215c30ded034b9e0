use egui::{Color32, Pos2, Rect, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Element, ShapeKind};
use crate::fonts::{DEFAULT_FONT_FAMILY, FontVariant};
use crate::id_generator::ShapeId;
use crate::shape::common::Geometry;

pub const DEFAULT_TEXT: &str = "Text";
pub const DEFAULT_TEXT_SIZE: Vec2 = Vec2::new(800.0, 400.0);
pub const DEFAULT_FONT_SIZE: f32 = 280.0;
/// Inner spacing between the text box edge and the glyphs
pub const TEXT_PADDING: f32 = 64.0;

/// New texts land somewhere in `[0, 500) x [0, 200)` so repeated adds don't stack exactly.
const PLACEMENT_RANGE: Vec2 = Vec2::new(500.0, 200.0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub const ALL: [TextAlign; 3] = [TextAlign::Left, TextAlign::Center, TextAlign::Right];

    pub fn label(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }

    /// Horizontal offset of a line of `line_width` inside a box of `box_width`
    pub fn line_offset(&self, box_width: f32, line_width: f32) -> f32 {
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Center => (box_width - line_width) / 2.0,
            TextAlign::Right => box_width - line_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub text: String,
    pub fill: Color32,
    pub font_size: f32,
    pub font_family: String,
    pub font_style: FontVariant,
    pub align: TextAlign,
    pub line_height: f32,
}

impl TextStyle {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fill: Color32::BLACK,
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            font_style: FontVariant::Normal,
            align: TextAlign::Left,
            line_height: 1.0,
        }
    }
}

/// Partial update of a text style, `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStylePatch {
    pub text: Option<String>,
    pub fill: Option<Color32>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub font_style: Option<FontVariant>,
    pub align: Option<TextAlign>,
    pub line_height: Option<f32>,
}

impl TextStylePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, style: &mut TextStyle) {
        if let Some(text) = self.text {
            style.text = text;
        }
        if let Some(fill) = self.fill {
            style.fill = fill;
        }
        if let Some(font_size) = self.font_size {
            style.font_size = font_size.max(1.0);
        }
        if let Some(font_family) = self.font_family {
            style.font_family = font_family;
        }
        if let Some(font_style) = self.font_style {
            style.font_style = font_style;
        }
        if let Some(align) = self.align {
            style.align = align;
        }
        if let Some(line_height) = self.line_height {
            style.line_height = line_height.max(0.0);
        }
    }
}

/// Text block placed on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    id: ShapeId,
    pub(crate) geometry: Geometry,
    pub(crate) style: TextStyle,
}

impl TextShape {
    pub fn new(id: ShapeId, geometry: Geometry, style: TextStyle) -> Self {
        Self { id, geometry, style }
    }

    /// Default-sized text at a random spot near the top-left of the canvas
    pub fn placed<R: Rng + ?Sized>(id: ShapeId, text: impl Into<String>, rng: &mut R) -> Self {
        let position = Pos2::new(
            rng.random_range(0..PLACEMENT_RANGE.x as u32) as f32,
            rng.random_range(0..PLACEMENT_RANGE.y as u32) as f32,
        );
        Self::new(
            id,
            Geometry::new(position, DEFAULT_TEXT_SIZE),
            TextStyle::with_text(text),
        )
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Lines in draw order. An empty string still yields one empty line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.style.text.split('\n')
    }
}

impl Element for TextShape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Text
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
