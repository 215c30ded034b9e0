//! Flattens the scene into a single RGBA image at full canvas resolution.

use egui::{Pos2, Rect, Rangef, Vec2};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point as rt_point};
use thiserror::Error;

mod scheduler;
mod slot;

pub use scheduler::RasterScheduler;
pub use slot::TextureSlot;

use crate::config::Resolution;
use crate::fonts::FontRegistry;
use crate::scene::Scene;
use crate::shape::{Element, ImageShape, Shape, TEXT_PADDING, TextShape};

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Invalid raster size {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },
}

/// Produces a flat image of a scene.
pub trait Rasterizer {
    fn rasterize(&mut self, scene: &Scene, fonts: &mut FontRegistry) -> Result<RgbaImage, RasterError>;
}

/// CPU rasterizer. Shapes are drawn in scene draw order at unit scale, whatever
/// zoom the on-screen canvas currently uses.
#[derive(Debug, Clone)]
pub struct SceneRasterizer {
    background: Rgba<u8>,
    filter: FilterType,
}

impl Default for SceneRasterizer {
    fn default() -> Self {
        Self {
            background: Rgba([0, 0, 0, 0]),
            filter: FilterType::Triangle,
        }
    }
}

impl SceneRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn canvas(&self, resolution: Resolution) -> Result<RgbaImage, RasterError> {
        let (width, height) = resolution.pixel_size();
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidResolution { width, height });
        }
        Ok(RgbaImage::from_pixel(width, height, self.background))
    }

    /// Draws the part of `shape` that lies on the canvas. Only that part is resampled,
    /// so a shape blown up far past the canvas costs no more than the canvas itself.
    fn draw_image(&self, canvas: &mut RgbaImage, shape: &ImageShape) {
        let rect = shape.rect();
        let bounds = Rect::from_min_size(
            Pos2::ZERO,
            Vec2::new(canvas.width() as f32, canvas.height() as f32),
        );
        let visible = rect.intersect(bounds);
        let width = visible.width().round() as u32;
        let height = visible.height().round() as u32;
        if !visible.is_positive() || width == 0 || height == 0 {
            return;
        }

        let pixels = shape.source().pixels();
        let (src_width, src_height) = pixels.dimensions();
        let (x0, x1) = source_span(rect.min.x, rect.width(), visible.x_range(), src_width);
        let (y0, y1) = source_span(rect.min.y, rect.height(), visible.y_range(), src_height);
        let crop = imageops::crop_imm(pixels.as_ref(), x0, y0, x1 - x0, y1 - y0).to_image();

        let resized = if crop.dimensions() == (width, height) {
            crop
        } else {
            imageops::resize(&crop, width, height, self.filter)
        };
        imageops::overlay(
            canvas,
            &resized,
            visible.min.x.round() as i64,
            visible.min.y.round() as i64,
        );
    }

    fn draw_text(&self, canvas: &mut RgbaImage, shape: &TextShape, fonts: &mut FontRegistry) {
        let style = shape.style();
        let Some(font) = fonts.font_for(&style.font_family, style.font_style) else {
            log::warn!("No font to draw text {}", shape.id());
            return;
        };

        let geometry = shape.geometry();
        let rect = shape.rect();
        let scale = Scale {
            x: style.font_size * geometry.scale.x,
            y: style.font_size * geometry.scale.y,
        };
        let padding = Vec2::new(TEXT_PADDING * geometry.scale.x, TEXT_PADDING * geometry.scale.y);
        let inner = Rect::from_min_max(rect.min + padding, rect.max - padding);
        let line_step = scale.y * style.line_height;
        let ascent = font.v_metrics(scale).ascent;
        let color = style.fill.to_srgba_unmultiplied();

        let lines = wrap_lines(&font, scale, shape.lines(), inner.width().max(0.0));
        for (index, line) in lines.iter().enumerate() {
            let line_width = measure(&font, scale, line);
            let x = inner.min.x + style.align.line_offset(inner.width(), line_width);
            let baseline = inner.min.y + index as f32 * line_step + ascent;

            for glyph in font.layout(line, scale, rt_point(x, baseline)) {
                let Some(bb) = glyph.pixel_bounding_box() else {
                    continue;
                };
                glyph.draw(|gx, gy, coverage| {
                    let px = bb.min.x + gx as i32;
                    let py = bb.min.y + gy as i32;
                    if px < 0 || py < 0 {
                        return;
                    }
                    let (px, py) = (px as u32, py as u32);
                    if px < canvas.width() && py < canvas.height() {
                        blend(canvas.get_pixel_mut(px, py), color, coverage);
                    }
                });
            }
        }
    }
}

impl Rasterizer for SceneRasterizer {
    fn rasterize(&mut self, scene: &Scene, fonts: &mut FontRegistry) -> Result<RgbaImage, RasterError> {
        let mut canvas = self.canvas(scene.resolution())?;
        for shape in scene.draw_order() {
            match shape {
                Shape::Image(image) => self.draw_image(&mut canvas, image),
                Shape::Text(text) => self.draw_text(&mut canvas, text, fonts),
            }
        }
        log::debug!(
            "Rasterized {} shapes at {}x{}",
            scene.len(),
            canvas.width(),
            canvas.height()
        );
        Ok(canvas)
    }
}

/// Source pixel range `[start, end)` showing `visible` of a span drawn at `origin`
/// with length `extent`. Never empty.
fn source_span(origin: f32, extent: f32, visible: Rangef, source_len: u32) -> (u32, u32) {
    let per_unit = source_len as f32 / extent;
    let start = ((visible.min - origin) * per_unit).floor().max(0.0) as u32;
    let start = start.min(source_len.saturating_sub(1));
    let end = ((visible.max - origin) * per_unit).ceil() as u32;
    (start, end.clamp(start + 1, source_len.max(start + 1)))
}

/// Advance width of one laid-out line
fn measure(font: &Font<'static>, scale: Scale, line: &str) -> f32 {
    font.layout(line, scale, rt_point(0.0, 0.0))
        .last()
        .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Breaks each paragraph at spaces so lines fit `max_width`. A single word wider
/// than the box stays on its own line.
fn wrap_lines<'a>(
    font: &Font<'static>,
    scale: Scale,
    paragraphs: impl Iterator<Item = &'a str>,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in paragraphs {
        let mut current = String::new();
        for word in paragraph.split(' ') {
            let candidate = if current.is_empty() {
                word.to_owned()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && measure(font, scale, &candidate) > max_width {
                lines.push(std::mem::replace(&mut current, word.to_owned()));
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}

fn blend(dst: &mut Rgba<u8>, color: [u8; 4], coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0) * color[3] as f32 / 255.0;
    if alpha <= 0.0 {
        return;
    }
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    for channel in 0..3 {
        let src = color[channel] as f32 * alpha;
        let below = dst[channel] as f32 * dst_alpha * (1.0 - alpha);
        dst[channel] = ((src + below) / out_alpha).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use egui::{Color32, Pos2};

    use super::*;
    use crate::id_generator::generate_id;
    use crate::shape::{Geometry, ImageSource, TextStyle};

    fn small_scene() -> Scene {
        Scene::new(Resolution {
            width: 40.0,
            height: 20.0,
        })
    }

    #[test]
    fn test_image_lands_at_its_position() {
        let mut scene = small_scene();
        let source = ImageSource::new("red.png", RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255])));
        scene.add(Shape::Image(ImageShape::new(
            generate_id(),
            Geometry::new(Pos2::new(10.0, 5.0), Vec2::new(4.0, 4.0)),
            source,
        )));

        let image = SceneRasterizer::new()
            .rasterize(&scene, &mut FontRegistry::without_system_fonts())
            .unwrap();

        assert_eq!(image.dimensions(), (40, 20));
        assert_eq!(image.get_pixel(11, 6), &Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_oversized_image_only_fills_canvas() {
        let mut scene = small_scene();
        let source = ImageSource::new("red.png", RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255])));
        scene.add(Shape::Image(ImageShape::new(
            generate_id(),
            Geometry::new(Pos2::new(-100.0, -100.0), Vec2::new(20000.0, 20000.0)),
            source,
        )));

        let image = SceneRasterizer::new()
            .rasterize(&scene, &mut FontRegistry::without_system_fonts())
            .unwrap();

        assert_eq!(image.dimensions(), (40, 20));
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(39, 19), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_partly_offscreen_image_keeps_its_visible_half() {
        let mut scene = small_scene();
        let mut pixels = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 0, 255]));
        pixels.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        scene.add(Shape::Image(ImageShape::new(
            generate_id(),
            Geometry::new(Pos2::new(-10.0, 0.0), Vec2::new(20.0, 10.0)),
            ImageSource::new("halves.png", pixels),
        )));

        let image = SceneRasterizer::new()
            .rasterize(&scene, &mut FontRegistry::without_system_fonts())
            .unwrap();

        // Only the blue right half lands on the canvas
        assert_eq!(image.get_pixel(0, 5), &Rgba([0, 0, 255, 255]));
        assert_eq!(image.get_pixel(9, 5), &Rgba([0, 0, 255, 255]));
        assert_eq!(image.get_pixel(10, 5)[3], 0);
    }

    #[test]
    fn test_source_span_covers_visible_part() {
        let full = Rangef::new(0.0, 100.0);
        assert_eq!(source_span(0.0, 100.0, full, 50), (0, 50));
        let right_half = Rangef::new(0.0, 10.0);
        assert_eq!(source_span(-10.0, 20.0, right_half, 2), (1, 2));
        let sliver = Rangef::new(0.0, 40.0);
        assert_eq!(source_span(-100.0, 20000.0, sliver, 2), (0, 1));
    }

    #[test]
    fn test_text_uses_fallback_face() {
        let mut scene = Scene::new(Resolution {
            width: 400.0,
            height: 200.0,
        });
        let mut style = TextStyle::with_text("Hi");
        style.font_size = 80.0;
        style.fill = Color32::BLACK;
        scene.add(Shape::Text(TextShape::new(
            generate_id(),
            Geometry::new(Pos2::ZERO, Vec2::new(400.0, 200.0)),
            style,
        )));

        let image = SceneRasterizer::new()
            .rasterize(&scene, &mut FontRegistry::without_system_fonts())
            .unwrap();

        assert!(image.pixels().any(|pixel| pixel[3] > 0));
    }

    #[test]
    fn test_zero_resolution_is_rejected() {
        let scene = Scene::new(Resolution {
            width: 0.0,
            height: 10.0,
        });
        let result = SceneRasterizer::new().rasterize(&scene, &mut FontRegistry::without_system_fonts());
        assert!(matches!(result, Err(RasterError::InvalidResolution { .. })));
    }

    #[test]
    fn test_blend_over_transparent() {
        let mut pixel = Rgba([0, 0, 0, 0]);
        blend(&mut pixel, [10, 20, 30, 255], 1.0);
        assert_eq!(pixel, Rgba([10, 20, 30, 255]));
    }
}
