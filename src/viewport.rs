//! Mapping between canvas units and screen points.

use egui::{Pos2, Rect, Vec2};

use crate::config::{ASPECT_RATIO, Resolution};
use crate::util::Debounced;

/// Where the canvas sits on screen and how much it is zoomed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageView {
    /// Screen position of canvas point (0, 0)
    pub origin: Pos2,
    pub scale: f32,
}

impl Default for StageView {
    fn default() -> Self {
        Self::unit()
    }
}

impl StageView {
    pub fn unit() -> Self {
        Self {
            origin: Pos2::ZERO,
            scale: 1.0,
        }
    }

    pub fn new(origin: Pos2, scale: f32) -> Self {
        Self { origin, scale }
    }

    pub fn to_screen(&self, pos: Pos2) -> Pos2 {
        self.origin + pos.to_vec2() * self.scale
    }

    pub fn to_stage(&self, pos: Pos2) -> Pos2 {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        ((pos - self.origin) / scale).to_pos2()
    }

    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max))
    }
}

/// Zoom that fits a canvas of `resolution` into a container `width` points wide
pub fn fit_scale(width: f32, resolution: Resolution) -> f32 {
    let width = width.max(0.0);
    (width / resolution.width).min(ASPECT_RATIO * width / resolution.height)
}

/// On-screen canvas size for a container `width` points wide
pub fn canvas_size(width: f32) -> Vec2 {
    Vec2::new(width, ASPECT_RATIO * width)
}

/// Container width, debounced so a window drag doesn't rescale every frame.
#[derive(Debug, Clone)]
pub struct Viewport {
    width: Debounced<f32>,
    resolution: Resolution,
}

impl Viewport {
    pub fn new(initial_width: f32, resolution: Resolution, debounce_secs: f64) -> Self {
        Self {
            width: Debounced::new(initial_width, debounce_secs),
            resolution,
        }
    }

    pub fn width(&self) -> f32 {
        *self.width.value()
    }

    pub fn scale(&self) -> f32 {
        fit_scale(self.width(), self.resolution)
    }

    pub fn size(&self) -> Vec2 {
        canvas_size(self.width())
    }

    /// Feed the current container width. Returns whether the settled width changed.
    pub fn observe(&mut self, width: f32, now: f64) -> bool {
        self.width.signal(width, now);
        self.width.poll(now)
    }

    /// Seconds until a pending resize lands
    pub fn pending_for(&self, now: f64) -> Option<f64> {
        self.width.remaining(now)
    }

    pub fn view_at(&self, origin: Pos2) -> StageView {
        StageView::new(origin, self.scale())
    }
}
