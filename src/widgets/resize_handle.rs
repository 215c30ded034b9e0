use egui::{Color32, Painter, Rect, Stroke};

const HANDLE_FILL: Color32 = Color32::WHITE;
const HANDLE_BORDER: Color32 = Color32::from_rgb(0x6a, 0x6a, 0xc8);

/// A corner handle of the transform box, already in screen space
pub struct ResizeHandle {
    rect: Rect,
}

impl ResizeHandle {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn paint(&self, painter: &Painter) {
        painter.rect_filled(self.rect, 2.0, HANDLE_FILL);
        painter.rect_stroke(self.rect, 2.0, Stroke::new(1.0, HANDLE_BORDER));
    }

    /// Thin outline around the transformed shape
    pub fn paint_border(painter: &Painter, bounds: Rect) {
        painter.rect_stroke(bounds, 0.0, Stroke::new(1.0, HANDLE_BORDER));
    }
}
