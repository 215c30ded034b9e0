use egui::{CursorIcon, Pos2, Rect, Vec2};

use crate::config::{ANCHOR_SIZE, ANCHOR_SIZE_NARROW, MIN_SHAPE_SIZE, NARROW_VIEWPORT_WIDTH};
use crate::snapping::SnapKind;

/// Represents a corner of a selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top_left",
            Corner::TopRight => "top_right",
            Corner::BottomLeft => "bottom_left",
            Corner::BottomRight => "bottom_right",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Corner::TopLeft | Corner::BottomRight => CursorIcon::ResizeNwSe,
            Corner::TopRight | Corner::BottomLeft => CursorIcon::ResizeNeSw,
        }
    }

    /// The corner's point on `rect`
    pub fn position_on(&self, rect: Rect) -> Pos2 {
        match self {
            Corner::TopLeft => rect.left_top(),
            Corner::TopRight => rect.right_top(),
            Corner::BottomLeft => rect.left_bottom(),
            Corner::BottomRight => rect.right_bottom(),
        }
    }

    fn moves_left(&self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    fn moves_top(&self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    /// Which vertical edge (x) this corner drags
    pub fn moving_x_edge(&self) -> SnapKind {
        if self.moves_left() { SnapKind::Start } else { SnapKind::End }
    }

    /// Which horizontal edge (y) this corner drags
    pub fn moving_y_edge(&self) -> SnapKind {
        if self.moves_top() { SnapKind::Start } else { SnapKind::End }
    }
}

/// Handle size in screen pixels; narrow viewports get larger touch targets.
pub fn anchor_size_for(viewport_width: f32) -> f32 {
    if viewport_width <= NARROW_VIEWPORT_WIDTH {
        ANCHOR_SIZE_NARROW
    } else {
        ANCHOR_SIZE
    }
}

/// Handle square centered on the corner, in canvas units.
pub fn handle_rect(corner: Corner, bounds: Rect, anchor_size: f32, view_scale: f32) -> Rect {
    let scale = if view_scale > 0.0 { view_scale } else { 1.0 };
    Rect::from_center_size(corner.position_on(bounds), Vec2::splat(anchor_size / scale))
}

/// First handle containing `pos`, if any
pub fn corner_at(pos: Pos2, bounds: Rect, anchor_size: f32, view_scale: f32) -> Option<Corner> {
    Corner::ALL
        .into_iter()
        .find(|corner| handle_rect(*corner, bounds, anchor_size, view_scale).contains(pos))
}

/// Box after dragging `corner` by `delta`. The opposite corner stays put.
///
/// No minimum is enforced here, the result may be inverted; see [`clamp_to_floor`].
pub fn dragged_rect(original: Rect, corner: Corner, delta: Vec2) -> Rect {
    let mut rect = original;
    if corner.moves_left() {
        rect.min.x = original.min.x + delta.x;
    } else {
        rect.max.x = original.max.x + delta.x;
    }
    if corner.moves_top() {
        rect.min.y = original.min.y + delta.y;
    } else {
        rect.max.y = original.max.y + delta.y;
    }
    rect
}

/// Keeps both dimensions at least [`MIN_SHAPE_SIZE`] by pushing the dragged edges back.
pub fn clamp_to_floor(rect: Rect, corner: Corner) -> Rect {
    let mut rect = rect;
    if rect.width() < MIN_SHAPE_SIZE {
        if corner.moves_left() {
            rect.min.x = rect.max.x - MIN_SHAPE_SIZE;
        } else {
            rect.max.x = rect.min.x + MIN_SHAPE_SIZE;
        }
    }
    if rect.height() < MIN_SHAPE_SIZE {
        if corner.moves_top() {
            rect.min.y = rect.max.y - MIN_SHAPE_SIZE;
        } else {
            rect.max.y = rect.min.y + MIN_SHAPE_SIZE;
        }
    }
    rect
}
