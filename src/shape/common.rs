use egui::{Pos2, Rect, Vec2};

use crate::config::{MIN_SHAPE_SIZE, Resolution};

/// Geometry shared by every shape kind.
///
/// `position` is the top-left corner in canvas units. `size` is the unscaled box,
/// `scale` multiplies it for rendering and bounding boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub position: Pos2,
    pub size: Vec2,
    pub scale: Vec2,
}

impl Geometry {
    pub fn new(position: Pos2, size: Vec2) -> Self {
        Self {
            position,
            size: size.max(Vec2::ZERO),
            scale: Vec2::splat(1.0),
        }
    }

    /// Rendered size. Negative components collapse to an empty interval.
    pub fn scaled_size(&self) -> Vec2 {
        (self.size * self.scale).max(Vec2::ZERO)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(self.position, self.scaled_size())
    }

    /// Replaces position and size with `rect`, folding any scale into the size.
    pub fn fold_into(&mut self, rect: Rect) {
        self.position = rect.min;
        self.size = clamp_size(rect.size());
        self.scale = Vec2::splat(1.0);
    }
}

pub(crate) fn clamp_size(size: Vec2) -> Vec2 {
    size.max(Vec2::splat(MIN_SHAPE_SIZE))
}

/// Scales `size` down to fit inside the canvas, keeping the aspect ratio.
/// Sizes that already fit are returned untouched.
pub fn fit_to_resolution(size: Vec2, resolution: Resolution) -> Vec2 {
    if size.x <= resolution.width && size.y <= resolution.height {
        return size;
    }
    let ratio = (resolution.width / size.x).min(resolution.height / size.y);
    size * ratio
}

/// Top-left position that centers a box of `size` on the canvas
pub fn centered_position(size: Vec2, resolution: Resolution) -> Pos2 {
    Pos2::new(
        (resolution.width - size.x) / 2.0,
        (resolution.height - size.y) / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RES: Resolution = Resolution {
        width: 2000.0,
        height: 1000.0,
    };

    #[test]
    fn test_small_image_keeps_size() {
        assert_eq!(fit_to_resolution(Vec2::new(300.0, 200.0), RES), Vec2::new(300.0, 200.0));
    }

    #[test]
    fn test_large_image_fits_by_tighter_axis() {
        let fitted = fit_to_resolution(Vec2::new(4000.0, 1000.0), RES);
        assert_eq!(fitted, Vec2::new(2000.0, 500.0));

        let fitted = fit_to_resolution(Vec2::new(1000.0, 4000.0), RES);
        assert_eq!(fitted, Vec2::new(250.0, 1000.0));
    }

    #[test]
    fn test_degenerate_geometry_has_empty_bounds() {
        let mut geometry = Geometry::new(Pos2::new(10.0, 10.0), Vec2::ZERO);
        assert_eq!(geometry.bounds().size(), Vec2::ZERO);

        geometry.scale = Vec2::new(-1.0, 2.0);
        geometry.size = Vec2::new(50.0, 50.0);
        assert_eq!(geometry.scaled_size(), Vec2::new(0.0, 100.0));
    }

    #[test]
    fn test_fold_into_resets_scale() {
        let mut geometry = Geometry::new(Pos2::ZERO, Vec2::new(100.0, 100.0));
        geometry.scale = Vec2::new(2.0, 0.5);

        geometry.fold_into(Rect::from_min_size(Pos2::new(5.0, 6.0), Vec2::new(200.0, 1.0)));

        assert_eq!(geometry.position, Pos2::new(5.0, 6.0));
        assert_eq!(geometry.size, Vec2::new(200.0, MIN_SHAPE_SIZE));
        assert_eq!(geometry.scale, Vec2::splat(1.0));
    }
}
