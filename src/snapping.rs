//! Alignment guides for the shape under transform.
//!
//! Every function here is pure and works in canvas units:
//!
//! 1. [`collect_guide_stops`] lists candidate line positions per axis: canvas edges,
//!    canvas center, two side markers, and the edges/centers of every other shape.
//! 2. [`active_snap_edges`] lists the start/center/end edges of the moving shape, each
//!    with the offset from the shape's anchor to that edge.
//! 3. [`compute_guides`] picks, per axis, the closest stop/edge pair within the threshold.
//! 4. [`apply_guides`] moves the anchor so the matched edge sits on the guide:
//!    `anchor = guide.position + guide.offset`.
//!
//! Carrying the offset lets one addition cover all three snap kinds.

use egui::{Pos2, Rect, Vec2};

use crate::config::{GUIDE_LINE_DASH, GUIDE_LINE_EXTENT, GUIDE_LINE_WIDTH};

/// Orientation of the drawn guide line.
///
/// A vertical line marks an x coordinate, a horizontal line a y coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Which edge of the moving shape a guide aligns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapKind {
    Start,
    Center,
    End,
}

impl SnapKind {
    pub const ALL: [SnapKind; 3] = [SnapKind::Start, SnapKind::Center, SnapKind::End];

    /// Coordinate of this edge of `rect` along the axis marked by `orientation`
    pub fn edge_of(&self, rect: Rect, orientation: Orientation) -> f32 {
        let (min, max) = match orientation {
            Orientation::Vertical => (rect.min.x, rect.max.x),
            Orientation::Horizontal => (rect.min.y, rect.max.y),
        };
        match self {
            SnapKind::Start => min,
            SnapKind::Center => min + (max - min) / 2.0,
            SnapKind::End => max,
        }
    }
}

/// Candidate line positions. Duplicates are kept, matching only looks at distance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuideStops {
    /// x coordinates
    pub vertical: Vec<f32>,
    /// y coordinates
    pub horizontal: Vec<f32>,
}

/// One snappable edge of the shape being transformed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEdge {
    pub position: f32,
    /// Anchor coordinate minus edge coordinate
    pub offset: f32,
    pub kind: SnapKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEdges {
    pub vertical: [SnapEdge; 3],
    pub horizontal: [SnapEdge; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub position: f32,
    pub orientation: Orientation,
    pub snap: SnapKind,
    pub offset: f32,
}

/// Result of snapping one pointer-driven anchor position
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub position: Pos2,
    pub guides: Vec<Guide>,
}

/// Gathers stop lines from the canvas and every other shape's bounding box.
pub fn collect_guide_stops(stage: Vec2, others: &[Rect]) -> GuideStops {
    let side = stage.x / 2.0 / 2.5;
    let mut vertical = vec![0.0, stage.x / 2.0, stage.x, side, stage.x - side];
    let mut horizontal = vec![0.0, stage.y / 2.0, stage.y];

    for rect in others {
        let width = rect.width().max(0.0);
        let height = rect.height().max(0.0);
        vertical.extend([rect.min.x, rect.min.x + width, rect.min.x + width / 2.0]);
        horizontal.extend([rect.min.y, rect.min.y + height, rect.min.y + height / 2.0]);
    }

    GuideStops {
        vertical,
        horizontal,
    }
}

/// Start/center/end edges of `bounds` with their offsets from `anchor`.
pub fn active_snap_edges(bounds: Rect, anchor: Pos2) -> SnapEdges {
    let edges = |orientation: Orientation, anchor: f32| {
        SnapKind::ALL.map(|kind| {
            let position = kind.edge_of(bounds, orientation);
            SnapEdge {
                position,
                offset: anchor - position,
                kind,
            }
        })
    };

    SnapEdges {
        vertical: edges(Orientation::Vertical, anchor.x),
        horizontal: edges(Orientation::Horizontal, anchor.y),
    }
}

/// Closest stop/edge pair on one axis within `threshold`.
pub fn match_axis(
    stops: &[f32],
    edges: &[SnapEdge],
    orientation: Orientation,
    threshold: f32,
) -> Option<Guide> {
    let mut best: Option<(f32, Guide)> = None;

    for &stop in stops {
        for edge in edges {
            let diff = (stop - edge.position).abs();
            if diff > threshold {
                continue;
            }
            // Strict comparison: on equal distance the first pair found stays
            if best.is_none_or(|(best_diff, _)| diff < best_diff) {
                best = Some((
                    diff,
                    Guide {
                        position: stop,
                        orientation,
                        snap: edge.kind,
                        offset: edge.offset,
                    },
                ));
            }
        }
    }

    best.map(|(_, guide)| guide)
}

/// At most one guide per axis, vertical first.
///
/// A stop exactly `threshold` away still matches. Ties go to the earliest stop,
/// then to the earliest edge in start/center/end order.
pub fn compute_guides(stops: &GuideStops, edges: &SnapEdges, threshold: f32) -> Vec<Guide> {
    [
        match_axis(&stops.vertical, &edges.vertical, Orientation::Vertical, threshold),
        match_axis(&stops.horizontal, &edges.horizontal, Orientation::Horizontal, threshold),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Overrides the anchor on every axis that has a guide.
pub fn apply_guides(anchor: Pos2, guides: &[Guide]) -> Pos2 {
    let mut snapped = anchor;
    for guide in guides {
        let position = guide.position + guide.offset;
        match guide.orientation {
            Orientation::Vertical => snapped.x = position,
            Orientation::Horizontal => snapped.y = position,
        }
    }
    snapped
}

/// Runs the whole pipeline for a shape whose box is `bounds` and anchor is `anchor`.
pub fn snap(stage: Vec2, others: &[Rect], bounds: Rect, anchor: Pos2, threshold: f32) -> SnapResult {
    let stops = collect_guide_stops(stage, others);
    let edges = active_snap_edges(bounds, anchor);
    let guides = compute_guides(&stops, &edges, threshold);
    SnapResult {
        position: apply_guides(anchor, &guides),
        guides,
    }
}

/// Drawable guide, in canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub orientation: Orientation,
    pub points: [Pos2; 2],
    pub stroke_width: f32,
    pub dash: [f32; 2],
}

/// Lines spanning far past the canvas at every guide.
///
/// Stroke width and dash lengths are divided by `view_scale`, so once the
/// canvas-to-screen zoom is applied they come out at constant screen size.
pub fn guide_lines(guides: &[Guide], view_scale: f32) -> Vec<GuideLine> {
    let scale = if view_scale > 0.0 { view_scale } else { 1.0 };
    guides
        .iter()
        .map(|guide| {
            let points = match guide.orientation {
                Orientation::Horizontal => [
                    Pos2::new(-GUIDE_LINE_EXTENT, guide.position),
                    Pos2::new(GUIDE_LINE_EXTENT, guide.position),
                ],
                Orientation::Vertical => [
                    Pos2::new(guide.position, -GUIDE_LINE_EXTENT),
                    Pos2::new(guide.position, GUIDE_LINE_EXTENT),
                ],
            };
            GuideLine {
                orientation: guide.orientation,
                points,
                stroke_width: GUIDE_LINE_WIDTH / scale,
                dash: GUIDE_LINE_DASH.map(|d| d / scale),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SNAP_THRESHOLD;

    const STAGE: Vec2 = Vec2::new(2835.0, 1181.0);

    fn other() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(200.0, 200.0))
    }

    #[test]
    fn test_stage_stops() {
        let stops = collect_guide_stops(Vec2::new(1000.0, 400.0), &[]);
        assert_eq!(stops.vertical, vec![0.0, 500.0, 1000.0, 200.0, 800.0]);
        assert_eq!(stops.horizontal, vec![0.0, 200.0, 400.0]);
    }

    #[test]
    fn test_other_shape_stops() {
        let stops = collect_guide_stops(STAGE, &[other()]);
        assert_eq!(&stops.vertical[5..], &[100.0, 300.0, 200.0]);
        assert_eq!(&stops.horizontal[3..], &[100.0, 300.0, 200.0]);
    }

    #[test]
    fn test_snap_edges_carry_offsets() {
        let bounds = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(100.0, 50.0));
        let edges = active_snap_edges(bounds, Pos2::new(10.0, 20.0));

        assert_eq!(edges.vertical[0].position, 10.0);
        assert_eq!(edges.vertical[0].offset, 0.0);
        assert_eq!(edges.vertical[1].position, 60.0);
        assert_eq!(edges.vertical[1].offset, -50.0);
        assert_eq!(edges.vertical[2].position, 110.0);
        assert_eq!(edges.vertical[2].offset, -100.0);
        assert_eq!(edges.horizontal[1].position, 45.0);
        assert_eq!(edges.horizontal[2].kind, SnapKind::End);
    }

    #[test]
    fn test_snaps_to_neighbour_edges() {
        let bounds = Rect::from_min_size(Pos2::new(298.0, 99.0), Vec2::new(50.0, 50.0));
        let result = snap(STAGE, &[other()], bounds, bounds.min, SNAP_THRESHOLD);

        assert_eq!(result.position, Pos2::new(300.0, 100.0));
        assert_eq!(result.guides.len(), 2);
        assert_eq!(result.guides[0].orientation, Orientation::Vertical);
        assert_eq!(result.guides[0].position, 300.0);
        assert_eq!(result.guides[1].orientation, Orientation::Horizontal);
        assert_eq!(result.guides[1].position, 100.0);
    }

    #[test]
    fn test_far_position_passes_through() {
        let bounds = Rect::from_min_size(Pos2::new(500.0, 500.0), Vec2::new(10.0, 10.0));
        let result = snap(STAGE, &[other()], bounds, bounds.min, SNAP_THRESHOLD);

        assert_eq!(result.position, Pos2::new(500.0, 500.0));
        assert!(result.guides.is_empty());
    }

    #[test]
    fn test_closer_stop_wins() {
        let stops = GuideStops {
            vertical: vec![104.0, 101.0],
            horizontal: vec![],
        };
        let bounds = Rect::from_min_size(Pos2::new(100.0, 0.0), Vec2::new(1000.0, 1000.0));
        let guides = compute_guides(&stops, &active_snap_edges(bounds, bounds.min), 5.0);

        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0].position, 101.0);
    }

    #[test]
    fn test_tie_goes_to_first_stop() {
        let stops = GuideStops {
            vertical: vec![97.0, 103.0],
            horizontal: vec![],
        };
        let bounds = Rect::from_min_size(Pos2::new(100.0, 0.0), Vec2::new(1000.0, 1000.0));
        let guides = compute_guides(&stops, &active_snap_edges(bounds, bounds.min), 5.0);

        assert_eq!(guides[0].position, 97.0);
    }

    #[test]
    fn test_center_snap_moves_anchor_by_offset() {
        // Center at 148 is 2 away from the canvas-wide stop at 150
        let stops = GuideStops {
            vertical: vec![150.0],
            horizontal: vec![],
        };
        let bounds = Rect::from_min_size(Pos2::new(98.0, 0.0), Vec2::new(100.0, 10.0));
        let guides = compute_guides(&stops, &active_snap_edges(bounds, bounds.min), 5.0);

        assert_eq!(guides[0].snap, SnapKind::Center);
        assert_eq!(apply_guides(bounds.min, &guides), Pos2::new(100.0, 0.0));
    }

    #[test]
    fn test_guide_lines_are_counter_scaled() {
        let guides = [
            Guide {
                position: 300.0,
                orientation: Orientation::Vertical,
                snap: SnapKind::Start,
                offset: 0.0,
            },
            Guide {
                position: 100.0,
                orientation: Orientation::Horizontal,
                snap: SnapKind::Start,
                offset: 0.0,
            },
        ];
        let lines = guide_lines(&guides, 0.5);

        assert_eq!(lines[0].points, [Pos2::new(300.0, -6000.0), Pos2::new(300.0, 6000.0)]);
        assert_eq!(lines[1].points, [Pos2::new(-6000.0, 100.0), Pos2::new(6000.0, 100.0)]);
        assert_eq!(lines[0].stroke_width, 4.0);
        assert_eq!(lines[0].dash, [8.0, 12.0]);
    }
}
