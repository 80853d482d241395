//! Nearest-point lookup and tooltip placement.

use crate::geom::{Point, ScreenPoint};
use crate::render::FrameOverlay;
use crate::transform::Transform;

/// Offset of the tooltip box from the pointer, in pixels on both axes.
pub const TOOLTIP_OFFSET: f32 = 10.0;

/// Tooltip for the data point nearest to the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Index of the point in the dataset.
    pub index: usize,
    /// The point itself.
    pub point: Point,
    /// Pointer position that produced the tooltip.
    pub pointer: ScreenPoint,
    /// Label text.
    pub text: String,
}

impl Tooltip {
    /// Top-left corner of the tooltip box.
    pub fn position(&self) -> ScreenPoint {
        ScreenPoint::new(self.pointer.x + TOOLTIP_OFFSET, self.pointer.y + TOOLTIP_OFFSET)
    }

    pub(crate) fn overlay(&self) -> FrameOverlay {
        FrameOverlay {
            highlight: self.point,
            label: self.text.clone(),
            anchor: self.position(),
        }
    }
}

/// Label shown for a point.
pub fn tooltip_text(point: Point) -> String {
    format!("x: {}, y: {}", point.x, point.y)
}

/// Point closest to `query` by Euclidean distance in data space.
///
/// Ties resolve to the earliest point. Non-finite points never match. There is
/// no distance cutoff.
pub fn nearest_point(points: &[Point], query: Point) -> Option<(usize, Point)> {
    if !query.is_finite() {
        return None;
    }
    let mut best: Option<(usize, Point, f64)> = None;
    for (index, point) in points.iter().enumerate() {
        if !point.is_finite() {
            continue;
        }
        let distance = point.distance_sq(query);
        if best.is_none_or(|(_, _, best_distance)| distance < best_distance) {
            best = Some((index, *point, distance));
        }
    }
    best.map(|(index, point, _)| (index, point))
}

/// Tooltip for the pointer, or `None` when there is nothing to show.
pub fn tooltip_at(points: &[Point], transform: &Transform, pointer: ScreenPoint) -> Option<Tooltip> {
    let query = transform.screen_to_data(pointer)?;
    let (index, point) = nearest_point(points, query)?;
    Some(Tooltip {
        index,
        point,
        pointer,
        text: tooltip_text(point),
    })
}
