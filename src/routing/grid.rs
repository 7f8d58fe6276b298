//! Grid snapping for route points

use super::types::Point;

/// Round `value` to the nearest multiple of `unit`
pub fn snap(value: f64, unit: f64) -> f64 {
    (value / unit).round() * unit
}

/// Snap both coordinates of a point
pub fn snap_point(point: Point, unit: f64) -> Point {
    Point::new(snap(point.x, unit), snap(point.y, unit))
}
