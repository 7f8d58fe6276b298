//! Path simplification: merge runs of collinear segments

use super::types::{Point, EPSILON};

/// Collapse consecutive segments that lie on one line.
///
/// A point is dropped when the segments on either side of it are collinear,
/// whether the second continues the first or doubles back over it, and when
/// it duplicates a neighbour. The first and last points are never removed.
/// Paths with fewer than three points are returned unchanged.
pub fn simplify(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut path: Vec<Point> = Vec::with_capacity(points.len());
    for &point in points {
        // popping can expose an earlier collinear triple, so keep going
        while let [.., start, mid] = path.as_slice() {
            if !is_redundant(*start, *mid, point) {
                break;
            }
            path.pop();
        }
        path.push(point);
    }
    path
}

/// True when `mid` lies on the line through its neighbours, or coincides
/// with one of them
fn is_redundant(start: Point, mid: Point, end: Point) -> bool {
    let d1 = mid - start;
    let d2 = end - mid;
    let cross = d1.x * d2.y - d1.y * d2.x;
    cross.abs() <= EPSILON * d1.length().max(1.0) * d2.length().max(1.0)
}

/// True when some three consecutive points lie on one line
pub fn has_collinear_triple(points: &[Point]) -> bool {
    points.windows(3).any(|w| is_redundant(w[0], w[1], w[2]))
}
