//! Crossing detection between a route, other routes and component outlines
//!
//! Read-only query used when drawing: a crossing with a route that shares an
//! endpoint becomes a junction dot, every other crossing becomes an underpass
//! gap. Only a horizontal segment against a vertical one counts as a
//! crossing; parallel pairs are skipped so collinear shared runs are not
//! reported twice.

use super::config::RouterConfig;
use super::types::{BoundingBox, EndpointId, Point, EPSILON};

/// A route as seen by the annotator
#[derive(Debug, Clone, Copy)]
pub struct RouteView<'a> {
    pub points: &'a [Point],
    /// Endpoints at the start and end of the route
    pub endpoints: [EndpointId; 2],
    /// Emphasized lines get wider underpass gaps
    pub thick: bool,
}

impl<'a> RouteView<'a> {
    pub fn new(points: &'a [Point], from: EndpointId, to: EndpointId) -> Self {
        Self {
            points,
            endpoints: [from, to],
            thick: false,
        }
    }

    pub fn with_thick(mut self, thick: bool) -> Self {
        self.thick = thick;
        self
    }

    fn shares_endpoint_with(&self, other: &RouteView) -> bool {
        self.endpoints
            .iter()
            .any(|id| other.endpoints.contains(id))
    }
}

/// How a crossing is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossingKind {
    /// Both wires join here; drawn as a solid dot
    Junction,
    /// Unrelated wires cross; the annotated route leaves `gap` clear on each side
    Underpass { gap: f64 },
    /// The route passes through an outline from `point` to `exit`, drawn
    /// with `gap` clear at both ends
    Tunnel { exit: Point, gap: f64 },
}

/// One decoration on the annotated route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Index of the route segment (`points[segment]..points[segment + 1]`)
    pub segment: usize,
    pub point: Point,
    pub kind: CrossingKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

fn axis_of(start: Point, end: Point) -> Option<Axis> {
    let d = end - start;
    if d.is_near_zero() {
        None
    } else if d.y.abs() <= EPSILON {
        Some(Axis::Horizontal)
    } else if d.x.abs() <= EPSILON {
        Some(Axis::Vertical)
    } else {
        None
    }
}

fn within(value: f64, a: f64, b: f64) -> bool {
    value >= a.min(b) - EPSILON && value <= a.max(b) + EPSILON
}

/// Bounded intersection of a horizontal and a vertical segment
fn intersect(a: (Point, Point), b: (Point, Point)) -> Option<Point> {
    let (h, v) = match (axis_of(a.0, a.1)?, axis_of(b.0, b.1)?) {
        (Axis::Horizontal, Axis::Vertical) => (a, b),
        (Axis::Vertical, Axis::Horizontal) => (b, a),
        _ => return None,
    };
    let x = v.0.x;
    let y = h.0.y;
    (within(x, h.0.x, h.1.x) && within(y, v.0.y, v.1.y)).then(|| Point::new(x, y))
}

/// Entry and exit points of a segment running through `bounds` from one
/// side to the opposite side
fn tunnel(start: Point, end: Point, bounds: &BoundingBox) -> Option<(Point, Point)> {
    match axis_of(start, end)? {
        Axis::Horizontal => {
            let y = start.y;
            let inside = y > bounds.y + EPSILON && y < bounds.bottom() - EPSILON;
            let spans = start.x.min(end.x) <= bounds.x + EPSILON
                && start.x.max(end.x) >= bounds.right() - EPSILON;
            if !(inside && spans) {
                return None;
            }
            let (left, right) = (Point::new(bounds.x, y), Point::new(bounds.right(), y));
            Some(if start.x <= end.x { (left, right) } else { (right, left) })
        }
        Axis::Vertical => {
            let x = start.x;
            let inside = x > bounds.x + EPSILON && x < bounds.right() - EPSILON;
            let spans = start.y.min(end.y) <= bounds.y + EPSILON
                && start.y.max(end.y) >= bounds.bottom() - EPSILON;
            if !(inside && spans) {
                return None;
            }
            let (top, bottom) = (Point::new(x, bounds.y), Point::new(x, bounds.bottom()));
            Some(if start.y <= end.y { (top, bottom) } else { (bottom, top) })
        }
    }
}

fn merge(kept: CrossingKind, found: CrossingKind) -> CrossingKind {
    match (kept, found) {
        (CrossingKind::Junction, _) | (_, CrossingKind::Junction) => CrossingKind::Junction,
        (CrossingKind::Underpass { gap: a }, CrossingKind::Underpass { gap: b }) => {
            CrossingKind::Underpass { gap: a.max(b) }
        }
        (kept, _) => kept,
    }
}

/// All crossings of `route` with `others` and `obstacles`, ordered along the route
pub fn find_crossings(
    route: &RouteView,
    others: &[RouteView],
    obstacles: &[BoundingBox],
    config: &RouterConfig,
) -> Vec<Crossing> {
    let mut crossings: Vec<Crossing> = Vec::new();

    for (segment, w) in route.points.windows(2).enumerate() {
        let ours = (w[0], w[1]);

        for other in others {
            let kind = if route.shares_endpoint_with(other) {
                CrossingKind::Junction
            } else if route.thick && other.thick {
                CrossingKind::Underpass {
                    gap: config.thick_crossing_gap,
                }
            } else {
                CrossingKind::Underpass {
                    gap: config.crossing_gap,
                }
            };

            for o in other.points.windows(2) {
                let Some(point) = intersect(ours, (o[0], o[1])) else {
                    continue;
                };
                // one decoration per point; a junction outranks any underpass there
                let existing = crossings.iter_mut().find(|c| {
                    c.segment == segment
                        && !matches!(c.kind, CrossingKind::Tunnel { .. })
                        && c.point.nearly_equals(point, EPSILON)
                });
                match existing {
                    Some(existing) => existing.kind = merge(existing.kind, kind),
                    None => crossings.push(Crossing {
                        segment,
                        point,
                        kind,
                    }),
                }
            }
        }

        let gap = if route.thick {
            config.thick_crossing_gap
        } else {
            config.crossing_gap
        };
        for bounds in obstacles {
            if let Some((entry, exit)) = tunnel(ours.0, ours.1, bounds) {
                crossings.push(Crossing {
                    segment,
                    point: entry,
                    kind: CrossingKind::Tunnel { exit, gap },
                });
            }
        }
    }

    let points = route.points;
    crossings.sort_by(|a, b| {
        let da = a.point.manhattan_distance(points[a.segment]);
        let db = b.point.manhattan_distance(points[b.segment]);
        a.segment.cmp(&b.segment).then(da.total_cmp(&db))
    });
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    const A: EndpointId = EndpointId(0);
    const B: EndpointId = EndpointId(1);
    const C: EndpointId = EndpointId(2);
    const D: EndpointId = EndpointId(3);

    #[test]
    fn test_unrelated_wires_underpass() {
        let ours = [p(0.0, 10.0), p(100.0, 10.0)];
        let theirs = [p(50.0, 0.0), p(50.0, 20.0)];
        let crossings = find_crossings(
            &RouteView::new(&ours, A, B),
            &[RouteView::new(&theirs, C, D)],
            &[],
            &RouterConfig::default(),
        );
        assert_eq!(
            crossings,
            vec![Crossing {
                segment: 0,
                point: p(50.0, 10.0),
                kind: CrossingKind::Underpass { gap: 4.0 },
            }]
        );
    }

    #[test]
    fn test_shared_endpoint_is_junction() {
        let ours = [p(0.0, 10.0), p(100.0, 10.0)];
        let theirs = [p(50.0, 0.0), p(50.0, 20.0)];
        let crossings = find_crossings(
            &RouteView::new(&ours, A, B),
            &[RouteView::new(&theirs, B, C)],
            &[],
            &RouterConfig::default(),
        );
        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].kind, CrossingKind::Junction);
    }

    #[test]
    fn test_junction_wins_over_underpass_at_same_point() {
        let ours = [p(0.0, 10.0), p(100.0, 10.0)];
        let unrelated = [p(50.0, 0.0), p(50.0, 20.0)];
        let joined = [p(50.0, -10.0), p(50.0, 30.0)];
        let expected = vec![Crossing {
            segment: 0,
            point: p(50.0, 10.0),
            kind: CrossingKind::Junction,
        }];

        let underpass_first = find_crossings(
            &RouteView::new(&ours, A, B),
            &[
                RouteView::new(&unrelated, C, D),
                RouteView::new(&joined, B, C),
            ],
            &[],
            &RouterConfig::default(),
        );
        assert_eq!(underpass_first, expected);

        let junction_first = find_crossings(
            &RouteView::new(&ours, A, B),
            &[
                RouteView::new(&joined, B, C),
                RouteView::new(&unrelated, C, D),
            ],
            &[],
            &RouterConfig::default(),
        );
        assert_eq!(junction_first, expected);
    }

    #[test]
    fn test_coincident_underpasses_keep_widest_gap() {
        let ours = [p(0.0, 10.0), p(100.0, 10.0)];
        let thin = [p(50.0, 0.0), p(50.0, 20.0)];
        let thick = [p(50.0, -10.0), p(50.0, 30.0)];
        let crossings = find_crossings(
            &RouteView::new(&ours, A, B).with_thick(true),
            &[
                RouteView::new(&thin, C, D),
                RouteView::new(&thick, C, D).with_thick(true),
            ],
            &[],
            &RouterConfig::default(),
        );
        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].kind, CrossingKind::Underpass { gap: 6.0 });
    }

    #[test]
    fn test_parallel_overlap_is_ignored() {
        let ours = [p(0.0, 10.0), p(100.0, 10.0)];
        let theirs = [p(20.0, 10.0), p(80.0, 10.0)];
        let crossings = find_crossings(
            &RouteView::new(&ours, A, B),
            &[RouteView::new(&theirs, C, D)],
            &[],
            &RouterConfig::default(),
        );
        assert!(crossings.is_empty());
    }

    #[test]
    fn test_disjoint_segments_do_not_cross() {
        let ours = [p(0.0, 10.0), p(40.0, 10.0)];
        let theirs = [p(50.0, 0.0), p(50.0, 20.0)];
        assert_eq!(intersect((ours[0], ours[1]), (theirs[0], theirs[1])), None);
    }

    #[test]
    fn test_thick_lines_use_wide_gap() {
        let ours = [p(0.0, 10.0), p(100.0, 10.0)];
        let theirs = [p(50.0, 0.0), p(50.0, 20.0)];
        let config = RouterConfig::default();

        let both = find_crossings(
            &RouteView::new(&ours, A, B).with_thick(true),
            &[RouteView::new(&theirs, C, D).with_thick(true)],
            &[],
            &config,
        );
        assert_eq!(both[0].kind, CrossingKind::Underpass { gap: 6.0 });

        let one = find_crossings(
            &RouteView::new(&ours, A, B).with_thick(true),
            &[RouteView::new(&theirs, C, D)],
            &[],
            &config,
        );
        assert_eq!(one[0].kind, CrossingKind::Underpass { gap: 4.0 });
    }

    #[test]
    fn test_crossings_ordered_along_route() {
        let ours = [p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0)];
        let first = [p(70.0, -10.0), p(70.0, 10.0)];
        let second = [p(30.0, -10.0), p(30.0, 10.0)];
        let third = [p(90.0, 50.0), p(110.0, 50.0)];
        let crossings = find_crossings(
            &RouteView::new(&ours, A, B),
            &[
                RouteView::new(&third, C, D),
                RouteView::new(&first, C, D),
                RouteView::new(&second, C, D),
            ],
            &[],
            &RouterConfig::default(),
        );
        let points: Vec<Point> = crossings.iter().map(|c| c.point).collect();
        assert_eq!(points, vec![p(30.0, 0.0), p(70.0, 0.0), p(100.0, 50.0)]);
        assert_eq!(crossings[2].segment, 1);
    }

    #[test]
    fn test_route_through_outline_is_tunnel() {
        let ours = [p(100.0, 30.0), p(0.0, 30.0)];
        let outline = BoundingBox::new(20.0, 0.0, 40.0, 60.0);
        let crossings = find_crossings(
            &RouteView::new(&ours, A, B),
            &[],
            &[outline],
            &RouterConfig::default(),
        );
        assert_eq!(
            crossings,
            vec![Crossing {
                segment: 0,
                point: p(60.0, 30.0),
                kind: CrossingKind::Tunnel {
                    exit: p(20.0, 30.0),
                    gap: 4.0,
                },
            }]
        );
    }

    #[test]
    fn test_route_along_outline_edge_is_not_tunnel() {
        let outline = BoundingBox::new(20.0, 0.0, 40.0, 60.0);
        assert_eq!(tunnel(p(0.0, 0.0), p(100.0, 0.0), &outline), None);
        // enters but ends inside
        assert_eq!(tunnel(p(0.0, 30.0), p(40.0, 30.0), &outline), None);
        assert_eq!(
            tunnel(p(40.0, -10.0), p(40.0, 70.0), &outline),
            Some((p(40.0, 0.0), p(40.0, 60.0)))
        );
    }
}
