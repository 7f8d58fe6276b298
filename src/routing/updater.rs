//! Incremental repair of an existing route after endpoints moved
//!
//! The ladder, cheapest first:
//! 1. stale or degenerate input is rebuilt from scratch,
//! 2. both ends moved by the same vector: translate every point,
//! 3. one end moved: patch the points next to it, validate, and rebuild
//!    if the patch is not a clean orthogonal route.

use super::builder::build_route;
use super::config::RouterConfig;
use super::grid::snap_point;
use super::simplify::simplify;
use super::types::{EndpointState, Point, Route, Vector, EPSILON};

/// Which rung of the update ladder produced a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// The old route moved as a whole
    Translated,
    /// The points next to the moved endpoint were adjusted
    Patched,
    /// The route was synthesized from scratch
    Rebuilt,
}

/// Result of [`update_route`]
#[derive(Debug, Clone, PartialEq)]
pub struct RouteUpdate {
    pub route: Route,
    pub kind: UpdateKind,
    pub direction_a: Vector,
    pub direction_b: Vector,
}

/// End of a path addressed by offset from that end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathEnd {
    Front,
    Back,
}

impl PathEnd {
    /// Index of the point `offset` steps in from this end
    fn index(self, len: usize, offset: usize) -> usize {
        match self {
            PathEnd::Front => offset,
            PathEnd::Back => len - 1 - offset,
        }
    }
}

/// Adapt `old` to the current endpoint states `a` and `b`
pub fn update_route(
    old: &Route,
    a: &EndpointState,
    b: &EndpointState,
    config: &RouterConfig,
) -> RouteUpdate {
    let points = old.points();
    if points.len() < 2 || is_stale(points, a, b, config) {
        tracing::debug!(points = points.len(), "rebuilding stale route");
        return rebuild(a, b, config);
    }

    let delta_a = a.position - points[0];
    let delta_b = b.position - points[points.len() - 1];

    if delta_a.nearly_equals(delta_b, EPSILON) {
        tracing::debug!(dx = delta_a.x, dy = delta_a.y, "translating route");
        return RouteUpdate {
            route: old.translated(delta_a),
            kind: UpdateKind::Translated,
            direction_a: a.direction,
            direction_b: b.direction,
        };
    }

    let patched = if delta_b.is_near_zero() {
        patch(points, PathEnd::Front, a, delta_a, config)
    } else if delta_a.is_near_zero() {
        patch(points, PathEnd::Back, b, delta_b, config)
    } else {
        None
    };

    match patched.filter(|path| is_clean_route(path, a, b, config)) {
        Some(path) => {
            tracing::debug!(points = path.len(), "patched route");
            RouteUpdate {
                route: Route::new(path),
                kind: UpdateKind::Patched,
                direction_a: a.direction,
                direction_b: b.direction,
            }
        }
        None => {
            tracing::debug!("patch rejected, rebuilding route");
            rebuild(a, b, config)
        }
    }
}

fn rebuild(a: &EndpointState, b: &EndpointState, config: &RouterConfig) -> RouteUpdate {
    let built = build_route(a, b, config);
    RouteUpdate {
        route: built.route,
        kind: UpdateKind::Rebuilt,
        direction_a: built.direction_a,
        direction_b: built.direction_b,
    }
}

/// A detour between facing endpoints that now have room for a direct route
fn is_stale(points: &[Point], a: &EndpointState, b: &EndpointState, config: &RouterConfig) -> bool {
    let (Some(dir_a), Some(dir_b)) = (a.direction.try_normalize(), b.direction.try_normalize())
    else {
        return true;
    };
    let opposite = dir_a.dot(dir_b) <= -1.0 + EPSILON;
    let ahead = (b.position - a.position).dot(dir_a);
    opposite && points.len() > 4 && ahead >= 2.0 * config.min_stub_length - EPSILON
}

/// Move the end of `points` addressed by `end` onto `endpoint`, adjusting
/// its neighbours. Returns the simplified candidate path; the caller
/// validates it.
fn patch(
    points: &[Point],
    end: PathEnd,
    endpoint: &EndpointState,
    delta: Vector,
    config: &RouterConfig,
) -> Option<Vec<Point>> {
    let dir = endpoint.direction.try_normalize()?;
    let mut path = points.to_vec();
    let len = path.len();
    let at = |offset| end.index(len, offset);

    if (4..=6).contains(&len) {
        let leaving = path[at(1)] - path[at(0)];
        let aligned = leaving
            .try_normalize()
            .is_some_and(|d| d.nearly_equals(dir, EPSILON));
        if aligned {
            // slide the stub sideways along the segment it turns into
            let sideways = delta - delta.project_onto(dir);
            path[at(1)] = path[at(1)] + sideways;

            let stub = (path[at(1)] - endpoint.position).dot(dir);
            if stub < config.min_stub_length {
                let push = dir * (config.min_stub_length - stub);
                path[at(1)] = path[at(1)] + push;
                path[at(2)] = path[at(2)] + push;
            }
        }
    }

    path[at(0)] = endpoint.position;
    for point in &mut path[1..len - 1] {
        *point = snap_point(*point, config.grid_size);
    }
    Some(simplify(&path))
}

/// Pinned ends, stubs leaving both endpoints along their directions and at
/// least `min_stub_length` long, no zero-length segments, and every turn a
/// right angle.
pub(crate) fn is_clean_route(
    points: &[Point],
    a: &EndpointState,
    b: &EndpointState,
    config: &RouterConfig,
) -> bool {
    let n = points.len();
    if n < 2
        || !points[0].nearly_equals(a.position, EPSILON)
        || !points[n - 1].nearly_equals(b.position, EPSILON)
    {
        return false;
    }

    let segments: Vec<Vector> = points.windows(2).map(|w| w[1] - w[0]).collect();
    if segments.iter().any(Vector::is_near_zero) {
        return false;
    }

    let stub_ok = |segment: Vector, direction: Vector| {
        direction.try_normalize().is_some_and(|dir| {
            segment.length() >= config.min_stub_length - EPSILON
                && segment.normalize().nearly_equals(dir, EPSILON)
        })
    };
    if !stub_ok(segments[0], a.direction) || !stub_ok(-segments[n - 2], b.direction) {
        return false;
    }

    segments
        .windows(2)
        .all(|w| w[0].normalize().dot(w[1].normalize()).abs() <= EPSILON)
}
