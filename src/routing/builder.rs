//! Route synthesis between two endpoints
//!
//! A route is grown greedily from endpoint A towards the tip of B's stub
//! (`B + dir_b * min_stub_length`). Every step either reaches that tip or
//! turns 90 degrees, so for axis-aligned exit directions the walk finishes
//! within a handful of steps. An explicit step cap guards against
//! non-terminating walks for arbitrary direction vectors.

use super::config::RouterConfig;
use super::error::RouteError;
use super::grid;
use super::simplify::simplify;
use super::types::{BuiltRoute, EndpointState, Point, Route, Vector, EPSILON};

/// Synthesize an orthogonal route from `a` to `b`.
///
/// Endpoints whose direction is not fixed are turned to face the other
/// endpoint horizontally; the directions actually used are returned
/// alongside the route so the caller can write them back.
pub fn build_route(a: &EndpointState, b: &EndpointState, config: &RouterConfig) -> BuiltRoute {
    let (direction_a, direction_b) = resolve_directions(a, b);

    if a.position.nearly_equals(b.position, EPSILON) {
        return BuiltRoute {
            route: Route::new(vec![a.position, b.position]),
            direction_a,
            direction_b,
        };
    }

    let points = match synthesize(a.position, direction_a, b.position, direction_b, config) {
        Ok(points) => points,
        Err(RouteError::StepLimitExceeded { steps, partial }) => {
            tracing::error!(
                steps,
                from = ?a.position,
                to = ?b.position,
                "route synthesis did not converge, keeping partial path"
            );
            partial
        }
    };

    BuiltRoute {
        route: Route::new(simplify(&pin_ends(points, a.position, b.position))),
        direction_a,
        direction_b,
    }
}

/// Walk from `start` to `end` between resolved exit directions, without
/// pinning or simplifying. Fails only when the step cap is hit.
fn synthesize(
    start: Point,
    direction_a: Vector,
    end: Point,
    direction_b: Vector,
    config: &RouterConfig,
) -> Result<Vec<Point>, RouteError> {
    let walk = Walk {
        target: end + direction_b * config.min_stub_length,
        approach: direction_b,
        stub: config.min_stub_length,
        segment: config.min_segment_length,
        grid: config.grid_size,
    };
    let limit = config.step_limit(start.manhattan_distance(end));
    walk.run(start, direction_a, end, limit)
}

/// Exit directions used for synthesis.
///
/// Free endpoints face the other endpoint along x. Fixed endpoints keep
/// their direction, normalized; a zero direction is a caller bug.
fn resolve_directions(a: &EndpointState, b: &EndpointState) -> (Vector, Vector) {
    let toward_b = if b.position.x > a.position.x {
        Vector::RIGHT
    } else {
        Vector::LEFT
    };
    let toward_a = if a.position.x > b.position.x {
        Vector::RIGHT
    } else {
        Vector::LEFT
    };

    let pick = |endpoint: &EndpointState, guess: Vector| {
        if !endpoint.direction_fixed {
            return guess;
        }
        debug_assert!(
            !endpoint.direction.is_near_zero(),
            "endpoint direction must be a non-zero vector"
        );
        endpoint.direction.try_normalize().unwrap_or(guess)
    };

    (pick(a, toward_b), pick(b, toward_a))
}

/// Force the first and last points onto the endpoints and drop zero-length segments
fn pin_ends(mut points: Vec<Point>, start: Point, end: Point) -> Vec<Point> {
    match points.last() {
        Some(last) if last.nearly_equals(end, EPSILON) => {}
        _ => points.push(end),
    }
    points.dedup_by(|next, prev| next.nearly_equals(*prev, EPSILON));
    if points.len() < 2 {
        points.push(end);
    }
    let last = points.len() - 1;
    points[0] = start;
    points[last] = end;
    points
}

/// Greedy walk towards the tip of B's stub
struct Walk {
    /// Tip of B's stub; the walk ends here and the final segment runs into B
    target: Point,
    /// B's exit direction. Arriving at the tip while moving along it would
    /// fold the route back over the stub.
    approach: Vector,
    stub: f64,
    segment: f64,
    grid: f64,
}

impl Walk {
    fn run(
        &self,
        start: Point,
        direction: Vector,
        end: Point,
        limit: usize,
    ) -> Result<Vec<Point>, RouteError> {
        let mut path = vec![start];
        let mut current = start;
        let mut heading = direction;
        let mut steps = 0;

        while !current.nearly_equals(self.target, EPSILON) {
            if steps >= limit {
                return Err(RouteError::StepLimitExceeded {
                    steps,
                    partial: path,
                });
            }
            steps += 1;

            let (next, next_heading) = self.step(current, heading, path.len() == 1);
            current = next;
            heading = next_heading;
            path.push(current);
        }

        if !self.target.nearly_equals(end, EPSILON) {
            path.push(end);
        }
        Ok(path)
    }

    /// Next corner and the heading used to reach it
    fn step(&self, current: Point, heading: Vector, at_start: bool) -> (Point, Vector) {
        let delta = self.target - current;
        let along = delta.dot(heading);
        let side = delta - heading * along;
        let side_len = side.length();
        // > 0: reaching the tip while still moving along `heading` doubles back over the stub
        let facing = heading.dot(self.approach);

        if side_len <= EPSILON {
            let first_leg_ok =
                !at_start || along >= self.stub - EPSILON || facing <= -1.0 + EPSILON;
            if along > EPSILON && facing <= EPSILON && first_leg_ok {
                return (self.target, heading);
            }
            if at_start {
                return (current + heading * self.stub, heading);
            }
            let turn = self.turn_from(heading);
            return (current + turn * self.segment, turn);
        }

        if at_start {
            let run = if along > EPSILON && delta.dot(self.approach) <= EPSILON {
                along.max(self.stub)
            } else {
                self.stub
            };
            return (current + heading * run, heading);
        }

        let sideways = side * (1.0 / side_len);
        if along > EPSILON {
            if facing > EPSILON {
                // overrun so the final approach comes in from the side
                (current + heading * along, heading)
            } else {
                (current + side, sideways)
            }
        } else if along < -EPSILON {
            if facing >= -EPSILON {
                (current + side, sideways)
            } else {
                // the tip is behind us on the far side of B: go part way
                // across, come back, then finish the remaining offset
                (current + sideways * self.detour_offset(side_len), sideways)
            }
        } else if sideways.dot(self.approach) <= EPSILON {
            (self.target, sideways)
        } else {
            (current + heading * self.segment, heading)
        }
    }

    /// Perpendicular to `heading`, preferring the side the final stub leaves from
    fn turn_from(&self, heading: Vector) -> Vector {
        let ccw = heading.perpendicular_ccw();
        if ccw.dot(self.approach) >= -EPSILON {
            ccw
        } else {
            heading.perpendicular_cw()
        }
    }

    /// Sideways distance for a U-shaped detour across an offset of `side_len`
    fn detour_offset(&self, side_len: f64) -> f64 {
        if side_len >= 2.0 * self.segment {
            grid::snap(side_len / 2.0, self.grid).clamp(self.segment, side_len - self.segment)
        } else {
            side_len + self.segment
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn build(a: EndpointState, b: EndpointState) -> Vec<Point> {
        build_route(&a, &b, &RouterConfig::default())
            .route
            .into_points()
    }

    #[test]
    fn test_facing_endpoints_route_straight() {
        let path = build(
            EndpointState::fixed(p(0.0, 0.0), Vector::RIGHT),
            EndpointState::fixed(p(200.0, 0.0), Vector::LEFT),
        );
        assert_eq!(path, vec![p(0.0, 0.0), p(200.0, 0.0)]);
    }

    #[test]
    fn test_z_shape_turns_near_target() {
        let path = build(
            EndpointState::fixed(p(0.0, 0.0), Vector::RIGHT),
            EndpointState::fixed(p(100.0, 50.0), Vector::LEFT),
        );
        assert_eq!(
            path,
            vec![p(0.0, 0.0), p(80.0, 0.0), p(80.0, 50.0), p(100.0, 50.0)]
        );
    }

    #[test]
    fn test_l_shape_into_upward_port() {
        let path = build(
            EndpointState::fixed(p(0.0, 0.0), Vector::RIGHT),
            EndpointState::fixed(p(100.0, 50.0), Vector::UP),
        );
        assert_eq!(path, vec![p(0.0, 0.0), p(100.0, 0.0), p(100.0, 50.0)]);
    }

    #[test]
    fn test_port_facing_away_is_approached_from_below() {
        let path = build(
            EndpointState::fixed(p(0.0, 0.0), Vector::RIGHT),
            EndpointState::fixed(p(100.0, 50.0), Vector::DOWN),
        );
        assert_eq!(
            path,
            vec![
                p(0.0, 0.0),
                p(20.0, 0.0),
                p(20.0, 70.0),
                p(100.0, 70.0),
                p(100.0, 50.0)
            ]
        );
    }

    #[test]
    fn test_same_direction_goes_around_target() {
        let path = build(
            EndpointState::fixed(p(0.0, 0.0), Vector::RIGHT),
            EndpointState::fixed(p(100.0, 50.0), Vector::RIGHT),
        );
        assert_eq!(
            path,
            vec![p(0.0, 0.0), p(120.0, 0.0), p(120.0, 50.0), p(100.0, 50.0)]
        );
    }

    #[test]
    fn test_target_behind_uses_detour() {
        let path = build(
            EndpointState::fixed(p(0.0, 0.0), Vector::RIGHT),
            EndpointState::fixed(p(30.0, 50.0), Vector::LEFT),
        );
        assert_eq!(
            path,
            vec![
                p(0.0, 0.0),
                p(20.0, 0.0),
                p(20.0, 30.0),
                p(10.0, 30.0),
                p(10.0, 50.0),
                p(30.0, 50.0)
            ]
        );
    }

    #[test]
    fn test_small_offset_detour_overshoots() {
        let path = build(
            EndpointState::fixed(p(0.0, 0.0), Vector::RIGHT),
            EndpointState::fixed(p(-100.0, 10.0), Vector::LEFT),
        );
        assert_eq!(
            path,
            vec![
                p(0.0, 0.0),
                p(20.0, 0.0),
                p(20.0, 20.0),
                p(-120.0, 20.0),
                p(-120.0, 10.0),
                p(-100.0, 10.0)
            ]
        );
    }

    #[test]
    fn test_coincident_endpoints() {
        let path = build(
            EndpointState::fixed(p(50.0, 50.0), Vector::RIGHT),
            EndpointState::fixed(p(50.0, 50.0), Vector::LEFT),
        );
        assert_eq!(path, vec![p(50.0, 50.0), p(50.0, 50.0)]);
    }

    #[test]
    fn test_free_endpoints_face_each_other() {
        let built = build_route(
            &EndpointState::free(p(0.0, 0.0), Vector::LEFT),
            &EndpointState::free(p(100.0, 0.0), Vector::RIGHT),
            &RouterConfig::default(),
        );
        assert_eq!(built.direction_a, Vector::RIGHT);
        assert_eq!(built.direction_b, Vector::LEFT);
        assert_eq!(built.route.points(), &[p(0.0, 0.0), p(100.0, 0.0)]);
    }

    #[test]
    fn test_fixed_direction_is_normalized() {
        let built = build_route(
            &EndpointState::fixed(p(0.0, 0.0), Vector::new(5.0, 0.0)),
            &EndpointState::fixed(p(100.0, 0.0), Vector::LEFT),
            &RouterConfig::default(),
        );
        assert_eq!(built.direction_a, Vector::RIGHT);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "non-zero"))]
    fn test_zero_direction_falls_back_in_release() {
        let built = build_route(
            &EndpointState::fixed(p(0.0, 0.0), Vector::ZERO),
            &EndpointState::fixed(p(100.0, 0.0), Vector::LEFT),
            &RouterConfig::default(),
        );
        assert_eq!(built.direction_a, Vector::RIGHT);
        assert!(built.route.is_well_formed());
    }

    #[test]
    fn test_step_limit_keeps_pinned_partial_path() {
        let config = RouterConfig::default().with_max_steps(1);
        let built = build_route(
            &EndpointState::fixed(p(0.0, 0.0), Vector::RIGHT),
            &EndpointState::fixed(p(30.0, 50.0), Vector::LEFT),
            &config,
        );
        let points = built.route.points();
        assert_eq!(points.first(), Some(&p(0.0, 0.0)));
        assert_eq!(points.last(), Some(&p(30.0, 50.0)));
        assert!(built.route.is_well_formed());
    }

    const AXES: [Vector; 4] = [Vector::RIGHT, Vector::DOWN, Vector::LEFT, Vector::UP];

    #[test]
    fn test_walk_never_hits_step_cap_for_axis_directions() {
        let config = RouterConfig::default();
        let steps = [-120.0, -60.0, -30.0, -10.0, 0.0, 10.0, 30.0, 60.0, 120.0];
        for x in steps {
            for y in steps {
                let end = p(x, y);
                if end.nearly_equals(p(0.0, 0.0), EPSILON) {
                    continue;
                }
                for dir_a in AXES {
                    for dir_b in AXES {
                        let walked = synthesize(p(0.0, 0.0), dir_a, end, dir_b, &config);
                        assert!(
                            matches!(&walked, Ok(points) if points.len() <= 16),
                            "{:?} {:?} -> {:?} {:?}: {:?}",
                            p(0.0, 0.0),
                            dir_a,
                            end,
                            dir_b,
                            walked
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_walk_never_hits_step_cap_for_any_unit_direction() {
        let config = RouterConfig::default();
        let directions = [
            Vector::new(0.6, 0.8),
            Vector::new(-0.28, 0.96),
            Vector::new(1.0, 1.0).normalize(),
            Vector::new(-3.0, -1.0).normalize(),
            Vector::new(0.0, -1.0),
            Vector::new(-1.0, 1e-3).normalize(),
        ];
        let coords = [-50_000.0, -1234.5, -30.0, 0.0, 7.0, 45.0, 20_000.0, 100_000.0];
        let start = p(5.0, 5.0);
        for x in coords {
            for y in coords {
                let end = p(x, y);
                for dir_a in directions {
                    for dir_b in directions {
                        let walked = synthesize(start, dir_a, end, dir_b, &config);
                        assert!(
                            matches!(&walked, Ok(points) if points.len() <= 16),
                            "{:?} {:?} -> {:?} {:?}: {:?}",
                            start,
                            dir_a,
                            end,
                            dir_b,
                            walked
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_pin_ends_removes_duplicates() {
        let points = pin_ends(
            vec![p(0.0, 0.0), p(20.0, 0.0), p(20.0, 0.0), p(20.0, 40.0 - 1e-9)],
            p(0.0, 0.0),
            p(20.0, 40.0),
        );
        assert_eq!(points, vec![p(0.0, 0.0), p(20.0, 0.0), p(20.0, 40.0)]);
    }
}
