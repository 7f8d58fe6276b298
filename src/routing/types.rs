//! Core types for the routing engine

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Tolerance used by every geometric comparison in the router
pub const EPSILON: f64 = 1e-6;

/// Compare two scalars within a tolerance
pub fn nearly_equal(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// A 2D point in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point-wise comparison within `epsilon` on both axes
    pub fn nearly_equals(&self, other: Point, epsilon: f64) -> bool {
        nearly_equal(self.x, other.x, epsilon) && nearly_equal(self.y, other.y, epsilon)
    }

    /// Sum of the axis distances to `other`
    pub fn manhattan_distance(&self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// A 2D displacement or direction
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };
    pub const RIGHT: Vector = Vector { x: 1.0, y: 0.0 };
    pub const LEFT: Vector = Vector { x: -1.0, y: 0.0 };
    /// Screen coordinates: y grows downwards
    pub const UP: Vector = Vector { x: 0.0, y: -1.0 };
    pub const DOWN: Vector = Vector { x: 0.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or `None` when the length is ~0.
    ///
    /// Callers pick their own fallback for the degenerate case instead of
    /// dividing by zero.
    pub fn try_normalize(&self) -> Option<Vector> {
        let len = self.length();
        if len <= EPSILON {
            None
        } else {
            Some(Vector::new(self.x / len, self.y / len))
        }
    }

    /// Unit vector, or [`Vector::ZERO`] when the input is degenerate
    pub fn normalize(&self) -> Vector {
        self.try_normalize().unwrap_or(Vector::ZERO)
    }

    /// Projection of `self` onto the unit vector `axis`
    pub fn project_onto(&self, axis: Vector) -> Vector {
        axis * self.dot(axis)
    }

    /// Rotate by +90 degrees
    pub fn perpendicular_ccw(&self) -> Vector {
        Vector::new(-self.y, self.x)
    }

    /// Rotate by -90 degrees
    pub fn perpendicular_cw(&self) -> Vector {
        Vector::new(self.y, -self.x)
    }

    pub fn is_near_zero(&self) -> bool {
        self.length() <= EPSILON
    }

    pub fn nearly_equals(&self, other: Vector, epsilon: f64) -> bool {
        nearly_equal(self.x, other.x, epsilon) && nearly_equal(self.y, other.y, epsilon)
    }

    /// True for vectors lying on the x or y axis
    pub fn is_axis_aligned(&self) -> bool {
        self.x.abs() <= EPSILON || self.y.abs() <= EPSILON
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl Sub for Point {
    type Output = Vector;
    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vector> for Point {
    type Output = Point;
    fn sub(self, rhs: Vector) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An axis-aligned bounding box, used for component outlines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if this bounding box contains a point (edges included)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Same box moved by `delta`
    pub fn translated(&self, delta: Vector) -> BoundingBox {
        BoundingBox::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }
}

/// Handle identifying an endpoint owned by the surrounding editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointId(pub usize);

/// Read interface over a connectable terminal owned by the surrounding editor
pub trait Endpoint {
    fn position(&self) -> Point;
    fn direction(&self) -> Vector;
    fn is_direction_fixed(&self) -> bool;
    fn set_direction(&mut self, direction: Vector);

    /// Write back a direction chosen by the router; fixed endpoints keep theirs
    fn apply_direction(&mut self, direction: Vector) {
        if !self.is_direction_fixed() {
            self.set_direction(direction);
        }
    }
}

/// Snapshot of an endpoint taken right before a routing call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointState {
    pub position: Point,
    pub direction: Vector,
    pub direction_fixed: bool,
}

impl EndpointState {
    pub fn new(position: Point, direction: Vector, direction_fixed: bool) -> Self {
        Self {
            position,
            direction,
            direction_fixed,
        }
    }

    /// Endpoint whose direction is locked by the side it is mounted on
    pub fn fixed(position: Point, direction: Vector) -> Self {
        Self::new(position, direction, true)
    }

    /// Endpoint that may be rotated by the router
    pub fn free(position: Point, direction: Vector) -> Self {
        Self::new(position, direction, false)
    }

    pub fn of(endpoint: &impl Endpoint) -> Self {
        Self::new(
            endpoint.position(),
            endpoint.direction(),
            endpoint.is_direction_fixed(),
        )
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }
}

/// An ordered polyline from endpoint A to endpoint B, both included
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Route(Vec<Point>);

impl Route {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.0.last().copied()
    }

    /// Consecutive point pairs
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    /// Every point moved by `delta`
    pub fn translated(&self, delta: Vector) -> Route {
        Route(self.0.iter().map(|&p| p + delta).collect())
    }

    /// At least two points and no zero-length segment, except for the
    /// two-point route between coincident endpoints.
    pub fn is_well_formed(&self) -> bool {
        match self.0.as_slice() {
            [] | [_] => false,
            [a, b] if a.nearly_equals(*b, EPSILON) => true,
            points => points
                .windows(2)
                .all(|w| !w[0].nearly_equals(w[1], EPSILON)),
        }
    }
}

impl From<Vec<Point>> for Route {
    fn from(points: Vec<Point>) -> Self {
        Route(points)
    }
}

/// Result of synthesizing a route from scratch
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRoute {
    pub route: Route,
    /// Exit direction actually used at A (differs from the input only when A is free)
    pub direction_a: Vector,
    /// Exit direction actually used at B
    pub direction_b: Vector,
}
