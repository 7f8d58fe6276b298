//! Schematic Router - orthogonal connection routing for schematic editors
//!
//! This library synthesizes axis-aligned routes between connection
//! endpoints, adapts them incrementally while endpoints are dragged, and
//! annotates crossings for drawing.
//!
//! # Example
//!
//! ```rust
//! use schematic_router::{build_route, EndpointState, Point, RouterConfig, Vector};
//!
//! let a = EndpointState::fixed(Point::new(0.0, 0.0), Vector::RIGHT);
//! let b = EndpointState::fixed(Point::new(200.0, 0.0), Vector::LEFT);
//! let built = build_route(&a, &b, &RouterConfig::default());
//! assert_eq!(built.route.points(), &[Point::new(0.0, 0.0), Point::new(200.0, 0.0)]);
//! ```

pub mod error;
pub mod routing;
pub mod scene;

pub use error::Error;
pub use routing::{
    build_route, find_crossings, simplify, snap, snap_point, update_route, BoundingBox,
    BuiltRoute, ConfigError, Crossing, CrossingKind, Endpoint, EndpointId, EndpointState, Point,
    Route, RouteUpdate, RouteView, RouterConfig, UpdateKind, Vector, EPSILON,
};
pub use scene::{Port, PortMove, Scene, SceneError, SceneReport};

/// Options for the complete load, edit and report pipeline
#[derive(Debug, Clone, Default)]
pub struct RouteOptions {
    /// Overrides the scene's own `[router]` table
    pub config: Option<RouterConfig>,
    /// Port drags applied in order after the initial routing
    pub moves: Vec<PortMove>,
    /// Include crossing decorations in the report
    pub crossings: bool,
}

impl RouteOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Route with `config` instead of the scene's `[router]` table
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Append a port drag
    pub fn with_move(mut self, request: PortMove) -> Self {
        self.moves.push(request);
        self
    }

    /// Enable or disable crossing output
    pub fn with_crossings(mut self, crossings: bool) -> Self {
        self.crossings = crossings;
        self
    }
}

/// Route a TOML scene and return the TOML report
///
/// # Example
///
/// ```rust
/// use schematic_router::route_scene;
///
/// let report = route_scene(r#"
///     [[port]]
///     name = "a"
///     position = [0, 0]
///     direction = "right"
///
///     [[port]]
///     name = "b"
///     position = [100, 0]
///     direction = "left"
///
///     [[connection]]
///     from = "a"
///     to = "b"
/// "#).unwrap();
///
/// assert!(report.contains("[[route]]"));
/// assert!(report.contains("from = \"a\""));
/// ```
pub fn route_scene(source: &str) -> Result<String, Error> {
    route_scene_with_options(source, &RouteOptions::default())
}

/// Route a TOML scene, apply the requested drags and return the TOML report
///
/// # Example
///
/// ```rust
/// use schematic_router::{route_scene_with_options, RouteOptions};
///
/// let source = r#"
///     [[port]]
///     name = "a"
///     position = [0, 0]
///     direction = "right"
///
///     [[port]]
///     name = "b"
///     position = [100, 0]
///     direction = "left"
///
///     [[connection]]
///     from = "a"
///     to = "b"
/// "#;
/// let options = RouteOptions::new().with_move("b=0,40".parse().unwrap());
/// let report = route_scene_with_options(source, &options).unwrap();
/// assert!(report.contains("update = "));
/// ```
pub fn route_scene_with_options(source: &str, options: &RouteOptions) -> Result<String, Error> {
    let mut scene = Scene::from_toml_str(source)?;

    if let Some(config) = &options.config {
        config.validate()?;
        scene.set_config(config.clone());
    }

    let mut latest = vec![None; scene.connections().len()];
    for request in &options.moves {
        for change in scene.apply_move(request)? {
            latest[change.connection.0] = Some(change.kind);
        }
    }

    let mut report = scene.report(options.crossings);
    for (connection, kind) in latest.into_iter().enumerate() {
        if let Some(kind) = kind {
            report.mark_update(connection, kind);
        }
    }
    Ok(report.to_toml()?)
}
