//! A minimal editor scene around the router
//!
//! The scene owns ports, component outlines and connections, and drives the
//! routing functions the way an editor would: build every route on load,
//! update the affected routes after a drag, and query crossings for drawing.

mod error;
mod file;
mod report;

pub use error::SceneError;
pub use report::{CrossingEntry, RouteEntry, SceneReport};

use std::collections::HashMap;
use std::str::FromStr;

use rayon::prelude::*;

use crate::routing::{
    build_route, find_crossings, update_route, BoundingBox, Crossing, Endpoint, EndpointId,
    EndpointState, Point, Route, RouteView, RouterConfig, UpdateKind, Vector,
};

/// A connectable terminal, optionally mounted on a component
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub name: String,
    /// Index of the component the port moves with
    pub component: Option<usize>,
    pub position: Point,
    pub direction: Vector,
    pub fixed: bool,
}

impl Port {
    /// Port whose direction is locked by the side it is mounted on
    pub fn new(name: impl Into<String>, position: Point, direction: Vector) -> Self {
        Self {
            name: name.into(),
            component: None,
            position,
            direction,
            fixed: true,
        }
    }

    /// Let the router pick the exit direction
    pub fn free(mut self) -> Self {
        self.fixed = false;
        self
    }

    pub fn on_component(mut self, component: usize) -> Self {
        self.component = Some(component);
        self
    }
}

impl Endpoint for Port {
    fn position(&self) -> Point {
        self.position
    }

    fn direction(&self) -> Vector {
        self.direction
    }

    fn is_direction_fixed(&self) -> bool {
        self.fixed
    }

    fn set_direction(&mut self, direction: Vector) {
        self.direction = direction;
    }
}

/// Outline of a component; routes passing through it are drawn as tunnels
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    pub bounds: BoundingBox,
}

/// Handle identifying a connection within a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub usize);

/// A routed wire between two ports
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: EndpointId,
    pub to: EndpointId,
    pub route: Route,
    pub thick: bool,
}

/// What happened to one connection after an endpoint moved
#[derive(Debug, Clone, PartialEq)]
pub struct RouteChange {
    pub connection: ConnectionId,
    pub before: Route,
    pub after: Route,
    pub kind: UpdateKind,
}

/// A requested drag of a named port, parsed from `PORT=DX,DY`
#[derive(Debug, Clone, PartialEq)]
pub struct PortMove {
    pub port: String,
    pub delta: Vector,
}

impl FromStr for PortMove {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SceneError::InvalidMove(s.to_string());
        let (port, delta) = s.split_once('=').ok_or_else(invalid)?;
        let (dx, dy) = delta.split_once(',').ok_or_else(invalid)?;
        let dx: f64 = dx.trim().parse().map_err(|_| invalid())?;
        let dy: f64 = dy.trim().parse().map_err(|_| invalid())?;
        let port = port.trim();
        if port.is_empty() || !dx.is_finite() || !dy.is_finite() {
            return Err(invalid());
        }
        Ok(PortMove {
            port: port.to_string(),
            delta: Vector::new(dx, dy),
        })
    }
}

/// Ports, outlines and routed connections
#[derive(Debug, Default)]
pub struct Scene {
    config: RouterConfig,
    ports: Vec<Port>,
    components: Vec<Component>,
    connections: Vec<Connection>,
    port_names: HashMap<String, EndpointId>,
    component_names: HashMap<String, usize>,
}

impl Scene {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Replace the configuration and reroute every connection from scratch
    pub fn set_config(&mut self, config: RouterConfig) {
        self.config = config;
        self.route_all();
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn port(&self, id: EndpointId) -> Option<&Port> {
        self.ports.get(id.0)
    }

    pub fn port_id(&self, name: &str) -> Option<EndpointId> {
        self.port_names.get(name).copied()
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0)
    }

    pub fn add_component(
        &mut self,
        name: impl Into<String>,
        bounds: BoundingBox,
    ) -> Result<usize, SceneError> {
        let name = name.into();
        if self.component_names.contains_key(&name) {
            return Err(SceneError::DuplicateName(name));
        }
        let index = self.components.len();
        self.component_names.insert(name.clone(), index);
        self.components.push(Component { name, bounds });
        Ok(index)
    }

    /// Register a port; its direction is normalized and must not be zero
    pub fn add_port(&mut self, mut port: Port) -> Result<EndpointId, SceneError> {
        if self.port_names.contains_key(&port.name) {
            return Err(SceneError::DuplicateName(port.name));
        }
        if let Some(component) = port.component {
            if component >= self.components.len() {
                return Err(SceneError::UnknownComponent(format!("#{component}")));
            }
        }
        port.direction = match port.direction.try_normalize() {
            Some(direction) if direction.x.is_finite() && direction.y.is_finite() => direction,
            _ => return Err(SceneError::invalid_direction(&port.name, "zero vector")),
        };

        let id = EndpointId(self.ports.len());
        self.port_names.insert(port.name.clone(), id);
        self.ports.push(port);
        Ok(id)
    }

    /// Connect two ports and route the new wire.
    ///
    /// Directions chosen for free ports are written back to them.
    pub fn connect(
        &mut self,
        from: EndpointId,
        to: EndpointId,
        thick: bool,
    ) -> Result<ConnectionId, SceneError> {
        let a = self.state(from)?;
        let b = self.state(to)?;
        let built = build_route(&a, &b, &self.config);
        self.ports[from.0].apply_direction(built.direction_a);
        self.ports[to.0].apply_direction(built.direction_b);

        let id = ConnectionId(self.connections.len());
        tracing::debug!(
            connection = id.0,
            points = built.route.len(),
            "routed new connection"
        );
        self.connections.push(Connection {
            id,
            from,
            to,
            route: built.route,
            thick,
        });
        Ok(id)
    }

    /// Rebuild every route from scratch in parallel
    pub fn route_all(&mut self) {
        let config = &self.config;
        let snapshots: Vec<(EndpointState, EndpointState)> = self
            .connections
            .iter()
            .map(|c| {
                (
                    EndpointState::of(&self.ports[c.from.0]),
                    EndpointState::of(&self.ports[c.to.0]),
                )
            })
            .collect();

        let built: Vec<_> = snapshots
            .par_iter()
            .map(|(a, b)| build_route(a, b, config))
            .collect();

        for (connection, built) in self.connections.iter_mut().zip(built) {
            self.ports[connection.from.0].apply_direction(built.direction_a);
            self.ports[connection.to.0].apply_direction(built.direction_b);
            connection.route = built.route;
        }
        tracing::debug!(connections = self.connections.len(), "routed scene");
    }

    /// Move a port to `position` and update every connection attached to it
    pub fn move_port(
        &mut self,
        id: EndpointId,
        position: Point,
    ) -> Result<Vec<RouteChange>, SceneError> {
        let port = self
            .ports
            .get_mut(id.0)
            .ok_or(SceneError::UnknownEndpoint(id.0))?;
        port.position = position;
        Ok(self.reroute(&[id]))
    }

    /// Move a port by `delta`, looked up by name
    pub fn apply_move(&mut self, request: &PortMove) -> Result<Vec<RouteChange>, SceneError> {
        let id = self
            .port_id(&request.port)
            .ok_or_else(|| SceneError::UnknownPort(request.port.clone()))?;
        let position = self.ports[id.0].position + request.delta;
        self.move_port(id, position)
    }

    /// Move a component outline by `delta` together with its mounted ports
    pub fn move_component(
        &mut self,
        index: usize,
        delta: Vector,
    ) -> Result<Vec<RouteChange>, SceneError> {
        let component = self
            .components
            .get_mut(index)
            .ok_or_else(|| SceneError::UnknownComponent(format!("#{index}")))?;
        component.bounds = component.bounds.translated(delta);

        let mut moved = Vec::new();
        for (i, port) in self.ports.iter_mut().enumerate() {
            if port.component == Some(index) {
                port.position = port.position + delta;
                moved.push(EndpointId(i));
            }
        }
        Ok(self.reroute(&moved))
    }

    /// Crossings of one connection with every other connection and with the
    /// outlines of components it is not attached to
    pub fn crossings(&self, id: ConnectionId) -> Result<Vec<Crossing>, SceneError> {
        let connection = self
            .connection(id)
            .ok_or(SceneError::UnknownConnection(id.0))?;
        Ok(self.crossings_of(connection))
    }

    /// Crossings of a connection owned by this scene; its ports always exist
    pub(crate) fn crossings_of(&self, connection: &Connection) -> Vec<Crossing> {
        let view = Self::view(connection);
        let others: Vec<RouteView> = self
            .connections
            .iter()
            .filter(|c| c.id != connection.id)
            .map(Self::view)
            .collect();

        let own = [
            self.ports[connection.from.0].component,
            self.ports[connection.to.0].component,
        ];
        let obstacles: Vec<BoundingBox> = self
            .components
            .iter()
            .enumerate()
            .filter(|(index, _)| !own.contains(&Some(*index)))
            .map(|(_, component)| component.bounds)
            .collect();

        find_crossings(&view, &others, &obstacles, &self.config)
    }

    fn view(connection: &Connection) -> RouteView<'_> {
        RouteView::new(connection.route.points(), connection.from, connection.to)
            .with_thick(connection.thick)
    }

    fn state(&self, id: EndpointId) -> Result<EndpointState, SceneError> {
        self.port(id)
            .map(EndpointState::of)
            .ok_or(SceneError::UnknownEndpoint(id.0))
    }

    /// Run the update ladder on every connection touching `moved`
    fn reroute(&mut self, moved: &[EndpointId]) -> Vec<RouteChange> {
        let Scene {
            config,
            ports,
            connections,
            ..
        } = self;

        let mut changes = Vec::new();
        for connection in connections.iter_mut() {
            if !moved.contains(&connection.from) && !moved.contains(&connection.to) {
                continue;
            }
            let a = EndpointState::of(&ports[connection.from.0]);
            let b = EndpointState::of(&ports[connection.to.0]);
            let update = update_route(&connection.route, &a, &b, config);
            tracing::debug!(
                connection = connection.id.0,
                kind = ?update.kind,
                "updated connection"
            );

            ports[connection.from.0].apply_direction(update.direction_a);
            ports[connection.to.0].apply_direction(update.direction_b);
            let before = std::mem::replace(&mut connection.route, update.route);
            changes.push(RouteChange {
                connection: connection.id,
                before,
                after: connection.route.clone(),
                kind: update.kind,
            });
        }
        changes
    }
}
